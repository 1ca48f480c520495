//! Button that swaps its label for a spinner while an action is in flight.
//!
//! Purely presentational: the caller owns `is_loading`.

#[cfg(test)]
#[path = "loader_button_test.rs"]
mod loader_button_test;

use leptos::prelude::*;

/// Label shown for the current loading flag.
pub(crate) fn button_label<'a>(is_loading: bool, text: &'a str, loading_text: &'a str) -> &'a str {
    if is_loading { loading_text } else { text }
}

/// The button is inert while loading, whatever the caller's `disabled` says.
pub(crate) fn is_disabled(is_loading: bool, disabled: Option<bool>) -> bool {
    is_loading || disabled.unwrap_or(false)
}

#[component]
pub fn LoaderButton(
    #[prop(into)] text: String,
    #[prop(into)] loading_text: String,
    #[prop(into)] is_loading: Signal<bool>,
    #[prop(optional, into)] disabled: MaybeProp<bool>,
    #[prop(optional, into)] class: String,
    #[prop(default = "button")] kind: &'static str,
    #[prop(optional)] on_click: Option<Callback<()>>,
) -> impl IntoView {
    let class = format!("loader-button {class}");
    let label = move || button_label(is_loading.get(), &text, &loading_text).to_owned();

    view! {
        <button
            class=class
            type=kind
            disabled=move || is_disabled(is_loading.get(), disabled.get())
            on:click=move |_| {
                if let Some(cb) = on_click.as_ref() {
                    cb.run(());
                }
            }
        >
            <Show when=move || is_loading.get()>
                <span class="spinner" role="status" aria-label="Loading..."></span>
            </Show>
            {label}
        </button>
    }
}
