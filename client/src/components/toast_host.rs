//! Toast stack rendered above the page.

use leptos::prelude::*;

use crate::state::toast::{ToastKind, ToastState};

#[cfg(feature = "hydrate")]
const TOAST_LIFETIME_MS: u32 = 4_000;

/// Queue a toast and schedule its removal.
pub fn notify(toasts: RwSignal<ToastState>, kind: ToastKind, text: impl Into<String>) {
    let Some(id) = toasts.try_update(|s| s.push(kind, text)) else {
        return;
    };
    #[cfg(feature = "hydrate")]
    leptos::task::spawn_local(async move {
        gloo_timers::future::TimeoutFuture::new(TOAST_LIFETIME_MS).await;
        toasts.update(|s| s.dismiss(id));
    });
    #[cfg(not(feature = "hydrate"))]
    let _ = id;
}

#[component]
pub fn ToastHost() -> impl IntoView {
    let toasts = expect_context::<RwSignal<ToastState>>();

    view! {
        <div class="toast-host" aria-live="polite">
            {move || {
                toasts
                    .get()
                    .items
                    .into_iter()
                    .map(|toast| {
                        let id = toast.id;
                        let success = toast.kind == ToastKind::Success;
                        let error = toast.kind == ToastKind::Error;
                        view! {
                            <div
                                class="toast"
                                class:toast--success=success
                                class:toast--error=error
                                on:click=move |_| toasts.update(|s| s.dismiss(id))
                            >
                                {toast.text}
                            </div>
                        }
                    })
                    .collect::<Vec<_>>()
            }}
        </div>
    }
}
