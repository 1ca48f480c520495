//! Prediction details and the ground-truth override form.

use leptos::prelude::*;

use crate::components::loader_button::LoaderButton;
use crate::state::dashboard::{DashboardState, DefectLabel, format_probability};

#[component]
pub fn DetailCard(dashboard: RwSignal<DashboardState>, on_submit: Callback<()>) -> impl IntoView {
    let has_images = move || dashboard.with(|s| !s.images.is_empty());
    let imgid = move || dashboard.with(|s| s.current_image().map(|i| i.imgid.clone()).unwrap_or_default());
    let prediction = move || {
        dashboard.with(|s| {
            s.current_image()
                .map(|i| format!("Prediction: {} (probability {})", i.prediction, format_probability(i.probability)))
                .unwrap_or_default()
        })
    };
    let override_label = move || dashboard.with(|s| s.override_label);

    let on_select = move |ev: leptos::ev::Event| match event_target_value(&ev).parse::<DefectLabel>() {
        Ok(label) => dashboard.update(|s| s.select_override(label)),
        Err(e) => log::warn!("{e}"),
    };

    view! {
        <Show when=has_images>
            <div class="card card--secondary detail-card">
                <div class="card__header">"Image: " {imgid}</div>
                <div class="card__body">
                    <p>{prediction}</p>
                    {move || {
                        override_label()
                            .map(|label| {
                                view! {
                                    <p class="detail-card__override">
                                        <b>{format!("Override: {label}")}</b>
                                    </p>
                                }
                            })
                    }}
                    <select class="detail-card__actuals" aria-label="actuals" on:change=on_select>
                        <option value="" disabled=true selected=move || override_label().is_none()>
                            "actuals"
                        </option>
                        {DefectLabel::ALL
                            .into_iter()
                            .map(|label| {
                                view! {
                                    <option
                                        value=label.as_str()
                                        selected=move || override_label() == Some(label)
                                    >
                                        {label.as_str()}
                                    </option>
                                }
                            })
                            .collect::<Vec<_>>()}
                    </select>
                </div>
                <div class="card__footer">
                    <LoaderButton
                        text="Submit"
                        loading_text="Submitting…"
                        class="btn btn--success"
                        is_loading=Signal::derive(move || dashboard.with(|s| s.submitting))
                        disabled=Signal::derive(move || !dashboard.with(DashboardState::can_submit))
                        on_click=on_submit
                    />
                </div>
            </div>
        </Show>
    }
}
