//! The image under the cursor with Prev/Next controls.

use leptos::prelude::*;

use crate::net::types::ClientConfig;
use crate::state::dashboard::DashboardState;

#[component]
pub fn ImageCard(dashboard: RwSignal<DashboardState>, config: RwSignal<Option<ClientConfig>>) -> impl IntoView {
    let image_url = move || {
        dashboard.with(|s| {
            let image = s.current_image()?;
            config.with(|c| {
                c.as_ref()
                    .map(|c| c.image_url(&s.selected_fab, &s.selected_camera, &image.imgid))
            })
        })
    };
    let has_images = move || dashboard.with(|s| !s.images.is_empty());

    view! {
        <Show when=has_images>
            <div class="card card--primary image-card">
                <img class="image-card__img" src=move || image_url().unwrap_or_default() alt="Wafer map"/>
                <div class="image-card__nav">
                    <button class="btn btn--outline" on:click=move |_| dashboard.update(DashboardState::prev_image)>
                        "Prev"
                    </button>
                    <button class="btn btn--outline" on:click=move |_| dashboard.update(DashboardState::next_image)>
                        "Next"
                    </button>
                </div>
            </div>
        </Show>
    }
}
