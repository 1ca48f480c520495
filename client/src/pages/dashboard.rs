//! Home route: the lander for visitors, the wafer review dashboard for
//! signed-in users.
//!
//! SYSTEM CONTEXT
//! ==============
//! All state transitions live in `state::dashboard`. This page wires DOM
//! events to those transitions and performs the network calls they request,
//! feeding each result back into the same signal.

use leptos::prelude::*;

use crate::components::detail_card::DetailCard;
use crate::components::filter_bar::FilterBar;
use crate::components::image_card::ImageCard;
use crate::components::summary_card::SummaryCard;
use crate::components::toast_host::notify;
use crate::net::api;
use crate::net::types::ClientConfig;
use crate::state::dashboard::{DashboardState, DevicesOutcome, ImageRequest, ImagesOutcome, SubmitOutcome};
use crate::state::session::SessionHandle;
use crate::state::toast::{ToastKind, ToastState};
use crate::util::dates::{local_offset_at, now_local, parse_datetime_local};

#[component]
pub fn DashboardPage() -> impl IntoView {
    let session = expect_context::<SessionHandle>();

    move || {
        if session.is_authenticated() {
            view! { <Dashboard/> }.into_any()
        } else {
            view! { <Lander/> }.into_any()
        }
    }
}

#[component]
fn Lander() -> impl IntoView {
    view! {
        <div class="lander">
            <h1>"Chip Wafer Review"</h1>
        </div>
    }
}

/// Perform an image-list fetch and apply the result if it is still current.
fn spawn_image_fetch(dashboard: RwSignal<DashboardState>, request: Option<ImageRequest>) {
    let Some(ImageRequest { seq, query }) = request else {
        return;
    };
    log::info!(
        "fetching images for fab {} camera {} between {} and {}",
        query.fab,
        query.camera,
        query.fromts,
        query.tots
    );
    leptos::task::spawn_local(async move {
        let result = api::fetch_images(&query).await;
        match dashboard.try_update(|s| s.apply_images(seq, result)) {
            Some(ImagesOutcome::Failed(e)) => log::error!("image list failed: {e}"),
            Some(ImagesOutcome::Stale) => log::debug!("dropped stale image list {seq}"),
            Some(ImagesOutcome::Applied) | None => {}
        }
    });
}

#[component]
fn Dashboard() -> impl IntoView {
    let toasts = expect_context::<RwSignal<ToastState>>();
    let dashboard = RwSignal::new(DashboardState::new(now_local()));
    let config = RwSignal::new(None::<ClientConfig>);

    Effect::new(move || {
        leptos::task::spawn_local(async move {
            match api::fetch_config().await {
                Ok(c) => config.set(Some(c)),
                Err(e) => log::error!("client config failed: {e}"),
            }
            let result = api::fetch_devices().await;
            if let Some(DevicesOutcome::Failed(e)) = dashboard.try_update(|s| s.apply_devices(result, now_local())) {
                log::error!("device list failed: {e}");
            }
        });
    });

    let on_fab = Callback::new(move |fab: String| {
        log::info!("selected fab {fab}");
        dashboard.update(|s| s.select_fab(&fab));
    });
    let on_camera = Callback::new(move |camera: String| {
        log::info!("selected camera {camera}");
        let request = dashboard.try_update(|s| s.select_camera(&camera)).flatten();
        spawn_image_fetch(dashboard, request);
    });
    let on_from = Callback::new(move |raw: String| {
        let Some(date) = parse_datetime_local(&raw, local_offset_at) else {
            log::warn!("ignoring unparseable from-date {raw:?}");
            return;
        };
        let request = dashboard.try_update(|s| s.set_from_date(date)).flatten();
        spawn_image_fetch(dashboard, request);
    });
    let on_to = Callback::new(move |raw: String| {
        let Some(date) = parse_datetime_local(&raw, local_offset_at) else {
            log::warn!("ignoring unparseable to-date {raw:?}");
            return;
        };
        let request = dashboard.try_update(|s| s.set_to_date(date)).flatten();
        spawn_image_fetch(dashboard, request);
    });

    let on_submit = Callback::new(move |()| {
        let Some(truth) = dashboard.try_update(DashboardState::begin_submit).flatten() else {
            return;
        };
        log::info!("submitting corrected classification {} for {}", truth.truth, truth.imgid);
        leptos::task::spawn_local(async move {
            let result = api::submit_ground_truth(&truth).await;
            match dashboard.try_update(|s| s.finish_submit(result)) {
                Some(SubmitOutcome::Saved) => notify(toasts, ToastKind::Success, "Feedback saved"),
                Some(SubmitOutcome::Failed(e)) => {
                    log::error!("ground truth submit failed: {e}");
                    notify(toasts, ToastKind::Error, format!("Feedback not saved: {e}"));
                }
                None => {}
            }
        });
    });

    view! {
        <div class="dashboard">
            <FilterBar dashboard=dashboard on_fab=on_fab on_camera=on_camera on_from=on_from on_to=on_to/>
            <Show when=move || dashboard.with(|s| s.loading)>
                <p class="dashboard__loading">"Loading fabs..."</p>
            </Show>
            <div class="dashboard__cards">
                <div class="dashboard__col">
                    <ImageCard dashboard=dashboard config=config/>
                </div>
                <div class="dashboard__col">
                    <DetailCard dashboard=dashboard on_submit=on_submit/>
                </div>
                <div class="dashboard__col">
                    <SummaryCard dashboard=dashboard/>
                </div>
            </div>
        </div>
    }
}
