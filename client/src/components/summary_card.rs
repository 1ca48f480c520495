//! Selected filters and the defect rate of the current list.

use leptos::prelude::*;

use crate::state::dashboard::{DashboardState, format_defect_rate};

#[component]
pub fn SummaryCard(dashboard: RwSignal<DashboardState>) -> impl IntoView {
    view! {
        <div class="card card--info summary-card">
            <div class="card__header">"Summary"</div>
            <div class="card__body">
                <p>"Selected FAB: " {move || dashboard.with(|s| s.selected_fab.clone())}</p>
                <p>"Selected Camera: " {move || dashboard.with(|s| s.selected_camera.clone())}</p>
                <p>"Defect rate: " {move || dashboard.with(|s| format_defect_rate(s.defect_rate))}</p>
            </div>
        </div>
    }
}
