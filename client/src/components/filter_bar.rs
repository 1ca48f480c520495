//! Fab, camera, and date-range pickers for the dashboard.

#[cfg(test)]
#[path = "filter_bar_test.rs"]
mod filter_bar_test;

use leptos::prelude::*;

use crate::state::dashboard::DashboardState;
use crate::util::dates::format_datetime_local;

/// `(value, selected)` pairs for a `<select>`, in list order.
pub(crate) fn select_options(items: &[String], selected: &str) -> Vec<(String, bool)> {
    items.iter().map(|item| (item.clone(), item == selected)).collect()
}

#[component]
pub fn FilterBar(
    dashboard: RwSignal<DashboardState>,
    on_fab: Callback<String>,
    on_camera: Callback<String>,
    on_from: Callback<String>,
    on_to: Callback<String>,
) -> impl IntoView {
    let fab_options = move || dashboard.with(|s| select_options(&s.fabs, &s.selected_fab));
    let camera_options = move || dashboard.with(|s| select_options(s.camera_options(), &s.selected_camera));
    let no_fab = move || dashboard.with(|s| s.selected_fab.is_empty());
    let no_camera = move || dashboard.with(|s| s.selected_camera.is_empty());

    view! {
        <div class="filter-bar">
            <div class="filter-bar__pickers">
                <select
                    class="filter-bar__select"
                    aria-label="fabs"
                    on:change=move |ev| on_fab.run(event_target_value(&ev))
                >
                    <option value="" disabled=true selected=no_fab>"fabs"</option>
                    {move || {
                        fab_options()
                            .into_iter()
                            .map(|(fab, selected)| {
                                let value = fab.clone();
                                view! { <option value=value selected=selected>{fab}</option> }
                            })
                            .collect::<Vec<_>>()
                    }}
                </select>
                <select
                    class="filter-bar__select"
                    aria-label="cameras"
                    disabled=no_fab
                    on:change=move |ev| on_camera.run(event_target_value(&ev))
                >
                    <option value="" disabled=true selected=no_camera>"cameras"</option>
                    {move || {
                        camera_options()
                            .into_iter()
                            .map(|(cam, selected)| {
                                let value = cam.clone();
                                view! { <option value=value selected=selected>{cam}</option> }
                            })
                            .collect::<Vec<_>>()
                    }}
                </select>
            </div>
            <label class="filter-bar__date">
                "From: "
                <input
                    type="datetime-local"
                    prop:value=move || format_datetime_local(dashboard.with(|s| s.from_date))
                    on:change=move |ev| on_from.run(event_target_value(&ev))
                />
            </label>
            <label class="filter-bar__date">
                "To: "
                <input
                    type="datetime-local"
                    prop:value=move || format_datetime_local(dashboard.with(|s| s.to_date))
                    on:change=move |ev| on_to.run(event_target_value(&ev))
                />
            </label>
        </div>
    }
}
