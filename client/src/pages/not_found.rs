//! Fallback for unmatched routes.

use leptos::prelude::*;

#[component]
pub fn NotFoundPage() -> impl IntoView {
    view! {
        <div class="not-found">
            <h3>"Sorry, page not found!"</h3>
        </div>
    }
}
