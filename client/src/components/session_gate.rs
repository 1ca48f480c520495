//! Hides its children until the initial session check has settled.
//!
//! Nothing renders while the check is pending, not even the not-found view,
//! so signed-in users never see a flash of the signed-out UI.

use leptos::prelude::*;

use crate::state::session::SessionHandle;

#[component]
pub fn SessionGate(children: ChildrenFn) -> impl IntoView {
    let session = expect_context::<SessionHandle>();

    view! { <Show when=move || !session.is_authenticating()>{children()}</Show> }
}
