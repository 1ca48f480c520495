//! Top navigation bar: brand plus the login/logout control.

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;

use crate::net::api;
use crate::state::session::SessionHandle;

#[component]
pub fn NavShell() -> impl IntoView {
    let session = expect_context::<SessionHandle>();
    let navigate = use_navigate();

    let logout = Callback::new(move |()| {
        let navigate = navigate.clone();
        leptos::task::spawn_local(async move {
            if let Err(e) = api::logout().await {
                log::warn!("sign-out failed: {e}");
            }
            session.signed_out();
            navigate("/login", NavigateOptions::default());
        });
    });

    view! {
        <nav class="nav-shell">
            <a class="nav-shell__brand" href="/">
                <img src="/favicon-32x32.png" width="30" height="30" alt="Wafer Maps"/>
                "Wafer Maps"
            </a>
            <div class="nav-shell__actions">
                {move || {
                    if session.is_authenticated() {
                        view! {
                            <button class="btn" on:click=move |_| logout.run(())>
                                "Logout"
                            </button>
                        }
                            .into_any()
                    } else {
                        view! { <a class="btn" href="/login">"Login"</a> }.into_any()
                    }
                }}
            </div>
        </nav>
    }
}
