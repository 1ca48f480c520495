//! Root application component with routing and context providers.

use leptos::prelude::*;
use leptos_meta::{MetaTags, Stylesheet, Title, provide_meta_context};
use leptos_router::{
    StaticSegment,
    components::{Route, Router, Routes},
};

use crate::components::nav_shell::NavShell;
use crate::components::session_gate::SessionGate;
use crate::components::toast_host::ToastHost;
use crate::net::api;
use crate::pages::{dashboard::DashboardPage, login::LoginPage, not_found::NotFoundPage};
use crate::state::session::{SessionCheck, SessionHandle};
use crate::state::toast::ToastState;
use crate::util::browser::alert;

/// HTML shell rendered on the server for SSR + hydration.
pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                <link rel="icon" type="image/png" href="/favicon-32x32.png"/>
                <AutoReload options=options.clone()/>
                <HydrationScripts options/>
                <MetaTags/>
            </head>
            <body>
                <App/>
            </body>
        </html>
    }
}

/// Root application component.
///
/// Provides the session and toast contexts, runs the initial session check,
/// and sets up client-side routing.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let session = SessionHandle::new();
    let toasts = RwSignal::new(ToastState::default());
    provide_context(session);
    provide_context(toasts);

    // Initial session check; every routed view stays hidden until it settles.
    Effect::new(move || {
        leptos::task::spawn_local(async move {
            let check = SessionCheck::from_result(api::fetch_session().await);
            if let Some(message) = session.resolve(check) {
                alert(&message);
            }
        });
    });

    view! {
        <Stylesheet id="leptos" href="/pkg/wafer-review.css"/>
        <Title text="Wafer Maps"/>

        <Router>
            <SessionGate>
                <NavShell/>
            </SessionGate>
            <main class="app-main">
                <Routes fallback=|| view! { <SessionGate><NotFoundPage/></SessionGate> }>
                    <Route path=StaticSegment("login") view=|| view! { <SessionGate><LoginPage/></SessionGate> }/>
                    <Route path=StaticSegment("") view=|| view! { <SessionGate><DashboardPage/></SessionGate> }/>
                </Routes>
            </main>
            <ToastHost/>
        </Router>
    }
}
