//! Email + password sign-in.

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;

use crate::components::loader_button::LoaderButton;
use crate::net::api;
use crate::state::login::LoginForm;
use crate::state::session::SessionHandle;
use crate::util::browser::alert;

#[component]
pub fn LoginPage() -> impl IntoView {
    let session = expect_context::<SessionHandle>();
    let form = RwSignal::new(LoginForm::default());
    let navigate = use_navigate();

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let Some(creds) = form.try_update(LoginForm::begin_submit).flatten() else {
            return;
        };
        let navigate = navigate.clone();
        leptos::task::spawn_local(async move {
            match api::login(&creds.email, &creds.password).await {
                Ok(_) => {
                    session.signed_in();
                    navigate("/", NavigateOptions::default());
                }
                Err(e) => {
                    alert(&e.message());
                    form.update(LoginForm::fail);
                }
            }
        });
    };

    view! {
        <div class="login-page">
            <form class="login-form" on:submit=on_submit>
                <label class="login-form__field" for="email">
                    "Email"
                </label>
                <input
                    id="email"
                    class="login-input"
                    type="email"
                    autofocus=true
                    prop:value=move || form.with(|f| f.email.clone())
                    on:input=move |ev| form.update(|f| f.email = event_target_value(&ev))
                />
                <label class="login-form__field" for="password">
                    "Password"
                </label>
                <input
                    id="password"
                    class="login-input"
                    type="password"
                    prop:value=move || form.with(|f| f.password.clone())
                    on:input=move |ev| form.update(|f| f.password = event_target_value(&ev))
                />
                <LoaderButton
                    text="Login"
                    loading_text="Logging in…"
                    class="btn btn--block"
                    kind="submit"
                    is_loading=Signal::derive(move || form.with(LoginForm::is_submitting))
                    disabled=Signal::derive(move || !form.with(LoginForm::is_valid))
                />
            </form>
        </div>
    }
}
