//! Auth routes: sign-in, current session, sign-out.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use axum::extract::{FromRef, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::{Duration, OffsetDateTime};
use wafer_client::net::types::{ErrorBody, LoginRequest, SessionInfo};

use crate::identity::IdentityError;
use crate::services::session::{self, Session};
use crate::state::AppState;

pub(crate) const COOKIE_NAME: &str = "wafer_session";

/// Message the client treats as "nobody is signed in".
pub(crate) const NO_CURRENT_USER: &str = "No current user";

pub(crate) fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(ErrorBody { error: message.into() })).into_response()
}

fn no_current_user() -> Response {
    error_response(StatusCode::UNAUTHORIZED, NO_CURRENT_USER)
}

/// Status for a failed provider call: refusals are the user's problem,
/// everything else is an upstream failure.
pub(crate) fn identity_error_to_status(err: &IdentityError) -> StatusCode {
    if err.is_rejection() { StatusCode::UNAUTHORIZED } else { StatusCode::BAD_GATEWAY }
}

fn session_cookie(token: String, secure: bool) -> Cookie<'static> {
    Cookie::build((COOKIE_NAME, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(session::SESSION_TTL)
        .build()
}

fn cleared_cookie(secure: bool) -> Cookie<'static> {
    Cookie::build((COOKIE_NAME, ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(Duration::ZERO)
        .build()
}

// =============================================================================
// AUTH EXTRACTOR
// =============================================================================

/// Signed-in user resolved from the session cookie, with tokens refreshed
/// if they were about to expire. Use as a handler parameter to require
/// authentication.
pub struct AuthUser {
    pub session: Session,
}

impl<S> axum::extract::FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut axum::http::request::Parts, state: &S) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let token = jar.get(COOKIE_NAME).map(Cookie::value).unwrap_or_default().to_owned();
        if token.is_empty() {
            return Err(no_current_user());
        }

        let app_state = AppState::from_ref(state);
        let now = OffsetDateTime::now_utc();
        match session::current_session(&app_state.sessions, app_state.identity.as_ref(), &token, now).await {
            Ok(Some(session)) => Ok(Self { session }),
            Ok(None) => Err(no_current_user()),
            Err(e) => {
                tracing::error!(error = %e, "session refresh failed");
                Err(error_response(StatusCode::BAD_GATEWAY, "identity provider unavailable"))
            }
        }
    }
}

// =============================================================================
// HANDLERS
// =============================================================================

/// `POST /api/auth/login`: check credentials, start a session, set cookie.
pub async fn login(State(state): State<AppState>, jar: CookieJar, Json(body): Json<LoginRequest>) -> Response {
    let tokens = match state.identity.sign_in(&body.email, &body.password).await {
        Ok(tokens) => tokens,
        Err(e) => {
            let status = identity_error_to_status(&e);
            if status == StatusCode::UNAUTHORIZED {
                tracing::info!(email = %body.email, error = %e, "sign-in refused");
                return error_response(status, e.to_string());
            }
            tracing::error!(email = %body.email, error = %e, "sign-in failed");
            return error_response(status, "identity provider unavailable");
        }
    };

    // A browser signing in again drops whatever session it had.
    if let Some(previous) = jar.get(COOKIE_NAME) {
        state.sessions.remove(previous.value()).await;
    }

    let token = state.sessions.create(&body.email, tokens, OffsetDateTime::now_utc()).await;
    let sessions = state.sessions.count().await;
    tracing::info!(email = %body.email, sessions, "signed in");

    let jar = jar.add(session_cookie(token, state.config.cookie_secure));
    (jar, Json(SessionInfo { email: body.email })).into_response()
}

/// `GET /api/auth/session`: the signed-in user, or 401 "No current user".
pub async fn current(auth: AuthUser) -> Json<SessionInfo> {
    Json(SessionInfo { email: auth.session.email })
}

/// `POST /api/auth/logout`: end the session, revoke provider tokens, clear
/// the cookie. Succeeds even when no session exists.
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    let token = jar.get(COOKIE_NAME).map(|c| c.value().to_owned());
    if let Some(token) = token {
        if let Some(session) = state.sessions.remove(&token).await {
            if let Err(e) = state.identity.sign_out(&session.tokens.access_token).await {
                tracing::warn!(email = %session.email, error = %e, "provider sign-out failed");
            }
            tracing::info!(email = %session.email, "signed out");
        }
    }

    let jar = jar.add(cleared_cookie(state.config.cookie_secure));
    (jar, StatusCode::NO_CONTENT)
}
