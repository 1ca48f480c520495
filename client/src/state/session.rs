//! Auth-session state for the current browser user.
//!
//! SYSTEM CONTEXT
//! ==============
//! Owned by the root `App` and provided as context. The session gate hides
//! every routed view until the initial check settles, and routed views read
//! `is_authenticated` to choose what to render.
//!
//! DESIGN
//! ======
//! Only three operations write the state: resolving the initial check,
//! signing in, and signing out. [`SessionHandle`] exposes exactly those plus
//! read accessors so no component can flip the flags ad hoc.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use leptos::prelude::*;

use crate::net::api::ApiError;
use crate::net::types::SessionInfo;

/// Message the server uses when no session exists.
pub const NO_CURRENT_USER: &str = "No current user";

/// Authentication flags shared by the shell and all routed views.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionState {
    pub is_authenticated: bool,
    pub is_authenticating: bool,
}

impl Default for SessionState {
    fn default() -> Self {
        Self { is_authenticated: false, is_authenticating: true }
    }
}

/// Outcome of the initial current-session lookup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionCheck {
    Authenticated,
    /// Expected when nobody is signed in; never shown to the user.
    NoCurrentUser,
    /// Any other failure; shown to the user.
    Failed(String),
}

impl SessionCheck {
    #[must_use]
    pub fn from_result(result: Result<SessionInfo, ApiError>) -> Self {
        match result {
            Ok(_) => Self::Authenticated,
            Err(e) if is_no_current_user(&e.message()) => Self::NoCurrentUser,
            Err(e) => Self::Failed(e.message()),
        }
    }
}

/// Exact, case-sensitive match on the "no session" message.
#[must_use]
pub fn is_no_current_user(message: &str) -> bool {
    message == NO_CURRENT_USER
}

impl SessionState {
    /// Settle the initial check. Returns the text to alert, if any.
    pub fn resolve(&mut self, check: SessionCheck) -> Option<String> {
        self.is_authenticating = false;
        match check {
            SessionCheck::Authenticated => {
                self.is_authenticated = true;
                None
            }
            SessionCheck::NoCurrentUser => {
                self.is_authenticated = false;
                None
            }
            SessionCheck::Failed(message) => {
                self.is_authenticated = false;
                Some(message)
            }
        }
    }

    pub fn signed_in(&mut self) {
        self.is_authenticated = true;
    }

    pub fn signed_out(&mut self) {
        *self = Self { is_authenticated: false, is_authenticating: false };
    }
}

/// Reactive handle to the shared session, provided as context by `App`.
#[derive(Clone, Copy, Debug)]
pub struct SessionHandle(RwSignal<SessionState>);

impl SessionHandle {
    #[must_use]
    pub fn new() -> Self {
        Self(RwSignal::new(SessionState::default()))
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.0.with(|s| s.is_authenticated)
    }

    #[must_use]
    pub fn is_authenticating(&self) -> bool {
        self.0.with(|s| s.is_authenticating)
    }

    /// Settle the initial check. Returns the text to alert, if any.
    pub fn resolve(&self, check: SessionCheck) -> Option<String> {
        self.0.try_update(|s| s.resolve(check)).flatten()
    }

    pub fn signed_in(&self) {
        self.0.update(SessionState::signed_in);
    }

    pub fn signed_out(&self) {
        self.0.update(SessionState::signed_out);
    }
}

impl Default for SessionHandle {
    fn default() -> Self {
        Self::new()
    }
}
