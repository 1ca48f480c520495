//! Login form state.
//!
//! The form moves `Idle → Submitting` only when both fields are filled and
//! back to `Idle` on a refused sign-in. A successful sign-in navigates away,
//! so there is no transition out of `Submitting` for it.

#[cfg(test)]
#[path = "login_test.rs"]
mod login_test;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LoginPhase {
    #[default]
    Idle,
    Submitting,
}

/// Credentials captured at submit time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    pub phase: LoginPhase,
}

impl LoginForm {
    /// Both fields non-empty. No further validation.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.email.is_empty() && !self.password.is_empty()
    }

    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.phase == LoginPhase::Submitting
    }

    #[must_use]
    pub fn can_submit(&self) -> bool {
        self.is_valid() && !self.is_submitting()
    }

    /// Enter `Submitting` and hand back the credentials to check.
    pub fn begin_submit(&mut self) -> Option<Credentials> {
        if !self.can_submit() {
            return None;
        }
        self.phase = LoginPhase::Submitting;
        Some(Credentials { email: self.email.clone(), password: self.password.clone() })
    }

    pub fn fail(&mut self) {
        self.phase = LoginPhase::Idle;
    }
}
