//! Identity types: issued tokens, errors, and the provider trait.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use time::{Duration, OffsetDateTime};

/// Tokens issued for one signed-in user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthTokens {
    /// Sent as `Authorization` on fab API calls.
    pub id_token: String,
    /// Needed for global sign-out.
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: OffsetDateTime,
}

impl AuthTokens {
    /// True when the tokens expire within `window` of `now` (or already have).
    #[must_use]
    pub fn expires_within(&self, now: OffsetDateTime, window: Duration) -> bool {
        self.expires_at - now <= window
    }
}

#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    /// The provider refused the request; `message` is safe to show the user.
    #[error("{message}")]
    Rejected { kind: String, message: String },

    /// The provider refused the call for a reason that is not the user's
    /// credentials or tokens, such as throttling.
    #[error("identity provider error {kind}: {message}")]
    Provider { kind: String, message: String },

    /// Sign-in needs a further step this app does not support.
    #[error("sign-in requires unsupported challenge: {0}")]
    Challenge(String),

    /// The HTTP request to the provider failed.
    #[error("identity request failed: {0}")]
    Request(String),

    /// The provider returned a non-success status without a recognizable error.
    #[error("identity response error: status {status}")]
    Response { status: u16, body: String },

    /// The provider response body could not be deserialized.
    #[error("identity response parse failed: {0}")]
    Parse(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

impl IdentityError {
    /// Whether the user (not the provider or network) is at fault.
    #[must_use]
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::Rejected { .. } | Self::Challenge(_))
    }
}

/// Identity operations used by the auth routes and the session service.
#[async_trait::async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Check an email + password pair and issue tokens.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::Rejected`] for refused credentials and other
    /// variants for transport or protocol failures.
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthTokens, IdentityError>;

    /// Exchange a refresh token for fresh id/access tokens. The returned
    /// tokens carry the same refresh token.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::Rejected`] when the refresh token is no
    /// longer valid.
    async fn refresh(&self, refresh_token: &str) -> Result<AuthTokens, IdentityError>;

    /// Revoke every token issued to the user behind `access_token`.
    ///
    /// # Errors
    ///
    /// Returns an [`IdentityError`] if the provider call fails.
    async fn sign_out(&self, access_token: &str) -> Result<(), IdentityError>;
}
