//! Browser session management.
//!
//! ARCHITECTURE
//! ============
//! The browser only ever holds an opaque random token in an HttpOnly cookie.
//! Identity-provider tokens stay server-side in [`SessionStore`], keyed by
//! that opaque token, and are attached to fab API calls on the user's behalf.
//!
//! TRADE-OFFS
//! ==========
//! The store is in-memory, so a server restart signs everyone out. Sessions
//! end when the user logs out, the provider refuses a token refresh, or
//! [`SESSION_TTL`] passes. Expired entries are dropped on access, on each
//! new sign-in, and by the background sweeper.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::collections::HashMap;
use std::fmt::Write;
use std::sync::Arc;

use rand::Rng;
use time::{Duration, OffsetDateTime};
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use crate::identity::{AuthTokens, IdentityError, IdentityProvider};

/// Tokens expiring sooner than this are refreshed before use.
pub const REFRESH_WINDOW: Duration = Duration::seconds(60);

/// Lifetime of a browser session, counted from sign-in. Also the cookie's
/// `Max-Age`.
pub const SESSION_TTL: Duration = Duration::hours(12);

const SWEEP_INTERVAL: std::time::Duration = std::time::Duration::from_secs(300);

pub(crate) fn bytes_to_hex(bytes: &[u8]) -> String {
    let mut s = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        let _ = write!(s, "{b:02x}");
    }
    s
}

/// Generate a cryptographically random 32-byte hex token.
#[must_use]
pub fn generate_token() -> String {
    let bytes: [u8; 32] = rand::rng().random();
    bytes_to_hex(&bytes)
}

/// A signed-in browser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub email: String,
    pub tokens: AuthTokens,
    pub expires_at: OffsetDateTime,
}

impl Session {
    #[must_use]
    pub fn is_expired(&self, now: OffsetDateTime) -> bool {
        self.expires_at <= now
    }
}

/// Sessions keyed by cookie token. Clone shares the same map.
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<String, Session>>>,
}

impl SessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a new session and return its cookie token. Expired sessions
    /// are swept first.
    pub async fn create(&self, email: &str, tokens: AuthTokens, now: OffsetDateTime) -> String {
        let token = generate_token();
        let session = Session { email: email.to_owned(), tokens, expires_at: now + SESSION_TTL };
        let mut sessions = self.sessions.write().await;
        sessions.retain(|_, s| !s.is_expired(now));
        sessions.insert(token.clone(), session);
        token
    }

    /// The live session for `token`. An expired one is removed.
    pub async fn get(&self, token: &str, now: OffsetDateTime) -> Option<Session> {
        {
            let sessions = self.sessions.read().await;
            match sessions.get(token) {
                None => return None,
                Some(session) if !session.is_expired(now) => return Some(session.clone()),
                Some(_) => {}
            }
        }
        self.sessions.write().await.remove(token);
        None
    }

    /// Swap in refreshed tokens. Returns false if the session is gone.
    pub async fn replace_tokens(&self, token: &str, tokens: AuthTokens) -> bool {
        match self.sessions.write().await.get_mut(token) {
            Some(session) => {
                session.tokens = tokens;
                true
            }
            None => false,
        }
    }

    pub async fn remove(&self, token: &str) -> Option<Session> {
        self.sessions.write().await.remove(token)
    }

    pub async fn count(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Drop every expired session. Returns how many were removed.
    pub async fn sweep_expired(&self, now: OffsetDateTime) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, s| !s.is_expired(now));
        before - sessions.len()
    }
}

/// Spawn the periodic sweep of expired sessions.
pub fn spawn_session_sweeper(sessions: SessionStore) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(SWEEP_INTERVAL);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        loop {
            ticker.tick().await;
            let removed = sessions.sweep_expired(OffsetDateTime::now_utc()).await;
            if removed > 0 {
                tracing::debug!(removed, "expired sessions swept");
            }
        }
    })
}

/// Resolve a cookie token to a live session.
///
/// Tokens close to expiry are refreshed through `identity` first. A refused
/// refresh ends the session and reports no session.
///
/// # Errors
///
/// Returns an [`IdentityError`] when the refresh fails for reasons other than
/// refusal (network, provider outage); the session is kept in that case.
pub async fn current_session(
    sessions: &SessionStore,
    identity: &dyn IdentityProvider,
    token: &str,
    now: OffsetDateTime,
) -> Result<Option<Session>, IdentityError> {
    let Some(mut session) = sessions.get(token, now).await else {
        return Ok(None);
    };
    if !session.tokens.expires_within(now, REFRESH_WINDOW) {
        return Ok(Some(session));
    }

    match identity.refresh(&session.tokens.refresh_token).await {
        Ok(tokens) => {
            tracing::debug!(email = %session.email, "session tokens refreshed");
            if !sessions.replace_tokens(token, tokens.clone()).await {
                return Ok(None);
            }
            session.tokens = tokens;
            Ok(Some(session))
        }
        Err(e) if e.is_rejection() => {
            tracing::info!(email = %session.email, error = %e, "token refresh refused; ending session");
            sessions.remove(token).await;
            Ok(None)
        }
        Err(e) => Err(e),
    }
}
