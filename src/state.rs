//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. The
//! two external collaborators sit behind trait objects so tests can replace
//! them with in-process mocks.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::identity::IdentityProvider;
use crate::services::fab_api::FabApi;
use crate::services::session::SessionStore;

/// Shared application state, injected into Axum handlers via State extractor.
/// Clone is required by Axum; every field is cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub sessions: SessionStore,
    pub identity: Arc<dyn IdentityProvider>,
    pub fab_api: Arc<dyn FabApi>,
}

impl AppState {
    #[must_use]
    pub fn new(config: AppConfig, identity: Arc<dyn IdentityProvider>, fab_api: Arc<dyn FabApi>) -> Self {
        Self { config: Arc::new(config), sessions: SessionStore::new(), identity, fab_api }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================

#[cfg(test)]
pub mod test_helpers {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use time::{Duration, OffsetDateTime};
    use wafer_client::net::types::{FabCameraMap, GroundTruth, ImageQuery, ImageRecord};

    use super::*;
    use crate::identity::{AuthTokens, IdentityError};
    use crate::services::fab_api::UpstreamError;

    /// Config with every required value set and defaults elsewhere.
    #[must_use]
    pub fn test_config() -> AppConfig {
        AppConfig::from_lookup(|key| match key {
            "WAFER_API_URL" => Some("https://api.fab.test/prod".to_owned()),
            "COGNITO_USER_POOL_ID" => Some("us-west-2_TestPool".to_owned()),
            "COGNITO_APP_CLIENT_ID" => Some("test-client".to_owned()),
            _ => None,
        })
        .expect("test config should parse")
    }

    #[must_use]
    pub fn test_app_state(identity: MockIdentity, fab_api: MockFabApi) -> AppState {
        AppState::new(test_config(), Arc::new(identity), Arc::new(fab_api))
    }

    /// Seed a signed-in session and return its cookie token.
    pub async fn seed_session(state: &AppState, email: &str, expires_in: Duration) -> String {
        let tokens = AuthTokens {
            id_token: format!("id-{email}"),
            access_token: format!("access-{email}"),
            refresh_token: format!("refresh-{email}"),
            expires_at: OffsetDateTime::now_utc() + expires_in,
        };
        state.sessions.create(email, tokens, OffsetDateTime::now_utc()).await
    }

    // =========================================================================
    // MockIdentity
    // =========================================================================

    /// Accepts one password for any email.
    pub struct MockIdentity {
        pub password: String,
        /// Refresh calls are refused as an expired refresh token.
        pub refresh_rejected: bool,
        /// Every call fails as if the provider were unreachable.
        pub unavailable: bool,
        /// Refreshes fail with a provider throttling error.
        pub refresh_throttled: bool,
        pub refreshes: AtomicUsize,
        pub sign_outs: Mutex<Vec<String>>,
    }

    impl MockIdentity {
        #[must_use]
        pub fn accepting(password: &str) -> Self {
            Self {
                password: password.to_owned(),
                refresh_rejected: false,
                unavailable: false,
                refresh_throttled: false,
                refreshes: AtomicUsize::new(0),
                sign_outs: Mutex::new(Vec::new()),
            }
        }

        #[must_use]
        pub fn refresh_count(&self) -> usize {
            self.refreshes.load(Ordering::SeqCst)
        }

        fn outage() -> IdentityError {
            IdentityError::Request("connection refused".to_owned())
        }
    }

    #[async_trait::async_trait]
    impl IdentityProvider for MockIdentity {
        async fn sign_in(&self, email: &str, password: &str) -> Result<AuthTokens, IdentityError> {
            if self.unavailable {
                return Err(Self::outage());
            }
            if password != self.password {
                return Err(IdentityError::Rejected {
                    kind: "NotAuthorizedException".to_owned(),
                    message: "Incorrect username or password.".to_owned(),
                });
            }
            Ok(AuthTokens {
                id_token: format!("id-{email}"),
                access_token: format!("access-{email}"),
                refresh_token: format!("refresh-{email}"),
                expires_at: OffsetDateTime::now_utc() + Duration::hours(1),
            })
        }

        async fn refresh(&self, refresh_token: &str) -> Result<AuthTokens, IdentityError> {
            self.refreshes.fetch_add(1, Ordering::SeqCst);
            if self.unavailable {
                return Err(Self::outage());
            }
            if self.refresh_throttled {
                return Err(IdentityError::Provider {
                    kind: "TooManyRequestsException".to_owned(),
                    message: "Rate exceeded".to_owned(),
                });
            }
            if self.refresh_rejected {
                return Err(IdentityError::Rejected {
                    kind: "NotAuthorizedException".to_owned(),
                    message: "Refresh Token has expired".to_owned(),
                });
            }
            Ok(AuthTokens {
                id_token: "id-refreshed".to_owned(),
                access_token: "access-refreshed".to_owned(),
                refresh_token: refresh_token.to_owned(),
                expires_at: OffsetDateTime::now_utc() + Duration::hours(1),
            })
        }

        async fn sign_out(&self, access_token: &str) -> Result<(), IdentityError> {
            self.sign_outs.lock().unwrap().push(access_token.to_owned());
            if self.unavailable {
                return Err(Self::outage());
            }
            Ok(())
        }
    }

    // =========================================================================
    // MockFabApi
    // =========================================================================

    /// Serves fixed data and records what it was asked for.
    #[derive(Default)]
    pub struct MockFabApi {
        pub devices: FabCameraMap,
        pub images: Vec<ImageRecord>,
        /// Every call fails with this upstream status.
        pub fail_status: Option<u16>,
        pub tokens: Mutex<Vec<String>>,
        pub queries: Mutex<Vec<ImageQuery>>,
        pub submitted: Mutex<Vec<GroundTruth>>,
    }

    impl MockFabApi {
        fn check(&self, id_token: &str) -> Result<(), UpstreamError> {
            self.tokens.lock().unwrap().push(id_token.to_owned());
            match self.fail_status {
                Some(status) => Err(UpstreamError::Status { status, body: "upstream refused".to_owned() }),
                None => Ok(()),
            }
        }
    }

    #[async_trait::async_trait]
    impl FabApi for MockFabApi {
        async fn list_devices(&self, id_token: &str) -> Result<FabCameraMap, UpstreamError> {
            self.check(id_token)?;
            Ok(self.devices.clone())
        }

        async fn list_images(&self, id_token: &str, query: &ImageQuery) -> Result<Vec<ImageRecord>, UpstreamError> {
            self.check(id_token)?;
            self.queries.lock().unwrap().push(query.clone());
            Ok(self.images.clone())
        }

        async fn submit_ground_truth(&self, id_token: &str, truth: &GroundTruth) -> Result<(), UpstreamError> {
            self.check(id_token)?;
            self.submitted.lock().unwrap().push(truth.clone());
            Ok(())
        }
    }

    #[must_use]
    pub fn image(imgid: &str, prediction: &str, probability: f64) -> ImageRecord {
        ImageRecord { imgid: imgid.to_owned(), prediction: prediction.to_owned(), probability }
    }
}
