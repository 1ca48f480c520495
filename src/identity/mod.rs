//! Identity provider: credential checks and token lifecycle.
//!
//! DESIGN
//! ======
//! Routes and the session service depend only on the [`IdentityProvider`]
//! trait. `CognitoClient` is the production implementation; tests swap in a
//! mock through `AppState`.

pub mod cognito;
pub mod types;

pub use cognito::CognitoClient;
pub use types::{AuthTokens, IdentityError, IdentityProvider};
