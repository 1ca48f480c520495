//! Server-side services behind the HTTP routes.

pub mod fab_api;
pub mod session;
