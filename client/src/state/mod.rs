//! Shared client-side state modules.
//!
//! DESIGN
//! ======
//! State is split by concern (`session`, `login`, `dashboard`, `toast`) so
//! individual views depend on small focused models. The models are plain
//! structs with synchronous transitions; pages wrap them in signals.

pub mod dashboard;
pub mod login;
pub mod session;
pub mod toast;
