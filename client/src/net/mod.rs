//! Networking modules for the browser → server HTTP calls.
//!
//! SYSTEM CONTEXT
//! ==============
//! `api` performs the REST calls and `types` defines the shared wire schema
//! that the server crate also consumes.

pub mod api;
pub mod types;
