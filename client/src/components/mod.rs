//! Reusable UI component modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Components render the navigation shell and dashboard cards, reading and
//! writing shared state passed in as signals or taken from Leptos context.

pub mod detail_card;
pub mod filter_bar;
pub mod image_card;
pub mod loader_button;
pub mod nav_shell;
pub mod session_gate;
pub mod summary_card;
pub mod toast_host;
