//! Browser-only side effects behind an SSR-safe surface.

/// Show a blocking alert with `message`.
///
/// Outside the browser the message is only logged.
pub fn alert(message: &str) {
    #[cfg(feature = "hydrate")]
    {
        if let Some(window) = web_sys::window() {
            let _ = window.alert_with_message(message);
            return;
        }
    }
    log::warn!("alert: {message}");
}
