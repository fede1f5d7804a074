//! Host platform bridge
//!
//! The core runs embedded in a chat-platform WebView shell. Everything the
//! shell provides (user identity, theming hints, lifecycle and messaging
//! calls) sits behind `HostBridge`; the core calls it at well-defined points
//! and never implements it.

/// Color scheme advertised by the host theme descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorScheme {
    Light,
    Dark,
}

pub trait HostBridge: Send + Sync {
    /// Identity of the current user, from the host init data. Zero means the
    /// host provided no identity; settings sync is skipped in that case.
    fn user_id(&self) -> i64;

    /// Theme hint for the embedding shell's palette.
    fn color_scheme(&self) -> ColorScheme;

    /// Signal that the app finished its startup sequence.
    fn ready(&self);

    /// Ask the host to expand the WebView to full height.
    fn expand(&self);

    /// Ask the host to terminate the session.
    fn close(&self);

    /// Show a host-rendered alert to the user.
    fn show_alert(&self, text: &str);

    /// Echo a payload back to the host platform.
    fn send_data(&self, payload: &str);
}

/// Bridge for running without a live host: logs every call and reports no
/// user identity, so settings sync stays local.
pub struct NullHost;

impl HostBridge for NullHost {
    fn user_id(&self) -> i64 {
        0
    }

    fn color_scheme(&self) -> ColorScheme {
        ColorScheme::Light
    }

    fn ready(&self) {
        log::info!("host: ready");
    }

    fn expand(&self) {
        log::info!("host: expand");
    }

    fn close(&self) {
        log::info!("host: close requested");
    }

    fn show_alert(&self, text: &str) {
        log::info!("host: alert: {}", text);
    }

    fn send_data(&self, payload: &str) {
        log::debug!("host: send_data: {}", payload);
    }
}
