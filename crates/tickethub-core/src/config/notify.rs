//! Notification subsystem configuration.

use serde::{Deserialize, Serialize};

/// Notification subsystem configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifyConfig {
    /// Delay before the scheduled reconnect attempt, in seconds.
    #[serde(default = "default_reconnect_delay")]
    pub reconnect_delay_seconds: u64,
    /// Maximum connect attempts per transport session.
    #[serde(default = "default_connect_attempts")]
    pub max_connect_attempts: u32,
    /// Maximum notifications retained in the live buffer.
    #[serde(default = "default_live_buffer_cap")]
    pub live_buffer_cap: usize,
    /// Toast presentation settings.
    #[serde(default)]
    pub toasts: ToastConfig,
    /// Default page size for history fetches.
    #[serde(default = "default_page_size")]
    pub page_size: u64,
}

/// Toast presentation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToastConfig {
    /// Maximum toasts visible at once.
    #[serde(default = "default_max_visible")]
    pub max_visible: usize,
    /// Seconds a toast stays visible before auto-expiry.
    #[serde(default = "default_toast_ttl")]
    pub ttl_seconds: u64,
    /// Maximum age in seconds for a push event to qualify as fresh.
    #[serde(default = "default_freshness_window")]
    pub freshness_window_seconds: i64,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            reconnect_delay_seconds: default_reconnect_delay(),
            max_connect_attempts: default_connect_attempts(),
            live_buffer_cap: default_live_buffer_cap(),
            toasts: ToastConfig::default(),
            page_size: default_page_size(),
        }
    }
}

impl Default for ToastConfig {
    fn default() -> Self {
        Self {
            max_visible: default_max_visible(),
            ttl_seconds: default_toast_ttl(),
            freshness_window_seconds: default_freshness_window(),
        }
    }
}

fn default_reconnect_delay() -> u64 {
    3
}

fn default_connect_attempts() -> u32 {
    5
}

fn default_live_buffer_cap() -> usize {
    50
}

fn default_max_visible() -> usize {
    3
}

fn default_toast_ttl() -> u64 {
    5
}

fn default_freshness_window() -> i64 {
    5
}

fn default_page_size() -> u64 {
    10
}
