//! Best-effort native alert sink.

use async_trait::async_trait;

use tickethub_core::result::AppResult;

/// Host-level alert surface (native OS notifications).
///
/// Raised as a side effect when a push event arrives; failures are
/// swallowed after logging and never affect ingestion.
#[async_trait]
pub trait DesktopAlerts: Send + Sync + 'static {
    /// Whether the host granted alert permission.
    fn permitted(&self) -> bool;

    /// Raise one alert.
    async fn alert(&self, title: &str, message: &str) -> AppResult<()>;
}

/// Default sink for hosts without a native notification surface.
#[derive(Debug, Clone, Default)]
pub struct NoAlerts;

#[async_trait]
impl DesktopAlerts for NoAlerts {
    fn permitted(&self) -> bool {
        false
    }

    async fn alert(&self, _title: &str, _message: &str) -> AppResult<()> {
        Ok(())
    }
}
