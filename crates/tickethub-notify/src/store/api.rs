//! REST API seam for the persisted notification log.

use async_trait::async_trait;

use tickethub_core::result::AppResult;
use tickethub_core::types::filter::NotificationFilter;
use tickethub_core::types::pagination::{PageRequest, PageResponse};
use tickethub_entity::notification::Notification;

use crate::session::Credential;

/// The server's durable notification log for the current user.
///
/// Implemented over HTTP in production; tests substitute an in-memory
/// fake.
#[async_trait]
pub trait NotificationApi: Send + Sync + 'static {
    /// List one page of notification history.
    async fn list(
        &self,
        credential: &Credential,
        page: PageRequest,
        filter: &NotificationFilter,
    ) -> AppResult<PageResponse<Notification>>;

    /// Mark one notification as read.
    async fn mark_read(&self, credential: &Credential, id: &str) -> AppResult<()>;

    /// Mark every notification as read.
    async fn mark_all_read(&self, credential: &Credential) -> AppResult<()>;

    /// Permanently delete one notification.
    async fn delete(&self, credential: &Credential, id: &str) -> AppResult<()>;
}
