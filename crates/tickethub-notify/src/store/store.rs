//! Client-side view of the persisted notification log.
//!
//! Owns the pagination state for the currently loaded page. Fetches are
//! last-response-wins; mutations are fire-and-forget with optimistic
//! local updates that are never rolled back on failure.

use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, warn};

use tickethub_core::result::AppResult;
use tickethub_core::types::filter::NotificationFilter;
use tickethub_core::types::pagination::{PageRequest, PageResponse};
use tickethub_entity::notification::Notification;

use crate::session::SessionHandle;

use super::api::NotificationApi;

/// Pagination position of the loaded page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageInfo {
    /// Current page number (1-based).
    pub page: u64,
    /// Total number of pages.
    pub total_pages: u64,
    /// Whether there is a next page.
    pub has_next: bool,
}

#[derive(Default)]
struct StoreState {
    items: Vec<Notification>,
    page_info: Option<PageInfo>,
}

/// Reads and mutates the server's durable notification log.
///
/// Every operation requires a credential; without one it is a logged
/// no-op.
pub struct PersistedStore {
    api: Arc<dyn NotificationApi>,
    session: SessionHandle,
    state: Mutex<StoreState>,
}

impl PersistedStore {
    /// Create a store over the given API client and session.
    pub fn new(api: Arc<dyn NotificationApi>, session: SessionHandle) -> Self {
        Self {
            api,
            session,
            state: Mutex::new(StoreState::default()),
        }
    }

    /// Fetch one page of history and make it the loaded page.
    ///
    /// The last completed response wins; a failed fetch leaves the
    /// last-known-good page in place.
    pub async fn fetch(
        &self,
        page: PageRequest,
        filter: &NotificationFilter,
    ) -> AppResult<PageResponse<Notification>> {
        let Some(credential) = self.session.credential() else {
            debug!("History fetch skipped: no credential");
            return Ok(PageResponse::empty(&page));
        };

        match self.api.list(&credential, page, filter).await {
            Ok(response) => {
                let mut state = self.lock_state();
                state.items = response.items.clone();
                state.page_info = Some(PageInfo {
                    page: response.page,
                    total_pages: response.total_pages,
                    has_next: response.has_next,
                });
                Ok(response)
            }
            Err(e) => {
                warn!(error = %e, "History fetch failed; keeping last-known-good page");
                Err(e)
            }
        }
    }

    /// Snapshot of the currently loaded page.
    pub fn loaded(&self) -> Vec<Notification> {
        self.lock_state().items.clone()
    }

    /// Pagination position of the loaded page, if any fetch completed.
    pub fn page_info(&self) -> Option<PageInfo> {
        self.lock_state().page_info
    }

    /// Mark one notification as read: optimistic local flip plus a
    /// fire-and-forget server call.
    pub fn mark_read(&self, id: &str) {
        let Some(credential) = self.session.credential() else {
            debug!(id, "Mark-read skipped: no credential");
            return;
        };

        if let Some(n) = self.lock_state().items.iter_mut().find(|n| n.id == id) {
            n.is_read = true;
        }

        let api = Arc::clone(&self.api);
        let id = id.to_string();
        tokio::spawn(async move {
            if let Err(e) = api.mark_read(&credential, &id).await {
                warn!(id = %id, error = %e, "Mark-read failed; local state stands");
            }
        });
    }

    /// Mark every notification as read. Also backs the user-facing
    /// "clear all" action; casual clearing never hard-deletes.
    pub fn mark_all_read(&self) {
        let Some(credential) = self.session.credential() else {
            debug!("Mark-all-read skipped: no credential");
            return;
        };

        for n in self.lock_state().items.iter_mut() {
            n.is_read = true;
        }

        let api = Arc::clone(&self.api);
        tokio::spawn(async move {
            if let Err(e) = api.mark_all_read(&credential).await {
                warn!(error = %e, "Mark-all-read failed; local state stands");
            }
        });
    }

    /// Permanently delete one notification.
    pub fn delete(&self, id: &str) {
        let Some(credential) = self.session.credential() else {
            debug!(id, "Delete skipped: no credential");
            return;
        };

        self.lock_state().items.retain(|n| n.id != id);

        let api = Arc::clone(&self.api);
        let id = id.to_string();
        tokio::spawn(async move {
            if let Err(e) = api.delete(&credential, &id).await {
                warn!(id = %id, error = %e, "Delete failed; local state stands");
            }
        });
    }

    /// Permanently delete everything currently loaded, via repeated
    /// single deletes. Returns the ids that were dropped locally.
    pub fn delete_loaded(&self) -> Vec<String> {
        let Some(credential) = self.session.credential() else {
            debug!("Delete-all skipped: no credential");
            return Vec::new();
        };

        let ids: Vec<String> = {
            let mut state = self.lock_state();
            let ids = state.items.iter().map(|n| n.id.clone()).collect();
            state.items.clear();
            ids
        };

        let api = Arc::clone(&self.api);
        let spawned_ids = ids.clone();
        tokio::spawn(async move {
            for id in &spawned_ids {
                if let Err(e) = api.delete(&credential, id).await {
                    warn!(id = %id, error = %e, "Delete failed; local state stands");
                }
            }
        });

        ids
    }

    fn lock_state(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}
