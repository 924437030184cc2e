//! The merged notification working set and its operations.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::debug;

use tickethub_core::result::AppResult;
use tickethub_core::types::filter::NotificationFilter;
use tickethub_core::types::pagination::{PageRequest, PageResponse};
use tickethub_entity::notification::{LOCAL_ID_PREFIX, Notification};

use crate::connection::ConnectionManager;
use crate::store::PersistedStore;

use super::merge::merge;
use super::route::Route;

/// Produces the single source of truth the UI renders from.
///
/// The working set is recomputed wholesale from the live buffer and the
/// loaded persisted page on every read; operations route to the correct
/// backing store by record provenance. Explicitly deleted ids are
/// tombstoned so later fetches and push replays cannot resurrect them.
pub struct Inbox {
    connection: ConnectionManager,
    store: Arc<PersistedStore>,
    tombstones: Mutex<HashSet<String>>,
}

impl Inbox {
    /// Create an inbox over the given buffers.
    pub fn new(connection: ConnectionManager, store: Arc<PersistedStore>) -> Self {
        Self {
            connection,
            store,
            tombstones: Mutex::new(HashSet::new()),
        }
    }

    /// The merged, ordered, de-duplicated working set.
    pub fn merged(&self) -> Vec<Notification> {
        merge(
            &self.connection.live_snapshot(),
            &self.store.loaded(),
            &self.lock_tombstones(),
        )
    }

    /// Count of unread records across the visible set.
    pub fn unread_count(&self) -> usize {
        self.merged().iter().filter(|n| n.is_unread()).count()
    }

    /// Fetch a page of history into the persisted buffer.
    pub async fn fetch_page(
        &self,
        page: PageRequest,
        filter: &NotificationFilter,
    ) -> AppResult<PageResponse<Notification>> {
        self.store.fetch(page, filter).await
    }

    /// Mark one record as read, routed by provenance.
    ///
    /// Ephemeral-provenance records are flipped locally only; their read
    /// state never round-trips to the server.
    pub fn mark_as_read(&self, id: &str) {
        if id.starts_with(LOCAL_ID_PREFIX) {
            self.connection.set_live_read(id);
        } else {
            // The same server id may also sit in the live buffer from a
            // push echo; flip both copies so the merge stays consistent.
            self.connection.set_live_read(id);
            self.store.mark_read(id);
        }
    }

    /// Optimistically mark every record as read, then tell the server.
    pub fn mark_all_read(&self) {
        self.connection.set_all_live_read();
        self.store.mark_all_read();
    }

    /// Remove one record from the inbox.
    ///
    /// Ephemeral records are dropped outright; persisted records are
    /// soft-removed (marked read, still counted in totals).
    pub fn remove(&self, id: &str) {
        if id.starts_with(LOCAL_ID_PREFIX) {
            self.connection.drop_live(id);
        } else {
            self.mark_as_read(id);
        }
    }

    /// Permanently delete every persisted record in the working set.
    ///
    /// Issues real deletes across the loaded page and tombstones the ids
    /// so they never reappear. Ephemeral records stay untouched.
    pub fn delete_all_persisted(&self) {
        let deleted = self.store.delete_loaded();

        // Push echoes of persisted records carry server ids; drop and
        // tombstone those too.
        let live_server_ids: Vec<String> = self
            .connection
            .live_snapshot()
            .into_iter()
            .filter(|n| !n.is_ephemeral())
            .map(|n| n.id)
            .collect();

        let mut tombstones = self.lock_tombstones();
        for id in &live_server_ids {
            self.connection.drop_live(id);
        }
        let count = deleted.len() + live_server_ids.len();
        tombstones.extend(deleted);
        tombstones.extend(live_server_ids);
        debug!(count, "Persisted notifications permanently deleted");
    }

    /// Mark a notification read and yield its navigation target.
    ///
    /// An explicit action supplied by the surface wins; otherwise
    /// resolution follows link > event route > kind default > inbox.
    pub fn click_through(&self, notification: &Notification, action: Option<Route>) -> Route {
        self.mark_as_read(&notification.id);
        action.unwrap_or_else(|| Route::resolve(notification))
    }

    fn lock_tombstones(&self) -> MutexGuard<'_, HashSet<String>> {
        self.tombstones.lock().unwrap_or_else(|e| e.into_inner())
    }
}
