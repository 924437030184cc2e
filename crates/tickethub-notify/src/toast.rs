//! Ephemeral toast queue for freshly arriving push events.
//!
//! A side-view of the live stream only: historical fetches never spawn
//! toasts, and the presenter never consults or mutates inbox read state.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chrono::Utc;
use tokio::task::AbortHandle;
use tracing::debug;

use tickethub_core::config::notify::ToastConfig;
use tickethub_entity::notification::Notification;

/// Rolling queue of short-lived pop-ups, newest first.
///
/// Each entry owns its own expiry timer; dismissing or displacing one
/// aborts only that timer. Cheap to clone; all clones share the queue.
#[derive(Clone)]
pub struct ToastPresenter {
    config: ToastConfig,
    state: Arc<Mutex<ToastState>>,
}

#[derive(Default)]
struct ToastState {
    /// Visible entries, newest first.
    entries: Vec<ToastEntry>,
}

struct ToastEntry {
    notification: Notification,
    timer: AbortHandle,
}

impl ToastPresenter {
    /// Create a presenter with the given tuning.
    pub fn new(config: ToastConfig) -> Self {
        Self {
            config,
            state: Arc::new(Mutex::new(ToastState::default())),
        }
    }

    /// Offer a freshly arrived push event for presentation.
    ///
    /// Only events younger than the freshness window are admitted, which
    /// keeps old events replayed on reconnect from spawning toasts. The
    /// queue is de-duplicated by id and capped; the oldest entry is
    /// displaced first.
    pub fn offer(&self, notification: &Notification) {
        let age = Utc::now() - notification.timestamp;
        if age.num_seconds() >= self.config.freshness_window_seconds {
            debug!(
                id = %notification.id,
                age_seconds = age.num_seconds(),
                "Stale push event; no toast"
            );
            return;
        }

        let timer = self.spawn_expiry(notification.id.clone());

        let mut state = self.lock_state();
        if state
            .entries
            .iter()
            .any(|e| e.notification.id == notification.id)
        {
            timer.abort();
            return;
        }

        state.entries.insert(
            0,
            ToastEntry {
                notification: notification.clone(),
                timer,
            },
        );
        while state.entries.len() > self.config.max_visible {
            if let Some(displaced) = state.entries.pop() {
                displaced.timer.abort();
            }
        }
    }

    /// Dismiss a toast early, cancelling its timer.
    pub fn dismiss(&self, id: &str) {
        let mut state = self.lock_state();
        if let Some(pos) = state.entries.iter().position(|e| e.notification.id == id) {
            let entry = state.entries.remove(pos);
            entry.timer.abort();
        }
    }

    /// Snapshot of the visible queue, newest first.
    pub fn visible(&self) -> Vec<Notification> {
        self.lock_state()
            .entries
            .iter()
            .map(|e| e.notification.clone())
            .collect()
    }

    /// Abort every outstanding timer and clear the queue.
    pub fn shutdown(&self) {
        let mut state = self.lock_state();
        for entry in state.entries.drain(..) {
            entry.timer.abort();
        }
    }

    fn spawn_expiry(&self, id: String) -> AbortHandle {
        let ttl = Duration::from_secs(self.config.ttl_seconds);
        let state = Arc::clone(&self.state);
        let handle = tokio::spawn(async move {
            tokio::time::sleep(ttl).await;
            let mut state = state.lock().unwrap_or_else(|e| e.into_inner());
            state.entries.retain(|e| e.notification.id != id);
        });
        handle.abort_handle()
    }

    fn lock_state(&self) -> MutexGuard<'_, ToastState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}
