//! Session-scoped facade wiring the notification subsystem together.

use std::sync::{Arc, Mutex};

use tokio::sync::{broadcast, watch};
use tokio::task::AbortHandle;
use tracing::warn;

use tickethub_core::config::ClientConfig;
use tickethub_core::config::notify::NotifyConfig;
use tickethub_core::result::AppResult;
use tickethub_core::types::filter::NotificationFilter;
use tickethub_core::types::pagination::{PageRequest, PageResponse};
use tickethub_entity::notification::Notification;

use crate::connection::{ConnectionManager, DesktopAlerts, NoAlerts, PushTransport, WsTransport};
use crate::inbox::{Inbox, Route};
use crate::session::SessionHandle;
use crate::store::{HttpNotificationApi, NotificationApi, PersistedStore};
use crate::toast::ToastPresenter;

/// The notification subsystem for one authenticated session.
///
/// Constructed once at session scope with its collaborators injected, so
/// tests can substitute a fake transport and API. Reacts to
/// authentication transitions: the push channel opens on login and closes
/// (with reconnect suppressed) on logout.
pub struct NotificationCenter {
    session: SessionHandle,
    connection: ConnectionManager,
    inbox: Inbox,
    toasts: ToastPresenter,
    tasks: Mutex<Vec<AbortHandle>>,
}

impl NotificationCenter {
    /// Build a center over injected collaborators.
    pub fn new(
        config: NotifyConfig,
        session: SessionHandle,
        transport: Arc<dyn PushTransport>,
        api: Arc<dyn NotificationApi>,
        alerts: Arc<dyn DesktopAlerts>,
    ) -> Self {
        let connection = ConnectionManager::new(config.clone(), transport, alerts);
        let store = Arc::new(PersistedStore::new(api, session.clone()));
        let inbox = Inbox::new(connection.clone(), store);
        let toasts = ToastPresenter::new(config.toasts);

        let center = Self {
            session,
            connection,
            inbox,
            toasts,
            tasks: Mutex::new(Vec::new()),
        };
        center.spawn_session_watcher();
        center.spawn_toast_feed();
        center
    }

    /// Build a center against the production transport and API.
    pub fn connect(config: &ClientConfig, session: SessionHandle) -> Self {
        Self::new(
            config.notify.clone(),
            session,
            Arc::new(WsTransport::new(config.endpoints.push_url.clone())),
            Arc::new(HttpNotificationApi::new(config.endpoints.api_base.clone())),
            Arc::new(NoAlerts),
        )
    }

    /// The merged, ordered notification list.
    pub fn notifications(&self) -> Vec<Notification> {
        self.inbox.merged()
    }

    /// Count of unread notifications across the visible set.
    pub fn unread_count(&self) -> usize {
        self.inbox.unread_count()
    }

    /// Whether the push channel is currently connected.
    pub fn is_connected(&self) -> bool {
        self.connection.is_connected()
    }

    /// Subscribe to connectivity transitions.
    pub fn connectivity(&self) -> watch::Receiver<bool> {
        self.connection.status()
    }

    /// Subscribe to normalized live events.
    pub fn events(&self) -> broadcast::Receiver<Notification> {
        self.connection.subscribe()
    }

    /// Fetch one page of notification history.
    pub async fn fetch_page(
        &self,
        page: PageRequest,
        filter: &NotificationFilter,
    ) -> AppResult<PageResponse<Notification>> {
        self.inbox.fetch_page(page, filter).await
    }

    /// Mark one notification as read.
    pub fn mark_as_read(&self, id: &str) {
        self.inbox.mark_as_read(id);
    }

    /// Mark every notification as read.
    pub fn mark_all_read(&self) {
        self.inbox.mark_all_read();
    }

    /// The user-facing "clear all" action: a mark-all-read, never a
    /// hard delete.
    pub fn clear_all(&self) {
        self.inbox.mark_all_read();
    }

    /// Remove one notification from the inbox.
    pub fn remove(&self, id: &str) {
        self.inbox.remove(id);
    }

    /// Permanently delete every loaded persisted notification. Intended
    /// to sit behind an explicit confirmation in the surface.
    pub fn delete_all_persisted(&self) {
        self.inbox.delete_all_persisted();
    }

    /// Mark a notification read and resolve its navigation target.
    pub fn click_through(&self, notification: &Notification, action: Option<Route>) -> Route {
        self.inbox.click_through(notification, action)
    }

    /// Snapshot of the visible toast queue, newest first.
    pub fn toast_queue(&self) -> Vec<Notification> {
        self.toasts.visible()
    }

    /// Dismiss one toast early.
    pub fn dismiss_toast(&self, id: &str) {
        self.toasts.dismiss(id);
    }

    /// Tear the subsystem down: stop background tasks, close the push
    /// channel, and cancel every toast timer.
    pub fn shutdown(&self) {
        let mut tasks = self.tasks.lock().unwrap_or_else(|e| e.into_inner());
        for task in tasks.drain(..) {
            task.abort();
        }
        self.connection.close();
        self.toasts.shutdown();
    }

    /// Follow authentication transitions: open on login, close on logout.
    fn spawn_session_watcher(&self) {
        let connection = self.connection.clone();
        let mut rx = self.session.subscribe();
        let handle = tokio::spawn(async move {
            loop {
                let credential = rx.borrow_and_update().clone();
                match credential {
                    Some(credential) => connection.open(credential),
                    None => connection.close(),
                }
                if rx.changed().await.is_err() {
                    break;
                }
            }
        });
        self.push_task(handle.abort_handle());
    }

    /// Feed fresh live events into the toast queue.
    fn spawn_toast_feed(&self) {
        let mut rx = self.connection.subscribe();
        let toasts = self.toasts.clone();
        let handle = tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(notification) => toasts.offer(&notification),
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(skipped, "Toast feed lagged behind the live stream");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        });
        self.push_task(handle.abort_handle());
    }

    fn push_task(&self, handle: AbortHandle) {
        self.tasks
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(handle);
    }
}

impl Drop for NotificationCenter {
    fn drop(&mut self) {
        self.shutdown();
    }
}
