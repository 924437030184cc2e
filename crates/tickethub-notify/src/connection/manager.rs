//! Push connection lifecycle: idempotent open, manual close with
//! reconnect suppression, single-shot scheduled reconnect, and the
//! bounded live buffer.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::Utc;
use tokio::sync::{broadcast, watch};
use tokio::task::AbortHandle;
use tracing::{debug, info, warn};

use tickethub_core::config::notify::NotifyConfig;
use tickethub_entity::notification::Notification;

use crate::session::Credential;

use super::alerts::DesktopAlerts;
use super::protocol::{ClientFrame, PushPayload, ServerFrame};
use super::transport::{PushSession, PushTransport};

/// Delay between connect attempts within one transport session.
const CONNECT_RETRY_DELAY: Duration = Duration::from_secs(1);

/// Fan-out buffer for live event subscribers.
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Owns the push channel for the lifetime of an authenticated session.
///
/// Cheap to clone; all clones drive the same connection. At most one
/// session is live at a time: [`open`](Self::open) while connected is a
/// no-op, and a manual [`close`](Self::close) suppresses any scheduled
/// reconnect.
#[derive(Clone)]
pub struct ConnectionManager {
    shared: Arc<Shared>,
}

struct Shared {
    transport: Arc<dyn PushTransport>,
    alerts: Arc<dyn DesktopAlerts>,
    config: NotifyConfig,
    state: Mutex<ConnState>,
    status_tx: watch::Sender<bool>,
    events_tx: broadcast::Sender<Notification>,
}

#[derive(Default)]
struct ConnState {
    /// Raw inbound event queue, oldest first.
    live: VecDeque<Notification>,
    /// Whether a session task is currently running.
    session_active: bool,
    /// Suppresses reconnection after a deliberate close.
    manual_close: bool,
    /// Credential used for the current session, kept for reconnects.
    credential: Option<Credential>,
    read_task: Option<AbortHandle>,
    reconnect_timer: Option<AbortHandle>,
}

impl ConnectionManager {
    /// Create a manager over the given transport and alert sink.
    pub fn new(
        config: NotifyConfig,
        transport: Arc<dyn PushTransport>,
        alerts: Arc<dyn DesktopAlerts>,
    ) -> Self {
        let (status_tx, _) = watch::channel(false);
        let (events_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            shared: Arc::new(Shared {
                transport,
                alerts,
                config,
                state: Mutex::new(ConnState::default()),
                status_tx,
                events_tx,
            }),
        }
    }

    /// Open the push connection with the given credential.
    ///
    /// Idempotent: if a session is already live, this is a no-op. A
    /// pending reconnect timer is cancelled, since this open supersedes it.
    pub fn open(&self, credential: Credential) {
        {
            let mut state = self.lock_state();
            if state.session_active {
                debug!("Push connection already live; open is a no-op");
                return;
            }
            state.session_active = true;
            state.manual_close = false;
            state.credential = Some(credential.clone());
            if let Some(timer) = state.reconnect_timer.take() {
                timer.abort();
            }

            let this = self.clone();
            let handle = tokio::spawn(async move { this.run_session(credential).await });
            state.read_task = Some(handle.abort_handle());
        }
        info!("Push connection opening");
    }

    /// Close the push connection deliberately (logout or teardown).
    ///
    /// Sets the suppress flag checked before any reconnect timer acts, so
    /// a logged-out session is never reconnected.
    pub fn close(&self) {
        {
            let mut state = self.lock_state();
            state.manual_close = true;
            state.session_active = false;
            state.credential = None;
            if let Some(task) = state.read_task.take() {
                task.abort();
            }
            if let Some(timer) = state.reconnect_timer.take() {
                timer.abort();
            }
        }
        self.set_connected(false);
        info!("Push connection closed");
    }

    /// Whether the push channel is currently connected.
    pub fn is_connected(&self) -> bool {
        *self.shared.status_tx.borrow()
    }

    /// Subscribe to connectivity transitions.
    pub fn status(&self) -> watch::Receiver<bool> {
        self.shared.status_tx.subscribe()
    }

    /// Subscribe to normalized live events.
    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.shared.events_tx.subscribe()
    }

    /// Snapshot of the live buffer, oldest first.
    pub fn live_snapshot(&self) -> Vec<Notification> {
        self.lock_state().live.iter().cloned().collect()
    }

    /// Flip one live-buffer record to read. Returns whether it was found.
    pub(crate) fn set_live_read(&self, id: &str) -> bool {
        let mut state = self.lock_state();
        match state.live.iter_mut().find(|n| n.id == id) {
            Some(n) => {
                n.is_read = true;
                true
            }
            None => false,
        }
    }

    /// Flip every live-buffer record to read.
    pub(crate) fn set_all_live_read(&self) {
        for n in self.lock_state().live.iter_mut() {
            n.is_read = true;
        }
    }

    /// Drop one record from the live buffer. Returns whether it was found.
    pub(crate) fn drop_live(&self, id: &str) -> bool {
        let mut state = self.lock_state();
        let before = state.live.len();
        state.live.retain(|n| n.id != id);
        state.live.len() != before
    }

    /// One transport session: bounded connect retries, then the frame pump.
    ///
    /// When the session ends for any reason other than a manual close, a
    /// single reconnect attempt is scheduled after the configured delay.
    async fn run_session(self, credential: Credential) {
        let mut attempts = 0u32;
        let mut dropped = false;
        loop {
            attempts += 1;
            match self.shared.transport.connect(&credential).await {
                Ok(session) => {
                    self.set_connected(true);
                    self.pump(session).await;
                    self.set_connected(false);
                    dropped = true;
                    break;
                }
                Err(e) => {
                    warn!(attempt = attempts, error = %e, "Push channel connect failed");
                    if attempts >= self.shared.config.max_connect_attempts {
                        break;
                    }
                    tokio::time::sleep(CONNECT_RETRY_DELAY).await;
                }
            }
        }
        self.on_session_end(dropped);
    }

    /// Read frames until the session ends.
    async fn pump(&self, mut session: Box<dyn PushSession>) {
        loop {
            match session.next_frame().await {
                Ok(Some(ServerFrame::Notification(payload))) => {
                    self.ingest(payload).await;
                }
                Ok(Some(ServerFrame::Ping { timestamp })) => {
                    if let Err(e) = session.send(ClientFrame::Pong { timestamp }).await {
                        debug!(error = %e, "Keepalive pong failed");
                    }
                }
                Ok(None) => {
                    info!("Push channel closed by server");
                    break;
                }
                Err(e) => {
                    warn!(error = %e, "Push channel stream error");
                    break;
                }
            }
        }
    }

    /// Normalize one inbound record, append it to the bounded live buffer,
    /// fan it out to subscribers, and raise the best-effort native alert.
    async fn ingest(&self, payload: PushPayload) {
        let notification = payload.into_notification(Utc::now());
        {
            let mut state = self.lock_state();
            state.live.push_back(notification.clone());
            while state.live.len() > self.shared.config.live_buffer_cap {
                state.live.pop_front();
            }
        }

        debug!(
            id = %notification.id,
            kind = %notification.kind,
            "Push notification ingested"
        );
        let _ = self.shared.events_tx.send(notification.clone());

        if self.shared.alerts.permitted() {
            if let Err(e) = self
                .shared
                .alerts
                .alert(&notification.title, &notification.message)
                .await
            {
                debug!(error = %e, "Native alert failed");
            }
        }
    }

    /// Schedule the single reconnect attempt after a dropped session.
    ///
    /// A manual close suppresses it, and so does an exhausted connect
    /// budget: a session that never established does not retry until the
    /// next explicit open.
    fn on_session_end(&self, dropped: bool) {
        let mut state = self.lock_state();
        state.session_active = false;
        state.read_task = None;

        if state.manual_close {
            debug!("Manual close; reconnect suppressed");
            return;
        }
        if !dropped {
            debug!("Connect budget exhausted; waiting for the next open");
            return;
        }
        let Some(credential) = state.credential.clone() else {
            return;
        };

        let delay = Duration::from_secs(self.shared.config.reconnect_delay_seconds);
        let this = self.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            this.reconnect(credential);
        });
        state.reconnect_timer = Some(handle.abort_handle());
        info!(
            delay_seconds = self.shared.config.reconnect_delay_seconds,
            "Scheduled push channel reconnect"
        );
    }

    /// Fired by the reconnect timer. The manual-close flag is re-checked
    /// here, and `open` itself is a no-op if the connection is already
    /// live again.
    fn reconnect(&self, credential: Credential) {
        if self.lock_state().manual_close {
            debug!("Reconnect timer fired after manual close; ignoring");
            return;
        }
        self.open(credential);
    }

    fn set_connected(&self, connected: bool) {
        let changed = self.shared.status_tx.send_replace(connected) != connected;
        if changed {
            info!(connected, "Push channel connectivity changed");
        }
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, ConnState> {
        self.shared.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}
