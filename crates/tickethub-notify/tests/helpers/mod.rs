//! Shared test helpers: fake transport, fake API, record builders.
#![allow(dead_code)]

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tokio::sync::mpsc;

use tickethub_core::error::AppError;
use tickethub_core::result::AppResult;
use tickethub_core::types::filter::NotificationFilter;
use tickethub_core::types::pagination::{PageRequest, PageResponse};
use tickethub_entity::notification::{Notification, NotificationKind};
use tickethub_notify::connection::{
    ClientFrame, PushPayload, PushSession, PushTransport, ServerFrame,
};
use tickethub_notify::session::Credential;
use tickethub_notify::store::NotificationApi;

/// Build a notification with a server id.
pub fn persisted(id: &str, minutes_ago: i64, is_read: bool) -> Notification {
    Notification {
        id: id.to_string(),
        kind: NotificationKind::Info,
        title: format!("title {id}"),
        message: format!("message {id}"),
        timestamp: Utc::now() - Duration::minutes(minutes_ago),
        is_read,
        link: None,
        event_id: None,
        event_title: None,
        reason: None,
        metadata: None,
    }
}

/// Build a raw push payload.
pub fn payload(id: Option<&str>, title: &str, timestamp: Option<DateTime<Utc>>) -> PushPayload {
    PushPayload {
        id: id.map(str::to_string),
        kind: NotificationKind::TicketConfirmed,
        title: Some(title.to_string()),
        message: Some("...".to_string()),
        timestamp,
        link: None,
        event_id: None,
        event_title: None,
        reason: None,
        metadata: None,
    }
}

/// Give spawned tasks a chance to run.
pub async fn settle() {
    for _ in 0..25 {
        tokio::task::yield_now().await;
    }
}

// ---------------------------------------------------------------------------
// Fake push transport
// ---------------------------------------------------------------------------

#[derive(Default)]
struct TransportState {
    connects: u32,
    fail_next: u32,
    current: Option<mpsc::UnboundedSender<ServerFrame>>,
}

/// In-memory push transport the tests drive by hand.
#[derive(Default)]
pub struct FakeTransport {
    state: Mutex<TransportState>,
    sent: Arc<Mutex<Vec<ClientFrame>>>,
}

impl FakeTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// How many times `connect` was called.
    pub fn connect_count(&self) -> u32 {
        self.lock_state().connects
    }

    /// Make the next `n` connect attempts fail.
    pub fn fail_next_connects(&self, n: u32) {
        self.lock_state().fail_next = n;
    }

    /// Deliver a frame on the current session. Panics if none is live.
    pub fn push(&self, frame: ServerFrame) {
        let state = self.lock_state();
        state
            .current
            .as_ref()
            .expect("no live session")
            .send(frame)
            .expect("session receiver dropped");
    }

    /// Deliver a notification push on the current session.
    pub fn push_notification(&self, payload: PushPayload) {
        self.push(ServerFrame::Notification(payload));
    }

    /// Close the current session from the server side.
    pub fn drop_session(&self) {
        self.lock_state().current = None;
    }

    /// Frames the client has sent.
    pub fn sent_frames(&self) -> Vec<ClientFrame> {
        self.sent.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn lock_state(&self) -> MutexGuard<'_, TransportState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl PushTransport for FakeTransport {
    async fn connect(&self, _credential: &Credential) -> AppResult<Box<dyn PushSession>> {
        let mut state = self.lock_state();
        state.connects += 1;
        if state.fail_next > 0 {
            state.fail_next -= 1;
            return Err(AppError::transport("fake connect refused"));
        }

        let (tx, rx) = mpsc::unbounded_channel();
        state.current = Some(tx);
        Ok(Box::new(FakeSession {
            rx,
            sent: Arc::clone(&self.sent),
        }))
    }
}

struct FakeSession {
    rx: mpsc::UnboundedReceiver<ServerFrame>,
    sent: Arc<Mutex<Vec<ClientFrame>>>,
}

#[async_trait]
impl PushSession for FakeSession {
    async fn next_frame(&mut self) -> AppResult<Option<ServerFrame>> {
        Ok(self.rx.recv().await)
    }

    async fn send(&mut self, frame: ClientFrame) -> AppResult<()> {
        self.sent
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(frame);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Fake notification API
// ---------------------------------------------------------------------------

#[derive(Default)]
struct ApiState {
    records: Vec<Notification>,
    marked_read: Vec<String>,
    mark_all_read_calls: u32,
    deleted: Vec<String>,
    fail_mutations: bool,
    fail_list: bool,
}

/// In-memory notification API.
#[derive(Default)]
pub struct FakeApi {
    state: Mutex<ApiState>,
}

impl FakeApi {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Seed the persisted log.
    pub fn seed(&self, records: Vec<Notification>) {
        self.lock_state().records = records;
    }

    /// Make every mutation call fail.
    pub fn fail_mutations(&self) {
        self.lock_state().fail_mutations = true;
    }

    /// Make every list call fail.
    pub fn fail_list(&self) {
        self.lock_state().fail_list = true;
    }

    pub fn marked_read(&self) -> Vec<String> {
        self.lock_state().marked_read.clone()
    }

    pub fn mark_all_read_calls(&self) -> u32 {
        self.lock_state().mark_all_read_calls
    }

    pub fn deleted(&self) -> Vec<String> {
        self.lock_state().deleted.clone()
    }

    fn lock_state(&self) -> MutexGuard<'_, ApiState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl NotificationApi for FakeApi {
    async fn list(
        &self,
        _credential: &Credential,
        page: PageRequest,
        filter: &NotificationFilter,
    ) -> AppResult<PageResponse<Notification>> {
        let state = self.lock_state();
        if state.fail_list {
            return Err(AppError::network("fake list refused"));
        }
        let filtered: Vec<Notification> = state
            .records
            .iter()
            .filter(|n| !filter.unread_only || !n.is_read)
            .filter(|n| {
                filter
                    .kind
                    .as_deref()
                    .is_none_or(|kind| n.kind.as_str() == kind)
            })
            .cloned()
            .collect();

        let total = filtered.len() as u64;
        let start = ((page.page - 1) * page.page_size) as usize;
        let items: Vec<Notification> = filtered
            .into_iter()
            .skip(start)
            .take(page.page_size as usize)
            .collect();
        Ok(PageResponse::new(items, page.page, page.page_size, total))
    }

    async fn mark_read(&self, _credential: &Credential, id: &str) -> AppResult<()> {
        let mut state = self.lock_state();
        if state.fail_mutations {
            return Err(AppError::network("fake mutation refused"));
        }
        state.marked_read.push(id.to_string());
        if let Some(n) = state.records.iter_mut().find(|n| n.id == id) {
            n.is_read = true;
        }
        Ok(())
    }

    async fn mark_all_read(&self, _credential: &Credential) -> AppResult<()> {
        let mut state = self.lock_state();
        if state.fail_mutations {
            return Err(AppError::network("fake mutation refused"));
        }
        state.mark_all_read_calls += 1;
        for n in state.records.iter_mut() {
            n.is_read = true;
        }
        Ok(())
    }

    async fn delete(&self, _credential: &Credential, id: &str) -> AppResult<()> {
        let mut state = self.lock_state();
        if state.fail_mutations {
            return Err(AppError::network("fake mutation refused"));
        }
        state.deleted.push(id.to_string());
        state.records.retain(|n| n.id != id);
        Ok(())
    }
}
