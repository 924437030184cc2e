//! Integration tests for the session-scoped facade.

mod helpers;

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;

use tickethub_core::config::notify::NotifyConfig;
use tickethub_notify::NotificationCenter;
use tickethub_notify::connection::{NoAlerts, PushTransport};
use tickethub_notify::session::{Credential, SessionHandle};
use tickethub_notify::store::NotificationApi;

use helpers::{FakeApi, FakeTransport, payload, settle};

fn center(
    transport: &Arc<FakeTransport>,
    api: &Arc<FakeApi>,
    session: &SessionHandle,
) -> NotificationCenter {
    let transport: Arc<dyn PushTransport> = transport.clone();
    let api: Arc<dyn NotificationApi> = api.clone();
    NotificationCenter::new(
        NotifyConfig::default(),
        session.clone(),
        transport,
        api,
        Arc::new(NoAlerts),
    )
}

#[tokio::test(start_paused = true)]
async fn test_fresh_push_spawns_toast_and_inbox_entry() {
    // Scenario A: the toast expires, the inbox entry remains.
    let transport = FakeTransport::new();
    let api = FakeApi::new();
    let session = SessionHandle::new();
    let center = center(&transport, &api, &session);

    session.login(Credential::new("tok"));
    settle().await;
    assert!(center.is_connected());

    transport.push_notification(payload(Some("n-1"), "Ticket Ready", Some(Utc::now())));
    settle().await;

    assert_eq!(center.toast_queue().len(), 1);
    assert_eq!(center.unread_count(), 1);

    tokio::time::sleep(Duration::from_secs(6)).await;
    settle().await;

    assert!(center.toast_queue().is_empty(), "toast expired");
    assert_eq!(center.notifications().len(), 1, "inbox entry remains");
    assert_eq!(center.unread_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_logout_closes_and_suppresses_reconnect() {
    // Scenario D.
    let transport = FakeTransport::new();
    let api = FakeApi::new();
    let session = SessionHandle::new();
    let center = center(&transport, &api, &session);

    session.login(Credential::new("tok"));
    settle().await;
    assert!(center.is_connected());

    session.logout();
    settle().await;
    assert!(!center.is_connected());

    tokio::time::sleep(Duration::from_secs(10)).await;
    settle().await;
    assert_eq!(transport.connect_count(), 1);
    assert!(!center.is_connected());
}

#[tokio::test(start_paused = true)]
async fn test_login_after_logout_reopens() {
    let transport = FakeTransport::new();
    let api = FakeApi::new();
    let session = SessionHandle::new();
    let center = center(&transport, &api, &session);

    session.login(Credential::new("tok"));
    settle().await;
    session.logout();
    settle().await;
    session.login(Credential::new("tok-2"));
    settle().await;

    assert_eq!(transport.connect_count(), 2);
    assert!(center.is_connected());
}

#[tokio::test(start_paused = true)]
async fn test_stale_replay_never_toasts_but_lands_in_inbox() {
    let transport = FakeTransport::new();
    let api = FakeApi::new();
    let session = SessionHandle::new();
    let center = center(&transport, &api, &session);

    session.login(Credential::new("tok"));
    settle().await;

    let stale = Utc::now() - chrono::Duration::seconds(10);
    transport.push_notification(payload(Some("old-1"), "replayed", Some(stale)));
    settle().await;

    assert!(center.toast_queue().is_empty());
    assert_eq!(center.notifications().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_toast_queue_caps_at_three_newest_first() {
    let transport = FakeTransport::new();
    let api = FakeApi::new();
    let session = SessionHandle::new();
    let center = center(&transport, &api, &session);

    session.login(Credential::new("tok"));
    settle().await;

    for i in 1..=4 {
        transport.push_notification(payload(Some(&format!("t-{i}")), "burst", Some(Utc::now())));
    }
    settle().await;

    let ids: Vec<String> = center.toast_queue().into_iter().map(|n| n.id).collect();
    assert_eq!(ids, vec!["t-4", "t-3", "t-2"]);
}

#[tokio::test(start_paused = true)]
async fn test_toast_queue_dedups_by_id() {
    let transport = FakeTransport::new();
    let api = FakeApi::new();
    let session = SessionHandle::new();
    let center = center(&transport, &api, &session);

    session.login(Credential::new("tok"));
    settle().await;

    transport.push_notification(payload(Some("t-1"), "first", Some(Utc::now())));
    transport.push_notification(payload(Some("t-1"), "again", Some(Utc::now())));
    settle().await;

    assert_eq!(center.toast_queue().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_dismiss_cancels_only_that_timer() {
    let transport = FakeTransport::new();
    let api = FakeApi::new();
    let session = SessionHandle::new();
    let center = center(&transport, &api, &session);

    session.login(Credential::new("tok"));
    settle().await;

    transport.push_notification(payload(Some("t-a"), "a", Some(Utc::now())));
    settle().await;
    tokio::time::sleep(Duration::from_secs(2)).await;
    transport.push_notification(payload(Some("t-b"), "b", Some(Utc::now())));
    settle().await;

    center.dismiss_toast("t-a");
    let ids: Vec<String> = center.toast_queue().into_iter().map(|n| n.id).collect();
    assert_eq!(ids, vec!["t-b"]);

    // Past t-a's original expiry; the sibling timer is untouched.
    tokio::time::sleep(Duration::from_secs(2)).await;
    settle().await;
    assert_eq!(center.toast_queue().len(), 1);

    tokio::time::sleep(Duration::from_secs(4)).await;
    settle().await;
    assert!(center.toast_queue().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_tears_everything_down() {
    let transport = FakeTransport::new();
    let api = FakeApi::new();
    let session = SessionHandle::new();
    let center = center(&transport, &api, &session);

    session.login(Credential::new("tok"));
    settle().await;
    transport.push_notification(payload(Some("t-1"), "pending", Some(Utc::now())));
    settle().await;
    assert_eq!(center.toast_queue().len(), 1);

    center.shutdown();
    settle().await;

    assert!(center.toast_queue().is_empty());
    assert!(!center.is_connected());

    // The session watcher is gone: a new login no longer opens anything.
    session.login(Credential::new("tok-2"));
    settle().await;
    assert_eq!(transport.connect_count(), 1);
}
