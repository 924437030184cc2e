//! Stateless merge of the live and persisted buffers.

use std::cmp::Ordering;
use std::collections::HashSet;

use tickethub_entity::notification::Notification;

/// Merge the live buffer with the loaded persisted page into one ordered,
/// de-duplicated working set.
///
/// Duplicate ids keep the persisted copy (it carries the authoritative
/// read state). Tombstoned ids are filtered from both buffers so an
/// explicitly deleted record is never re-introduced by a push replay.
/// Ordering: unread before read, then newest timestamp first.
pub fn merge(
    live: &[Notification],
    persisted: &[Notification],
    tombstones: &HashSet<String>,
) -> Vec<Notification> {
    let mut seen: HashSet<&str> = HashSet::with_capacity(live.len() + persisted.len());
    let mut merged: Vec<Notification> = Vec::with_capacity(live.len() + persisted.len());

    for n in persisted {
        if !tombstones.contains(&n.id) && seen.insert(n.id.as_str()) {
            merged.push(n.clone());
        }
    }
    for n in live {
        if !tombstones.contains(&n.id) && seen.insert(n.id.as_str()) {
            merged.push(n.clone());
        }
    }

    merged.sort_by(compare);
    merged
}

/// Unread sorts before read; within the same read state, newest first.
fn compare(a: &Notification, b: &Notification) -> Ordering {
    a.is_read
        .cmp(&b.is_read)
        .then_with(|| b.timestamp.cmp(&a.timestamp))
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::{Duration, Utc};
    use tickethub_entity::notification::NotificationKind;

    fn notification(id: &str, minutes_ago: i64, is_read: bool) -> Notification {
        Notification {
            id: id.to_string(),
            kind: NotificationKind::Info,
            title: format!("title {id}"),
            message: String::new(),
            timestamp: Utc::now() - Duration::minutes(minutes_ago),
            is_read,
            link: None,
            event_id: None,
            event_title: None,
            reason: None,
            metadata: None,
        }
    }

    #[test]
    fn test_dedup_prefers_persisted_copy() {
        let live = vec![notification("n-1", 5, false)];
        let mut persisted_copy = notification("n-1", 5, false);
        persisted_copy.is_read = true;

        let merged = merge(&live, &[persisted_copy], &HashSet::new());
        assert_eq!(merged.len(), 1);
        assert!(merged[0].is_read, "persisted read state must win");
    }

    #[test]
    fn test_ordering_unread_first_then_newest() {
        let live = vec![notification("fresh", 0, false)];
        let persisted = vec![
            notification("old-read", 10, true),
            notification("new-read", 1, true),
            notification("old-unread", 60, false),
        ];

        let merged = merge(&live, &persisted, &HashSet::new());
        let ids: Vec<&str> = merged.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["fresh", "old-unread", "new-read", "old-read"]);
    }

    #[test]
    fn test_tombstones_filter_both_buffers() {
        let live = vec![notification("gone", 1, false)];
        let persisted = vec![notification("gone", 1, true), notification("kept", 2, true)];
        let tombstones: HashSet<String> = ["gone".to_string()].into();

        let merged = merge(&live, &persisted, &tombstones);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].id, "kept");
    }

    #[test]
    fn test_merge_is_additive() {
        // A push arriving before the fetch completes stays visible after it.
        let live = vec![notification("pushed", 0, false)];
        let persisted: Vec<Notification> = (1..=5)
            .map(|i| notification(&format!("p-{i}"), i + 1, i > 3))
            .collect();

        let merged = merge(&live, &persisted, &HashSet::new());
        assert_eq!(merged.len(), 6);
        assert_eq!(merged[0].id, "pushed");
    }
}
