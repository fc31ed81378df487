//! Startup reconciliation between local data and the published snapshot.
//!
//! Runs once per session and only ever pulls: the snapshot either replaces
//! the local item collection wholesale or is ignored. Gift cards and
//! categories are never touched.

use chrono::{DateTime, Utc};
use log::{info, warn};
use shared::SnapshotDocument;
use std::fmt;

use crate::io::SnapshotSource;
use crate::storage::{StorageContext, StorageError};

/// Why a snapshot was not applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    NoSnapshot,
    MissingTimestamp,
    InvalidTimestamp(String),
    /// Local data is at least as recent as the snapshot
    NotNewer,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NoSnapshot => write!(f, "no snapshot available"),
            SkipReason::MissingTimestamp => write!(f, "snapshot has no exportDate"),
            SkipReason::InvalidTimestamp(raw) => write!(f, "snapshot exportDate '{}' is not valid", raw),
            SkipReason::NotNewer => write!(f, "local data is up to date"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncDecision {
    Apply { snapshot_time: DateTime<Utc> },
    Skip(SkipReason),
}

/// What a reconciliation run did
#[derive(Debug)]
pub enum SyncOutcome {
    Applied {
        items: usize,
        synced_at: DateTime<Utc>,
        persisted: Result<(), StorageError>,
    },
    Skipped(SkipReason),
}

impl SyncOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, SyncOutcome::Applied { .. })
    }
}

/// Decide whether `snapshot` should replace local items.
///
/// Applies only when the snapshot carries a valid RFC 3339 `exportDate` and
/// either there is no local checkpoint, the snapshot is strictly newer, or
/// there are no local items.
pub fn decide(
    local_items_empty: bool,
    local_sync: Option<DateTime<Utc>>,
    snapshot: Option<&SnapshotDocument>,
) -> SyncDecision {
    let Some(snapshot) = snapshot else {
        return SyncDecision::Skip(SkipReason::NoSnapshot);
    };
    let Some(raw) = snapshot.export_date.as_deref() else {
        return SyncDecision::Skip(SkipReason::MissingTimestamp);
    };
    let snapshot_time = match DateTime::parse_from_rfc3339(raw) {
        Ok(timestamp) => timestamp.with_timezone(&Utc),
        Err(_) => return SyncDecision::Skip(SkipReason::InvalidTimestamp(raw.to_string())),
    };

    let newer = match local_sync {
        Some(local) => snapshot_time > local,
        None => true,
    };

    if newer || local_items_empty {
        SyncDecision::Apply { snapshot_time }
    } else {
        SyncDecision::Skip(SkipReason::NotNewer)
    }
}

#[derive(Clone)]
pub struct SyncService {
    context: StorageContext,
}

impl SyncService {
    pub fn new(context: StorageContext) -> Self {
        Self { context }
    }

    /// Fetch the snapshot from `source` and apply it if it is newer.
    ///
    /// The fetch runs without holding the storage lock.
    pub async fn reconcile(&self, source: &dyn SnapshotSource) -> SyncOutcome {
        let snapshot = source.fetch().await;
        self.apply_snapshot(snapshot)
    }

    /// Apply an already fetched snapshot according to [`decide`].
    ///
    /// The decision and the replacement happen under one storage lock.
    pub fn apply_snapshot(&self, snapshot: Option<SnapshotDocument>) -> SyncOutcome {
        let result = self.context.replace_items_with(|collections| {
            let decision = decide(
                collections.items.is_empty(),
                collections.last_sync,
                snapshot.as_ref(),
            );
            match decision {
                SyncDecision::Apply { snapshot_time } => {
                    let mut items = snapshot.and_then(|s| s.items).unwrap_or_default();
                    for item in &mut items {
                        item.ensure_variant();
                    }
                    Ok((items, snapshot_time))
                }
                SyncDecision::Skip(reason) => Err(reason),
            }
        });

        let stored = match result {
            Ok(stored) => stored,
            Err(reason) => {
                info!("Skipping snapshot sync: {}", reason);
                return SyncOutcome::Skipped(reason);
            }
        };

        if let Err(e) = &stored.persisted {
            warn!("Applied snapshot but could not persist it: {}", e);
        }
        let (items, synced_at) = stored.value;
        info!("Applied snapshot from {} with {} items", synced_at, items);

        SyncOutcome::Applied {
            items,
            synced_at,
            persisted: stored.persisted,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::StaticSnapshot;
    use crate::test_utils::{item_fixture, timestamp, TestEnvironment};
    use shared::Item;

    fn snapshot(export_date: Option<&str>, items: Option<Vec<Item>>) -> SnapshotDocument {
        SnapshotDocument {
            export_date: export_date.map(str::to_string),
            items,
        }
    }

    fn item_names(env: &TestEnvironment) -> Vec<String> {
        env.context.read(|c| c.items.iter().map(|i| i.name.clone()).collect())
    }

    #[test]
    fn test_decide_without_snapshot() {
        assert_eq!(decide(true, None, None), SyncDecision::Skip(SkipReason::NoSnapshot));
    }

    #[test]
    fn test_decide_requires_valid_timestamp() {
        let missing = snapshot(None, Some(vec![]));
        assert_eq!(
            decide(true, None, Some(&missing)),
            SyncDecision::Skip(SkipReason::MissingTimestamp)
        );

        let invalid = snapshot(Some("yesterday"), Some(vec![]));
        assert_eq!(
            decide(true, None, Some(&invalid)),
            SyncDecision::Skip(SkipReason::InvalidTimestamp("yesterday".to_string()))
        );
    }

    #[test]
    fn test_decide_compares_timestamps() {
        let doc = snapshot(Some("2024-02-01T00:00:00Z"), Some(vec![]));
        let snapshot_time = timestamp("2024-02-01T00:00:00Z");

        assert_eq!(
            decide(false, None, Some(&doc)),
            SyncDecision::Apply { snapshot_time }
        );
        assert_eq!(
            decide(false, Some(timestamp("2024-01-01T00:00:00Z")), Some(&doc)),
            SyncDecision::Apply { snapshot_time }
        );
        assert_eq!(
            decide(false, Some(snapshot_time), Some(&doc)),
            SyncDecision::Skip(SkipReason::NotNewer)
        );
        assert_eq!(
            decide(true, Some(timestamp("2024-03-01T00:00:00Z")), Some(&doc)),
            SyncDecision::Apply { snapshot_time }
        );
    }

    #[test]
    fn test_fresh_install_adopts_snapshot() {
        let env = TestEnvironment::new();
        let service = SyncService::new(env.context.clone());

        let outcome = service.apply_snapshot(Some(snapshot(
            Some("2024-01-01T00:00:00Z"),
            Some(vec![item_fixture("a", "Bike"), item_fixture("b", "Book")]),
        )));

        assert!(outcome.is_applied());
        assert_eq!(item_names(&env), vec!["Bike", "Book"]);

        let reopened = env.reopen();
        assert_eq!(reopened.read(|c| c.items.len()), 2);
        assert_eq!(
            reopened.read(|c| c.last_sync),
            Some(timestamp("2024-01-01T00:00:00Z"))
        );
    }

    #[test]
    fn test_local_newer_keeps_local_items() {
        let env = TestEnvironment::with_items(
            vec![item_fixture("local", "Local")],
            Some(timestamp("2024-06-01T00:00:00Z")),
        );
        let service = SyncService::new(env.context.clone());

        let outcome = service.apply_snapshot(Some(snapshot(
            Some("2024-01-01T00:00:00Z"),
            Some(vec![item_fixture("remote", "Remote")]),
        )));

        assert!(matches!(outcome, SyncOutcome::Skipped(SkipReason::NotNewer)));
        assert_eq!(item_names(&env), vec!["Local"]);
        assert_eq!(
            env.context.read(|c| c.last_sync),
            Some(timestamp("2024-06-01T00:00:00Z"))
        );
    }

    #[test]
    fn test_newer_snapshot_overwrites_local_items() {
        let env = TestEnvironment::with_items(
            vec![item_fixture("local", "Local")],
            Some(timestamp("2024-01-01T00:00:00Z")),
        );
        let service = SyncService::new(env.context.clone());

        service.apply_snapshot(Some(snapshot(
            Some("2024-02-01T00:00:00Z"),
            Some(vec![item_fixture("remote", "Remote")]),
        )));

        assert_eq!(item_names(&env), vec!["Remote"]);
        assert_eq!(
            env.context.read(|c| c.last_sync),
            Some(timestamp("2024-02-01T00:00:00Z"))
        );
    }

    #[test]
    fn test_second_run_is_a_no_op() {
        let env = TestEnvironment::new();
        let service = SyncService::new(env.context.clone());
        let doc = snapshot(
            Some("2024-01-01T00:00:00Z"),
            Some(vec![item_fixture("a", "Bike")]),
        );

        service.apply_snapshot(Some(doc.clone()));
        let after_first = env.context.read(|c| c.clone());

        let outcome = service.apply_snapshot(Some(doc));
        assert!(matches!(outcome, SyncOutcome::Skipped(SkipReason::NotNewer)));
        assert_eq!(env.context.read(|c| c.clone()), after_first);
    }

    #[test]
    fn test_snapshot_without_items_applies_as_empty() {
        let env = TestEnvironment::with_items(
            vec![item_fixture("local", "Local")],
            Some(timestamp("2024-01-01T00:00:00Z")),
        );
        let service = SyncService::new(env.context.clone());

        let outcome = service.apply_snapshot(Some(snapshot(Some("2024-05-01T00:00:00Z"), None)));

        assert!(matches!(outcome, SyncOutcome::Applied { items: 0, .. }));
        assert!(item_names(&env).is_empty());
    }

    #[test]
    fn test_snapshot_items_get_a_variant() {
        let env = TestEnvironment::new();
        let service = SyncService::new(env.context.clone());

        let mut bare = item_fixture("a", "Bike");
        bare.variants.clear();
        service.apply_snapshot(Some(snapshot(Some("2024-01-01T00:00:00Z"), Some(vec![bare]))));

        assert_eq!(env.context.read(|c| c.items[0].variants.len()), 1);
    }

    #[test]
    fn test_invalid_timestamp_leaves_state_alone() {
        let env = TestEnvironment::with_items(vec![item_fixture("local", "Local")], None);
        let service = SyncService::new(env.context.clone());

        let outcome = service.apply_snapshot(Some(snapshot(Some("not a date"), Some(vec![]))));

        assert!(!outcome.is_applied());
        assert_eq!(item_names(&env), vec!["Local"]);
        assert_eq!(env.context.read(|c| c.last_sync), None);
    }

    #[test]
    fn test_failed_write_is_reported() {
        let env = TestEnvironment::new();
        env.store.set_writable(false);
        let service = SyncService::new(env.context.clone());

        let outcome = service.apply_snapshot(Some(snapshot(
            Some("2024-01-01T00:00:00Z"),
            Some(vec![item_fixture("a", "Bike")]),
        )));

        match outcome {
            SyncOutcome::Applied { items, persisted, .. } => {
                assert_eq!(items, 1);
                assert!(persisted.is_err());
            }
            other => panic!("expected applied outcome, got {:?}", other),
        }
        assert_eq!(item_names(&env), vec!["Bike"]);
    }

    #[tokio::test]
    async fn test_reconcile_fetches_from_source() {
        let env = TestEnvironment::new();
        let service = SyncService::new(env.context.clone());
        let source = StaticSnapshot::new(Some(snapshot(
            Some("2024-01-01T00:00:00Z"),
            Some(vec![item_fixture("a", "Bike")]),
        )));

        let outcome = service.reconcile(&source).await;
        assert!(matches!(outcome, SyncOutcome::Applied { items: 1, .. }));

        let outcome = service.reconcile(&StaticSnapshot::default()).await;
        assert!(matches!(outcome, SyncOutcome::Skipped(SkipReason::NoSnapshot)));
        assert_eq!(item_names(&env), vec!["Bike"]);
    }

    #[test]
    fn test_empty_local_adopts_older_snapshot() {
        let env = TestEnvironment::with_items(vec![], Some(timestamp("2024-06-01T00:00:00Z")));
        let service = SyncService::new(env.context.clone());

        let outcome = service.apply_snapshot(Some(snapshot(
            Some("2024-01-01T00:00:00Z"),
            Some(vec![item_fixture("a", "Bike")]),
        )));

        assert!(outcome.is_applied());
        assert_eq!(item_names(&env), vec!["Bike"]);
        assert_eq!(
            env.context.read(|c| c.last_sync),
            Some(timestamp("2024-01-01T00:00:00Z"))
        );

        let reopened = env.reopen();
        assert_eq!(reopened.read(|c| c.items.len()), 1);
        assert_eq!(
            reopened.read(|c| c.last_sync),
            Some(timestamp("2024-01-01T00:00:00Z"))
        );
    }

    #[test]
    fn test_unsaved_items_do_not_advance_stored_checkpoint() {
        let env = TestEnvironment::with_items(
            vec![item_fixture("old", "Old")],
            Some(timestamp("2024-01-01T00:00:00Z")),
        );
        env.store.reject_writes_to("wishlist-data");
        let service = SyncService::new(env.context.clone());
        let doc = snapshot(
            Some("2024-02-01T00:00:00Z"),
            Some(vec![item_fixture("new", "New")]),
        );

        match service.apply_snapshot(Some(doc.clone())) {
            SyncOutcome::Applied { persisted, .. } => assert!(persisted.is_err()),
            other => panic!("expected applied outcome, got {:?}", other),
        }
        assert_eq!(item_names(&env), vec!["New"]);

        // After a restart the old items sit next to the old checkpoint,
        // so the same snapshot is adopted again
        let restarted = SyncService::new(env.reopen());
        assert_eq!(
            restarted.context.read(|c| c.last_sync),
            Some(timestamp("2024-01-01T00:00:00Z"))
        );
        assert!(restarted.apply_snapshot(Some(doc)).is_applied());
    }
}
