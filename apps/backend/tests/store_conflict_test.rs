//! Optimistic-concurrency behavior: conflicted writes retry from a
//! fresh read instead of silently losing updates.

mod common;

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use backend::domain::script::Position;
use backend::domain::state::GameStateRecord;
use backend::services::game_loop::MoveCommand;
use backend::services::GameLoopService;
use backend::store::{GameStateStore, MemoryStore, StoreError};
use common::fixture_record;

/// Wraps the memory store and fails the first N puts with a version
/// conflict, as if another writer always got there first.
struct ContendedStore {
    inner: MemoryStore,
    conflicts_left: AtomicU32,
}

impl ContendedStore {
    fn new(conflicts: u32) -> Self {
        Self {
            inner: MemoryStore::new(),
            conflicts_left: AtomicU32::new(conflicts),
        }
    }
}

#[async_trait]
impl GameStateStore for ContendedStore {
    async fn get(&self, game_token: &str) -> Result<Option<GameStateRecord>, StoreError> {
        self.inner.get(game_token).await
    }

    async fn put(&self, record: GameStateRecord) -> Result<GameStateRecord, StoreError> {
        let left = self.conflicts_left.load(Ordering::SeqCst);
        if left > 0 {
            self.conflicts_left.store(left - 1, Ordering::SeqCst);
            return Err(StoreError::VersionConflict {
                game_token: record.game_token.clone(),
                expected: record.version,
                actual: record.version + 1,
            });
        }
        self.inner.put(record).await
    }
}

async fn contended_started_game(token: &str, conflicts: u32) -> (GameLoopService, Arc<ContendedStore>) {
    let store = Arc::new(ContendedStore::new(conflicts));
    store.inner.seed(fixture_record(token));
    let service = GameLoopService::new(store.clone());
    (service, store)
}

#[tokio::test]
async fn one_conflict_is_absorbed_by_the_retry() {
    let (service, store) = contended_started_game("tok-retry", 0).await;
    service.join("tok-retry", "ua", Some("Ann")).await.unwrap();
    service.join("tok-retry", "ub", Some("Ben")).await.unwrap();

    // Next put conflicts once, then succeeds on the re-read.
    store.conflicts_left.store(1, Ordering::SeqCst);

    let outcome = service
        .apply_move(
            "tok-retry",
            "ua",
            &MoveCommand {
                object_id: "w_rook".to_string(),
                player: 1,
                from: Position::new(8, 1),
                to: Position::new(6, 1),
            },
        )
        .await
        .unwrap();
    assert_eq!(outcome.turn.unwrap().user_id, "ub");

    let record = store.get("tok-retry").await.unwrap().unwrap();
    assert_eq!(
        record.load_run_info.object_by_id("w_rook").unwrap().current_position,
        Position::new(6, 1)
    );
}

#[tokio::test]
async fn persistent_contention_surfaces_a_conflict_error() {
    let (service, store) = contended_started_game("tok-lost", 0).await;
    service.join("tok-lost", "ua", Some("Ann")).await.unwrap();
    service.join("tok-lost", "ub", Some("Ben")).await.unwrap();

    store.conflicts_left.store(u32::MAX, Ordering::SeqCst);

    let err = service
        .apply_move(
            "tok-lost",
            "ua",
            &MoveCommand {
                object_id: "w_rook".to_string(),
                player: 1,
                from: Position::new(8, 1),
                to: Position::new(6, 1),
            },
        )
        .await
        .unwrap_err();
    assert!(err.detail().contains("retry"));

    // The rook never moved: a conflicted write applies nothing.
    let record = store.get("tok-lost").await.unwrap().unwrap();
    assert_eq!(
        record.load_run_info.object_by_id("w_rook").unwrap().current_position,
        Position::new(8, 1)
    );
}
