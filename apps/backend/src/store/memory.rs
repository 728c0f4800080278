//! In-memory document store: the development and test double for the
//! external state store.

use async_trait::async_trait;
use dashmap::DashMap;

use super::{GameStateStore, StoreError};
use crate::domain::GameStateRecord;

#[derive(Default)]
pub struct MemoryStore {
    records: DashMap<String, GameStateRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a record directly, bypassing the version check. This is
    /// the stand-in for the out-of-scope bootstrap step that creates
    /// game-state records.
    pub fn seed(&self, record: GameStateRecord) {
        self.records.insert(record.game_token.clone(), record);
    }
}

#[async_trait]
impl GameStateStore for MemoryStore {
    async fn get(&self, game_token: &str) -> Result<Option<GameStateRecord>, StoreError> {
        Ok(self.records.get(game_token).map(|r| r.clone()))
    }

    async fn put(&self, mut record: GameStateRecord) -> Result<GameStateRecord, StoreError> {
        let mut stored = self
            .records
            .get_mut(&record.game_token)
            .ok_or_else(|| StoreError::Missing {
                game_token: record.game_token.clone(),
            })?;

        if stored.version != record.version {
            return Err(StoreError::VersionConflict {
                game_token: record.game_token.clone(),
                expected: record.version,
                actual: stored.version,
            });
        }

        record.version += 1;
        *stored = record.clone();
        Ok(record)
    }
}
