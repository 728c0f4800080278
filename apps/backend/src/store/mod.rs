//! State-store adapter boundary.
//!
//! The engine consumes the document store through this minimal get/put
//! interface only. Writes are whole-record replacements guarded by an
//! optimistic version check; there are no partial-field transactions.

pub mod memory;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::GameStateRecord;

pub use memory::MemoryStore;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A put against a token with no record. Records are created by
    /// the bootstrap step, never by this service.
    #[error("no game state record for token {game_token}")]
    Missing { game_token: String },

    /// The stored version moved under the writer.
    #[error("version conflict on {game_token}: expected {expected}, found {actual}")]
    VersionConflict {
        game_token: String,
        expected: u64,
        actual: u64,
    },

    /// The backing store failed the operation.
    #[error("store backend error: {detail}")]
    Backend { detail: String },
}

/// The consumed external interface of the document store.
#[async_trait]
pub trait GameStateStore: Send + Sync {
    /// Fetch the record for a token, or `None` if the token is
    /// unknown.
    async fn get(&self, game_token: &str) -> Result<Option<GameStateRecord>, StoreError>;

    /// Replace the whole record. Fails with `VersionConflict` when
    /// `record.version` no longer matches the stored version; on
    /// success the returned record carries the incremented version.
    async fn put(&self, record: GameStateRecord) -> Result<GameStateRecord, StoreError>;
}
