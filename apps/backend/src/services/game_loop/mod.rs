//! Game-loop orchestration service.
//!
//! Bridges the pure domain engine with the state store: every
//! operation performs one fresh record read, synchronous rule/board
//! computation, and (for mutating operations) one whole-document
//! conditional write. There is no in-memory authoritative board; the
//! persisted record is the single source of truth.

mod join;
mod player_actions;

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::domain::script::Position;
use crate::domain::state::{
    GameObject, GameStateInfo, GameStateRecord, GameStateResult, LoadRunInfo, Player, PlayerTurn,
};
use crate::domain::{end_reason, Seat};
use crate::error::AppError;
use crate::errors::domain::{DomainError, NotFoundKind, ValidationKind};
use crate::store::GameStateStore;

/// Bounded optimistic-write retries before a conflict surfaces to the
/// caller.
const MAX_WRITE_ATTEMPTS: u32 = 3;

/// A `possible_moves` query payload: `{ObjectID, from:{Row,Column}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PossibleMovesQuery {
    #[serde(rename = "ObjectID")]
    pub object_id: String,
    pub from: Position,
}

/// A `move` request payload:
/// `{ObjectID, Player, from:{Row,Column}, to:{Row,Column}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveCommand {
    #[serde(rename = "ObjectID")]
    pub object_id: String,
    #[serde(rename = "Player")]
    pub player: Seat,
    pub from: Position,
    pub to: Position,
}

/// Payload of the `end` broadcast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndPayload {
    pub end_run_info: LoadRunInfo,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub game_state_result: Option<GameStateResult>,
}

/// What a successful join produced, in broadcast order.
#[derive(Debug, Clone)]
pub struct JoinOutcome {
    /// Initial board and script context, sent to the joiner only.
    pub load: LoadRunInfo,
    pub players: Vec<Player>,
    /// Set only on the join that actually started the game.
    pub started: Option<GameStateInfo>,
    /// The very first turn, set together with `started`.
    pub turn: Option<PlayerTurn>,
}

/// What an accepted move produced.
#[derive(Debug, Clone)]
pub struct MoveOutcome {
    /// The full captured list, present when this move captured.
    pub captured_objects: Option<Vec<GameObject>>,
    /// Next turn owner; `None` exactly when the move ended the game.
    pub turn: Option<PlayerTurn>,
    pub end: Option<EndPayload>,
}

pub struct GameLoopService {
    store: Arc<dyn GameStateStore>,
}

impl GameLoopService {
    pub fn new(store: Arc<dyn GameStateStore>) -> Self {
        Self { store }
    }

    pub(crate) fn store(&self) -> &dyn GameStateStore {
        self.store.as_ref()
    }

    /// Load the record or fail with the protocol's not-found reason.
    pub(crate) async fn require_record(
        &self,
        game_token: &str,
    ) -> Result<GameStateRecord, AppError> {
        self.store
            .get(game_token)
            .await
            .map_err(AppError::from)?
            .ok_or_else(|| {
                DomainError::not_found(NotFoundKind::GameState, "Game state not found").into()
            })
    }

    /// Reject requests against a terminal game with its end reason.
    pub(crate) fn gate_active(
        record: &GameStateRecord,
        now: OffsetDateTime,
    ) -> Result<(), DomainError> {
        match end_reason(record, now) {
            Some(reason) => Err(DomainError::validation(
                ValidationKind::GameEnded,
                reason.message(),
            )),
            None => Ok(()),
        }
    }

    /// Only the current turn owner may act; returns that owner.
    pub(crate) fn gate_turn(
        record: &GameStateRecord,
        user_id: &str,
    ) -> Result<PlayerTurn, DomainError> {
        let current = record.current_turn.clone().ok_or_else(|| {
            DomainError::validation(ValidationKind::GameNotStarted, "The game has not started")
        })?;
        if current.user_id != user_id {
            return Err(DomainError::validation(
                ValidationKind::OutOfTurn,
                format!("It's currently {}'s turn", current.name),
            ));
        }
        Ok(current)
    }

    /// Terminal broadcast payload for a token, if the record exists.
    /// Read-only; used by the gateway after a terminal rejection.
    pub async fn end_payload(&self, game_token: &str) -> Result<Option<EndPayload>, AppError> {
        let record = self.store.get(game_token).await.map_err(AppError::from)?;
        Ok(record.map(|r| EndPayload {
            end_run_info: r.load_run_info,
            game_state_result: r.game_state_result,
        }))
    }
}
