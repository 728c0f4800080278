//! Move queries and move application.

use time::OffsetDateTime;
use tracing::{debug, info, warn};

use super::{EndPayload, GameLoopService, MoveCommand, MoveOutcome, PossibleMovesQuery,
    MAX_WRITE_ATTEMPTS};
use crate::domain::script::Position;
use crate::domain::{
    build_result, check_win, legal_moves, next_turn, normalize_moves, take_captured,
};
use crate::error::AppError;
use crate::errors::domain::{ConflictKind, DomainError, ValidationKind};
use crate::store::StoreError;

impl GameLoopService {
    /// Compute the legal destination set for one of the requester's
    /// pieces. Read-only: the record is never rewritten, so repeated
    /// queries are byte-for-byte idempotent.
    pub async fn possible_moves(
        &self,
        game_token: &str,
        user_id: &str,
        query: &PossibleMovesQuery,
    ) -> Result<Vec<Position>, AppError> {
        let record = self.require_record(game_token).await?;
        Self::gate_active(&record, OffsetDateTime::now_utc())?;
        Self::gate_turn(&record, user_id)?;

        let object = record
            .object_for_player(&query.object_id, user_id)
            .ok_or_else(|| {
                DomainError::validation(
                    ValidationKind::ObjectNotFound,
                    "Object not found for the player",
                )
            })?;

        let rules = normalize_moves(&object.moves, object.move_counter);
        let moves = legal_moves(
            object,
            &rules,
            &record.load_run_info.object_list,
            &record.game_state_script.grid_size,
        );
        debug!(
            game_token,
            object_id = %query.object_id,
            count = moves.len(),
            "possible moves computed"
        );
        Ok(moves)
    }

    /// Validate and apply a move: capture detection, win evaluation,
    /// turn advance, one conditional write. Retries from a fresh read
    /// when a concurrent writer wins the version race.
    pub async fn apply_move(
        &self,
        game_token: &str,
        user_id: &str,
        command: &MoveCommand,
    ) -> Result<MoveOutcome, AppError> {
        for attempt in 0..MAX_WRITE_ATTEMPTS {
            let mut record = self.require_record(game_token).await?;
            let now = OffsetDateTime::now_utc();
            Self::gate_active(&record, now)?;
            let current = Self::gate_turn(&record, user_id)?;

            let object = record
                .object_for_player(&command.object_id, user_id)
                .cloned()
                .ok_or_else(|| {
                    DomainError::validation(
                        ValidationKind::ObjectNotFound,
                        "Object not found for the player",
                    )
                })?;

            let rules = normalize_moves(&object.moves, object.move_counter);
            let legal = legal_moves(
                &object,
                &rules,
                &record.load_run_info.object_list,
                &record.game_state_script.grid_size,
            );
            if command.from != object.current_position || !legal.contains(&command.to) {
                return Err(DomainError::validation(
                    ValidationKind::InvalidMove,
                    "Not a valid move",
                )
                .into());
            }

            // Capture and board mutation happen inside one record
            // write: the captured object leaves `ObjectList` and joins
            // `captured_objects` atomically.
            let captured = take_captured(
                &mut record.load_run_info.object_list,
                &command.object_id,
                &command.to,
                user_id,
            );
            for piece in &mut record.load_run_info.object_list {
                if piece.object_id == command.object_id {
                    piece.current_position = command.to;
                    piece.move_counter += 1;
                }
            }
            if let Some(taken) = captured.clone() {
                record.captured_objects.push(taken);
            }

            let win = check_win(
                &record.game_state_script.win_list,
                object.player,
                &command.to,
                captured.as_ref(),
            )
            .cloned();

            let mut turn = None;
            let mut end = None;
            match win {
                Some(item) => {
                    // Terminal: the turn does not advance after a win.
                    let result = build_result(&record, current.clone(), &item);
                    record.game_state_result = Some(result.clone());
                    end = Some(EndPayload {
                        end_run_info: record.load_run_info.clone(),
                        game_state_result: Some(result),
                    });
                    info!(game_token, winner = %current.user_id, "win condition matched");
                }
                None => {
                    let next = next_turn(
                        &record.game_state_info.players_turn_sequence,
                        &current,
                    )
                    .ok_or_else(|| {
                        AppError::internal("started game has an empty turn sequence")
                    })?;
                    record.current_turn = Some(next.clone());
                    turn = Some(next);
                }
            }

            let captured_objects = captured
                .is_some()
                .then(|| record.captured_objects.clone());

            match self.store().put(record).await {
                Ok(_) => {
                    debug!(game_token, user_id, object_id = %command.object_id, "move applied");
                    return Ok(MoveOutcome {
                        captured_objects,
                        turn,
                        end,
                    });
                }
                Err(StoreError::VersionConflict { .. }) => {
                    warn!(game_token, user_id, attempt, "move raced a concurrent write, retrying");
                    continue;
                }
                Err(err) => return Err(err.into()),
            }
        }

        Err(DomainError::conflict(
            ConflictKind::OptimisticLock,
            "Concurrent updates kept outrunning this move; please retry",
        )
        .into())
    }
}
