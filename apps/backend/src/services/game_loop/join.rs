//! Room join handling and the start transition.

use time::OffsetDateTime;
use tracing::{debug, info, warn};

use super::{GameLoopService, JoinOutcome, MAX_WRITE_ATTEMPTS};
use crate::domain::state::Player;
use crate::domain::{should_start, start_game};
use crate::error::AppError;
use crate::errors::domain::{ConflictKind, DomainError};
use crate::store::StoreError;

impl GameLoopService {
    /// Register a join against the record.
    ///
    /// A first-time joiner is appended to `players` while seats remain;
    /// the join that meets the player quota fires the start transition
    /// (seat binding, clocks, first turn). Rejoining an existing player
    /// or joining a started game as a spectator touches nothing and
    /// skips the write entirely.
    pub async fn join(
        &self,
        game_token: &str,
        user_id: &str,
        name: Option<&str>,
    ) -> Result<JoinOutcome, AppError> {
        for attempt in 0..MAX_WRITE_ATTEMPTS {
            let mut record = self.require_record(game_token).await?;
            let now = OffsetDateTime::now_utc();
            Self::gate_active(&record, now)?;

            let mut mutated = false;
            let already_registered = record.players.iter().any(|p| p.user_id == user_id);
            if !already_registered
                && !record.has_started()
                && record.players_count() < record.game_state_info.max_players
            {
                let display_name = name
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("Player {}", record.players_count() + 1));
                record.players.push(Player {
                    user_id: user_id.to_string(),
                    name: display_name,
                    is_anonymous: name.is_none(),
                    points: 0,
                });
                mutated = true;
                debug!(game_token, user_id, "player registered");
            }

            let started_now = should_start(&record);
            if started_now {
                start_game(&mut record, now);
                mutated = true;
                info!(
                    game_token,
                    players = record.players_count(),
                    "player quota met, game started"
                );
            }

            if !mutated {
                return Ok(JoinOutcome {
                    load: record.load_run_info,
                    players: record.players,
                    started: None,
                    turn: None,
                });
            }

            match self.store().put(record).await {
                Ok(saved) => {
                    return Ok(JoinOutcome {
                        started: started_now.then(|| saved.game_state_info.clone()),
                        turn: if started_now {
                            saved.current_turn.clone()
                        } else {
                            None
                        },
                        load: saved.load_run_info,
                        players: saved.players,
                    });
                }
                Err(StoreError::VersionConflict { .. }) => {
                    warn!(game_token, user_id, attempt, "join raced a concurrent write, retrying");
                    continue;
                }
                Err(err) => return Err(err.into()),
            }
        }

        Err(DomainError::conflict(
            ConflictKind::OptimisticLock,
            "Concurrent updates kept outrunning this join; please retry",
        )
        .into())
    }

    /// Leaving is room bookkeeping only; the record keeps its player
    /// roster and the turn sequence stays fixed.
    pub async fn leave(&self, game_token: &str, user_id: &str) -> Result<(), AppError> {
        debug!(game_token, user_id, "player left the room");
        Ok(())
    }
}
