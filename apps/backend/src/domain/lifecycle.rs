//! Game lifecycle: start when the player quota is met, end on a
//! written result or an elapsed game clock.

use time::OffsetDateTime;

use crate::domain::state::{GameStateRecord, PlayerTurn};

/// Why a game is terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EndReason {
    /// `game_state_result` has been written.
    ResultDecided,
    /// `end_date` passed without a result.
    TimeElapsed,
}

impl EndReason {
    /// The descriptive failure message surfaced in acknowledge
    /// envelopes for requests against a terminal game.
    pub fn message(&self) -> &'static str {
        match self {
            EndReason::ResultDecided => "The game has already ended",
            EndReason::TimeElapsed => "The game time has elapsed",
        }
    }
}

/// Evaluated on every join/move/possible-moves request.
pub fn end_reason(record: &GameStateRecord, now: OffsetDateTime) -> Option<EndReason> {
    if record.game_state_result.is_some() {
        return Some(EndReason::ResultDecided);
    }
    match record.game_state_info.end_date {
        Some(end_date) if end_date <= now => Some(EndReason::TimeElapsed),
        _ => None,
    }
}

/// Start fires only when the room is full and the game has not
/// started yet.
pub fn should_start(record: &GameStateRecord) -> bool {
    !record.has_started() && record.players_count() == record.game_state_info.max_players
}

/// Transition the record to "started": derive the turn sequence from
/// join order (seats 1..N), bind each object's seat to its user id,
/// stamp the clocks, and hand the first turn to seat 1.
pub fn start_game(record: &mut GameStateRecord, now: OffsetDateTime) {
    let sequence: Vec<PlayerTurn> = record
        .players
        .iter()
        .enumerate()
        .map(|(index, p)| PlayerTurn {
            user_id: p.user_id.clone(),
            name: p.name.clone(),
            is_anonymous: p.is_anonymous,
            player_num: (index + 1) as i64,
        })
        .collect();

    for object in &mut record.load_run_info.object_list {
        if let Some(owner) = sequence.iter().find(|t| t.player_num == object.player) {
            object.player_user_id = Some(owner.user_id.clone());
        }
    }

    record.game_state_info.started_at = Some(now);
    record.game_state_info.end_date = record
        .game_state_info
        .game_duration
        .map(|seconds| now + time::Duration::seconds(seconds));
    record.current_turn = sequence.first().cloned();
    record.game_state_info.players_turn_sequence = sequence;
}
