//! Win evaluation: matches post-move, post-capture state against the
//! script's declarative win list.

use crate::domain::script::{Position, WinCondition, WinItem};
use crate::domain::state::{
    GameObject, GameStateRecord, GameStateResult, PlayerMessage, PlayerTurn, ResultType, Seat,
};

pub const WINNER_MESSAGE: &str = "Winner! Congratulations!";
pub const LOSER_MESSAGE: &str = "Loser";

/// First win item matching the mover's seat and condition. List order
/// is the tie-break when a script is ambiguous.
pub fn check_win<'a>(
    win_list: &'a [WinItem],
    mover_seat: Seat,
    destination: &Position,
    captured: Option<&GameObject>,
) -> Option<&'a WinItem> {
    win_list.iter().find(|item| {
        if item.player != mover_seat {
            return false;
        }
        match item.condition {
            WinCondition::ReachedPosition => item.position.as_ref() == Some(destination),
            WinCondition::CapturedObject => captured
                .map(|object| item.object_types.contains(&object.object_type))
                .unwrap_or(false),
        }
    })
}

/// Build the write-once terminal result for a matched win item. The
/// mover wins; every other registered player gets the consolation
/// line.
pub fn build_result(
    record: &GameStateRecord,
    winner: PlayerTurn,
    item: &WinItem,
) -> GameStateResult {
    let player_messages = record
        .players
        .iter()
        .map(|p| PlayerMessage {
            user_id: p.user_id.clone(),
            message: if p.user_id == winner.user_id {
                WINNER_MESSAGE.to_string()
            } else {
                LOSER_MESSAGE.to_string()
            },
        })
        .collect();

    GameStateResult {
        result_type: ResultType::PlayerWon,
        winner,
        player_messages,
        win_item: item.clone(),
        run_info: record.load_run_info.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::test_support::piece_at;

    fn reach_item(player: Seat, row: i64, column: i64) -> WinItem {
        WinItem {
            player,
            condition: WinCondition::ReachedPosition,
            position: Some(Position::new(row, column)),
            object_types: Vec::new(),
        }
    }

    fn capture_item(player: Seat, types: &[&str]) -> WinItem {
        WinItem {
            player,
            condition: WinCondition::CapturedObject,
            position: None,
            object_types: types.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn reached_position_matches_destination() {
        let list = vec![reach_item(1, 1, 4)];
        assert!(check_win(&list, 1, &Position::new(1, 4), None).is_some());
        assert!(check_win(&list, 1, &Position::new(2, 4), None).is_none());
    }

    #[test]
    fn seat_mismatch_never_matches() {
        let list = vec![reach_item(2, 1, 4)];
        assert!(check_win(&list, 1, &Position::new(1, 4), None).is_none());
    }

    #[test]
    fn captured_object_matches_by_type() {
        let list = vec![capture_item(1, &["King"])];
        let mut king = piece_at("k2", 2, "u2", (5, 5));
        king.object_type = "King".into();

        assert!(check_win(&list, 1, &Position::new(5, 5), Some(&king)).is_some());

        let mut pawn = piece_at("p2", 2, "u2", (5, 5));
        pawn.object_type = "Pawn".into();
        assert!(check_win(&list, 1, &Position::new(5, 5), Some(&pawn)).is_none());
        assert!(check_win(&list, 1, &Position::new(5, 5), None).is_none());
    }

    #[test]
    fn list_order_breaks_ties() {
        let list = vec![reach_item(1, 1, 1), capture_item(1, &["King"])];
        let mut king = piece_at("k2", 2, "u2", (1, 1));
        king.object_type = "King".into();
        let matched = check_win(&list, 1, &Position::new(1, 1), Some(&king)).unwrap();
        assert_eq!(matched.condition, WinCondition::ReachedPosition);
    }
}
