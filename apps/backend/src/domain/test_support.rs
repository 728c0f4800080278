//! Shared fixtures for domain unit tests and integration test
//! binaries. Kept small and chess-flavored: an 8x8 grid, a couple of
//! pieces, and a capture-the-King win list.

use crate::domain::script::{
    Direction, GameScript, GridSize, MoveRule, Position, StepSpec, WinCondition, WinItem,
};
use crate::domain::state::{
    GameObject, GameStateInfo, GameStateRecord, LoadRunInfo, Player, PlayerTurn, Seat,
};

pub fn grid(rows: i64, columns: i64) -> GridSize {
    GridSize { rows, columns }
}

pub fn turn_entry(user_id: &str, name: &str, player_num: Seat) -> PlayerTurn {
    PlayerTurn {
        user_id: user_id.to_string(),
        name: name.to_string(),
        is_anonymous: false,
        player_num,
    }
}

/// A capturable piece with explicit move rules, bound to a user.
pub fn piece(
    object_id: &str,
    player: Seat,
    user_id: &str,
    at: (i64, i64),
    moves: &[MoveRule],
) -> GameObject {
    GameObject {
        object_id: object_id.to_string(),
        player,
        player_user_id: Some(user_id.to_string()),
        object_type: "Piece".to_string(),
        current_position: Position::new(at.0, at.1),
        moves: moves.to_vec(),
        can_jump: false,
        is_capturable: true,
        captureable_object_types: Vec::new(),
        move_counter: 0,
        first_move_only: false,
    }
}

/// A capturable piece with no moves of its own (an obstacle/target).
pub fn piece_at(object_id: &str, player: Seat, user_id: &str, at: (i64, i64)) -> GameObject {
    piece(object_id, player, user_id, at, &[])
}

pub fn rook_moves() -> Vec<MoveRule> {
    [Direction::Up, Direction::Down, Direction::Left, Direction::Right]
        .into_iter()
        .map(|d| MoveRule::single(d, StepSpec::Infinite))
        .collect()
}

fn capture_the_king(player: Seat) -> WinItem {
    WinItem {
        player,
        condition: WinCondition::CapturedObject,
        position: None,
        object_types: vec!["King".to_string()],
    }
}

pub fn sample_script() -> GameScript {
    GameScript {
        grid_size: grid(8, 8),
        win_list: vec![capture_the_king(1), capture_the_king(2)],
        extra: serde_json::Map::new(),
    }
}

/// An unstarted record: pieces exist with seats assigned but no user
/// ids bound, and no turn sequence yet.
pub fn record_with_players(players: &[(&str, &str)], max_players: usize) -> GameStateRecord {
    let mut rook = piece("w_rook", 1, "unbound", (8, 1), &rook_moves());
    rook.player_user_id = None;
    let mut king = piece("b_king", 2, "unbound", (1, 5), &rook_moves());
    king.player_user_id = None;
    king.object_type = "King".to_string();

    GameStateRecord {
        game_token: "token-1".to_string(),
        version: 0,
        game_state_script: sample_script(),
        game_state_info: GameStateInfo {
            max_players,
            turn_duration: None,
            game_duration: None,
            players_turn_sequence: Vec::new(),
            started_at: None,
            end_date: None,
        },
        load_run_info: LoadRunInfo {
            object_list: vec![rook, king],
            extra: serde_json::Map::new(),
        },
        players: players
            .iter()
            .map(|(user_id, name)| Player {
                user_id: user_id.to_string(),
                name: name.to_string(),
                is_anonymous: false,
                points: 0,
            })
            .collect(),
        current_turn: None,
        captured_objects: Vec::new(),
        game_state_result: None,
    }
}

pub fn sample_record() -> GameStateRecord {
    record_with_players(&[("ua", "Ann"), ("ub", "Ben")], 2)
}
