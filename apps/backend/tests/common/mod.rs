#![allow(dead_code)]

// tests/common/mod.rs

use std::collections::BTreeMap;
use std::sync::Arc;

use backend::domain::script::{
    Direction, GameScript, GridSize, MoveRule, Position, StepSpec, WinCondition, WinItem,
};
use backend::domain::state::{
    GameObject, GameStateInfo, GameStateRecord, LoadRunInfo,
};
use backend::services::GameLoopService;
use backend::store::MemoryStore;

// Logging is auto-installed for all test binaries
#[ctor::ctor]
fn init_logging() {
    backend_test_support::logging::init();
}

pub fn rook_moves() -> Vec<MoveRule> {
    [Direction::Up, Direction::Down, Direction::Left, Direction::Right]
        .into_iter()
        .map(|d| MoveRule::single(d, StepSpec::Infinite))
        .collect()
}

/// A pawn that steps one row up, or two on its very first move.
pub fn pawn_moves() -> Vec<MoveRule> {
    vec![
        MoveRule::single(Direction::Up, StepSpec::Steps(vec![1])),
        MoveRule {
            directions: BTreeMap::from([(Direction::Up, StepSpec::Steps(vec![2]))]),
            first_move_only: true,
        },
    ]
}

pub fn object(
    object_id: &str,
    player: i64,
    object_type: &str,
    at: (i64, i64),
    moves: Vec<MoveRule>,
) -> GameObject {
    GameObject {
        object_id: object_id.to_string(),
        player,
        player_user_id: None,
        object_type: object_type.to_string(),
        current_position: Position::new(at.0, at.1),
        moves,
        can_jump: false,
        is_capturable: true,
        captureable_object_types: Vec::new(),
        move_counter: 0,
        first_move_only: false,
    }
}

fn capture_the_king(player: i64) -> WinItem {
    WinItem {
        player,
        condition: WinCondition::CapturedObject,
        position: None,
        object_types: vec!["King".to_string()],
    }
}

/// An unstarted two-seat game on an 8x8 grid: a rook and a pawn for
/// seat 1, a pawn and a King for seat 2, capture-the-King to win.
pub fn fixture_record(game_token: &str) -> GameStateRecord {
    GameStateRecord {
        game_token: game_token.to_string(),
        version: 0,
        game_state_script: GameScript {
            grid_size: GridSize { rows: 8, columns: 8 },
            win_list: vec![capture_the_king(1), capture_the_king(2)],
            extra: serde_json::Map::new(),
        },
        game_state_info: GameStateInfo {
            max_players: 2,
            turn_duration: None,
            game_duration: None,
            players_turn_sequence: Vec::new(),
            started_at: None,
            end_date: None,
        },
        load_run_info: LoadRunInfo {
            object_list: vec![
                object("w_rook", 1, "Rook", (8, 1), rook_moves()),
                object("w_pawn", 1, "Pawn", (7, 2), pawn_moves()),
                object("b_pawn", 2, "Pawn", (4, 1), Vec::new()),
                object("b_king", 2, "King", (1, 5), rook_moves()),
            ],
            extra: serde_json::Map::new(),
        },
        players: Vec::new(),
        current_turn: None,
        captured_objects: Vec::new(),
        game_state_result: None,
    }
}

/// Seed a fixture record and join both players, starting the game.
/// Join order makes "ua" seat 1 and "ub" seat 2.
pub async fn started_game(game_token: &str) -> (GameLoopService, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    store.seed(fixture_record(game_token));
    let service = GameLoopService::new(store.clone());

    service.join(game_token, "ua", Some("Ann")).await.unwrap();
    let outcome = service.join(game_token, "ub", Some("Ben")).await.unwrap();
    assert!(outcome.started.is_some(), "second join should start the game");

    (service, store)
}
