//! Service-level tests for the join/start lifecycle and move
//! application, driven through the in-memory document store.

mod common;

use std::sync::Arc;

use backend::domain::script::Position;
use backend::services::game_loop::MoveCommand;
use backend::services::GameLoopService;
use backend::store::{GameStateStore, MemoryStore};
use common::{fixture_record, started_game};

fn move_cmd(object_id: &str, player: i64, from: (i64, i64), to: (i64, i64)) -> MoveCommand {
    MoveCommand {
        object_id: object_id.to_string(),
        player,
        from: Position::new(from.0, from.1),
        to: Position::new(to.0, to.1),
    }
}

#[tokio::test]
async fn join_registers_players_until_quota_starts_the_game() {
    let store = Arc::new(MemoryStore::new());
    store.seed(fixture_record("tok-start"));
    let service = GameLoopService::new(store.clone());

    let first = service.join("tok-start", "ua", Some("Ann")).await.unwrap();
    assert_eq!(first.players.len(), 1);
    assert!(first.started.is_none());
    assert!(first.turn.is_none());

    let second = service.join("tok-start", "ub", Some("Ben")).await.unwrap();
    assert_eq!(second.players.len(), 2);
    let info = second.started.expect("quota met, game should start");
    assert!(info.started_at.is_some());
    assert_eq!(info.players_turn_sequence.len(), 2);
    assert_eq!(second.turn.unwrap().user_id, "ua");

    let record = store.get("tok-start").await.unwrap().unwrap();
    assert_eq!(record.current_turn.as_ref().unwrap().user_id, "ua");
    for piece in &record.load_run_info.object_list {
        let expected = if piece.player == 1 { "ua" } else { "ub" };
        assert_eq!(piece.player_user_id.as_deref(), Some(expected));
    }
}

#[tokio::test]
async fn join_unknown_token_is_not_found() {
    let store = Arc::new(MemoryStore::new());
    let service = GameLoopService::new(store);

    let err = service.join("missing", "ua", None).await.unwrap_err();
    assert_eq!(err.detail(), "Game state not found");
}

#[tokio::test]
async fn rejoining_player_leaves_the_record_untouched() {
    let (service, store) = started_game("tok-rejoin").await;
    let before = store.get("tok-rejoin").await.unwrap().unwrap();

    let outcome = service.join("tok-rejoin", "ua", Some("Ann")).await.unwrap();
    assert!(outcome.started.is_none());

    let after = store.get("tok-rejoin").await.unwrap().unwrap();
    assert_eq!(before, after);
}

#[tokio::test]
async fn accepted_move_advances_the_turn() {
    let (service, store) = started_game("tok-turn").await;

    let outcome = service
        .apply_move("tok-turn", "ua", &move_cmd("w_rook", 1, (8, 1), (6, 1)))
        .await
        .unwrap();
    assert!(outcome.end.is_none());
    assert_eq!(outcome.turn.unwrap().user_id, "ub");

    let record = store.get("tok-turn").await.unwrap().unwrap();
    let rook = record.load_run_info.object_by_id("w_rook").unwrap();
    assert_eq!(rook.current_position, Position::new(6, 1));
    assert_eq!(rook.move_counter, 1);

    // And back again after seat 2 moves.
    let outcome = service
        .apply_move("tok-turn", "ub", &move_cmd("b_king", 2, (1, 5), (2, 5)))
        .await
        .unwrap();
    assert_eq!(outcome.turn.unwrap().user_id, "ua");
}

#[tokio::test]
async fn out_of_turn_move_is_rejected_without_mutation() {
    let (service, store) = started_game("tok-oot").await;
    let before = store.get("tok-oot").await.unwrap().unwrap();

    let err = service
        .apply_move("tok-oot", "ub", &move_cmd("b_king", 2, (1, 5), (2, 5)))
        .await
        .unwrap_err();
    assert_eq!(err.detail(), "It's currently Ann's turn");

    assert_eq!(store.get("tok-oot").await.unwrap().unwrap(), before);
}

#[tokio::test]
async fn moving_another_players_object_is_rejected() {
    let (service, _store) = started_game("tok-own").await;

    let err = service
        .apply_move("tok-own", "ua", &move_cmd("b_king", 2, (1, 5), (2, 5)))
        .await
        .unwrap_err();
    assert_eq!(err.detail(), "Object not found for the player");
}

#[tokio::test]
async fn illegal_destination_is_rejected() {
    let (service, _store) = started_game("tok-illegal").await;

    // The rook cannot reach (5, 5) in one rook move.
    let err = service
        .apply_move("tok-illegal", "ua", &move_cmd("w_rook", 1, (8, 1), (5, 5)))
        .await
        .unwrap_err();
    assert_eq!(err.detail(), "Not a valid move");
}

#[tokio::test]
async fn capture_removes_the_object_and_appends_it_once() {
    let (service, store) = started_game("tok-capture").await;

    // Rook walks its upward ray onto the enemy pawn.
    let outcome = service
        .apply_move("tok-capture", "ua", &move_cmd("w_rook", 1, (8, 1), (4, 1)))
        .await
        .unwrap();

    let captured = outcome.captured_objects.expect("a capture happened");
    assert_eq!(captured.len(), 1);
    assert_eq!(captured[0].object_id, "b_pawn");
    // Pawn capture is not a win: the turn still advances.
    assert!(outcome.end.is_none());
    assert_eq!(outcome.turn.unwrap().user_id, "ub");

    let record = store.get("tok-capture").await.unwrap().unwrap();
    assert!(record.load_run_info.object_by_id("b_pawn").is_none());
    assert_eq!(record.captured_objects.len(), 1);
    assert_eq!(record.captured_objects[0].object_id, "b_pawn");
}

#[tokio::test]
async fn capturing_the_king_wins_and_does_not_advance_the_turn() {
    let store = Arc::new(MemoryStore::new());
    let mut record = fixture_record("tok-win");
    // Put the King in the rook's firing line instead of the pawn.
    record.load_run_info.object_list.retain(|o| o.object_id != "b_pawn");
    for piece in &mut record.load_run_info.object_list {
        if piece.object_id == "b_king" {
            piece.current_position = Position::new(4, 1);
        }
    }
    store.seed(record);
    let service = GameLoopService::new(store.clone());
    service.join("tok-win", "ua", Some("Ann")).await.unwrap();
    service.join("tok-win", "ub", Some("Ben")).await.unwrap();

    let outcome = service
        .apply_move("tok-win", "ua", &move_cmd("w_rook", 1, (8, 1), (4, 1)))
        .await
        .unwrap();

    assert!(outcome.turn.is_none(), "a winning move must not advance the turn");
    let end = outcome.end.expect("winning move ends the game");
    let result = end.game_state_result.expect("result is written on a win");
    assert_eq!(result.winner.user_id, "ua");
    let loser = result
        .player_messages
        .iter()
        .find(|m| m.user_id == "ub")
        .unwrap();
    assert_eq!(loser.message, "Loser");

    let stored = store.get("tok-win").await.unwrap().unwrap();
    assert!(stored.game_state_result.is_some());
    assert_eq!(stored.current_turn.as_ref().unwrap().user_id, "ua");
}

#[tokio::test]
async fn terminal_game_rejects_every_further_request() {
    let store = Arc::new(MemoryStore::new());
    let mut record = fixture_record("tok-done");
    record.load_run_info.object_list.retain(|o| o.object_id != "b_pawn");
    for piece in &mut record.load_run_info.object_list {
        if piece.object_id == "b_king" {
            piece.current_position = Position::new(4, 1);
        }
    }
    store.seed(record);
    let service = GameLoopService::new(store.clone());
    service.join("tok-done", "ua", Some("Ann")).await.unwrap();
    service.join("tok-done", "ub", Some("Ben")).await.unwrap();
    service
        .apply_move("tok-done", "ua", &move_cmd("w_rook", 1, (8, 1), (4, 1)))
        .await
        .unwrap();

    let before = store.get("tok-done").await.unwrap().unwrap();

    let err = service
        .apply_move("tok-done", "ub", &move_cmd("b_king", 2, (4, 1), (5, 1)))
        .await
        .unwrap_err();
    assert_eq!(err.detail(), "The game has already ended");

    let err = service.join("tok-done", "uc", Some("Cam")).await.unwrap_err();
    assert_eq!(err.detail(), "The game has already ended");

    assert_eq!(store.get("tok-done").await.unwrap().unwrap(), before);
}

#[tokio::test]
async fn elapsed_end_date_terminates_the_game() {
    let store = Arc::new(MemoryStore::new());
    let mut record = fixture_record("tok-clock");
    record.game_state_info.game_duration = Some(-60);
    store.seed(record);
    let service = GameLoopService::new(store.clone());
    service.join("tok-clock", "ua", Some("Ann")).await.unwrap();
    // The starting join stamps end_date = now + (-60s), already past.
    service.join("tok-clock", "ub", Some("Ben")).await.unwrap();

    let err = service
        .apply_move("tok-clock", "ua", &move_cmd("w_rook", 1, (8, 1), (6, 1)))
        .await
        .unwrap_err();
    assert_eq!(err.detail(), "The game time has elapsed");
}

#[tokio::test]
async fn extra_joiner_becomes_a_spectator() {
    let (service, store) = started_game("tok-spec").await;
    let before = store.get("tok-spec").await.unwrap().unwrap();

    let outcome = service.join("tok-spec", "uc", Some("Cam")).await.unwrap();
    assert_eq!(outcome.players.len(), 2, "roster is fixed after start");
    assert!(outcome.started.is_none());

    assert_eq!(store.get("tok-spec").await.unwrap().unwrap(), before);
}

#[tokio::test]
async fn spectator_cannot_move() {
    let (service, _store) = started_game("tok-spec2").await;

    let err = service
        .apply_move("tok-spec2", "uc", &move_cmd("w_rook", 1, (8, 1), (6, 1)))
        .await
        .unwrap_err();
    assert_eq!(err.detail(), "It's currently Ann's turn");
}

#[tokio::test]
async fn captured_square_is_plain_empty_afterwards() {
    let (service, store) = started_game("tok-once").await;

    service
        .apply_move("tok-once", "ua", &move_cmd("w_rook", 1, (8, 1), (4, 1)))
        .await
        .unwrap();
    let record = store.get("tok-once").await.unwrap().unwrap();
    assert_eq!(record.captured_objects.len(), 1);

    // The captured pawn is gone from the board, so the square it held
    // is plain empty for the next mover.
    let outcome = service
        .apply_move("tok-once", "ub", &move_cmd("b_king", 2, (1, 5), (1, 1)))
        .await
        .unwrap();
    assert!(outcome.captured_objects.is_none());
    let record = store.get("tok-once").await.unwrap().unwrap();
    assert_eq!(record.captured_objects.len(), 1);
}
