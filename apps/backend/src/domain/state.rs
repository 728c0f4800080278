//! The GameState record: the mutable runtime document for one active
//! game instance, keyed by game token. This is the unit of concurrency
//! and persistence; the store rewrites it whole on every mutation.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::domain::script::{GameScript, MoveRule, Position, WinItem};

/// Seat number: a player's fixed position (1..N) in turn order.
pub type Seat = i64;

/// One piece on the board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameObject {
    /// Unique id, generated once at game-state creation.
    #[serde(rename = "ObjectID")]
    pub object_id: String,
    /// Owning seat number.
    #[serde(rename = "Player")]
    pub player: Seat,
    /// Owning user id, bound at game start.
    #[serde(rename = "PlayerUserID", default)]
    pub player_user_id: Option<String>,
    #[serde(rename = "Type")]
    pub object_type: String,
    #[serde(rename = "CurrentPosition")]
    pub current_position: Position,
    #[serde(rename = "Moves", default)]
    pub moves: Vec<MoveRule>,
    #[serde(default)]
    pub can_jump: bool,
    #[serde(default)]
    pub is_capturable: bool,
    /// Script data: which enemy types this piece may take. Carried for
    /// authoring tools; capture detection keys on `is_capturable` only.
    #[serde(default)]
    pub captureable_object_types: Vec<String>,
    #[serde(default)]
    pub move_counter: u32,
    #[serde(default)]
    pub first_move_only: bool,
}

/// The mutable board plus whatever the bootstrap compiled alongside it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LoadRunInfo {
    #[serde(rename = "ObjectList", default)]
    pub object_list: Vec<GameObject>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl LoadRunInfo {
    /// The object at `pos`, if any. Captured objects are not on the
    /// list, so at most one piece can occupy a square.
    pub fn object_at(&self, pos: &Position) -> Option<&GameObject> {
        self.object_list.iter().find(|o| o.current_position == *pos)
    }

    pub fn object_by_id(&self, object_id: &str) -> Option<&GameObject> {
        self.object_list.iter().find(|o| o.object_id == object_id)
    }
}

/// A registered participant. Distinct from the turn sequence, which
/// fixes seat order once the game starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub user_id: String,
    pub name: String,
    pub is_anonymous: bool,
    #[serde(default)]
    pub points: i64,
}

/// One entry of `players_turn_sequence`; also the `current_turn` value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerTurn {
    pub user_id: String,
    pub name: String,
    pub is_anonymous: bool,
    pub player_num: Seat,
}

/// Mutable config snapshot for one game instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameStateInfo {
    pub max_players: usize,
    /// Turn countdown in seconds; presentation-layer only, never
    /// enforced server-side.
    #[serde(default)]
    pub turn_duration: Option<i64>,
    /// Whole-game duration in seconds; `end_date` derives from it at
    /// start when finite.
    #[serde(default)]
    pub game_duration: Option<i64>,
    #[serde(default)]
    pub players_turn_sequence: Vec<PlayerTurn>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub started_at: Option<OffsetDateTime>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub end_date: Option<OffsetDateTime>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResultType {
    PlayerWon,
}

/// Per-player outcome line attached to the terminal result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerMessage {
    pub user_id: String,
    pub message: String,
}

/// Terminal result, written once. Once set the game rejects all
/// further move and possible-moves requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameStateResult {
    pub result_type: ResultType,
    pub winner: PlayerTurn,
    pub player_messages: Vec<PlayerMessage>,
    pub win_item: WinItem,
    pub run_info: LoadRunInfo,
}

/// The whole persisted document for one game token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameStateRecord {
    pub game_token: String,
    /// Optimistic-concurrency counter; the store refuses a put whose
    /// version does not match the stored one.
    #[serde(default)]
    pub version: u64,
    pub game_state_script: GameScript,
    pub game_state_info: GameStateInfo,
    pub load_run_info: LoadRunInfo,
    #[serde(default)]
    pub players: Vec<Player>,
    #[serde(default)]
    pub current_turn: Option<PlayerTurn>,
    #[serde(default)]
    pub captured_objects: Vec<GameObject>,
    #[serde(default)]
    pub game_state_result: Option<GameStateResult>,
}

impl GameStateRecord {
    pub fn players_count(&self) -> usize {
        self.players.len()
    }

    pub fn has_started(&self) -> bool {
        self.game_state_info.started_at.is_some()
    }

    /// Find the requester's piece by id. Both the id and the bound
    /// user id must match; anything else is "not your object".
    pub fn object_for_player(&self, object_id: &str, user_id: &str) -> Option<&GameObject> {
        self.load_run_info
            .object_list
            .iter()
            .find(|o| o.object_id == object_id && o.player_user_id.as_deref() == Some(user_id))
    }
}
