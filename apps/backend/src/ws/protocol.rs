//! The room-scoped event protocol.
//!
//! Every frame is one JSON object tagged by `event`. Each event is a
//! concrete variant with its own payload type, validated on receipt;
//! the gateway never forwards untyped blobs except the `message`
//! relay, which is rebroadcast verbatim by design.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::script::Position;
use crate::domain::state::{GameObject, GameStateInfo, LoadRunInfo, Player, PlayerTurn};
use crate::services::game_loop::{EndPayload, MoveCommand, PossibleMovesQuery};

/// Events accepted from a client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ClientEvent {
    Join {
        #[serde(rename = "gameToken")]
        game_token: String,
        #[serde(rename = "userId")]
        user_id: String,
        /// Display name hint; absent for anonymous joiners.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
    },
    Leave {
        #[serde(rename = "gameToken")]
        game_token: String,
        #[serde(rename = "userId")]
        user_id: String,
    },
    Message {
        data: Value,
        #[serde(rename = "gameToken")]
        game_token: String,
        #[serde(rename = "userId")]
        user_id: String,
    },
    PossibleMoves {
        data: PossibleMovesQuery,
        #[serde(rename = "gameToken")]
        game_token: String,
        #[serde(rename = "userId")]
        user_id: String,
    },
    Move {
        data: MoveCommand,
        #[serde(rename = "gameToken")]
        game_token: String,
        #[serde(rename = "userId")]
        user_id: String,
    },
}

impl ClientEvent {
    /// The wire name, used in acknowledge envelopes.
    pub fn name(&self) -> &'static str {
        match self {
            ClientEvent::Join { .. } => "join",
            ClientEvent::Leave { .. } => "leave",
            ClientEvent::Message { .. } => "message",
            ClientEvent::PossibleMoves { .. } => "possible_moves",
            ClientEvent::Move { .. } => "move",
        }
    }
}

/// Reply to a `possible_moves` query, sent to the requester only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PossibleMovesReply {
    #[serde(rename = "ObjectID")]
    pub object_id: String,
    pub possible_moves: Vec<Position>,
}

/// Per-request success/failure envelope, sent to the requester only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Acknowledge {
    pub success: bool,
    pub event: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    pub message: String,
}

impl Acknowledge {
    pub fn ok(event: &str, data: Option<Value>, message: impl Into<String>) -> Self {
        Self {
            success: true,
            event: event.to_string(),
            data,
            message: message.into(),
        }
    }

    pub fn fail(event: &str, message: impl Into<String>) -> Self {
        Self {
            success: false,
            event: event.to_string(),
            data: None,
            message: message.into(),
        }
    }
}

/// Events emitted to clients.
#[allow(clippy::large_enum_variant)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ServerEvent {
    /// Initial board and run context; joining client only.
    Load { data: LoadRunInfo },
    Players { data: Vec<Player> },
    /// Emitted once, when the game actually starts.
    Start { data: GameStateInfo },
    /// Every turn change, including the very first.
    Turn { data: PlayerTurn },
    PossibleMoves { data: PossibleMovesReply },
    /// Room broadcast of the raw accepted move envelope.
    Move {
        data: MoveCommand,
        #[serde(rename = "gameToken")]
        game_token: String,
        #[serde(rename = "userId")]
        user_id: String,
    },
    /// Verbatim relay of a client `message`.
    Message {
        data: Value,
        #[serde(rename = "gameToken")]
        game_token: String,
        #[serde(rename = "userId")]
        user_id: String,
    },
    CapturedObjects { data: Vec<GameObject> },
    End { data: EndPayload },
    Acknowledge { data: Acknowledge },
}
