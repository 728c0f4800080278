//! Error codes for the backend API.
//!
//! All error codes are SCREAMING_SNAKE_CASE and map 1:1 to the strings
//! that appear in responses. Add new codes here; never pass ad-hoc
//! strings as error codes.

use core::fmt;

/// Centralized error codes for the backend API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Request validation
    /// Malformed or unparseable request payload
    BadRequest,
    /// General validation error
    ValidationError,
    /// Request arrived before the game started
    GameNotStarted,
    /// Requester does not own the current turn
    OutOfTurn,
    /// Destination is not in the legal move set
    InvalidMove,

    // Resource not found
    /// No game state record for the supplied token
    GameStateNotFound,
    /// Object not owned by the requesting player
    ObjectNotFound,
    /// General not found error
    NotFound,

    // Lifecycle conflicts
    /// Game already terminal (result set or time elapsed)
    GameEnded,
    /// Concurrent writers raced on the same record version
    OptimisticLock,

    // Infrastructure
    /// State store rejected or failed the operation
    StoreUnavailable,
    /// Invalid or missing configuration
    ConfigError,
    /// Unexpected internal error
    InternalError,
}

impl ErrorCode {
    /// Canonical SCREAMING_SNAKE_CASE string for this code.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::BadRequest => "BAD_REQUEST",
            ErrorCode::ValidationError => "VALIDATION_ERROR",
            ErrorCode::GameNotStarted => "GAME_NOT_STARTED",
            ErrorCode::OutOfTurn => "OUT_OF_TURN",
            ErrorCode::InvalidMove => "INVALID_MOVE",
            ErrorCode::GameStateNotFound => "GAME_STATE_NOT_FOUND",
            ErrorCode::ObjectNotFound => "OBJECT_NOT_FOUND",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::GameEnded => "GAME_ENDED",
            ErrorCode::OptimisticLock => "OPTIMISTIC_LOCK",
            ErrorCode::StoreUnavailable => "STORE_UNAVAILABLE",
            ErrorCode::ConfigError => "CONFIG_ERROR",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
