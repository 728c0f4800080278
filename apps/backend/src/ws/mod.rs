//! Real-time gateway: websocket sessions, room fanout, and the event
//! protocol.

pub mod hub;
pub mod protocol;
pub mod session;

pub use hub::{RoomBroadcast, RoomRegistry};
pub use protocol::{Acknowledge, ClientEvent, PossibleMovesReply, ServerEvent};
