//! Room registry: fans server events out to every session joined to a
//! game token. Sessions register on a successful join and unregister
//! when they leave or disconnect.

use actix::prelude::*;
use dashmap::DashMap;
use uuid::Uuid;

use crate::ws::protocol::ServerEvent;

#[derive(Message, Clone)]
#[rtype(result = "()")]
pub struct RoomBroadcast {
    pub event: ServerEvent,
}

#[derive(Default)]
pub struct RoomRegistry {
    rooms: DashMap<String, DashMap<Uuid, Recipient<RoomBroadcast>>>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn join(&self, game_token: &str, conn_id: Uuid, recipient: Recipient<RoomBroadcast>) {
        let room = self
            .rooms
            .entry(game_token.to_string())
            .or_insert_with(DashMap::new);
        room.insert(conn_id, recipient);
    }

    pub fn leave(&self, game_token: &str, conn_id: Uuid) {
        if let Some(room) = self.rooms.get(game_token) {
            room.remove(&conn_id);
            if room.is_empty() {
                drop(room);
                self.rooms.remove(game_token);
            }
        }
    }

    pub fn broadcast(&self, game_token: &str, event: ServerEvent) {
        if let Some(room) = self.rooms.get(game_token) {
            for recipient in room.iter() {
                recipient.value().do_send(RoomBroadcast {
                    event: event.clone(),
                });
            }
        }
    }

    pub fn room_size(&self, game_token: &str) -> usize {
        self.rooms.get(game_token).map(|r| r.len()).unwrap_or(0)
    }
}
