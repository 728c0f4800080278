use std::sync::Arc;

use crate::services::GameLoopService;
use crate::store::{GameStateStore, MemoryStore};
use crate::ws::RoomRegistry;

/// Application state containing shared resources.
#[derive(Clone)]
pub struct AppState {
    game_loop: Arc<GameLoopService>,
    rooms: Arc<RoomRegistry>,
    store: Arc<dyn GameStateStore>,
}

impl AppState {
    /// Build state over an arbitrary store adapter.
    pub fn new(store: Arc<dyn GameStateStore>) -> Self {
        Self {
            game_loop: Arc::new(GameLoopService::new(store.clone())),
            rooms: Arc::new(RoomRegistry::new()),
            store,
        }
    }

    /// Development/test state over the in-memory document store.
    pub fn with_memory_store() -> (Self, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        (Self::new(store.clone()), store)
    }

    pub fn game_loop(&self) -> Arc<GameLoopService> {
        self.game_loop.clone()
    }

    pub fn rooms(&self) -> Arc<RoomRegistry> {
        self.rooms.clone()
    }

    pub fn store(&self) -> Arc<dyn GameStateStore> {
        self.store.clone()
    }
}
