//! Service layer: orchestration between the domain engine, the state
//! store, and the gateway.

pub mod game_loop;

pub use game_loop::GameLoopService;
