#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

pub mod broadcast;
pub mod config;
pub mod domain;
pub mod errors;
pub mod logging;
pub mod repos;
pub mod services;
pub mod utils;

// Re-exports for public API
pub use broadcast::{ChannelBroadcaster, NoopBroadcaster, RoomEvent, SessionBroadcaster};
pub use config::{EngineConfig, GameOptions};
pub use domain::cards::CardId;
pub use domain::snapshot::GameSnapshot;
pub use domain::state::{ClueMode, GamePhase, GameStatus};
pub use errors::GameError;
pub use repos::memory::InMemoryRepo;
pub use repos::{GameRepo, GuestProfile};
pub use services::game_flow::GameFlowService;

// Auto-initialize logging for unit tests
#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    logging::init();
}
