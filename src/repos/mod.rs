//! Repository abstraction for durable game state.
//!
//! The engine never talks to a storage backend directly; every read and
//! write goes through [`GameRepo`]. [`memory::InMemoryRepo`] ships as the
//! in-process implementation used by tests and storage-free embedders.

pub mod games;
pub mod memory;
pub mod players;
pub mod rounds;

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::domain::state::{GameId, PlayerId, UserId};
use crate::errors::domain::GameError;
use crate::repos::games::Game;
use crate::repos::players::Player;
use crate::repos::rounds::Round;

/// Profile supplied inline when an unauthenticated host creates a game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuestProfile {
    pub nickname: String,
    pub avatar: String,
}

/// Durable storage of Game, Player and Round entities.
///
/// Natural keys: room code for games, highest round number for the active
/// round. `apply_score_deltas` must be atomic across the whole roster.
#[async_trait]
pub trait GameRepo: Send + Sync {
    async fn create_game(&self, game: Game) -> Result<(), GameError>;
    async fn find_game_by_code(&self, room_code: &str) -> Result<Option<Game>, GameError>;
    async fn update_game(&self, game: Game) -> Result<(), GameError>;

    async fn create_player(&self, player: Player) -> Result<(), GameError>;
    async fn update_player(&self, player: Player) -> Result<(), GameError>;
    async fn find_player(&self, player_id: PlayerId) -> Result<Option<Player>, GameError>;
    /// All players of a game, id-sorted so every caller sees the same
    /// deterministic order.
    async fn players_by_game(&self, game_id: GameId) -> Result<Vec<Player>, GameError>;

    async fn create_round(&self, round: Round) -> Result<(), GameError>;
    async fn update_round(&self, round: Round) -> Result<(), GameError>;
    /// The active round: most recent by round number.
    async fn latest_round(&self, game_id: GameId) -> Result<Option<Round>, GameError>;

    /// Apply one round's point deltas as a single all-or-nothing batch and
    /// return the updated, id-sorted roster.
    async fn apply_score_deltas(
        &self,
        game_id: GameId,
        deltas: &BTreeMap<PlayerId, u32>,
    ) -> Result<Vec<Player>, GameError>;

    /// Materialize an ephemeral guest identity.
    async fn create_guest(&self, profile: &GuestProfile) -> Result<UserId, GameError>;
    /// Best-effort host linking; runs decoupled from the create response.
    async fn link_host(&self, game_id: GameId, user_id: UserId) -> Result<(), GameError>;
}

/// Find a game by room code or fail with `GameNotFound`.
///
/// Convenience helper that converts `None` into a `GameError`, eliminating
/// the repetitive `ok_or_else` pattern when a game must exist.
pub async fn require_game(repo: &dyn GameRepo, room_code: &str) -> Result<Game, GameError> {
    repo.find_game_by_code(room_code)
        .await?
        .ok_or_else(|| GameError::GameNotFound(room_code.to_string()))
}
