//! Domain layer: pure game logic types and helpers.

pub mod cards;
pub mod deck;
pub mod rules;
pub mod scoring;
pub mod snapshot;
pub mod state;

#[cfg(test)]
mod tests_scoring;

// Re-exports for ergonomics
pub use cards::CardId;
pub use deck::{deal, deal_size, shuffled_deck};
pub use rules::{card_quota, next_storyteller, DEFAULT_WINNING_SCORE};
pub use scoring::{score_round, RoundScore};
pub use snapshot::GameSnapshot;
pub use state::{ClueMode, GamePhase, GameStatus, PlayerId};
