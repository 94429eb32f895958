//! Domain-level error type used across services and repositories.
//!
//! This error type is transport- and storage-agnostic. Every variant is
//! recoverable at the caller boundary: the operation aborts, no partial
//! state is committed, and the embedding layer decides how to surface the
//! failure to the acting player.

use thiserror::Error;

use crate::domain::cards::CardId;
use crate::domain::state::{GamePhase, PlayerId};

/// Central domain error type for all game operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum GameError {
    /// Room code or game id does not resolve.
    #[error("game not found: {0}")]
    GameNotFound(String),

    /// Join or round progression attempted after the game finished.
    #[error("game already finished")]
    GameAlreadyFinished,

    /// Operation invoked while the game is not in the phase that permits it.
    #[error("wrong phase: operation requires {expected:?}, game is in {actual:?}")]
    WrongPhase {
        expected: GamePhase,
        actual: GamePhase,
    },

    /// A storyteller-only action was attempted by another player.
    #[error("player {0} is not the storyteller")]
    NotStoryteller(PlayerId),

    /// A claim was attempted while a storyteller is already assigned.
    #[error("storyteller already set for the current round")]
    StorytellerAlreadySet,

    /// A player attempted to submit more cards than their per-round quota.
    #[error("player {player} exceeded the per-round card quota of {quota}")]
    QuotaExceeded { player: PlayerId, quota: usize },

    #[error("player not found: {0}")]
    PlayerNotFound(PlayerId),

    #[error("no round exists for game with room code {0}")]
    RoundNotFound(String),

    /// Room-code collision retries exhausted.
    #[error("room code generation exhausted after {0} attempts")]
    CodeGenerationExhausted(u32),

    /// Ephemeral guest identity creation failed; aborts the whole create flow.
    #[error("guest identity creation failed: {0}")]
    GuestCreationFailed(String),

    /// The deck holds fewer cards than requested; callers decide the
    /// replenishment policy (partial deal or skip, never block).
    #[error("deck has {available} cards, {requested} requested")]
    InsufficientCards { requested: usize, available: usize },

    /// The referenced card is not in the acting player's hand.
    #[error("card {0} is not in the player's hand")]
    CardNotInHand(CardId),

    /// The storyteller is excluded from voting.
    #[error("the storyteller cannot vote")]
    StorytellerCannotVote,

    /// Votes may never target a card the voter played themselves.
    #[error("voting for your own card is not allowed")]
    VotedOwnCard,

    /// A second vote with a different target while vote changes are disabled.
    #[error("vote already cast and vote changes are disabled")]
    VoteAlreadyCast,

    /// A structural invariant did not hold on loaded state.
    #[error("invariant violated: {0}")]
    Invariant(String),

    /// Opaque failure bubbled up from the repository collaborator.
    #[error("persistence failure: {0}")]
    Persistence(String),
}

impl GameError {
    pub fn invariant(detail: impl Into<String>) -> Self {
        Self::Invariant(detail.into())
    }

    pub fn persistence(detail: impl Into<String>) -> Self {
        Self::Persistence(detail.into())
    }
}
