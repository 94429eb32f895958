//! Core game-state enums and id aliases.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type GameId = Uuid;
pub type PlayerId = Uuid;
pub type UserId = Uuid;

/// Overall lifecycle status of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameStatus {
    /// Created, players may join, not yet started.
    Waiting,
    /// Rounds in progress.
    Active,
    /// Score threshold reached. Terminal: only reads are defined past here.
    Finished,
}

/// Phase within the active round.
///
/// Phases only ever advance Lobby -> StorytellerPick -> PlayersPick ->
/// Voting -> Scoring, then wrap to StorytellerPick of the next round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GamePhase {
    Lobby,
    StorytellerPick,
    PlayersPick,
    Voting,
    Scoring,
}

/// How the storyteller delivers the clue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClueMode {
    #[default]
    Text,
    Voice,
}
