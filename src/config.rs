//! Engine and per-game configuration.

use crate::domain::rules::DEFAULT_WINNING_SCORE;
use crate::domain::state::ClueMode;

/// Options chosen by the host when creating a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameOptions {
    pub winning_score: u32,
    pub clue_mode: ClueMode,
}

impl Default for GameOptions {
    fn default() -> Self {
        Self {
            winning_score: DEFAULT_WINNING_SCORE,
            clue_mode: ClueMode::Text,
        }
    }
}

/// Process-level engine configuration.
///
/// `from_env` reads overrides the way deployments tune the engine without
/// code changes; unparsable values fall back to the defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Attempts at generating a non-colliding room code before giving up.
    pub max_code_attempts: u32,
    /// Permit a voter to replace their vote before the voting threshold.
    pub allow_vote_change: bool,
    /// When true, `start` leaves the storyteller unassigned so a client
    /// claims the role explicitly; otherwise the first id-sorted player is
    /// selected deterministically.
    pub defer_storyteller_claim: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_code_attempts: 16,
            allow_vote_change: true,
            defer_storyteller_claim: false,
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_code_attempts: env_parse("FABULA_MAX_CODE_ATTEMPTS")
                .unwrap_or(defaults.max_code_attempts),
            allow_vote_change: env_parse("FABULA_ALLOW_VOTE_CHANGE")
                .unwrap_or(defaults.allow_vote_change),
            defer_storyteller_claim: env_parse("FABULA_DEFER_STORYTELLER_CLAIM")
                .unwrap_or(defaults.defer_storyteller_claim),
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}
