//! Game entity for the repository layer.

use time::OffsetDateTime;
use uuid::Uuid;

use crate::config::GameOptions;
use crate::domain::cards::CardId;
use crate::domain::state::{ClueMode, GameId, GamePhase, GameStatus, PlayerId, UserId};
use crate::errors::domain::GameError;

/// One play session identified by a short numeric room code.
///
/// Invariant: `deck` contains no card present in any player's hand or in the
/// active round's plays; every referenced card id originates from the fixed
/// artwork catalogue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Game {
    pub id: GameId,
    pub room_code: String,
    pub status: GameStatus,
    pub phase: GamePhase,
    /// Remaining undealt cards, in shuffled order.
    pub deck: Vec<CardId>,
    pub winning_score: u32,
    pub clue_mode: ClueMode,
    pub storyteller_id: Option<PlayerId>,
    /// 0 until the game starts, then the 1-based active round number.
    pub current_round: u32,
    pub host_user_id: Option<UserId>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl Game {
    pub fn new(room_code: String, deck: Vec<CardId>, options: &GameOptions) -> Self {
        let now = OffsetDateTime::now_utc();
        Self {
            id: Uuid::new_v4(),
            room_code,
            status: GameStatus::Waiting,
            phase: GamePhase::Lobby,
            deck,
            winning_score: options.winning_score,
            clue_mode: options.clue_mode,
            storyteller_id: None,
            current_round: 0,
            host_user_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.status == GameStatus::Finished
    }

    /// Guard for phase-gated operations.
    pub fn require_phase(&self, expected: GamePhase) -> Result<(), GameError> {
        if self.phase != expected {
            return Err(GameError::WrongPhase {
                expected,
                actual: self.phase,
            });
        }
        Ok(())
    }

    /// Bump `updated_at`; call on every mutation so snapshot consumers can
    /// order broadcasts.
    pub fn touch(&mut self) {
        self.updated_at = OffsetDateTime::now_utc();
    }
}
