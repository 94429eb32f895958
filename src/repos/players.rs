//! Player entity for the repository layer.

use uuid::Uuid;

use crate::domain::cards::CardId;
use crate::domain::state::{GameId, PlayerId};
use crate::errors::domain::GameError;

/// A player inside exactly one game. Created on join, destroyed only with
/// the game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub id: PlayerId,
    pub game_id: GameId,
    pub nickname: String,
    pub avatar: String,
    /// Unique card ids; shrinks as cards are played, topped up between
    /// rounds.
    pub hand: Vec<CardId>,
    /// Monotonically non-decreasing.
    pub score: u32,
    /// Transient UI hints, cleared at the start of every round.
    pub last_submitted_card: Option<CardId>,
    pub last_voted_card: Option<CardId>,
}

impl Player {
    pub fn new(game_id: GameId, nickname: String, avatar: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            game_id,
            nickname,
            avatar,
            hand: Vec::new(),
            score: 0,
            last_submitted_card: None,
            last_voted_card: None,
        }
    }

    /// Take a card out of the hand; `CardNotInHand` when absent.
    pub fn remove_from_hand(&mut self, card: CardId) -> Result<(), GameError> {
        let pos = self
            .hand
            .iter()
            .position(|c| *c == card)
            .ok_or(GameError::CardNotInHand(card))?;
        self.hand.remove(pos);
        Ok(())
    }

    pub fn clear_round_markers(&mut self) {
        self.last_submitted_card = None;
        self.last_voted_card = None;
    }
}
