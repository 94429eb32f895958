//! Deck construction and dealing.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::domain::cards::CardId;
use crate::errors::domain::GameError;

/// Build a freshly shuffled deck from the artwork catalogue.
///
/// Fisher-Yates uniform permutation; never repeats an id. Callers supply the
/// RNG so tests can pin a seed (`rand_chacha`) while production uses
/// `rand::rng()`.
pub fn shuffled_deck<R: Rng + ?Sized>(catalogue: &[CardId], rng: &mut R) -> Vec<CardId> {
    let mut deck = catalogue.to_vec();
    deck.shuffle(rng);
    deck
}

/// Cards dealt to each player's opening hand.
///
/// The 3-player variant deals one extra card per hand to compensate for the
/// double-submission rule.
pub fn deal_size(player_count: usize) -> usize {
    if player_count == 3 {
        7
    } else {
        6
    }
}

/// Remove `count` cards from the front of the deck.
///
/// Fails with `InsufficientCards` when the deck is short; the caller chooses
/// the replenishment policy (deal what is available or skip, never block).
pub fn deal(deck: &mut Vec<CardId>, count: usize) -> Result<Vec<CardId>, GameError> {
    if deck.len() < count {
        return Err(GameError::InsufficientCards {
            requested: count,
            available: deck.len(),
        });
    }
    Ok(deck.drain(..count).collect())
}
