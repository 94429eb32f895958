//! Round entity for the repository layer.

use std::collections::BTreeMap;

use crate::domain::cards::CardId;
use crate::domain::state::{GameId, PlayerId};

/// One clue -> submit -> vote -> score cycle.
///
/// Invariants: `cards_played[storyteller_id]` has exactly one entry, set
/// only by the clue operation; every other player's list stays within the
/// per-round quota; `votes` never contains the storyteller or a card the
/// voter played themselves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Round {
    pub game_id: GameId,
    /// 1-based, strictly increasing per game; the highest number is the
    /// single active round.
    pub round_no: u32,
    pub storyteller_id: PlayerId,
    /// Empty until the storyteller sets it.
    pub clue: String,
    /// Ordered lists: the first entry of the storyteller's list is the clue
    /// card.
    pub cards_played: BTreeMap<PlayerId, Vec<CardId>>,
    /// At most one live vote per voter.
    pub votes: BTreeMap<PlayerId, CardId>,
}

impl Round {
    pub fn new(game_id: GameId, round_no: u32, storyteller_id: PlayerId) -> Self {
        Self {
            game_id,
            round_no,
            storyteller_id,
            clue: String::new(),
            cards_played: BTreeMap::new(),
            votes: BTreeMap::new(),
        }
    }

    pub fn plays_for(&self, player: PlayerId) -> usize {
        self.cards_played.get(&player).map_or(0, Vec::len)
    }

    pub fn has_played(&self, player: PlayerId, card: CardId) -> bool {
        self.cards_played
            .get(&player)
            .is_some_and(|cards| cards.contains(&card))
    }

    pub fn record_play(&mut self, player: PlayerId, card: CardId) {
        self.cards_played.entry(player).or_default().push(card);
    }

    /// Upsert: a voter holds at most one live vote.
    pub fn record_vote(&mut self, voter: PlayerId, target: CardId) {
        self.votes.insert(voter, target);
    }

    pub fn distinct_voters(&self) -> usize {
        self.votes.len()
    }

    /// The storyteller's clue card, once set.
    pub fn clue_card(&self) -> Option<CardId> {
        self.cards_played
            .get(&self.storyteller_id)
            .and_then(|cards| cards.first())
            .copied()
    }
}
