//! Per-round scoring.
//!
//! Pure computation over a completed voting round: no entity mutation, no
//! persistence. The orchestrator applies the resulting deltas as one batch
//! and runs the win check on the updated totals.

use std::collections::{BTreeMap, HashMap};

use crate::domain::cards::CardId;
use crate::domain::state::PlayerId;
use crate::errors::domain::GameError;

/// Point deltas for one completed round.
///
/// `deltas` holds an entry for every player (zero included) so batched
/// application touches the full roster atomically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundScore {
    pub deltas: BTreeMap<PlayerId, u32>,
    pub correct_votes: usize,
    pub total_voters: usize,
}

/// Compute point deltas for a finished voting round.
///
/// * Branch A — every voter found the clue card, or none did: the
///   storyteller gains nothing and every other player gains +2.
/// * Branch B — some but not all found it: storyteller +3, each correct
///   voter +3.
/// * Both branches: each vote landing on a non-storyteller card awards its
///   owner +1 per vote (decoy bonus, stacks with the branch points).
pub fn score_round(
    cards_played: &BTreeMap<PlayerId, Vec<CardId>>,
    votes: &BTreeMap<PlayerId, CardId>,
    storyteller_id: PlayerId,
    player_ids: &[PlayerId],
) -> Result<RoundScore, GameError> {
    // Reverse index: card -> owning player (multi-card lists flattened).
    let owners: HashMap<CardId, PlayerId> = cards_played
        .iter()
        .flat_map(|(player, cards)| cards.iter().map(|card| (*card, *player)))
        .collect();

    let clue_card = cards_played
        .get(&storyteller_id)
        .and_then(|cards| cards.first())
        .copied()
        .ok_or_else(|| GameError::invariant("storyteller has no clue card on a scored round"))?;

    let correct_votes = votes.values().filter(|target| **target == clue_card).count();
    let total_voters = player_ids.len().saturating_sub(1);

    let mut deltas: BTreeMap<PlayerId, u32> =
        player_ids.iter().map(|id| (*id, 0u32)).collect();
    let mut add = |player: PlayerId, points: u32| {
        if let Some(delta) = deltas.get_mut(&player) {
            *delta += points;
        }
    };

    if correct_votes == total_voters || correct_votes == 0 {
        // Everyone or no one found the clue card: participation bonus.
        for id in player_ids {
            if *id != storyteller_id {
                add(*id, 2);
            }
        }
    } else {
        add(storyteller_id, 3);
        for (voter, target) in votes {
            if *target == clue_card {
                add(*voter, 3);
            }
        }
    }

    // Decoy bonus: +1 to the owner for every vote landing on their card.
    for target in votes.values() {
        if let Some(owner) = owners.get(target) {
            if *owner != storyteller_id {
                add(*owner, 1);
            }
        }
    }

    Ok(RoundScore {
        deltas,
        correct_votes,
        total_voters,
    })
}
