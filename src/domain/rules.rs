//! Game rules shared by the orchestrator and scoring.

use crate::domain::state::PlayerId;

/// First score at or above this ends the game.
pub const DEFAULT_WINNING_SCORE: u32 = 30;

/// Cards a player must submit in the current round.
///
/// 2 for non-storytellers in a 3-player game, else 1. The storyteller always
/// plays exactly one card (the clue card).
pub fn card_quota(player_count: usize, is_storyteller: bool) -> usize {
    if player_count == 3 && !is_storyteller {
        2
    } else {
        1
    }
}

/// Storyteller rotation.
///
/// Players are ordered by id (content-derived, stable across storage
/// backends) and the role moves to the player immediately after the current
/// storyteller in that order, wrapping from last to first. If the current
/// storyteller is absent from the player list, rotation restarts at the
/// first id-sorted player. Returns `None` only for an empty player list.
pub fn next_storyteller(
    mut player_ids: Vec<PlayerId>,
    current: Option<PlayerId>,
) -> Option<PlayerId> {
    player_ids.sort();
    player_ids.dedup();
    if player_ids.is_empty() {
        return None;
    }
    let next_idx = match current.and_then(|id| player_ids.iter().position(|p| *p == id)) {
        Some(pos) => (pos + 1) % player_ids.len(),
        None => 0,
    };
    Some(player_ids[next_idx])
}
