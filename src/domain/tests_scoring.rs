use std::collections::BTreeMap;

use uuid::Uuid;

use crate::domain::cards::CardId;
use crate::domain::scoring::score_round;
use crate::domain::state::PlayerId;

struct Table {
    players: Vec<PlayerId>,
    storyteller: PlayerId,
    cards: Vec<CardId>,
    cards_played: BTreeMap<PlayerId, Vec<CardId>>,
}

/// One card per player, players[0] as storyteller, id-sorted roster.
fn table(n: usize) -> Table {
    let mut players: Vec<PlayerId> = (0..n).map(|_| Uuid::new_v4()).collect();
    players.sort();
    let cards: Vec<CardId> = (0..n).map(|_| CardId::new()).collect();
    let cards_played: BTreeMap<PlayerId, Vec<CardId>> = players
        .iter()
        .zip(cards.iter())
        .map(|(p, c)| (*p, vec![*c]))
        .collect();
    Table {
        storyteller: players[0],
        players,
        cards,
        cards_played,
    }
}

#[test]
fn branch_a_nobody_guessed() {
    let t = table(4);
    // All three voters pick the card of players[1] (a decoy).
    let votes: BTreeMap<PlayerId, CardId> = t.players[1..]
        .iter()
        .map(|voter| (*voter, t.cards[1]))
        .collect();
    // players[1] holds that decoy; own-card votes are rejected upstream, so
    // rebuild with players[1] voting elsewhere.
    let mut votes = votes;
    votes.insert(t.players[1], t.cards[2]);

    let score = score_round(&t.cards_played, &votes, t.storyteller, &t.players).unwrap();

    assert_eq!(score.correct_votes, 0);
    assert_eq!(score.total_voters, 3);
    assert_eq!(score.deltas[&t.storyteller], 0);
    // players[1]: +2 participation, +2 decoy votes from players[2] and players[3].
    assert_eq!(score.deltas[&t.players[1]], 4);
    // players[2]: +2 participation, +1 decoy vote from players[1].
    assert_eq!(score.deltas[&t.players[2]], 3);
    assert_eq!(score.deltas[&t.players[3]], 2);
}

#[test]
fn branch_a_everyone_guessed() {
    let t = table(4);
    let clue = t.cards[0];
    let votes: BTreeMap<PlayerId, CardId> =
        t.players[1..].iter().map(|voter| (*voter, clue)).collect();

    let score = score_round(&t.cards_played, &votes, t.storyteller, &t.players).unwrap();

    assert_eq!(score.correct_votes, 3);
    assert_eq!(score.deltas[&t.storyteller], 0);
    // No votes landed on decoys, so a flat +2 each.
    for voter in &t.players[1..] {
        assert_eq!(score.deltas[voter], 2);
    }
}

#[test]
fn branch_b_partial_guesses() {
    let t = table(5);
    let clue = t.cards[0];
    let mut votes = BTreeMap::new();
    // Two of four voters find the clue card.
    votes.insert(t.players[1], clue);
    votes.insert(t.players[2], clue);
    // The other two are misled by decoys.
    votes.insert(t.players[3], t.cards[1]);
    votes.insert(t.players[4], t.cards[2]);

    let score = score_round(&t.cards_played, &votes, t.storyteller, &t.players).unwrap();

    assert_eq!(score.correct_votes, 2);
    assert_eq!(score.total_voters, 4);
    assert_eq!(score.deltas[&t.storyteller], 3);
    // Correct voters: +3, plus +1 each for the decoy votes their cards drew.
    assert_eq!(score.deltas[&t.players[1]], 4);
    assert_eq!(score.deltas[&t.players[2]], 4);
    assert_eq!(score.deltas[&t.players[3]], 0);
    assert_eq!(score.deltas[&t.players[4]], 0);
}

#[test]
fn decoy_bonus_counts_multi_card_lists() {
    // 3-player game: non-storytellers play two cards each.
    let mut players: Vec<PlayerId> = (0..3).map(|_| Uuid::new_v4()).collect();
    players.sort();
    let storyteller = players[0];
    let clue = CardId::new();
    let decoys: Vec<CardId> = (0..4).map(|_| CardId::new()).collect();

    let mut cards_played = BTreeMap::new();
    cards_played.insert(storyteller, vec![clue]);
    cards_played.insert(players[1], vec![decoys[0], decoys[1]]);
    cards_played.insert(players[2], vec![decoys[2], decoys[3]]);

    let mut votes = BTreeMap::new();
    votes.insert(players[1], clue);
    // Second entry of a multi-card list still resolves to its owner.
    votes.insert(players[2], decoys[1]);

    let score = score_round(&cards_played, &votes, storyteller, &players).unwrap();

    assert_eq!(score.correct_votes, 1);
    assert_eq!(score.deltas[&storyteller], 3);
    assert_eq!(score.deltas[&players[1]], 4);
    assert_eq!(score.deltas[&players[2]], 0);
}

#[test]
fn votes_on_unknown_cards_award_nothing() {
    let t = table(4);
    let stray = CardId::new();
    let mut votes = BTreeMap::new();
    votes.insert(t.players[1], t.cards[0]);
    votes.insert(t.players[2], stray);
    votes.insert(t.players[3], stray);

    let score = score_round(&t.cards_played, &votes, t.storyteller, &t.players).unwrap();

    // Branch B: one of three correct.
    assert_eq!(score.deltas[&t.storyteller], 3);
    assert_eq!(score.deltas[&t.players[1]], 3);
    assert_eq!(score.deltas[&t.players[2]], 0);
    assert_eq!(score.deltas[&t.players[3]], 0);
}

#[test]
fn missing_clue_card_is_an_invariant_error() {
    let t = table(4);
    let mut cards_played = t.cards_played.clone();
    cards_played.remove(&t.storyteller);

    let res = score_round(&cards_played, &BTreeMap::new(), t.storyteller, &t.players);
    assert!(res.is_err());
}
