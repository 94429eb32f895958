//! Game snapshot: the value returned to callers and pushed to rooms.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::cards::CardId;
use crate::domain::state::{ClueMode, GameId, GamePhase, GameStatus, PlayerId};
use crate::repos::games::Game;
use crate::repos::players::Player;
use crate::repos::rounds::Round;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerView {
    pub id: PlayerId,
    pub nickname: String,
    pub avatar: String,
    pub hand: Vec<CardId>,
    pub score: u32,
    pub submitted_card: Option<CardId>,
    pub voted_card: Option<CardId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoundView {
    pub round_no: u32,
    pub storyteller_id: PlayerId,
    pub clue: String,
    pub cards_played: BTreeMap<PlayerId, Vec<CardId>>,
    pub votes: BTreeMap<PlayerId, CardId>,
    /// All cards on the table in id order, so clients can render submissions
    /// without learning who played what.
    pub table: Vec<CardId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameSnapshot {
    pub id: GameId,
    pub room_code: String,
    pub status: GameStatus,
    pub phase: GamePhase,
    pub winning_score: u32,
    pub clue_mode: ClueMode,
    pub storyteller_id: Option<PlayerId>,
    pub current_round: u32,
    pub players: Vec<PlayerView>,
    pub round: Option<RoundView>,
}

impl GameSnapshot {
    pub fn from_entities(game: &Game, players: &[Player], round: Option<&Round>) -> Self {
        Self {
            id: game.id,
            room_code: game.room_code.clone(),
            status: game.status,
            phase: game.phase,
            winning_score: game.winning_score,
            clue_mode: game.clue_mode,
            storyteller_id: game.storyteller_id,
            current_round: game.current_round,
            players: players
                .iter()
                .map(|p| PlayerView {
                    id: p.id,
                    nickname: p.nickname.clone(),
                    avatar: p.avatar.clone(),
                    hand: p.hand.clone(),
                    score: p.score,
                    submitted_card: p.last_submitted_card,
                    voted_card: p.last_voted_card,
                })
                .collect(),
            round: round.map(|r| {
                let mut table: Vec<CardId> =
                    r.cards_played.values().flatten().copied().collect();
                table.sort();
                RoundView {
                    round_no: r.round_no,
                    storyteller_id: r.storyteller_id,
                    clue: r.clue.clone(),
                    cards_played: r.cards_played.clone(),
                    votes: r.votes.clone(),
                    table,
                }
            }),
        }
    }

    /// Redact hidden information for one viewer.
    ///
    /// Other players' hands are stripped, and until the round reaches
    /// Scoring the per-player submission map and vote targets are reduced to
    /// the viewer's own entries (the anonymized `table` stays intact).
    pub fn for_player(&self, viewer: PlayerId) -> Self {
        let mut snapshot = self.clone();
        for player in &mut snapshot.players {
            if player.id != viewer {
                player.hand.clear();
            }
        }
        if snapshot.phase != GamePhase::Scoring {
            if let Some(round) = &mut snapshot.round {
                round.cards_played.retain(|player, _| *player == viewer);
                round.votes.retain(|voter, _| *voter == viewer);
            }
        }
        snapshot
    }
}
