//! Game flow orchestration service.
//!
//! The phase state machine for the storyteller game: validates phase and
//! authorization for every inbound player action, mutates entities through
//! the repository, runs scoring on phase-completing actions, and pushes the
//! post-operation snapshot to the room. Mutations for one room never
//! interleave (see `room_guard`); ordering is apply -> persist -> broadcast.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::broadcast::{SessionBroadcaster, GAME_STATE_EVENT};
use crate::config::{EngineConfig, GameOptions};
use crate::domain::cards::CardId;
use crate::domain::snapshot::GameSnapshot;
use crate::domain::state::{GamePhase, GameStatus, PlayerId, UserId};
use crate::domain::{card_quota, deal, deal_size, next_storyteller, score_round, shuffled_deck};
use crate::errors::domain::GameError;
use crate::repos::games::Game;
use crate::repos::players::Player;
use crate::repos::rounds::Round;
use crate::repos::{require_game, GameRepo, GuestProfile};
use crate::services::room_guard::RoomGuards;
use crate::utils::room_code::generate_room_code;

/// Result of `create_game`: the snapshot plus the guest player id when an
/// inline guest profile was supplied.
#[derive(Debug, Clone)]
pub struct CreatedGame {
    pub snapshot: GameSnapshot,
    pub guest_player_id: Option<PlayerId>,
}

pub struct GameFlowService {
    repo: Arc<dyn GameRepo>,
    broadcaster: Arc<dyn SessionBroadcaster>,
    guards: RoomGuards,
    /// The fixed global artwork catalogue; every card id in play originates
    /// here.
    catalogue: Vec<CardId>,
    config: EngineConfig,
}

impl GameFlowService {
    pub fn new(
        repo: Arc<dyn GameRepo>,
        broadcaster: Arc<dyn SessionBroadcaster>,
        catalogue: Vec<CardId>,
    ) -> Self {
        Self::with_config(repo, broadcaster, catalogue, EngineConfig::default())
    }

    pub fn with_config(
        repo: Arc<dyn GameRepo>,
        broadcaster: Arc<dyn SessionBroadcaster>,
        catalogue: Vec<CardId>,
        config: EngineConfig,
    ) -> Self {
        Self {
            repo,
            broadcaster,
            guards: RoomGuards::new(),
            catalogue,
            config,
        }
    }

    /// Create a game room.
    ///
    /// With no host identity, materializes an ephemeral guest from the
    /// inline profile (failure aborts the whole operation). The guest, if
    /// any, joins immediately as the first player. Host linking is deferred
    /// to a background task and never blocks or fails the response.
    pub async fn create_game(
        &self,
        host: Option<UserId>,
        guest_profile: Option<GuestProfile>,
        options: GameOptions,
    ) -> Result<CreatedGame, GameError> {
        let creator = match (host, &guest_profile) {
            (Some(user_id), _) => Some(user_id),
            (None, Some(profile)) => Some(
                self.repo
                    .create_guest(profile)
                    .await
                    .map_err(|e| GameError::GuestCreationFailed(e.to_string()))?,
            ),
            (None, None) => None,
        };

        let room_code = self.generate_unique_code().await?;
        let deck = {
            let mut rng = rand::rng();
            shuffled_deck(&self.catalogue, &mut rng)
        };
        let game = Game::new(room_code.clone(), deck, &options);
        let game_id = game.id;
        self.repo.create_game(game).await?;

        let guest_player_id = if let Some(profile) = guest_profile {
            let player = Player::new(game_id, profile.nickname, profile.avatar);
            let player_id = player.id;
            self.repo.create_player(player).await?;
            Some(player_id)
        } else {
            None
        };

        // Best-effort host link, decoupled from the response path.
        if let Some(user_id) = creator {
            let repo = Arc::clone(&self.repo);
            tokio::spawn(async move {
                if let Err(err) = repo.link_host(game_id, user_id).await {
                    warn!(%game_id, %user_id, error = %err, "deferred host link failed");
                }
            });
        }

        info!(%game_id, %room_code, "game created");
        let game = require_game(self.repo.as_ref(), &room_code).await?;
        let snapshot = self.broadcast_snapshot(&game).await?;
        Ok(CreatedGame {
            snapshot,
            guest_player_id,
        })
    }

    /// Join a room. Permitted until the game finishes; a mid-game joiner
    /// starts with an empty hand and is dealt into the next round.
    pub async fn join(
        &self,
        room_code: &str,
        nickname: String,
        avatar: String,
    ) -> Result<(GameSnapshot, PlayerId), GameError> {
        let _guard = self.guards.lock(room_code).await;

        let mut game = require_game(self.repo.as_ref(), room_code).await?;
        if game.is_finished() {
            return Err(GameError::GameAlreadyFinished);
        }

        let player = Player::new(game.id, nickname, avatar);
        let player_id = player.id;
        self.repo.create_player(player).await?;

        game.touch();
        self.repo.update_game(game.clone()).await?;

        info!(game_id = %game.id, %player_id, "player joined");
        let snapshot = self.broadcast_snapshot(&game).await?;
        Ok((snapshot, player_id))
    }

    /// Start the game: deal opening hands, create Round 1, pick the first
    /// storyteller.
    ///
    /// Without an explicit storyteller the first id-sorted player is chosen,
    /// the same deterministic order rotation uses; with
    /// `defer_storyteller_claim` the role stays open for `claim_storyteller`.
    pub async fn start(
        &self,
        room_code: &str,
        first_storyteller: Option<PlayerId>,
    ) -> Result<GameSnapshot, GameError> {
        let _guard = self.guards.lock(room_code).await;

        let mut game = require_game(self.repo.as_ref(), room_code).await?;
        game.require_phase(GamePhase::Lobby)?;

        let mut players = self.repo.players_by_game(game.id).await?;
        if players.is_empty() {
            return Err(GameError::invariant("cannot start a game with no players"));
        }

        // Reshuffle the catalogue only when the stored deck snapshot was
        // consumed or never built.
        if game.deck.is_empty() {
            let mut rng = rand::rng();
            game.deck = shuffled_deck(&self.catalogue, &mut rng);
        }

        let hand_size = deal_size(players.len());
        for player in &mut players {
            let take = hand_size.min(game.deck.len());
            player.hand = deal(&mut game.deck, take)?;
            self.repo.update_player(player.clone()).await?;
        }

        let storyteller = match first_storyteller {
            Some(id) => {
                if !players.iter().any(|p| p.id == id) {
                    return Err(GameError::PlayerNotFound(id));
                }
                Some(id)
            }
            None if self.config.defer_storyteller_claim => None,
            // Players come back id-sorted from the repo.
            None => players.first().map(|p| p.id),
        };

        game.status = GameStatus::Active;
        game.phase = GamePhase::StorytellerPick;
        game.storyteller_id = storyteller;
        game.current_round = 1;
        game.touch();

        if let Some(storyteller_id) = storyteller {
            self.repo
                .create_round(Round::new(game.id, 1, storyteller_id))
                .await?;
        }
        self.repo.update_game(game.clone()).await?;

        info!(
            game_id = %game.id,
            players = players.len(),
            hand_size,
            storyteller = ?storyteller,
            "game started"
        );
        self.broadcast_snapshot(&game).await
    }

    /// Claim the storyteller role when `start` left it unassigned.
    ///
    /// Creates the round record for the already-established round number.
    pub async fn claim_storyteller(
        &self,
        room_code: &str,
        player_id: PlayerId,
    ) -> Result<GameSnapshot, GameError> {
        let _guard = self.guards.lock(room_code).await;

        let mut game = require_game(self.repo.as_ref(), room_code).await?;
        game.require_phase(GamePhase::StorytellerPick)?;
        if game.storyteller_id.is_some() {
            return Err(GameError::StorytellerAlreadySet);
        }
        self.require_player(&game, player_id).await?;

        game.storyteller_id = Some(player_id);
        game.touch();

        let round_exists = self
            .repo
            .latest_round(game.id)
            .await?
            .is_some_and(|r| r.round_no == game.current_round);
        if !round_exists {
            self.repo
                .create_round(Round::new(game.id, game.current_round, player_id))
                .await?;
        }
        self.repo.update_game(game.clone()).await?;

        info!(game_id = %game.id, %player_id, round = game.current_round, "storyteller claimed");
        self.broadcast_snapshot(&game).await
    }

    /// Storyteller plays the clue card with its clue, opening the pick phase
    /// for everyone else.
    pub async fn set_clue_and_card(
        &self,
        room_code: &str,
        player_id: PlayerId,
        clue: String,
        card: CardId,
    ) -> Result<GameSnapshot, GameError> {
        let _guard = self.guards.lock(room_code).await;

        let mut game = require_game(self.repo.as_ref(), room_code).await?;
        game.require_phase(GamePhase::StorytellerPick)?;
        if game.storyteller_id != Some(player_id) {
            return Err(GameError::NotStoryteller(player_id));
        }

        let mut round = self.require_round(&game).await?;
        let mut player = self.require_player(&game, player_id).await?;

        player.remove_from_hand(card)?;
        player.last_submitted_card = Some(card);
        round.cards_played.insert(player_id, vec![card]);
        round.clue = clue;
        game.phase = GamePhase::PlayersPick;
        game.touch();

        self.repo.update_player(player).await?;
        self.repo.update_round(round).await?;
        self.repo.update_game(game.clone()).await?;

        info!(game_id = %game.id, %player_id, %card, "clue set, players picking");
        self.broadcast_snapshot(&game).await
    }

    /// Submit a decoy card.
    ///
    /// Identical resubmission is absorbed as success (idempotency contract
    /// for transport retries); a new card past the quota fails. The phase
    /// advances to Voting once every non-storyteller reached their quota.
    pub async fn submit_player_card(
        &self,
        room_code: &str,
        player_id: PlayerId,
        card: CardId,
    ) -> Result<GameSnapshot, GameError> {
        let _guard = self.guards.lock(room_code).await;

        let mut game = require_game(self.repo.as_ref(), room_code).await?;
        let mut round = self.require_round(&game).await?;
        let players = self.repo.players_by_game(game.id).await?;
        let mut player = self.require_player(&game, player_id).await?;

        if round.has_played(player_id, card) {
            debug!(game_id = %game.id, %player_id, %card, "duplicate card submission absorbed");
            return self.snapshot(&game).await;
        }

        // The storyteller's single card enters via set_clue_and_card only;
        // everyone else submits while the pick phase is open.
        game.require_phase(GamePhase::PlayersPick)?;

        let quota = card_quota(players.len(), round.storyteller_id == player_id);
        if round.plays_for(player_id) >= quota {
            return Err(GameError::QuotaExceeded {
                player: player_id,
                quota,
            });
        }

        player.remove_from_hand(card)?;
        player.last_submitted_card = Some(card);
        round.record_play(player_id, card);

        // Voting opens only when every non-storyteller filled their own
        // quota.
        let all_submitted = players
            .iter()
            .filter(|p| round.storyteller_id != p.id)
            .all(|p| round.plays_for(p.id) >= card_quota(players.len(), false));
        if all_submitted {
            game.phase = GamePhase::Voting;
            info!(game_id = %game.id, round = round.round_no, "all cards in, voting open");
        }
        game.touch();

        self.repo.update_player(player).await?;
        self.repo.update_round(round).await?;
        self.repo.update_game(game.clone()).await?;

        debug!(game_id = %game.id, %player_id, %card, "card submitted");
        self.broadcast_snapshot(&game).await
    }

    /// Cast (or change) a vote. When the last missing vote arrives the round
    /// is scored synchronously and the game may finish.
    pub async fn submit_vote(
        &self,
        room_code: &str,
        voter_id: PlayerId,
        target: CardId,
    ) -> Result<GameSnapshot, GameError> {
        let _guard = self.guards.lock(room_code).await;

        let mut game = require_game(self.repo.as_ref(), room_code).await?;
        game.require_phase(GamePhase::Voting)?;
        let mut round = self.require_round(&game).await?;

        if round.storyteller_id == voter_id {
            return Err(GameError::StorytellerCannotVote);
        }
        let mut voter = self.require_player(&game, voter_id).await?;
        if round.has_played(voter_id, target) {
            return Err(GameError::VotedOwnCard);
        }

        match round.votes.get(&voter_id) {
            Some(previous) if *previous == target => {
                debug!(game_id = %game.id, %voter_id, "duplicate vote absorbed");
                return self.snapshot(&game).await;
            }
            Some(_) if !self.config.allow_vote_change => {
                return Err(GameError::VoteAlreadyCast);
            }
            _ => {}
        }

        round.record_vote(voter_id, target);
        voter.last_voted_card = Some(target);
        self.repo.update_player(voter).await?;

        let players = self.repo.players_by_game(game.id).await?;
        if round.distinct_voters() == players.len().saturating_sub(1) {
            self.finish_voting(&mut game, &round, &players).await?;
        }
        game.touch();

        self.repo.update_round(round).await?;
        self.repo.update_game(game.clone()).await?;

        debug!(game_id = %game.id, %voter_id, %target, "vote recorded");
        if game.is_finished() {
            self.guards.forget(room_code);
        }
        self.broadcast_snapshot(&game).await
    }

    /// Rotate the storyteller, top up hands, and open the next round.
    pub async fn next_round(
        &self,
        room_code: &str,
    ) -> Result<GameSnapshot, GameError> {
        let _guard = self.guards.lock(room_code).await;

        let mut game = require_game(self.repo.as_ref(), room_code).await?;
        if game.is_finished() {
            return Err(GameError::GameAlreadyFinished);
        }
        // The only sanctioned entry back into StorytellerPick is the wrap
        // from a scored round; anywhere else this would discard live plays
        // and votes.
        game.require_phase(GamePhase::Scoring)?;
        let previous = self.require_round(&game).await?;

        let mut players = self.repo.players_by_game(game.id).await?;
        let ids: Vec<PlayerId> = players.iter().map(|p| p.id).collect();
        let storyteller = next_storyteller(ids, game.storyteller_id)
            .ok_or_else(|| GameError::invariant("cannot rotate storyteller without players"))?;

        let hand_size = deal_size(players.len());
        for player in &mut players {
            player.clear_round_markers();
            let shortfall = hand_size.saturating_sub(player.hand.len());
            if shortfall > 0 {
                match deal(&mut game.deck, shortfall) {
                    Ok(cards) => player.hand.extend(cards),
                    Err(GameError::InsufficientCards { .. }) => {
                        // Deck exhausted: accepted as a partial deal, the
                        // player sits on a short hand.
                        debug!(
                            game_id = %game.id,
                            player_id = %player.id,
                            shortfall,
                            remaining = game.deck.len(),
                            "deck cannot cover top-up, skipping player"
                        );
                    }
                    Err(other) => return Err(other),
                }
            }
            self.repo.update_player(player.clone()).await?;
        }

        let round_no = previous.round_no + 1;
        self.repo
            .create_round(Round::new(game.id, round_no, storyteller))
            .await?;

        game.storyteller_id = Some(storyteller);
        game.current_round = round_no;
        game.phase = GamePhase::StorytellerPick;
        game.touch();
        self.repo.update_game(game.clone()).await?;

        info!(game_id = %game.id, round = round_no, storyteller = %storyteller, "next round");
        self.broadcast_snapshot(&game).await
    }

    /// Read-only snapshot of a room; runs unserialized.
    pub async fn game_snapshot(
        &self,
        room_code: &str,
    ) -> Result<GameSnapshot, GameError> {
        let game = require_game(self.repo.as_ref(), room_code).await?;
        self.snapshot(&game).await
    }

    // Scoring step: compute deltas, apply as one batch, check the winning
    // threshold.
    async fn finish_voting(
        &self,
        game: &mut Game,
        round: &Round,
        players: &[Player],
    ) -> Result<(), GameError> {
        let ids: Vec<PlayerId> = players.iter().map(|p| p.id).collect();
        let score = score_round(
            &round.cards_played,
            &round.votes,
            round.storyteller_id,
            &ids,
        )?;

        let updated = self.repo.apply_score_deltas(game.id, &score.deltas).await?;
        game.phase = GamePhase::Scoring;

        let best = updated.iter().map(|p| p.score).max().unwrap_or(0);
        if best >= game.winning_score {
            game.status = GameStatus::Finished;
            info!(
                game_id = %game.id,
                round = round.round_no,
                best,
                "winning score reached, game finished"
            );
        }

        info!(
            game_id = %game.id,
            round = round.round_no,
            correct = score.correct_votes,
            voters = score.total_voters,
            "round scored"
        );
        Ok(())
    }

    async fn generate_unique_code(&self) -> Result<String, GameError> {
        for _ in 0..self.config.max_code_attempts {
            let code = generate_room_code();
            if self.repo.find_game_by_code(&code).await?.is_none() {
                return Ok(code);
            }
        }
        Err(GameError::CodeGenerationExhausted(
            self.config.max_code_attempts,
        ))
    }

    async fn require_player(&self, game: &Game, player_id: PlayerId) -> Result<Player, GameError> {
        let player = self
            .repo
            .find_player(player_id)
            .await?
            .filter(|p| p.game_id == game.id)
            .ok_or(GameError::PlayerNotFound(player_id))?;
        Ok(player)
    }

    async fn require_round(&self, game: &Game) -> Result<Round, GameError> {
        self.repo
            .latest_round(game.id)
            .await?
            .ok_or_else(|| GameError::RoundNotFound(game.room_code.clone()))
    }

    async fn snapshot(
        &self,
        game: &Game,
    ) -> Result<GameSnapshot, GameError> {
        let players = self.repo.players_by_game(game.id).await?;
        let round = self.repo.latest_round(game.id).await?;
        Ok(GameSnapshot::from_entities(
            game,
            &players,
            round.as_ref(),
        ))
    }

    // Persist already happened; a failing broadcaster must not corrupt the
    // applied state, so delivery errors are only logged.
    async fn broadcast_snapshot(
        &self,
        game: &Game,
    ) -> Result<GameSnapshot, GameError> {
        let snapshot = self.snapshot(game).await?;
        match serde_json::to_value(&snapshot) {
            Ok(payload) => {
                if let Err(err) = self
                    .broadcaster
                    .send(&game.room_code, GAME_STATE_EVENT, payload)
                    .await
                {
                    warn!(game_id = %game.id, error = %err, "snapshot broadcast failed");
                }
            }
            Err(err) => {
                warn!(game_id = %game.id, error = %err, "snapshot serialization failed");
            }
        }
        Ok(snapshot)
    }
}
