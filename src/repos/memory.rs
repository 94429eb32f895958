//! In-memory `GameRepo` implementation.
//!
//! A single `parking_lot::RwLock` over all tables keeps multi-record
//! operations (batched score deltas) atomic without a transaction API.
//! Suitable for tests and single-process deployments; durable backends
//! implement [`GameRepo`] against their own storage.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use parking_lot::RwLock;
use uuid::Uuid;

use crate::domain::state::{GameId, PlayerId, UserId};
use crate::errors::domain::GameError;
use crate::repos::games::Game;
use crate::repos::players::Player;
use crate::repos::rounds::Round;
use crate::repos::{GameRepo, GuestProfile};

#[derive(Default)]
struct Tables {
    games: HashMap<GameId, Game>,
    code_index: HashMap<String, GameId>,
    players: HashMap<PlayerId, Player>,
    /// Rounds per game, in creation order (round_no ascending).
    rounds: HashMap<GameId, Vec<Round>>,
    guests: HashMap<UserId, GuestProfile>,
}

#[derive(Default)]
pub struct InMemoryRepo {
    tables: RwLock<Tables>,
}

impl InMemoryRepo {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl GameRepo for InMemoryRepo {
    async fn create_game(&self, game: Game) -> Result<(), GameError> {
        let mut tables = self.tables.write();
        if tables.code_index.contains_key(&game.room_code) {
            return Err(GameError::persistence(format!(
                "room code {} already exists",
                game.room_code
            )));
        }
        tables.code_index.insert(game.room_code.clone(), game.id);
        tables.games.insert(game.id, game);
        Ok(())
    }

    async fn find_game_by_code(&self, room_code: &str) -> Result<Option<Game>, GameError> {
        let tables = self.tables.read();
        Ok(tables
            .code_index
            .get(room_code)
            .and_then(|id| tables.games.get(id))
            .cloned())
    }

    async fn update_game(&self, game: Game) -> Result<(), GameError> {
        let mut tables = self.tables.write();
        if !tables.games.contains_key(&game.id) {
            return Err(GameError::GameNotFound(game.id.to_string()));
        }
        tables.games.insert(game.id, game);
        Ok(())
    }

    async fn create_player(&self, player: Player) -> Result<(), GameError> {
        self.tables.write().players.insert(player.id, player);
        Ok(())
    }

    async fn update_player(&self, player: Player) -> Result<(), GameError> {
        let mut tables = self.tables.write();
        if !tables.players.contains_key(&player.id) {
            return Err(GameError::PlayerNotFound(player.id));
        }
        tables.players.insert(player.id, player);
        Ok(())
    }

    async fn find_player(&self, player_id: PlayerId) -> Result<Option<Player>, GameError> {
        Ok(self.tables.read().players.get(&player_id).cloned())
    }

    async fn players_by_game(&self, game_id: GameId) -> Result<Vec<Player>, GameError> {
        let tables = self.tables.read();
        let mut players: Vec<Player> = tables
            .players
            .values()
            .filter(|p| p.game_id == game_id)
            .cloned()
            .collect();
        players.sort_by_key(|p| p.id);
        Ok(players)
    }

    async fn create_round(&self, round: Round) -> Result<(), GameError> {
        self.tables
            .write()
            .rounds
            .entry(round.game_id)
            .or_default()
            .push(round);
        Ok(())
    }

    async fn update_round(&self, round: Round) -> Result<(), GameError> {
        let mut tables = self.tables.write();
        let rounds = tables
            .rounds
            .get_mut(&round.game_id)
            .ok_or_else(|| GameError::RoundNotFound(round.game_id.to_string()))?;
        let slot = rounds
            .iter_mut()
            .find(|r| r.round_no == round.round_no)
            .ok_or_else(|| GameError::RoundNotFound(round.game_id.to_string()))?;
        *slot = round;
        Ok(())
    }

    async fn latest_round(&self, game_id: GameId) -> Result<Option<Round>, GameError> {
        let tables = self.tables.read();
        Ok(tables
            .rounds
            .get(&game_id)
            .and_then(|rounds| rounds.iter().max_by_key(|r| r.round_no))
            .cloned())
    }

    async fn apply_score_deltas(
        &self,
        game_id: GameId,
        deltas: &BTreeMap<PlayerId, u32>,
    ) -> Result<Vec<Player>, GameError> {
        let mut tables = self.tables.write();
        // Validate the whole batch before touching anything.
        for player_id in deltas.keys() {
            let belongs = tables
                .players
                .get(player_id)
                .is_some_and(|p| p.game_id == game_id);
            if !belongs {
                return Err(GameError::PlayerNotFound(*player_id));
            }
        }
        for (player_id, delta) in deltas {
            if let Some(player) = tables.players.get_mut(player_id) {
                player.score += delta;
            }
        }
        let mut players: Vec<Player> = tables
            .players
            .values()
            .filter(|p| p.game_id == game_id)
            .cloned()
            .collect();
        players.sort_by_key(|p| p.id);
        Ok(players)
    }

    async fn create_guest(&self, profile: &GuestProfile) -> Result<UserId, GameError> {
        let user_id = Uuid::new_v4();
        self.tables.write().guests.insert(user_id, profile.clone());
        Ok(user_id)
    }

    async fn link_host(&self, game_id: GameId, user_id: UserId) -> Result<(), GameError> {
        let mut tables = self.tables.write();
        let game = tables
            .games
            .get_mut(&game_id)
            .ok_or_else(|| GameError::GameNotFound(game_id.to_string()))?;
        game.host_user_id = Some(user_id);
        Ok(())
    }
}
