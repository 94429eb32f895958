#![allow(dead_code)]

//! Shared helpers for game-flow integration tests.

use std::sync::Arc;

use fabula_engine::domain::snapshot::GameSnapshot;
use fabula_engine::domain::state::PlayerId;
use fabula_engine::{
    CardId, EngineConfig, GameError, GameFlowService, GameOptions, InMemoryRepo, NoopBroadcaster,
};

// Logging is auto-installed for integration test binaries
#[ctor::ctor]
fn init_logging() {
    fabula_engine::logging::init();
}

/// A room with `player_count` joined players, not yet started.
pub struct TestRoom {
    pub service: Arc<GameFlowService>,
    pub room_code: String,
    /// Id-sorted, matching storyteller rotation order.
    pub players: Vec<PlayerId>,
}

pub fn catalogue(size: usize) -> Vec<CardId> {
    (0..size).map(|_| CardId::new()).collect()
}

pub async fn setup_room_with_options(
    player_count: usize,
    catalogue_size: usize,
    options: GameOptions,
    config: EngineConfig,
) -> Result<TestRoom, GameError> {
    let service = Arc::new(GameFlowService::with_config(
        Arc::new(InMemoryRepo::new()),
        Arc::new(NoopBroadcaster),
        catalogue(catalogue_size),
        config,
    ));

    let created = service.create_game(None, None, options).await?;
    let room_code = created.snapshot.room_code.clone();

    let mut players = Vec::with_capacity(player_count);
    for i in 0..player_count {
        let (_, player_id) = service
            .join(&room_code, format!("player-{i}"), format!("avatar-{i}"))
            .await?;
        players.push(player_id);
    }
    players.sort();

    Ok(TestRoom {
        service,
        room_code,
        players,
    })
}

pub async fn setup_room(player_count: usize) -> Result<TestRoom, GameError> {
    setup_room_with_options(
        player_count,
        84,
        GameOptions::default(),
        EngineConfig::default(),
    )
    .await
}

/// A started room; the storyteller is the first id-sorted player.
pub async fn setup_started_room(player_count: usize) -> Result<TestRoom, GameError> {
    let room = setup_room(player_count).await?;
    room.service.start(&room.room_code, None).await?;
    Ok(room)
}

impl TestRoom {
    pub async fn snapshot(&self) -> Result<GameSnapshot, GameError> {
        self.service.game_snapshot(&self.room_code).await
    }

    pub async fn hand_of(&self, player: PlayerId) -> Result<Vec<CardId>, GameError> {
        let snapshot = self.snapshot().await?;
        Ok(snapshot
            .players
            .iter()
            .find(|p| p.id == player)
            .map(|p| p.hand.clone())
            .unwrap_or_default())
    }

    pub async fn storyteller(&self) -> Result<PlayerId, GameError> {
        let snapshot = self.snapshot().await?;
        Ok(snapshot.storyteller_id.expect("storyteller assigned"))
    }

    pub async fn score_of(&self, player: PlayerId) -> Result<u32, GameError> {
        let snapshot = self.snapshot().await?;
        Ok(snapshot
            .players
            .iter()
            .find(|p| p.id == player)
            .map(|p| p.score)
            .unwrap_or(0))
    }

    /// Storyteller plays their first hand card with a fixed clue; returns
    /// the clue card.
    pub async fn set_clue_from_hand(&self) -> Result<CardId, GameError> {
        let storyteller = self.storyteller().await?;
        let card = self.hand_of(storyteller).await?[0];
        self.service
            .set_clue_and_card(&self.room_code, storyteller, "a distant memory".into(), card)
            .await?;
        Ok(card)
    }

    /// Every non-storyteller submits cards from their hand until the quota
    /// is filled; returns the submitted cards per player in roster order.
    pub async fn submit_all_decoys(&self) -> Result<Vec<(PlayerId, Vec<CardId>)>, GameError> {
        let storyteller = self.storyteller().await?;
        let quota = if self.players.len() == 3 { 2 } else { 1 };

        let mut submissions = Vec::new();
        for player in self.players.iter().filter(|p| **p != storyteller) {
            let hand = self.hand_of(*player).await?;
            let cards: Vec<CardId> = hand[..quota].to_vec();
            for card in &cards {
                self.service
                    .submit_player_card(&self.room_code, *player, *card)
                    .await?;
            }
            submissions.push((*player, cards));
        }
        Ok(submissions)
    }

    /// Drive a full clue/submit cycle into the Voting phase.
    pub async fn advance_to_voting(&self) -> Result<CardId, GameError> {
        let clue_card = self.set_clue_from_hand().await?;
        self.submit_all_decoys().await?;
        Ok(clue_card)
    }
}
