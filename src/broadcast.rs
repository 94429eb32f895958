//! Room event fan-out.
//!
//! The engine treats the realtime transport as a collaborator: after every
//! mutating operation it hands the fresh snapshot to a
//! [`SessionBroadcaster`] and moves on. Delivery is fire-and-forget; a
//! failing broadcaster never corrupts already-applied state.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::debug;

use crate::errors::domain::GameError;

/// Event name used for full-snapshot pushes.
pub const GAME_STATE_EVENT: &str = "game_state";

/// One event addressed to every member of a room.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomEvent {
    pub room_code: String,
    pub event: String,
    pub payload: serde_json::Value,
}

/// Push an event to all members of a room.
#[async_trait]
pub trait SessionBroadcaster: Send + Sync {
    async fn send(
        &self,
        room_code: &str,
        event: &str,
        payload: serde_json::Value,
    ) -> Result<(), GameError>;
}

/// Discards every event. Default for tests and headless embedding.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopBroadcaster;

#[async_trait]
impl SessionBroadcaster for NoopBroadcaster {
    async fn send(
        &self,
        _room_code: &str,
        _event: &str,
        _payload: serde_json::Value,
    ) -> Result<(), GameError> {
        Ok(())
    }
}

/// In-process fan-out over a tokio broadcast channel.
///
/// Embedders subscribe and forward events to their transport of choice.
/// Lagging or absent subscribers are not an error.
pub struct ChannelBroadcaster {
    tx: broadcast::Sender<RoomEvent>,
}

impl ChannelBroadcaster {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<RoomEvent> {
        self.tx.subscribe()
    }
}

impl Default for ChannelBroadcaster {
    fn default() -> Self {
        Self::new(64)
    }
}

#[async_trait]
impl SessionBroadcaster for ChannelBroadcaster {
    async fn send(
        &self,
        room_code: &str,
        event: &str,
        payload: serde_json::Value,
    ) -> Result<(), GameError> {
        let delivered = self.tx.send(RoomEvent {
            room_code: room_code.to_string(),
            event: event.to_string(),
            payload,
        });
        if delivered.is_err() {
            debug!(room_code, event, "no live subscribers for room event");
        }
        Ok(())
    }
}
