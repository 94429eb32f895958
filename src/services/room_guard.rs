//! Per-room write serialization.
//!
//! Player actions arrive concurrently against a shared game aggregate. Every
//! mutating operation must hold the room's lock for its whole
//! read-modify-write span so interleaved submit/vote/next-round calls from
//! different players cannot race on the same Game or Round record. Read-only
//! snapshot queries may bypass the guard.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

#[derive(Default)]
pub struct RoomGuards {
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl RoomGuards {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the room's mutation lock, creating it on first use.
    pub async fn lock(&self, room_code: &str) -> OwnedMutexGuard<()> {
        let cell = self
            .locks
            .entry(room_code.to_string())
            .or_default()
            .clone();
        cell.lock_owned().await
    }

    /// Drop a room's lock entry once the game is finished. A late caller
    /// simply recreates it; this only bounds map growth.
    pub fn forget(&self, room_code: &str) {
        self.locks.remove(room_code);
    }
}
