//! Room code generation for games.
//!
//! Room codes are short numeric strings players type to find a room.
//! Uniqueness is the caller's concern: the orchestrator retries generation
//! against the repository a bounded number of times.

use rand::Rng;

pub const ROOM_CODE_LEN: usize = 6;

/// Generate a random 6-digit room code (leading zeros allowed).
pub fn generate_room_code() -> String {
    let mut rng = rand::rng();
    (0..ROOM_CODE_LEN)
        .map(|_| char::from(b'0' + rng.random_range(0..10u8)))
        .collect()
}
