//! Service layer: orchestration over the domain and repository.

pub mod game_flow;
pub mod room_guard;
