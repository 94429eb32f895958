//! Error handling for the Fabula game engine.

pub mod domain;

pub use domain::GameError;
