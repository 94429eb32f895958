//! Artwork card identifiers.
//!
//! The engine never decodes or transforms artwork; cards are opaque ids into
//! the fixed global catalogue held by the binary-asset store.

use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque id of one artwork card in the global catalogue.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct CardId(pub Uuid);

impl CardId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Display for CardId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        Display::fmt(&self.0, f)
    }
}

impl From<Uuid> for CardId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}
