//! Competitor (an individual or a pair) and physical dartboards.

use serde::{Deserialize, Serialize};

/// Unique identifier for a competitor (used in matches and lookups).
pub type CompetitorId = u32;

/// Unique identifier for a dartboard record.
pub type BoardId = u32;

/// A participant unit: a single player in singles, a pair in doubles.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Competitor {
    pub id: CompetitorId,
    pub name: String,
}

impl Competitor {
    pub fn new(id: CompetitorId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// A physical board. Matches refer to boards by `number`, not by id.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Board {
    pub id: BoardId,
    /// e.g. "Main Stage"
    pub name: String,
    pub number: u32,
}

impl Board {
    pub fn new(id: BoardId, name: impl Into<String>, number: u32) -> Self {
        Self {
            id,
            name: name.into(),
            number,
        }
    }
}
