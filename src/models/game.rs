//! Match record: two competitor slots, best-of settings, score and board/referee assignment.

use crate::models::competitor::CompetitorId;
use crate::models::tournament::{MatchSettings, TournamentError, TournamentId};
use serde::{Deserialize, Serialize};

/// Unique identifier for a match. Assigned by the store in creation order.
pub type MatchId = u64;

/// One of the two sides of a match.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Slot {
    #[default]
    One,
    Two,
}

/// A single contest. `group == None` means a knockout match.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct GameMatch {
    /// 0 until the match has been inserted into a store.
    pub id: MatchId,
    pub tournament_id: TournamentId,
    pub round: u32,
    pub group: Option<u32>,
    /// None is a bye / unfilled slot.
    pub slot_1: Option<CompetitorId>,
    pub slot_2: Option<CompetitorId>,
    pub best_of_legs: u32,
    pub best_of_sets: u32,
    pub score_1: u32,
    pub score_2: u32,
    pub completed: bool,
    /// Board number, not board id.
    pub board: Option<u32>,
    pub referee: Option<CompetitorId>,
}

impl GameMatch {
    /// An unplayed match between two competitors.
    pub fn new(
        settings: &MatchSettings,
        round: u32,
        group: Option<u32>,
        slot_1: CompetitorId,
        slot_2: CompetitorId,
    ) -> Self {
        Self {
            id: 0,
            tournament_id: settings.tournament_id,
            round,
            group,
            slot_1: Some(slot_1),
            slot_2: Some(slot_2),
            best_of_legs: settings.best_of_legs,
            best_of_sets: settings.best_of_sets,
            score_1: 0,
            score_2: 0,
            completed: false,
            board: None,
            referee: None,
        }
    }

    /// A knockout bye: already completed, the competitor wins by the legs needed to take the match.
    pub fn walkover(settings: &MatchSettings, round: u32, competitor: CompetitorId) -> Self {
        Self {
            slot_2: None,
            score_1: settings.best_of_legs.div_ceil(2),
            completed: true,
            ..Self::new(settings, round, None, competitor, competitor)
        }
    }

    pub fn is_knockout(&self) -> bool {
        self.group.is_none()
    }

    pub fn is_walkover(&self) -> bool {
        self.slot_1.is_none() || self.slot_2.is_none()
    }

    /// True if the competitor is playing in this match (refereeing does not count).
    pub fn involves(&self, id: CompetitorId) -> bool {
        self.slot_1 == Some(id) || self.slot_2 == Some(id)
    }

    /// Legs needed to win: first to `best_of_legs / 2 + 1`.
    pub fn legs_to_win(&self) -> u32 {
        self.best_of_legs / 2 + 1
    }

    /// Winning side of a completed match. `Ok(None)` while the match is still open.
    ///
    /// A completed match with both slots filled and equal scores is an integrity error.
    pub fn winning_slot(&self) -> Result<Option<Slot>, TournamentError> {
        if !self.completed {
            return Ok(None);
        }
        match (self.slot_1, self.slot_2) {
            (Some(_), None) => Ok(Some(Slot::One)),
            (None, Some(_)) => Ok(Some(Slot::Two)),
            (None, None) => Err(TournamentError::UndecidedMatch(self.id)),
            (Some(_), Some(_)) => match self.score_1.cmp(&self.score_2) {
                std::cmp::Ordering::Greater => Ok(Some(Slot::One)),
                std::cmp::Ordering::Less => Ok(Some(Slot::Two)),
                std::cmp::Ordering::Equal => Err(TournamentError::UndecidedMatch(self.id)),
            },
        }
    }

    /// Winner of a completed match, see [`GameMatch::winning_slot`].
    pub fn winner(&self) -> Result<Option<CompetitorId>, TournamentError> {
        Ok(self.winning_slot()?.and_then(|slot| self.competitor(slot)))
    }

    pub fn competitor(&self, slot: Slot) -> Option<CompetitorId> {
        match slot {
            Slot::One => self.slot_1,
            Slot::Two => self.slot_2,
        }
    }
}
