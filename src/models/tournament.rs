//! Tournament, its settings, lifecycle status and errors.

use crate::models::competitor::{BoardId, CompetitorId};
use crate::models::game::MatchId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Largest group the hybrid format accepts (`ceil(roster / groups)`).
pub const MAX_GROUP_SIZE: usize = 7;

/// Smallest group that still plays a match.
pub const MIN_GROUP_SIZE: usize = 2;

/// Errors that can occur during tournament operations.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TournamentError {
    /// Fewer competitors than the operation needs.
    NotEnoughCompetitors { required: usize, found: usize },
    /// Too many competitors per group for the requested group count.
    GroupTooLarge { size: usize, max: usize },
    /// Group count must be at least 1.
    InvalidGroupCount,
    /// The partition would leave a group too small to play a match.
    GroupTooSmall { size: usize, min: usize },
    /// A hybrid tournament must send at least one competitor per group to the knockout.
    InvalidQualifierCount(usize),
    /// Best-of values must be at least 1.
    InvalidBestOf(u32),
    UnknownCompetitor(CompetitorId),
    UnknownBoard(BoardId),
    /// The same competitor was entered twice.
    DuplicateCompetitor(CompetitorId),
    /// A competitor cannot referee a match they play in.
    RefereeIsPlaying(CompetitorId),
    TournamentNotFound(TournamentId),
    MatchNotFound(MatchId),
    /// Tournament is not in a state that allows this action.
    InvalidState,
    /// The action does not apply to this tournament format.
    WrongFormat,
    /// Knockout phase requested before any group match was played.
    NoCompletedGroupMatches,
    /// Knockout matches already exist for this tournament.
    KnockoutAlreadyStarted,
    /// A bracket needs at least two qualifiers.
    NotEnoughQualifiers { found: usize },
    /// Completed knockout matches are immutable.
    MatchAlreadyCompleted(MatchId),
    /// A walkover has no opponent to score against.
    WalkoverNotScorable(MatchId),
    /// Score does not fit the match's best-of.
    ImpossibleScore { best_of_legs: u32, score_1: u32, score_2: u32 },
    /// A completed match without a decisive winner. Fatal.
    UndecidedMatch(MatchId),
    /// A knockout round that cannot be paired up. Fatal.
    MalformedRound { round: u32 },
    /// A knockout round already exists (uniqueness constraint on tournament + round).
    RoundAlreadyExists { round: u32 },
}

impl TournamentError {
    /// Integrity errors mean persisted data is inconsistent; callers must not retry or paper
    /// over them.
    pub fn is_integrity_error(&self) -> bool {
        matches!(
            self,
            TournamentError::UndecidedMatch(_) | TournamentError::MalformedRound { .. }
        )
    }
}

impl std::fmt::Display for TournamentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TournamentError::NotEnoughCompetitors { required, found } => {
                write!(f, "Need at least {} competitors (found {})", required, found)
            }
            TournamentError::GroupTooLarge { size, max } => write!(
                f,
                "Too many competitors per group: {} (maximum is {})",
                size, max
            ),
            TournamentError::InvalidGroupCount => write!(f, "Number of groups must be at least 1"),
            TournamentError::GroupTooSmall { size, min } => write!(
                f,
                "Too few competitors per group: {} (minimum is {})",
                size, min
            ),
            TournamentError::InvalidQualifierCount(n) => {
                write!(f, "Qualifiers per group must be at least 1 (got {})", n)
            }
            TournamentError::InvalidBestOf(n) => write!(f, "Invalid best-of value: {}", n),
            TournamentError::UnknownCompetitor(id) => write!(f, "Unknown competitor: {}", id),
            TournamentError::UnknownBoard(id) => write!(f, "Unknown board: {}", id),
            TournamentError::DuplicateCompetitor(id) => {
                write!(f, "Competitor {} was entered more than once", id)
            }
            TournamentError::RefereeIsPlaying(id) => {
                write!(f, "Competitor {} plays in this match and cannot referee it", id)
            }
            TournamentError::TournamentNotFound(id) => write!(f, "Tournament {} not found", id),
            TournamentError::MatchNotFound(id) => write!(f, "Match {} not found", id),
            TournamentError::InvalidState => write!(f, "Invalid state for this action"),
            TournamentError::WrongFormat => write!(f, "Not available for this tournament format"),
            TournamentError::NoCompletedGroupMatches => {
                write!(f, "No completed group matches; cannot start the knockout phase")
            }
            TournamentError::KnockoutAlreadyStarted => {
                write!(f, "The knockout phase has already been generated")
            }
            TournamentError::NotEnoughQualifiers { found } => {
                write!(f, "Need at least 2 qualifiers for a bracket (found {})", found)
            }
            TournamentError::MatchAlreadyCompleted(id) => {
                write!(f, "Match {} is already completed", id)
            }
            TournamentError::WalkoverNotScorable(id) => {
                write!(f, "Match {} is a walkover and cannot be scored", id)
            }
            TournamentError::ImpossibleScore {
                best_of_legs,
                score_1,
                score_2,
            } => write!(
                f,
                "Impossible score {}-{} for a best of {} legs match",
                score_1, score_2, best_of_legs
            ),
            TournamentError::UndecidedMatch(id) => {
                write!(f, "Match {} is completed without a winner", id)
            }
            TournamentError::MalformedRound { round } => {
                write!(f, "Knockout round {} cannot be paired", round)
            }
            TournamentError::RoundAlreadyExists { round } => {
                write!(f, "Knockout round {} already exists", round)
            }
        }
    }
}

impl std::error::Error for TournamentError {}

/// Unique identifier for a tournament.
pub type TournamentId = u32;

/// Lifecycle of a tournament.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentStatus {
    #[default]
    Draft,
    Active,
    /// Terminal.
    Finished,
}

/// Singles (individual competitors) or doubles (pairs).
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentMode {
    #[default]
    Singles,
    Doubles,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentFormat {
    /// Everyone plays everyone, no knockout.
    RoundRobin,
    /// Single elimination from a random draw.
    Knockout,
    /// Poules followed by a seeded knockout.
    #[default]
    Hybrid,
}

/// Best-of settings for one batch of generated matches.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct MatchSettings {
    pub tournament_id: TournamentId,
    pub best_of_legs: u32,
    pub best_of_sets: u32,
}

impl MatchSettings {
    pub fn new(tournament_id: TournamentId, best_of_legs: u32, best_of_sets: u32) -> Self {
        Self {
            tournament_id,
            best_of_legs,
            best_of_sets,
        }
    }

    pub fn validate(&self) -> Result<(), TournamentError> {
        if self.best_of_legs == 0 {
            return Err(TournamentError::InvalidBestOf(self.best_of_legs));
        }
        if self.best_of_sets == 0 {
            return Err(TournamentError::InvalidBestOf(self.best_of_sets));
        }
        Ok(())
    }
}

/// Configuration chosen at creation.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct TournamentSettings {
    #[serde(default)]
    pub mode: TournamentMode,
    #[serde(default)]
    pub format: TournamentFormat,
    #[serde(default = "default_number_of_groups")]
    pub number_of_groups: usize,
    #[serde(default = "default_qualifiers_per_group")]
    pub qualifiers_per_group: usize,
    #[serde(default = "default_allow_byes")]
    pub allow_byes: bool,
    #[serde(default = "default_legs_group")]
    pub legs_group: u32,
    #[serde(default = "default_legs_knockout")]
    pub legs_knockout: u32,
    #[serde(default = "default_sets_per_match")]
    pub sets_per_match: u32,
}

fn default_number_of_groups() -> usize {
    1
}

fn default_qualifiers_per_group() -> usize {
    2
}

fn default_allow_byes() -> bool {
    true
}

fn default_legs_group() -> u32 {
    3
}

fn default_legs_knockout() -> u32 {
    5
}

fn default_sets_per_match() -> u32 {
    1
}

impl Default for TournamentSettings {
    fn default() -> Self {
        Self {
            mode: TournamentMode::default(),
            format: TournamentFormat::default(),
            number_of_groups: default_number_of_groups(),
            qualifiers_per_group: default_qualifiers_per_group(),
            allow_byes: default_allow_byes(),
            legs_group: default_legs_group(),
            legs_knockout: default_legs_knockout(),
            sets_per_match: default_sets_per_match(),
        }
    }
}

/// Partial settings change. Only the fields that are sent are applied.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct SettingsUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub allow_byes: Option<bool>,
    #[serde(default)]
    pub qualifiers_per_group: Option<usize>,
    #[serde(default)]
    pub legs_knockout: Option<u32>,
}

impl SettingsUpdate {
    /// True if the change alters how the knockout bracket is built or played.
    pub fn touches_knockout(&self) -> bool {
        self.allow_byes.is_some()
            || self.qualifiers_per_group.is_some()
            || self.legs_knockout.is_some()
    }
}

/// Full tournament record: configuration plus lifecycle state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub status: TournamentStatus,
    pub settings: TournamentSettings,
    pub competitors: Vec<CompetitorId>,
    /// Boards linked to this tournament.
    pub boards: Vec<BoardId>,
    /// Set when the tournament finishes.
    pub champion: Option<CompetitorId>,
}

impl Tournament {
    /// Create a new tournament in Draft state.
    pub fn new(id: TournamentId, name: impl Into<String>, settings: TournamentSettings) -> Self {
        Self {
            id,
            name: name.into(),
            created_at: Utc::now(),
            status: TournamentStatus::Draft,
            settings,
            competitors: Vec::new(),
            boards: Vec::new(),
            champion: None,
        }
    }

    pub fn group_match_settings(&self) -> MatchSettings {
        MatchSettings::new(self.id, self.settings.legs_group, self.settings.sets_per_match)
    }

    pub fn knockout_match_settings(&self) -> MatchSettings {
        MatchSettings::new(
            self.id,
            self.settings.legs_knockout,
            self.settings.sets_per_match,
        )
    }

    pub fn is_finished(&self) -> bool {
        self.status == TournamentStatus::Finished
    }

    /// Terminal transition: record the champion and mark the tournament finished.
    pub fn finish(&mut self, champion: Option<CompetitorId>) -> Result<(), TournamentError> {
        if self.status != TournamentStatus::Active {
            return Err(TournamentError::InvalidState);
        }
        self.champion = champion;
        self.status = TournamentStatus::Finished;
        Ok(())
    }
}
