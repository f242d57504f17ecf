//! Data structures for the tournament engine: competitors, boards, matches, tournament state.

mod competitor;
mod game;
mod tournament;

pub use competitor::{Board, BoardId, Competitor, CompetitorId};
pub use game::{GameMatch, MatchId, Slot};
pub use tournament::{
    MatchSettings, SettingsUpdate, Tournament, TournamentError, TournamentFormat, TournamentId,
    TournamentMode, TournamentSettings, TournamentStatus, MAX_GROUP_SIZE, MIN_GROUP_SIZE,
};
