//! Dart tournament progression engine: library with models, store interface and business logic.

pub mod logic;
pub mod models;
pub mod store;

pub use logic::{
    advance_round, assign_board, assign_referee, board_status, compute_standings,
    create_tournament, generate_direct_knockout, generate_full_round_robin, generate_group_phase,
    on_match_completed, report_score, start_knockout_phase, update_round_format, update_settings,
    Advance, BoardStatus, GroupTables, ScoreReport, Standing,
};
pub use models::{
    Board, BoardId, Competitor, CompetitorId, GameMatch, MatchId, MatchSettings, SettingsUpdate,
    Slot, Tournament, TournamentError, TournamentFormat, TournamentId, TournamentMode,
    TournamentSettings, TournamentStatus, MAX_GROUP_SIZE, MIN_GROUP_SIZE,
};
pub use store::{MemoryStore, TournamentStore};
