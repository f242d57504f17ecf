//! Tournament business logic: setup, group phase, standings, knockout, scoring.

mod advance;
mod boards;
mod bracket;
mod poules;
mod referee;
mod round_robin;
mod scoring;
mod setup;
mod standings;

pub use advance::{advance_round, on_match_completed, Advance};
pub use boards::{
    assign_board, assign_referee, board_status, update_round_format, BoardState, BoardStatus,
};
pub use bracket::{
    bracket_order, bracket_size, build_first_round, generate_direct_knockout, seed_qualifiers,
    select_qualifiers, start_knockout_phase, BracketPlan, Qualifier, FIRST_ROUND,
};
pub use poules::{
    assign_boards, generate_full_round_robin, generate_group_phase, partition_groups,
    SINGLE_GROUP,
};
pub use referee::assign_referees;
pub use round_robin::{round_count, round_robin_schedule};
pub use scoring::{report_score, validate_score, ScoreReport};
pub use setup::{create_tournament, update_settings};
pub use standings::{
    compare_standings, compute_standings, group_standings, rank_group, GroupTables, HeadToHead,
    Standing, POINTS_FOR_WIN,
};
