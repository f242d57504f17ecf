//! Board queue view, manual board and referee overrides, batch best-of changes.

use crate::models::{CompetitorId, GameMatch, MatchId, TournamentError, TournamentId};
use crate::store::TournamentStore;
use serde::Serialize;

/// Queued matches shown after the current one.
const NEXT_MATCHES: usize = 2;
/// Completed matches shown, newest first.
const LAST_MATCHES: usize = 4;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BoardState {
    ActiveMatch,
    Waiting,
}

/// What a scorer at one board needs to see.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct BoardStatus {
    pub tournament_id: TournamentId,
    pub board_number: u32,
    pub state: BoardState,
    /// Oldest unfinished match on this board.
    pub current: Option<GameMatch>,
    pub next: Vec<GameMatch>,
    pub last: Vec<GameMatch>,
}

pub fn board_status<S: TournamentStore + ?Sized>(
    store: &S,
    tournament_id: TournamentId,
    board_number: u32,
) -> Result<BoardStatus, TournamentError> {
    let on_board: Vec<GameMatch> = store
        .matches(tournament_id)?
        .into_iter()
        .filter(|m| m.board == Some(board_number))
        .collect();

    let mut open = on_board.iter().filter(|m| !m.completed).cloned();
    let current = open.next();
    let next = open.take(NEXT_MATCHES).collect();
    let last = on_board
        .iter()
        .rev()
        .filter(|m| m.completed)
        .take(LAST_MATCHES)
        .cloned()
        .collect();

    Ok(BoardStatus {
        tournament_id,
        board_number,
        state: if current.is_some() {
            BoardState::ActiveMatch
        } else {
            BoardState::Waiting
        },
        current,
        next,
        last,
    })
}

/// Move a match to another board of the same tournament.
pub fn assign_board<S: TournamentStore + ?Sized>(
    store: &mut S,
    tournament_id: TournamentId,
    match_id: MatchId,
    board_number: u32,
) -> Result<GameMatch, TournamentError> {
    if !store
        .boards(tournament_id)?
        .iter()
        .any(|b| b.number == board_number)
    {
        return Err(TournamentError::UnknownBoard(board_number));
    }
    let mut game = store.get_match(match_id)?;
    if game.tournament_id != tournament_id {
        return Err(TournamentError::MatchNotFound(match_id));
    }
    game.board = Some(board_number);
    store.update_match(&game)?;
    Ok(game)
}

/// Override the referee picked by the scheduler. `None` clears it.
///
/// The referee must be entered in the tournament and must not be playing in the match.
pub fn assign_referee<S: TournamentStore + ?Sized>(
    store: &mut S,
    tournament_id: TournamentId,
    match_id: MatchId,
    referee: Option<CompetitorId>,
) -> Result<GameMatch, TournamentError> {
    let tournament = store.tournament(tournament_id)?;
    let mut game = store.get_match(match_id)?;
    if game.tournament_id != tournament_id {
        return Err(TournamentError::MatchNotFound(match_id));
    }
    if let Some(id) = referee {
        if game.involves(id) {
            return Err(TournamentError::RefereeIsPlaying(id));
        }
        if !tournament.competitors.contains(&id) {
            return Err(TournamentError::UnknownCompetitor(id));
        }
    }

    game.referee = referee;
    store.update_match(&game)?;
    log::info!("Match {}: referee set to {:?}", match_id, referee);
    Ok(game)
}

/// Set best-of-legs on every unplayed match of a round. Returns how many were changed.
pub fn update_round_format<S: TournamentStore + ?Sized>(
    store: &mut S,
    tournament_id: TournamentId,
    round: u32,
    best_of_legs: u32,
) -> Result<usize, TournamentError> {
    if best_of_legs == 0 {
        return Err(TournamentError::InvalidBestOf(best_of_legs));
    }
    let pending: Vec<GameMatch> = store
        .matches(tournament_id)?
        .into_iter()
        .filter(|m| m.round == round && !m.completed)
        .collect();
    for mut game in pending.iter().cloned() {
        game.best_of_legs = best_of_legs;
        store.update_match(&game)?;
    }
    log::info!(
        "Tournament {}: {} match(es) in round {} set to best of {} legs",
        tournament_id,
        pending.len(),
        round,
        best_of_legs
    );
    Ok(pending.len())
}
