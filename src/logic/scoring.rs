//! Score reporting: validate legs against the best-of, complete the match, trigger progression.

use crate::logic::advance::{on_match_completed, Advance};
use crate::logic::standings::compute_standings;
use crate::models::{
    GameMatch, MatchId, TournamentError, TournamentFormat, TournamentId, TournamentStatus,
};
use crate::store::TournamentStore;
use serde::Serialize;

/// Result of a score report: the stored match and whatever progression it caused.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct ScoreReport {
    pub game: GameMatch,
    pub advance: Option<Advance>,
}

/// Check a leg score against the match format.
///
/// Nobody can pass the winning threshold and the total cannot exceed the best-of, so a
/// completed match always has a single winner.
pub fn validate_score(game: &GameMatch, score_1: u32, score_2: u32) -> Result<(), TournamentError> {
    let threshold = game.legs_to_win();
    let impossible = score_1 > threshold
        || score_2 > threshold
        || score_1
            .checked_add(score_2)
            .map_or(true, |total| total > game.best_of_legs);
    if impossible {
        return Err(TournamentError::ImpossibleScore {
            best_of_legs: game.best_of_legs,
            score_1,
            score_2,
        });
    }
    Ok(())
}

/// Record a (possibly partial) score. The match completes when one side reaches the threshold.
///
/// Group scores may be corrected after completion; a completed knockout match is final.
pub fn report_score<S: TournamentStore + ?Sized>(
    store: &mut S,
    tournament_id: TournamentId,
    match_id: MatchId,
    score_1: u32,
    score_2: u32,
) -> Result<ScoreReport, TournamentError> {
    let tournament = store.tournament(tournament_id)?;
    if tournament.status != TournamentStatus::Active {
        return Err(TournamentError::InvalidState);
    }

    let mut game = store.get_match(match_id)?;
    if game.tournament_id != tournament_id {
        return Err(TournamentError::MatchNotFound(match_id));
    }
    if game.is_walkover() {
        return Err(TournamentError::WalkoverNotScorable(match_id));
    }
    if game.is_knockout() && game.completed {
        return Err(TournamentError::MatchAlreadyCompleted(match_id));
    }
    validate_score(&game, score_1, score_2)?;

    let threshold = game.legs_to_win();
    game.score_1 = score_1;
    game.score_2 = score_2;
    game.completed = score_1 == threshold || score_2 == threshold;
    store.update_match(&game)?;

    let advance = if !game.completed {
        None
    } else if game.is_knockout() {
        Some(on_match_completed(store, tournament_id, match_id)?)
    } else if tournament.settings.format == TournamentFormat::RoundRobin {
        finish_round_robin(store, tournament_id)?
    } else {
        None
    };

    Ok(ScoreReport { game, advance })
}

/// A round-robin-only tournament ends with its last match; the table leader is champion.
fn finish_round_robin<S: TournamentStore + ?Sized>(
    store: &mut S,
    tournament_id: TournamentId,
) -> Result<Option<Advance>, TournamentError> {
    if store.matches(tournament_id)?.iter().any(|m| !m.completed) {
        return Ok(None);
    }

    let tables = compute_standings(&*store, tournament_id)?;
    let Some(leader) = tables.values().next().and_then(|t| t.first()).cloned() else {
        return Ok(None);
    };
    if leader.needs_shootout {
        log::warn!(
            "Tournament {}: leader {} is level with the runner-up, a shoot-out may be needed",
            tournament_id,
            leader.name
        );
    }

    let mut tournament = store.tournament(tournament_id)?;
    tournament.finish(Some(leader.competitor_id))?;
    store.save_tournament(&tournament)?;
    log::info!("Tournament {} finished, champion {}", tournament_id, leader.name);
    Ok(Some(Advance::Finished {
        champion: leader.competitor_id,
    }))
}
