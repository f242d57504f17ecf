//! Knockout progression: close a round, generate the next one or crown the champion.

use crate::models::{
    CompetitorId, GameMatch, MatchId, TournamentError, TournamentId, TournamentStatus,
};
use crate::store::TournamentStore;
use serde::Serialize;

/// What the advancer did. Every variant except `NextRound` and `Finished` is a no-op.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Advance {
    /// The completed match belongs to the group phase.
    NotKnockout,
    /// Nothing left to advance.
    TournamentFinished,
    /// Some matches of the round are still being played.
    RoundOpen { round: u32 },
    /// The next round already exists (repeated trigger or a lost race).
    AlreadyAdvanced { round: u32 },
    NextRound { round: u32, matches: Vec<GameMatch> },
    Finished { champion: CompetitorId },
}

/// Run after a match has been marked completed.
pub fn on_match_completed<S: TournamentStore + ?Sized>(
    store: &mut S,
    tournament_id: TournamentId,
    match_id: MatchId,
) -> Result<Advance, TournamentError> {
    let game = store.get_match(match_id)?;
    if game.tournament_id != tournament_id {
        return Err(TournamentError::MatchNotFound(match_id));
    }
    if !game.is_knockout() {
        return Ok(Advance::NotKnockout);
    }
    if !game.completed {
        return Ok(Advance::RoundOpen { round: game.round });
    }
    advance_round(store, tournament_id, game.round)
}

/// Close knockout round `round` if every match in it is completed.
///
/// Winners of matches `2k` and `2k + 1` (persisted creation order) meet in round + 1. A round
/// with a single completed match is the final. Idempotent: if round + 1 exists, nothing happens.
pub fn advance_round<S: TournamentStore + ?Sized>(
    store: &mut S,
    tournament_id: TournamentId,
    round: u32,
) -> Result<Advance, TournamentError> {
    let mut tournament = store.tournament(tournament_id)?;
    if tournament.is_finished() {
        return Ok(Advance::TournamentFinished);
    }
    if tournament.status != TournamentStatus::Active {
        return Err(TournamentError::InvalidState);
    }

    let all = store.matches(tournament_id)?;
    let current: Vec<&GameMatch> = all
        .iter()
        .filter(|m| m.is_knockout() && m.round == round)
        .collect();
    if current.is_empty() {
        return Err(TournamentError::MalformedRound { round });
    }
    if current.iter().any(|m| !m.completed) {
        return Ok(Advance::RoundOpen { round });
    }
    if all.iter().any(|m| m.is_knockout() && m.round == round + 1) {
        return Ok(Advance::AlreadyAdvanced { round: round + 1 });
    }

    let winners = current
        .iter()
        .map(|m| m.winner()?.ok_or(TournamentError::UndecidedMatch(m.id)))
        .collect::<Result<Vec<CompetitorId>, _>>()?;

    if let [champion] = winners[..] {
        tournament.finish(Some(champion))?;
        store.save_tournament(&tournament)?;
        log::info!(
            "Tournament {} finished after round {}, champion {}",
            tournament_id,
            round,
            champion
        );
        return Ok(Advance::Finished { champion });
    }
    if winners.len() % 2 != 0 {
        return Err(TournamentError::MalformedRound { round });
    }

    let settings = tournament.knockout_match_settings();
    let next: Vec<GameMatch> = winners
        .chunks_exact(2)
        .map(|pair| GameMatch::new(&settings, round + 1, None, pair[0], pair[1]))
        .collect();

    match store.insert_matches(next) {
        Ok(matches) => {
            log::info!(
                "Tournament {}: round {} closed, {} match(es) in round {}",
                tournament_id,
                round,
                matches.len(),
                round + 1
            );
            Ok(Advance::NextRound {
                round: round + 1,
                matches,
            })
        }
        Err(TournamentError::RoundAlreadyExists { round: next_round }) => {
            log::warn!(
                "Tournament {}: duplicate attempt to create round {} rejected",
                tournament_id,
                next_round
            );
            Ok(Advance::AlreadyAdvanced { round: next_round })
        }
        Err(e) => Err(e),
    }
}
