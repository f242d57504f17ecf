//! Setup phase: validate the entry, create the tournament and generate its first matches.

use crate::logic::bracket::generate_direct_knockout;
use crate::logic::poules::{generate_full_round_robin, generate_group_phase};
use crate::models::{
    BoardId, CompetitorId, GameMatch, SettingsUpdate, Tournament, TournamentError,
    TournamentFormat, TournamentId, TournamentSettings, TournamentStatus,
};
use crate::store::TournamentStore;
use rand::Rng;
use std::collections::HashSet;

/// Create an active tournament and persist its opening schedule for the chosen format.
///
/// Everything is validated and generated before anything is written, so a configuration
/// error leaves the store untouched.
pub fn create_tournament<S: TournamentStore + ?Sized, R: Rng + ?Sized>(
    store: &mut S,
    name: &str,
    settings: TournamentSettings,
    competitor_ids: &[CompetitorId],
    board_ids: &[BoardId],
    rng: &mut R,
) -> Result<(Tournament, Vec<GameMatch>), TournamentError> {
    let mut seen = HashSet::new();
    for &id in competitor_ids {
        if !seen.insert(id) {
            return Err(TournamentError::DuplicateCompetitor(id));
        }
    }
    let roster = competitor_ids
        .iter()
        .map(|&id| store.competitor(id))
        .collect::<Result<Vec<_>, _>>()?;
    let boards = board_ids
        .iter()
        .map(|&id| store.board(id))
        .collect::<Result<Vec<_>, _>>()?;
    if roster.len() < 2 {
        return Err(TournamentError::NotEnoughCompetitors {
            required: 2,
            found: roster.len(),
        });
    }

    if settings.format == TournamentFormat::Hybrid && settings.qualifiers_per_group == 0 {
        return Err(TournamentError::InvalidQualifierCount(0));
    }

    let mut tournament = Tournament::new(0, name.trim(), settings);
    tournament.competitors = competitor_ids.to_vec();
    tournament.boards = board_ids.to_vec();

    let mut matches = match tournament.settings.format {
        TournamentFormat::Hybrid => generate_group_phase(
            &roster,
            &boards,
            tournament.settings.number_of_groups,
            &tournament.group_match_settings(),
            rng,
        )?,
        TournamentFormat::RoundRobin => {
            generate_full_round_robin(&roster, &boards, &tournament.group_match_settings())?
        }
        TournamentFormat::Knockout => generate_direct_knockout(
            &roster,
            &tournament.knockout_match_settings(),
            tournament.settings.allow_byes,
            rng,
        )?,
    };

    let mut tournament = store.create_tournament(tournament)?;
    for m in &mut matches {
        m.tournament_id = tournament.id;
    }
    let matches = store.insert_matches(matches)?;
    tournament.status = TournamentStatus::Active;
    store.save_tournament(&tournament)?;

    log::info!(
        "Created tournament {} ({:?}) with {} competitors and {} matches",
        tournament.id,
        tournament.settings.format,
        roster.len(),
        matches.len()
    );
    Ok((tournament, matches))
}

/// Change settings of an existing tournament.
///
/// Bracket settings (byes, qualifiers, knockout best-of) are locked once knockout matches
/// exist. A finished tournament cannot be changed.
pub fn update_settings<S: TournamentStore + ?Sized>(
    store: &mut S,
    tournament_id: TournamentId,
    update: &SettingsUpdate,
) -> Result<Tournament, TournamentError> {
    let mut tournament = store.tournament(tournament_id)?;
    if tournament.is_finished() {
        return Err(TournamentError::InvalidState);
    }
    if update.qualifiers_per_group == Some(0) {
        return Err(TournamentError::InvalidQualifierCount(0));
    }
    if update.legs_knockout == Some(0) {
        return Err(TournamentError::InvalidBestOf(0));
    }
    if update.touches_knockout()
        && store
            .matches(tournament_id)?
            .iter()
            .any(GameMatch::is_knockout)
    {
        return Err(TournamentError::KnockoutAlreadyStarted);
    }

    if let Some(name) = &update.name {
        tournament.name = name.trim().to_string();
    }
    if let Some(allow_byes) = update.allow_byes {
        tournament.settings.allow_byes = allow_byes;
    }
    if let Some(qualifiers) = update.qualifiers_per_group {
        tournament.settings.qualifiers_per_group = qualifiers;
    }
    if let Some(legs) = update.legs_knockout {
        tournament.settings.legs_knockout = legs;
    }
    store.save_tournament(&tournament)?;

    log::info!(
        "Tournament {}: settings updated (byes {}, {} qualifier(s), knockout best of {})",
        tournament_id,
        tournament.settings.allow_byes,
        tournament.settings.qualifiers_per_group,
        tournament.settings.legs_knockout
    );
    Ok(tournament)
}
