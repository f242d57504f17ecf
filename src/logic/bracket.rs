//! Knockout bracket construction: qualifiers, global seeding, byes, cross-group pairing and
//! seed-protected slot order.

use crate::logic::standings::{group_standings, GroupTables};
use crate::models::{
    Competitor, CompetitorId, GameMatch, MatchSettings, TournamentError, TournamentFormat,
    TournamentId, TournamentStatus,
};
use crate::store::TournamentStore;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;
use std::cmp::Reverse;

/// Round number of the first knockout round.
pub const FIRST_ROUND: u32 = 1;

/// A competitor entering the bracket.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Qualifier {
    pub competitor_id: CompetitorId,
    /// None for a direct knockout draw.
    pub group: Option<u32>,
    /// 1-based finishing position within the group.
    pub group_rank: usize,
    pub points: u32,
    pub leg_difference: i32,
    pub legs_won: u32,
}

/// First knockout round ready to persist, in bracket-tree order.
#[derive(Clone, Debug)]
pub struct BracketPlan {
    pub bracket_size: usize,
    pub byes: usize,
    /// Qualifiers dropped to reach a power of two when byes are not allowed.
    pub eliminated: Vec<CompetitorId>,
    pub matches: Vec<GameMatch>,
}

/// Top `per_group` rows of every group table.
pub fn select_qualifiers(tables: &GroupTables, per_group: usize) -> Vec<Qualifier> {
    tables
        .iter()
        .flat_map(|(&group, table)| {
            table
                .iter()
                .take(per_group)
                .enumerate()
                .map(move |(i, s)| Qualifier {
                    competitor_id: s.competitor_id,
                    group: Some(group),
                    group_rank: i + 1,
                    points: s.points,
                    leg_difference: s.leg_difference,
                    legs_won: s.legs_won,
                })
        })
        .collect()
}

/// Global seed list, strongest first: every group winner before any runner-up, then points,
/// leg difference and legs won within a rank tier.
pub fn seed_qualifiers(mut qualifiers: Vec<Qualifier>) -> Vec<Qualifier> {
    qualifiers.sort_by_key(|q| {
        (
            q.group_rank,
            Reverse(q.points),
            Reverse(q.leg_difference),
            Reverse(q.legs_won),
        )
    });
    qualifiers
}

/// Smallest power of two that holds `qualifiers` competitors.
pub fn bracket_size(qualifiers: usize) -> usize {
    qualifiers.max(1).next_power_of_two()
}

/// 1-based seed numbers in bracket position order for `slots` first-round slots.
///
/// Doubling from `s` to `2s` places each seed next to its mirror `2s + 1 - seed`, so seeds 1
/// and 2 land in opposite halves. `slots` must be a power of two.
pub fn bracket_order(slots: usize) -> Vec<usize> {
    if slots == 0 {
        return Vec::new();
    }
    let mut order = vec![1];
    while order.len() < slots {
        let s = order.len();
        let mut next = vec![0; 2 * s];
        for (i, &seed) in order.iter().enumerate() {
            next[2 * i] = seed;
            next[2 * i + 1] = 2 * s + 1 - seed;
        }
        order = next;
    }
    order
}

/// Build the first knockout round from a seed list (strongest first).
///
/// The top seeds take the byes as completed walkovers. Without byes the weakest qualifiers
/// are dropped down to a power of two instead. Remaining seeds pair strongest-first against
/// the weakest opponent from another group, else the weakest left. Slots are then permuted
/// into bracket order.
pub fn build_first_round(
    mut seeds: Vec<Qualifier>,
    settings: &MatchSettings,
    allow_byes: bool,
) -> Result<BracketPlan, TournamentError> {
    if seeds.len() < 2 {
        return Err(TournamentError::NotEnoughQualifiers { found: seeds.len() });
    }

    let mut size = bracket_size(seeds.len());
    let mut byes = size - seeds.len();
    let mut eliminated = Vec::new();
    if byes > 0 && !allow_byes {
        size /= 2;
        byes = 0;
        eliminated = seeds.split_off(size).into_iter().map(|q| q.competitor_id).collect();
        log::info!(
            "Byes not allowed: {} qualifier(s) eliminated to fit a bracket of {}",
            eliminated.len(),
            size
        );
    }

    let mut pool = seeds.split_off(byes);
    let mut slots: Vec<GameMatch> = seeds
        .iter()
        .map(|q| GameMatch::walkover(settings, FIRST_ROUND, q.competitor_id))
        .collect();

    while !pool.is_empty() {
        let strong = pool.remove(0);
        let Some(last) = pool.len().checked_sub(1) else {
            return Err(TournamentError::MalformedRound { round: FIRST_ROUND });
        };
        let pick = pool
            .iter()
            .rposition(|q| q.group.is_some() && q.group != strong.group)
            .unwrap_or(last);
        let opponent = pool.remove(pick);
        slots.push(GameMatch::new(
            settings,
            FIRST_ROUND,
            None,
            strong.competitor_id,
            opponent.competitor_id,
        ));
    }

    let mut slots: Vec<Option<GameMatch>> = slots.into_iter().map(Some).collect();
    let matches = bracket_order(slots.len())
        .into_iter()
        .filter_map(|seed| slots.get_mut(seed - 1).and_then(Option::take))
        .collect();

    Ok(BracketPlan {
        bracket_size: size,
        byes,
        eliminated,
        matches,
    })
}

/// Seed the knockout phase of a hybrid tournament from its group tables and persist round 1.
pub fn start_knockout_phase<S: TournamentStore + ?Sized>(
    store: &mut S,
    tournament_id: TournamentId,
) -> Result<Vec<GameMatch>, TournamentError> {
    let tournament = store.tournament(tournament_id)?;
    if tournament.status != TournamentStatus::Active {
        return Err(TournamentError::InvalidState);
    }
    if tournament.settings.format != TournamentFormat::Hybrid {
        return Err(TournamentError::WrongFormat);
    }

    let matches = store.matches(tournament_id)?;
    if matches.iter().any(GameMatch::is_knockout) {
        return Err(TournamentError::KnockoutAlreadyStarted);
    }
    let completed = matches.iter().filter(|m| m.completed).count();
    if completed == 0 {
        return Err(TournamentError::NoCompletedGroupMatches);
    }
    if completed < matches.len() {
        log::warn!(
            "Tournament {}: starting knockout with {} group match(es) unplayed",
            tournament_id,
            matches.len() - completed
        );
    }

    let roster = store.roster(tournament_id)?;
    let tables = group_standings(&matches, &roster)?;
    let seeds = seed_qualifiers(select_qualifiers(
        &tables,
        tournament.settings.qualifiers_per_group,
    ));
    let plan = build_first_round(
        seeds,
        &tournament.knockout_match_settings(),
        tournament.settings.allow_byes,
    )?;

    let inserted = store.insert_matches(plan.matches).map_err(|e| match e {
        TournamentError::RoundAlreadyExists { .. } => TournamentError::KnockoutAlreadyStarted,
        other => other,
    })?;
    log::info!(
        "Tournament {}: knockout started, bracket of {} with {} bye(s)",
        tournament_id,
        plan.bracket_size,
        plan.byes
    );
    Ok(inserted)
}

/// First round of a knockout-only tournament from a random draw. Returns unsaved matches.
pub fn generate_direct_knockout<R: Rng + ?Sized>(
    roster: &[Competitor],
    settings: &MatchSettings,
    allow_byes: bool,
    rng: &mut R,
) -> Result<Vec<GameMatch>, TournamentError> {
    settings.validate()?;
    if roster.len() < 2 {
        return Err(TournamentError::NotEnoughCompetitors {
            required: 2,
            found: roster.len(),
        });
    }

    let mut draw: Vec<CompetitorId> = roster.iter().map(|c| c.id).collect();
    draw.shuffle(rng);
    let seeds = draw
        .into_iter()
        .enumerate()
        .map(|(i, competitor_id)| Qualifier {
            competitor_id,
            group: None,
            group_rank: i + 1,
            points: 0,
            leg_difference: 0,
            legs_won: 0,
        })
        .collect();

    let plan = build_first_round(seeds, settings, allow_byes)?;
    log::info!(
        "Generated knockout draw: {} competitors, bracket of {}",
        roster.len(),
        plan.bracket_size
    );
    Ok(plan.matches)
}
