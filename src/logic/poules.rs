//! Group ("poule") phase: partition the roster, schedule each group, place matches on boards
//! and assign referees.

use crate::logic::referee::assign_referees;
use crate::logic::round_robin::round_robin_schedule;
use crate::models::{
    Board, Competitor, CompetitorId, GameMatch, MatchSettings, TournamentError, MAX_GROUP_SIZE,
    MIN_GROUP_SIZE,
};
use rand::seq::SliceRandom;
use rand::Rng;

/// Group number used for a single all-play-all table.
pub const SINGLE_GROUP: u32 = 1;

/// Randomly split the roster into `groups` groups: shuffled index `i` goes to group `i % groups`.
///
/// A roster smaller than the group count collapses to one group. Returned groups are indexed
/// from 0; group `k` in the result is group number `k + 1` on the matches.
pub fn partition_groups<R: Rng + ?Sized>(
    roster: &[Competitor],
    groups: usize,
    rng: &mut R,
) -> Vec<Vec<CompetitorId>> {
    let groups = if groups == 0 || roster.len() < groups {
        1
    } else {
        groups
    };

    let mut ids: Vec<CompetitorId> = roster.iter().map(|c| c.id).collect();
    ids.shuffle(rng);

    let mut partition = vec![Vec::new(); groups];
    for (i, id) in ids.into_iter().enumerate() {
        partition[i % groups].push(id);
    }
    partition
}

/// Put matches on boards.
///
/// More boards than groups: sort by (round, group) and hand boards out cyclically, so the
/// concurrent matches of a round spread over every board. Otherwise group `k` plays on the
/// `k`-th board by number and groups past the last board stay unassigned.
pub fn assign_boards(matches: &mut [GameMatch], group_count: usize, boards: &[Board]) {
    let mut numbers: Vec<u32> = boards.iter().map(|b| b.number).collect();
    numbers.sort_unstable();

    if numbers.len() > group_count {
        let mut order: Vec<usize> = (0..matches.len()).collect();
        order.sort_by_key(|&i| (matches[i].round, matches[i].group));
        for (pos, i) in order.into_iter().enumerate() {
            matches[i].board = Some(numbers[pos % numbers.len()]);
        }
    } else {
        for m in matches.iter_mut() {
            m.board = m
                .group
                .and_then(|g| (g as usize).checked_sub(1))
                .and_then(|k| numbers.get(k).copied());
        }
    }
}

/// Generate the complete group phase: partition, per-group round robin, boards, referees.
///
/// Returns unsaved matches ordered by (round, group).
pub fn generate_group_phase<R: Rng + ?Sized>(
    roster: &[Competitor],
    boards: &[Board],
    groups: usize,
    settings: &MatchSettings,
    rng: &mut R,
) -> Result<Vec<GameMatch>, TournamentError> {
    settings.validate()?;
    if groups == 0 {
        return Err(TournamentError::InvalidGroupCount);
    }
    if roster.len() < 2 {
        return Err(TournamentError::NotEnoughCompetitors {
            required: 2,
            found: roster.len(),
        });
    }
    let effective_groups = if roster.len() < groups { 1 } else { groups };
    let largest = roster.len().div_ceil(effective_groups);
    if largest > MAX_GROUP_SIZE {
        return Err(TournamentError::GroupTooLarge {
            size: largest,
            max: MAX_GROUP_SIZE,
        });
    }
    let smallest = roster.len() / effective_groups;
    if smallest < MIN_GROUP_SIZE {
        return Err(TournamentError::GroupTooSmall {
            size: smallest,
            min: MIN_GROUP_SIZE,
        });
    }

    let partition = partition_groups(roster, effective_groups, rng);

    let mut matches = Vec::new();
    let mut ranges = Vec::with_capacity(partition.len());
    for (k, members) in partition.iter().enumerate() {
        let start = matches.len();
        matches.extend(round_robin_schedule(members, settings, Some(k as u32 + 1)));
        ranges.push(start..matches.len());
    }

    assign_boards(&mut matches, partition.len(), boards);

    for (members, range) in partition.iter().zip(ranges) {
        assign_referees(&mut matches[range], members);
    }

    matches.sort_by_key(|m| (m.round, m.group));
    log::info!(
        "Generated group phase: {} competitors in {} group(s), {} matches",
        roster.len(),
        partition.len(),
        matches.len()
    );
    Ok(matches)
}

/// One all-play-all table over the whole roster, tagged as group 1.
pub fn generate_full_round_robin(
    roster: &[Competitor],
    boards: &[Board],
    settings: &MatchSettings,
) -> Result<Vec<GameMatch>, TournamentError> {
    settings.validate()?;
    if roster.len() < 2 {
        return Err(TournamentError::NotEnoughCompetitors {
            required: 2,
            found: roster.len(),
        });
    }

    let members: Vec<CompetitorId> = roster.iter().map(|c| c.id).collect();
    let mut matches = round_robin_schedule(&members, settings, Some(SINGLE_GROUP));
    assign_boards(&mut matches, 1, boards);
    assign_referees(&mut matches, &members);

    log::info!(
        "Generated round robin: {} competitors, {} matches",
        members.len(),
        matches.len()
    );
    Ok(matches)
}
