//! Referee assignment within a group: a greedy online balancer over the group's schedule.

use crate::models::{CompetitorId, GameMatch};
use std::collections::HashMap;

/// Weight per match already refereed; dominates the other terms.
const REFEREE_COUNT_WEIGHT: i64 = 100;
/// Added when the candidate was last active on a different board.
const LOCATION_PENALTY: i64 = 50;
/// Gap used for a competitor who has not been active yet.
const NEVER_ACTIVE_GAP: i64 = 999;

/// Per-competitor state carried across the schedule.
#[derive(Clone, Copy, Debug, Default)]
struct Duty {
    refereed: u32,
    last_active: Option<usize>,
    last_board: Option<u32>,
}

impl Duty {
    fn mark_active(&mut self, index: usize, board: Option<u32>) {
        self.last_active = Some(index);
        self.last_board = board;
    }

    fn score(&self, index: usize, board: Option<u32>) -> i64 {
        let gap = match self.last_active {
            Some(last) => index as i64 - last as i64,
            None => NEVER_ACTIVE_GAP,
        };
        let location_penalty = match (self.last_board, board) {
            (Some(prev), Some(current)) if prev != current => LOCATION_PENALTY,
            _ => 0,
        };
        i64::from(self.refereed) * REFEREE_COUNT_WEIGHT + location_penalty - gap
    }
}

/// Assign one non-playing group member as referee to every match, in round order.
///
/// Candidates are scored `refereed * 100 + location_penalty - rest_gap`; the lowest score wins
/// and ties go to the earliest candidate in `members`. Groups with fewer than 3 members get
/// no referees.
pub fn assign_referees(matches: &mut [GameMatch], members: &[CompetitorId]) {
    if members.len() < 3 {
        for m in matches.iter_mut() {
            m.referee = None;
        }
        return;
    }

    let mut order: Vec<usize> = (0..matches.len()).collect();
    order.sort_by_key(|&i| matches[i].round);

    let mut duties: HashMap<CompetitorId, Duty> =
        members.iter().map(|&id| (id, Duty::default())).collect();

    for (index, &mi) in order.iter().enumerate() {
        let board = matches[mi].board;
        for player in [matches[mi].slot_1, matches[mi].slot_2].into_iter().flatten() {
            duties.entry(player).or_default().mark_active(index, board);
        }

        let chosen = members
            .iter()
            .copied()
            .filter(|&id| !matches[mi].involves(id))
            .min_by_key(|id| duties.get(id).copied().unwrap_or_default().score(index, board));

        if let Some(referee) = chosen {
            let duty = duties.entry(referee).or_default();
            duty.refereed += 1;
            duty.mark_active(index, board);
        }
        log::debug!(
            "Round {}: {:?} vs {:?}, referee {:?}",
            matches[mi].round,
            matches[mi].slot_1,
            matches[mi].slot_2,
            chosen
        );
        matches[mi].referee = chosen;
    }
}
