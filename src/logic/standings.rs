//! Group tables: points, legs and head-to-head tie-breaking.

use crate::models::{Competitor, CompetitorId, GameMatch, TournamentError, TournamentId};
use crate::store::TournamentStore;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

/// Points for winning a group match. Losing scores nothing; there are no draws.
pub const POINTS_FOR_WIN: u32 = 2;

/// Ranked tables keyed by group number.
pub type GroupTables = BTreeMap<u32, Vec<Standing>>;

/// One competitor's row in a group table. Derived, never stored.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct Standing {
    pub competitor_id: CompetitorId,
    pub name: String,
    pub group: u32,
    pub played: u32,
    pub won: u32,
    pub lost: u32,
    pub points: u32,
    pub legs_won: u32,
    pub legs_lost: u32,
    pub leg_difference: i32,
    /// Tied with a neighbour on points and leg difference.
    pub needs_shootout: bool,
}

impl Standing {
    fn new(competitor: &Competitor, group: u32) -> Self {
        Self {
            competitor_id: competitor.id,
            name: competitor.name.clone(),
            group,
            ..Self::default()
        }
    }

    fn record(&mut self, legs_for: u32, legs_against: u32, won: Option<bool>) {
        self.played += 1;
        self.legs_won += legs_for;
        self.legs_lost += legs_against;
        self.leg_difference = self.legs_won as i32 - self.legs_lost as i32;
        match won {
            Some(true) => {
                self.won += 1;
                self.points += POINTS_FOR_WIN;
            }
            Some(false) => self.lost += 1,
            None => {}
        }
    }
}

/// Winner of each direct meeting, keyed by the unordered pair.
#[derive(Clone, Debug, Default)]
pub struct HeadToHead {
    winners: HashMap<(CompetitorId, CompetitorId), CompetitorId>,
}

impl HeadToHead {
    fn key(a: CompetitorId, b: CompetitorId) -> (CompetitorId, CompetitorId) {
        (a.min(b), a.max(b))
    }

    pub fn record(&mut self, a: CompetitorId, b: CompetitorId, winner: CompetitorId) {
        self.winners.insert(Self::key(a, b), winner);
    }

    pub fn winner(&self, a: CompetitorId, b: CompetitorId) -> Option<CompetitorId> {
        self.winners.get(&Self::key(a, b)).copied()
    }
}

/// Points, then leg difference, then the direct meeting. `Less` means `a` ranks higher.
///
/// Not a total order: three competitors level on points and legs can beat each other in a cycle.
pub fn compare_standings(a: &Standing, b: &Standing, h2h: &HeadToHead) -> Ordering {
    b.points
        .cmp(&a.points)
        .then_with(|| b.leg_difference.cmp(&a.leg_difference))
        .then_with(|| match h2h.winner(a.competitor_id, b.competitor_id) {
            Some(w) if w == a.competitor_id => Ordering::Less,
            Some(w) if w == b.competitor_id => Ordering::Greater,
            _ => Ordering::Equal,
        })
}

/// Sort a group table and raise shoot-out flags.
///
/// Uses a stable insertion sort driven only by pairwise comparisons; the comparator is not
/// transitive, which `slice::sort_by` does not allow. Adjacent rows equal on points and leg
/// difference are flagged even when head-to-head already separated them.
pub fn rank_group(table: &mut [Standing], h2h: &HeadToHead) {
    for i in 1..table.len() {
        let mut j = i;
        while j > 0 && compare_standings(&table[j - 1], &table[j], h2h) == Ordering::Greater {
            table.swap(j - 1, j);
            j -= 1;
        }
    }

    for s in table.iter_mut() {
        s.needs_shootout = false;
    }
    for i in 1..table.len() {
        let tied = table[i - 1].points == table[i].points
            && table[i - 1].leg_difference == table[i].leg_difference;
        if tied {
            table[i - 1].needs_shootout = true;
            table[i].needs_shootout = true;
        }
    }
}

/// Build ranked tables from group matches. Everyone scheduled in a group gets a row, played or not.
pub fn group_standings(
    matches: &[GameMatch],
    roster: &[Competitor],
) -> Result<GroupTables, TournamentError> {
    let by_id: HashMap<CompetitorId, &Competitor> = roster.iter().map(|c| (c.id, c)).collect();

    let mut rows: BTreeMap<u32, Vec<Standing>> = BTreeMap::new();
    let mut index: HashMap<(u32, CompetitorId), usize> = HashMap::new();
    let mut h2h = HeadToHead::default();

    for m in matches.iter().filter(|m| !m.is_knockout()) {
        let group = m.group.unwrap_or_default();
        for id in [m.slot_1, m.slot_2].into_iter().flatten() {
            if index.contains_key(&(group, id)) {
                continue;
            }
            let competitor = by_id
                .get(&id)
                .ok_or(TournamentError::UnknownCompetitor(id))?;
            let table = rows.entry(group).or_default();
            index.insert((group, id), table.len());
            table.push(Standing::new(competitor, group));
        }
    }

    for m in matches.iter().filter(|m| !m.is_knockout() && m.completed) {
        let (Some(a), Some(b)) = (m.slot_1, m.slot_2) else {
            continue;
        };
        let group = m.group.unwrap_or_default();
        let a_won = match m.score_1.cmp(&m.score_2) {
            Ordering::Greater => Some(true),
            Ordering::Less => Some(false),
            Ordering::Equal => {
                log::warn!("Group match {} is completed as a draw; no points awarded", m.id);
                None
            }
        };
        if let Some(a_won) = a_won {
            h2h.record(a, b, if a_won { a } else { b });
        }

        let table = rows.entry(group).or_default();
        let ia = index[&(group, a)];
        let ib = index[&(group, b)];
        table[ia].record(m.score_1, m.score_2, a_won);
        table[ib].record(m.score_2, m.score_1, a_won.map(|w| !w));
    }

    for table in rows.values_mut() {
        rank_group(table, &h2h);
    }
    Ok(rows)
}

/// Ranked tables for every group of a tournament, recomputed from its persisted matches.
pub fn compute_standings<S: TournamentStore + ?Sized>(
    store: &S,
    tournament_id: TournamentId,
) -> Result<GroupTables, TournamentError> {
    let roster = store.roster(tournament_id)?;
    let matches = store.matches(tournament_id)?;
    group_standings(&matches, &roster)
}
