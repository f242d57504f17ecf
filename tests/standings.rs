//! Integration tests for group tables and tie-breaking.

use dart_poule_engine::logic::{group_standings, POINTS_FOR_WIN};
use dart_poule_engine::{
    compute_standings, create_tournament, report_score, Competitor, CompetitorId, GameMatch,
    MatchSettings, MemoryStore, TournamentFormat, TournamentSettings, TournamentStore,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn roster(n: u32) -> Vec<Competitor> {
    (1..=n).map(|i| Competitor::new(i, format!("P{i}"))).collect()
}

/// A completed group-1 match.
fn played(a: CompetitorId, b: CompetitorId, score_a: u32, score_b: u32) -> GameMatch {
    let mut m = GameMatch::new(&MatchSettings::new(1, 5, 1), 1, Some(1), a, b);
    m.score_1 = score_a;
    m.score_2 = score_b;
    m.completed = true;
    m
}

fn order(table: &[dart_poule_engine::Standing]) -> Vec<CompetitorId> {
    table.iter().map(|s| s.competitor_id).collect()
}

#[test]
fn points_and_legs_are_aggregated() {
    let matches = vec![played(1, 2, 3, 1), played(2, 3, 3, 2), played(1, 3, 0, 3)];
    let tables = group_standings(&matches, &roster(3)).unwrap();
    let table = &tables[&1];

    let row = |id: CompetitorId| table.iter().find(|s| s.competitor_id == id).unwrap();
    assert_eq!(row(1).points, 2);
    assert_eq!((row(1).legs_won, row(1).legs_lost, row(1).leg_difference), (3, 4, -1));
    assert_eq!(row(3).points, 2);
    assert_eq!((row(3).legs_won, row(3).legs_lost, row(3).leg_difference), (5, 3, 2));
    assert_eq!((row(2).won, row(2).lost, row(2).played), (1, 1, 2));
    assert_eq!(row(2).name, "P2");
}

#[test]
fn total_points_equal_two_per_completed_match() {
    let mut matches = vec![
        played(1, 2, 3, 0),
        played(3, 4, 1, 3),
        played(1, 3, 3, 2),
        played(2, 4, 2, 3),
    ];
    // Unplayed matches award nothing.
    matches.push(GameMatch::new(&MatchSettings::new(1, 5, 1), 3, Some(1), 1, 4));

    let tables = group_standings(&matches, &roster(4)).unwrap();
    let total: u32 = tables[&1].iter().map(|s| s.points).sum();
    assert_eq!(total, POINTS_FOR_WIN * 4);
}

#[test]
fn ranking_uses_points_then_leg_difference() {
    let matches = vec![
        played(1, 2, 3, 0),
        played(3, 4, 3, 2),
        played(1, 3, 3, 2),
        played(2, 4, 3, 0),
        played(1, 4, 3, 1),
        played(2, 3, 3, 2),
    ];
    let tables = group_standings(&matches, &roster(4)).unwrap();
    // 1: 6 points, 2: 4, 3: 2, 4: 0.
    assert_eq!(order(&tables[&1]), vec![1, 2, 3, 4]);
    assert!(tables[&1].iter().all(|s| !s.needs_shootout));
}

#[test]
fn leg_difference_separates_rows_level_on_points() {
    // Everyone wins once: legs decide, no shoot-out needed.
    let matches = vec![played(1, 2, 2, 3), played(1, 3, 3, 0), played(2, 3, 0, 3)];
    let tables = group_standings(&matches, &roster(3)).unwrap();
    let ld: Vec<_> = tables[&1]
        .iter()
        .map(|s| (s.competitor_id, s.leg_difference))
        .collect();
    assert_eq!(ld, vec![(1, 2), (3, 0), (2, -2)]);
    assert!(tables[&1].iter().all(|s| !s.needs_shootout));
}

#[test]
fn head_to_head_orders_level_rows_but_shootout_is_still_flagged() {
    let matches = vec![
        played(1, 2, 2, 3),
        played(1, 3, 3, 2),
        played(1, 4, 3, 2),
        played(2, 3, 0, 3),
        played(2, 4, 3, 0),
        played(3, 4, 0, 3),
    ];
    let tables = group_standings(&matches, &roster(4)).unwrap();
    let table = &tables[&1];

    // 1 and 2: 4 points, +1. 3 and 4: 2 points, -1. Direct meetings: 2 beat 1, 4 beat 3.
    let rows: Vec<_> = table
        .iter()
        .map(|s| (s.competitor_id, s.points, s.leg_difference))
        .collect();
    assert_eq!(rows, vec![(2, 4, 1), (1, 4, 1), (4, 2, -1), (3, 2, -1)]);
    assert!(table.iter().all(|s| s.needs_shootout));
}

#[test]
fn three_way_cycle_keeps_schedule_order_and_flags_everyone() {
    // 1 beats 2, 2 beats 3, 3 beats 1, all 3-2: identical points and legs.
    let matches = vec![played(1, 2, 3, 2), played(2, 3, 3, 2), played(3, 1, 3, 2)];
    let tables = group_standings(&matches, &roster(3)).unwrap();
    let table = &tables[&1];

    assert!(table.iter().all(|s| s.points == 2 && s.leg_difference == 0));
    assert_eq!(order(table), vec![1, 2, 3]);
    assert!(table.iter().all(|s| s.needs_shootout));
}

#[test]
fn unplayed_competitors_still_get_a_row() {
    let mut matches = vec![played(1, 2, 3, 0)];
    matches.push(GameMatch::new(&MatchSettings::new(1, 5, 1), 2, Some(1), 3, 4));
    let tables = group_standings(&matches, &roster(4)).unwrap();
    assert_eq!(tables[&1].len(), 4);
    assert_eq!(tables[&1][0].competitor_id, 1);
    let four = tables[&1].iter().find(|s| s.competitor_id == 4).unwrap();
    assert_eq!((four.played, four.points), (0, 0));
}

#[test]
fn knockout_matches_are_ignored() {
    let mut ko = GameMatch::new(&MatchSettings::new(1, 5, 1), 1, None, 1, 2);
    ko.score_1 = 3;
    ko.completed = true;
    let tables = group_standings(&[played(1, 2, 0, 3), ko], &roster(2)).unwrap();
    assert_eq!(tables.len(), 1);
    assert_eq!(order(&tables[&1]), vec![2, 1]);
}

#[test]
fn compute_standings_reads_every_group_from_the_store() {
    let mut store = MemoryStore::new();
    let ids: Vec<CompetitorId> = (0..8)
        .map(|i| store.add_competitor(&format!("Player {i}")).id)
        .collect();
    let settings = TournamentSettings {
        format: TournamentFormat::Hybrid,
        number_of_groups: 2,
        ..TournamentSettings::default()
    };
    let (tournament, matches) = create_tournament(
        &mut store,
        "Club night",
        settings,
        &ids,
        &[],
        &mut StdRng::seed_from_u64(4),
    )
    .unwrap();

    // Slot 1 wins every group match 2-0 (best of 3).
    for m in &matches {
        report_score(&mut store, tournament.id, m.id, 2, 0).unwrap();
    }

    let tables = compute_standings(&store, tournament.id).unwrap();
    assert_eq!(tables.keys().copied().collect::<Vec<_>>(), vec![1, 2]);
    for table in tables.values() {
        assert_eq!(table.len(), 4);
        let points: u32 = table.iter().map(|s| s.points).sum();
        assert_eq!(points, 2 * 6);
        assert!(table.windows(2).all(|w| w[0].points >= w[1].points));
    }
}
