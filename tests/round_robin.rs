//! Integration tests for the circle-method round robin.

use dart_poule_engine::logic::{round_count, round_robin_schedule};
use dart_poule_engine::{CompetitorId, GameMatch, MatchSettings};
use std::collections::{BTreeMap, HashSet};

fn settings() -> MatchSettings {
    MatchSettings::new(1, 3, 1)
}

fn ids(n: u32) -> Vec<CompetitorId> {
    (1..=n).collect()
}

fn rounds(matches: &[GameMatch]) -> BTreeMap<u32, Vec<&GameMatch>> {
    let mut by_round: BTreeMap<u32, Vec<&GameMatch>> = BTreeMap::new();
    for m in matches {
        by_round.entry(m.round).or_default().push(m);
    }
    by_round
}

#[test]
fn every_pair_meets_exactly_once() {
    for n in 2..=9 {
        let matches = round_robin_schedule(&ids(n), &settings(), Some(1));
        let n = n as usize;
        assert_eq!(matches.len(), n * (n - 1) / 2, "n = {n}");

        let pairs: HashSet<(CompetitorId, CompetitorId)> = matches
            .iter()
            .map(|m| {
                let (a, b) = (m.slot_1.unwrap(), m.slot_2.unwrap());
                (a.min(b), a.max(b))
            })
            .collect();
        assert_eq!(pairs.len(), matches.len(), "duplicate pairing for n = {n}");
        assert!(matches.iter().all(|m| m.slot_1 != m.slot_2));
    }
}

#[test]
fn nobody_plays_twice_in_a_round() {
    for n in 2..=9 {
        let matches = round_robin_schedule(&ids(n), &settings(), None);
        let by_round = rounds(&matches);
        assert_eq!(by_round.len(), round_count(n as usize));
        for (round, games) in by_round {
            let mut seen = HashSet::new();
            for m in games {
                assert!(seen.insert(m.slot_1.unwrap()), "n = {n}, round {round}");
                assert!(seen.insert(m.slot_2.unwrap()), "n = {n}, round {round}");
            }
        }
    }
}

#[test]
fn five_competitors_sit_out_one_per_round() {
    let competitors = ids(5);
    let matches = round_robin_schedule(&competitors, &settings(), Some(1));
    assert_eq!(matches.len(), 10);

    let by_round = rounds(&matches);
    // Six positions with the placeholder: five rounds of two matches.
    assert_eq!(by_round.len(), 5);
    let mut sat_out = HashSet::new();
    for games in by_round.values() {
        assert_eq!(games.len(), 2);
        let idle: Vec<_> = competitors
            .iter()
            .filter(|&&c| !games.iter().any(|m| m.involves(c)))
            .collect();
        assert_eq!(idle.len(), 1);
        sat_out.insert(*idle[0]);
    }
    // Everyone gets exactly one bye.
    assert_eq!(sat_out.len(), 5);
}

#[test]
fn fewer_than_two_competitors_is_empty() {
    assert!(round_robin_schedule(&[], &settings(), None).is_empty());
    assert!(round_robin_schedule(&[7], &settings(), None).is_empty());
}

#[test]
fn matches_carry_settings_and_group() {
    let s = MatchSettings::new(42, 5, 3);
    let matches = round_robin_schedule(&ids(4), &s, Some(2));
    for m in &matches {
        assert_eq!(m.tournament_id, 42);
        assert_eq!(m.best_of_legs, 5);
        assert_eq!(m.best_of_sets, 3);
        assert_eq!(m.group, Some(2));
        assert!(!m.completed);
        assert_eq!((m.score_1, m.score_2), (0, 0));
    }
    // Position 0 stays fixed: competitor 1 plays in every round.
    for games in rounds(&matches).values() {
        assert!(games.iter().any(|m| m.involves(1)));
    }
}
