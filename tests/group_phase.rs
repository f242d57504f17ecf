//! Integration tests for poule partitioning, board placement and referee assignment.

use dart_poule_engine::logic::{
    assign_boards, assign_referees, partition_groups, round_robin_schedule,
};
use dart_poule_engine::{
    generate_full_round_robin, generate_group_phase, Board, Competitor, CompetitorId, GameMatch,
    MatchSettings, TournamentError,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::{HashMap, HashSet};

fn roster(n: u32) -> Vec<Competitor> {
    (1..=n).map(|i| Competitor::new(i, format!("P{i}"))).collect()
}

fn boards(numbers: &[u32]) -> Vec<Board> {
    numbers
        .iter()
        .enumerate()
        .map(|(i, &n)| Board::new(i as u32 + 1, format!("Board {n}"), n))
        .collect()
}

fn settings() -> MatchSettings {
    MatchSettings::new(1, 3, 1)
}

fn members_of(matches: &[GameMatch], group: u32) -> HashSet<CompetitorId> {
    matches
        .iter()
        .filter(|m| m.group == Some(group))
        .flat_map(|m| [m.slot_1, m.slot_2])
        .flatten()
        .collect()
}

#[test]
fn partition_spreads_roster_evenly() {
    let mut rng = StdRng::seed_from_u64(7);
    let groups = partition_groups(&roster(11), 3, &mut rng);
    assert_eq!(groups.len(), 3);
    let sizes: Vec<usize> = groups.iter().map(Vec::len).collect();
    assert_eq!(sizes, vec![4, 4, 3]);

    let all: HashSet<CompetitorId> = groups.iter().flatten().copied().collect();
    assert_eq!(all, (1..=11).collect());
}

#[test]
fn partition_is_reproducible_with_the_same_seed() {
    let a = partition_groups(&roster(12), 3, &mut StdRng::seed_from_u64(99));
    let b = partition_groups(&roster(12), 3, &mut StdRng::seed_from_u64(99));
    assert_eq!(a, b);
}

#[test]
fn roster_smaller_than_group_count_collapses_to_one_group() {
    let groups = partition_groups(&roster(3), 4, &mut StdRng::seed_from_u64(1));
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].len(), 3);

    let matches =
        generate_group_phase(&roster(3), &[], 4, &settings(), &mut StdRng::seed_from_u64(1))
            .unwrap();
    assert_eq!(matches.len(), 3);
    assert!(matches.iter().all(|m| m.group == Some(1)));
}

#[test]
fn group_phase_schedules_each_group_separately() {
    let mut rng = StdRng::seed_from_u64(3);
    let matches = generate_group_phase(&roster(8), &[], 2, &settings(), &mut rng).unwrap();
    assert_eq!(matches.len(), 12);

    let g1 = members_of(&matches, 1);
    let g2 = members_of(&matches, 2);
    assert_eq!(g1.len(), 4);
    assert_eq!(g2.len(), 4);
    assert!(g1.is_disjoint(&g2));

    // Ordered by (round, group).
    let keys: Vec<_> = matches.iter().map(|m| (m.round, m.group)).collect();
    let mut sorted = keys.clone();
    sorted.sort();
    assert_eq!(keys, sorted);
}

#[test]
fn configuration_errors_are_reported_before_generation() {
    let mut rng = StdRng::seed_from_u64(0);
    assert_eq!(
        generate_group_phase(&roster(1), &[], 1, &settings(), &mut rng),
        Err(TournamentError::NotEnoughCompetitors {
            required: 2,
            found: 1
        })
    );
    assert_eq!(
        generate_group_phase(&roster(15), &[], 2, &settings(), &mut rng),
        Err(TournamentError::GroupTooLarge { size: 8, max: 7 })
    );
    assert_eq!(
        generate_group_phase(&roster(6), &[], 0, &settings(), &mut rng),
        Err(TournamentError::InvalidGroupCount)
    );
    // 3 into 2 groups would leave one competitor alone with no matches.
    assert_eq!(
        generate_group_phase(&roster(3), &[], 2, &settings(), &mut rng),
        Err(TournamentError::GroupTooSmall { size: 1, min: 2 })
    );
    assert!(generate_group_phase(&roster(4), &[], 2, &settings(), &mut rng).is_ok());
    assert_eq!(
        generate_group_phase(&roster(6), &[], 1, &MatchSettings::new(1, 0, 1), &mut rng),
        Err(TournamentError::InvalidBestOf(0))
    );
}

#[test]
fn overflow_boards_spread_a_round_over_all_boards() {
    let mut rng = StdRng::seed_from_u64(11);
    let matches =
        generate_group_phase(&roster(8), &boards(&[1, 2, 3, 4]), 2, &settings(), &mut rng)
            .unwrap();

    let round_one: Vec<_> = matches.iter().filter(|m| m.round == 1).collect();
    assert_eq!(round_one.len(), 4);
    let used: HashSet<u32> = round_one.iter().filter_map(|m| m.board).collect();
    assert_eq!(used, HashSet::from([1, 2, 3, 4]));
    assert!(matches.iter().all(|m| m.board.is_some()));
}

#[test]
fn fixed_boards_follow_group_number() {
    let s = settings();
    let mut matches = round_robin_schedule(&[1, 2, 3], &s, Some(1));
    matches.extend(round_robin_schedule(&[4, 5, 6], &s, Some(2)));
    matches.extend(round_robin_schedule(&[7, 8, 9], &s, Some(3)));

    // Unsorted board list: group 1 gets the lowest number.
    assign_boards(&mut matches, 3, &boards(&[9, 4]));
    for m in &matches {
        let expected = match m.group {
            Some(1) => Some(4),
            Some(2) => Some(9),
            _ => None,
        };
        assert_eq!(m.board, expected);
    }
}

#[test]
fn referee_is_never_a_player() {
    let mut rng = StdRng::seed_from_u64(5);
    let matches =
        generate_group_phase(&roster(14), &boards(&[1, 2]), 2, &settings(), &mut rng).unwrap();
    for group in [1, 2] {
        let members = members_of(&matches, group);
        for m in matches.iter().filter(|m| m.group == Some(group)) {
            let referee = m.referee.expect("groups of 7 always have a referee");
            assert!(!m.involves(referee));
            assert!(members.contains(&referee));
        }
    }
}

#[test]
fn referee_duty_is_balanced() {
    for n in 3..=7u32 {
        let members: Vec<CompetitorId> = (1..=n).collect();
        let mut matches = round_robin_schedule(&members, &settings(), Some(1));
        assign_referees(&mut matches, &members);

        let mut duty: HashMap<CompetitorId, u32> = HashMap::new();
        for m in &matches {
            *duty.entry(m.referee.unwrap()).or_default() += 1;
        }
        let counts: Vec<u32> = members
            .iter()
            .map(|id| duty.get(id).copied().unwrap_or(0))
            .collect();
        let max = counts.iter().max().unwrap();
        let min = counts.iter().min().unwrap();
        assert!(max - min <= 1, "n = {n}: {counts:?}");
    }
}

#[test]
fn three_player_group_uses_the_idle_player() {
    let members = [10, 20, 30];
    let mut matches = round_robin_schedule(&members, &settings(), Some(1));
    assign_referees(&mut matches, &members);
    for m in &matches {
        let idle = members.iter().copied().find(|&c| !m.involves(c)).unwrap();
        assert_eq!(m.referee, Some(idle));
    }
}

#[test]
fn two_player_group_has_no_referee() {
    let matches =
        generate_group_phase(&roster(4), &[], 2, &settings(), &mut StdRng::seed_from_u64(2))
            .unwrap();
    assert_eq!(matches.len(), 2);
    assert!(matches.iter().all(|m| m.referee.is_none()));
}

#[test]
fn referee_prefers_someone_already_at_the_board() {
    // Two matches of the same round on different boards, then one more on board 1.
    let s = settings();
    let mut matches = vec![
        GameMatch::new(&s, 1, Some(1), 1, 2),
        GameMatch::new(&s, 1, Some(1), 3, 4),
        GameMatch::new(&s, 2, Some(1), 1, 3),
    ];
    matches[0].board = Some(1);
    matches[1].board = Some(2);
    matches[2].board = Some(1);

    assign_referees(&mut matches, &[1, 2, 3, 4, 5]);
    // Match 0: nobody active yet, 3 is first in member order.
    assert_eq!(matches[0].referee, Some(3));
    // Match 1: 5 is the only candidate that has never refereed nor played.
    assert_eq!(matches[1].referee, Some(5));
    // Match 2: 2 and 4 have not refereed; 2 was last on board 1, 4 on board 2.
    assert_eq!(matches[2].referee, Some(2));
}

#[test]
fn full_round_robin_is_one_group() {
    let matches = generate_full_round_robin(&roster(6), &boards(&[1, 2]), &settings()).unwrap();
    assert_eq!(matches.len(), 15);
    assert!(matches.iter().all(|m| m.group == Some(1)));
    assert!(matches.iter().all(|m| m.referee.is_some()));
    // Two boards for one group: overflow policy.
    assert!(matches.iter().all(|m| m.board.is_some()));
}
