//! All-play-all schedule generation (circle method).

use crate::models::{CompetitorId, GameMatch, MatchSettings};

/// Every unordered pair of `competitors` exactly once, spread over rounds so nobody plays twice
/// in a round.
///
/// With an odd count a placeholder is added; whoever meets the placeholder has a bye that
/// round and no match is emitted. Position 0 stays fixed while the rest rotate one step per
/// round. Fewer than 2 competitors yields no matches.
pub fn round_robin_schedule(
    competitors: &[CompetitorId],
    settings: &MatchSettings,
    group: Option<u32>,
) -> Vec<GameMatch> {
    if competitors.len() < 2 {
        return Vec::new();
    }

    let mut rotation: Vec<Option<CompetitorId>> = competitors.iter().copied().map(Some).collect();
    if rotation.len() % 2 != 0 {
        rotation.push(None);
    }

    let n = rotation.len();
    let mut matches = Vec::with_capacity(competitors.len() * (competitors.len() - 1) / 2);

    for round_idx in 0..n - 1 {
        let round = round_idx as u32 + 1;
        for i in 0..n / 2 {
            if let (Some(a), Some(b)) = (rotation[i], rotation[n - 1 - i]) {
                matches.push(GameMatch::new(settings, round, group, a, b));
            }
        }
        // [0, 1, 2, 3] -> [0, 3, 1, 2]
        rotation[1..].rotate_right(1);
    }

    matches
}

/// Number of rounds the circle method needs for `n` competitors.
pub fn round_count(n: usize) -> usize {
    match n {
        0 | 1 => 0,
        n if n % 2 == 0 => n - 1,
        n => n,
    }
}
