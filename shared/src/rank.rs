//! Rank and placement-score pure functions (§4.2 Rank, §4.11 Hub client).

use crate::ids::PlayerId;

/// Leaderboard score used to sort ships for ranking: `kills*100 − deaths*50`.
pub fn leaderboard_score(kills: u32, deaths: u32) -> i64 {
    kills as i64 * 100 - deaths as i64 * 50
}

/// Rank (1-based) of `target` among `ships`, sorted by `leaderboard_score`
/// descending with ties broken by insertion order (the order `ships` is
/// given in).
pub fn rank_of(ships: &[(PlayerId, u32, u32)], target: PlayerId) -> Option<usize> {
    let mut indexed: Vec<(usize, &(PlayerId, u32, u32))> = ships.iter().enumerate().collect();
    indexed.sort_by(|a, b| {
        let sa = leaderboard_score(a.1 .1, a.1 .2);
        let sb = leaderboard_score(b.1 .1, b.1 .2);
        sb.cmp(&sa).then(a.0.cmp(&b.0))
    });
    indexed.iter().position(|(_, s)| s.0 == target).map(|pos| pos + 1)
}

/// Placement score table (§4.11): rank 1→100, 2→80, 3→60, 4→40, 5+→20;
/// rank 0 (absent from the leaderboard) → 0.
pub fn placement_score(rank: usize) -> u8 {
    match rank {
        0 => 0,
        1 => 100,
        2 => 80,
        3 => 60,
        4 => 40,
        _ => 20,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placement_table_matches_spec() {
        assert_eq!(placement_score(1), 100);
        assert_eq!(placement_score(2), 80);
        assert_eq!(placement_score(3), 60);
        assert_eq!(placement_score(4), 40);
        assert_eq!(placement_score(5), 20);
        assert_eq!(placement_score(99), 20);
        assert_eq!(placement_score(0), 0);
    }

    #[test]
    fn test_placement_scenario_four_players() {
        // Placement scenario: scores (600,400,200,0) -> submits (100,80,60,40).
        let a = PlayerId(1);
        let b = PlayerId(2);
        let c = PlayerId(3);
        let d = PlayerId(4);
        // kills/deaths chosen so leaderboard_score matches 600/400/200/0.
        let ships = vec![(a, 6, 0), (b, 4, 0), (c, 2, 0), (d, 0, 0)];
        assert_eq!(placement_score(rank_of(&ships, a).unwrap()), 100);
        assert_eq!(placement_score(rank_of(&ships, b).unwrap()), 80);
        assert_eq!(placement_score(rank_of(&ships, c).unwrap()), 60);
        assert_eq!(placement_score(rank_of(&ships, d).unwrap()), 40);
    }

    #[test]
    fn test_ties_break_by_insertion_order() {
        let a = PlayerId(1);
        let b = PlayerId(2);
        let ships = vec![(a, 1, 0), (b, 1, 0)];
        assert_eq!(rank_of(&ships, a), Some(1));
        assert_eq!(rank_of(&ships, b), Some(2));
    }
}
