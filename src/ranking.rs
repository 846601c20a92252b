//! # Global Normalizer & Ranker
//! z-scores of team totals against the whole population, rank scores and places.
//!
//! Places use "gap on resume": teams whose rank scores differ by less than
//! `TIE_EPSILON` share a place, and the next distinct team takes its 1-based
//! position in the sorted order (1, 1, 1, 4 rather than 1, 1, 1, 2).

use crate::policy::{MIN_GLOBAL_STD, RP_CENTER, RP_SCALE, TIE_EPSILON};
use crate::record::TeamRecord;
use tracing::info;

/// Mean and floored population standard deviation of team totals.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoolStats {
    pub mean: f64,
    pub stdev: f64,
}

/// Population (N denominator) statistics; stdev never drops below `MIN_GLOBAL_STD`.
pub fn compute_pool_stats(values: &[f64]) -> PoolStats {
    if values.is_empty() {
        return PoolStats {
            mean: 0.0,
            stdev: MIN_GLOBAL_STD,
        };
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    PoolStats {
        mean,
        stdev: variance.sqrt().max(MIN_GLOBAL_STD),
    }
}

/// z-score of a total; `stats.stdev` is already floored.
pub fn compute_zscore(value: f64, stats: &PoolStats) -> f64 {
    (value - stats.mean) / stats.stdev
}

/// Display scale centered on 50.
pub fn rank_score(z: f64) -> f64 {
    RP_CENTER + z * RP_SCALE
}

/// Set z-scores and rank scores of every team; returns the pool statistics.
pub fn normalize(teams: &mut [TeamRecord]) -> PoolStats {
    let totals: Vec<f64> = teams.iter().map(|t| t.total).collect();
    let stats = compute_pool_stats(&totals);
    info!(
        global_mean_tp = format_args!("{:.2}", stats.mean),
        global_std_tp = format_args!("{:.2}", stats.stdev),
        "global TP statistics"
    );
    for team in teams.iter_mut() {
        team.z_score = compute_zscore(team.total, &stats);
        team.rank_score = rank_score(team.z_score);
    }
    stats
}

/// Sort by rank score, highest first. Equal scores keep their input order.
pub fn sort_by_rank_score(teams: &mut [TeamRecord]) {
    teams.sort_by(|a, b| b.rank_score.total_cmp(&a.rank_score));
}

/// Assign places to teams already sorted by `sort_by_rank_score`.
pub fn assign_places(teams: &mut [TeamRecord]) {
    for i in 0..teams.len() {
        let position = (i + 1) as u32;
        teams[i].rank = if i > 0 && (teams[i].rank_score - teams[i - 1].rank_score).abs() < TIE_EPSILON {
            teams[i - 1].rank
        } else {
            position
        };
    }
}

/// normalize → sort → places.
pub fn rank_teams(teams: &mut [TeamRecord]) -> PoolStats {
    let stats = normalize(teams);
    sort_by_rank_score(teams);
    assign_places(teams);
    stats
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_total(id: &str, total: f64) -> TeamRecord {
        let mut t = TeamRecord::new("A", "", id, id, "x");
        t.total = total;
        t
    }

    fn ids(teams: &[TeamRecord]) -> Vec<&str> {
        teams.iter().map(|t| t.team_id.as_str()).collect()
    }

    fn ranks(teams: &[TeamRecord]) -> Vec<u32> {
        teams.iter().map(|t| t.rank).collect()
    }

    #[test]
    fn pool_stats_use_population_stdev() {
        let s = compute_pool_stats(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        assert!((s.mean - 5.0).abs() < 1e-12);
        assert!((s.stdev - 2.0).abs() < 1e-12);
    }

    #[test]
    fn zero_variance_floors_stdev_to_one() {
        let s = compute_pool_stats(&[42.0, 42.0, 42.0]);
        assert_eq!(s.stdev, 1.0);
        let s = compute_pool_stats(&[10.0, 10.4]);
        assert_eq!(s.stdev, 1.0);
        let s = compute_pool_stats(&[]);
        assert_eq!(s.stdev, 1.0);
    }

    #[test]
    fn rank_score_mapping() {
        assert_eq!(rank_score(0.0), 50.0);
        assert_eq!(rank_score(1.5), 65.0);
        assert_eq!(rank_score(-2.0), 30.0);
    }

    #[test]
    fn sorts_descending_and_numbers_positions() {
        let mut teams = vec![with_total("a", 10.0), with_total("b", 90.0), with_total("c", 50.0)];
        rank_teams(&mut teams);
        assert_eq!(ids(&teams), vec!["b", "c", "a"]);
        assert_eq!(ranks(&teams), vec![1, 2, 3]);
        assert!(teams[0].z_score > 0.0 && teams[2].z_score < 0.0);
    }

    #[test]
    fn three_way_tie_resumes_at_position_four() {
        let mut teams = vec![
            with_total("a", 60.0),
            with_total("b", 60.0),
            with_total("c", 60.0),
            with_total("d", 20.0),
        ];
        rank_teams(&mut teams);
        assert_eq!(ranks(&teams), vec![1, 1, 1, 4]);
        assert_eq!(ids(&teams), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn tie_after_leader_keeps_gap() {
        let mut teams = vec![
            with_total("lead", 100.0),
            with_total("x", 40.0),
            with_total("y", 40.0),
            with_total("z", 40.0),
            with_total("last", 0.0),
        ];
        rank_teams(&mut teams);
        assert_eq!(ranks(&teams), vec![1, 2, 2, 2, 5]);
    }

    #[test]
    fn near_equal_scores_within_epsilon_tie() {
        let mut teams = vec![with_total("a", 0.0), with_total("b", 0.0)];
        teams[0].rank_score = 55.004;
        teams[1].rank_score = 55.0;
        sort_by_rank_score(&mut teams);
        assign_places(&mut teams);
        assert_eq!(ranks(&teams), vec![1, 1]);

        teams[0].rank_score = 55.02;
        assign_places(&mut teams);
        assert_eq!(ranks(&teams), vec![1, 2]);
    }

    #[test]
    fn ranks_never_decrease_down_the_table() {
        let totals = [13.0, 77.5, 77.5, 2.0, 40.0, 40.001, 91.0, 0.0, 55.0];
        let mut teams: Vec<_> = totals
            .iter()
            .enumerate()
            .map(|(i, &v)| with_total(&i.to_string(), v))
            .collect();
        rank_teams(&mut teams);
        for pair in teams.windows(2) {
            assert!(pair[0].rank_score >= pair[1].rank_score);
            assert!(pair[0].rank <= pair[1].rank);
            if (pair[0].rank_score - pair[1].rank_score).abs() < TIE_EPSILON {
                assert_eq!(pair[0].rank, pair[1].rank);
            }
        }
    }

    #[test]
    fn empty_population_is_fine() {
        let mut teams: Vec<TeamRecord> = Vec::new();
        let stats = rank_teams(&mut teams);
        assert_eq!(stats.stdev, 1.0);
    }
}
