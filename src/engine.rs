//! # Ranking Engine
//! Runs the LASS stages over the in-memory team list:
//! sections & leniency → per-team totals → global normalization & places.
//!
//! Pure apart from tracing/metrics, so it is easy to test and to re-run: the
//! same input always produces the same order and values.

use crate::compose::compose_team;
use crate::metrics::{ensure_metrics_described, SECTIONS, TEAMS_RANKED_TOTAL};
use crate::output::TeamResult;
use crate::policy::ScoringPolicy;
use crate::ranking::{compute_pool_stats, rank_teams, PoolStats};
use crate::record::{read_records, TeamRecord};
use crate::section::{assign_leniency, group_sections, SectionSummary};
use anyhow::Result;
use metrics::{counter, gauge};
use std::io::BufRead;
use tracing::debug;

/// Everything one run produced, already in place order.
#[derive(Debug, Clone)]
pub struct Ranking {
    pub teams: Vec<TeamRecord>,
    pub sections: Vec<SectionSummary>,
    pub global_mean_raw: f64,
    pub stats: PoolStats,
}

impl Ranking {
    /// Output rows, place order.
    pub fn results(&self) -> Vec<TeamResult> {
        self.teams.iter().map(TeamResult::from).collect()
    }
}

/// Score and rank `teams` in place with the deployed policy.
pub fn process_all_teams(teams: &mut [TeamRecord]) -> Vec<SectionSummary> {
    score_in_place(teams, &ScoringPolicy::default()).sections
}

/// Score and rank `teams` in place with an explicit policy.
///
/// On return `teams` is sorted by rank score (highest first) and every record
/// carries its leniency, averages, totals, z-score, rank score and place.
pub fn process_with_policy(teams: &mut [TeamRecord], policy: &ScoringPolicy) -> Ranking {
    let run = score_in_place(teams, policy);
    Ranking {
        teams: teams.to_vec(),
        sections: run.sections,
        global_mean_raw: run.global_mean_raw,
        stats: run.stats,
    }
}

struct RunSummary {
    sections: Vec<SectionSummary>,
    global_mean_raw: f64,
    stats: PoolStats,
}

fn score_in_place(teams: &mut [TeamRecord], policy: &ScoringPolicy) -> RunSummary {
    ensure_metrics_described();
    if teams.is_empty() {
        return RunSummary {
            sections: Vec::new(),
            global_mean_raw: 0.0,
            stats: compute_pool_stats(&[]),
        };
    }

    // 1) Sections and their leniency coefficients
    let mut sections = group_sections(teams);
    let global_mean_raw = assign_leniency(&mut sections, policy);
    gauge!(SECTIONS).set(sections.len() as f64);

    // 2) Raw/adjusted role averages and totals
    for section in sections.values() {
        for &idx in &section.members {
            compose_team(&mut teams[idx], section.leniency_coefficient, &policy.weights);
        }
    }

    // 3) z-scores, rank scores, places
    let stats = rank_teams(teams);
    counter!(TEAMS_RANKED_TOTAL).increment(teams.len() as u64);

    for t in teams.iter() {
        debug!(
            place = t.rank,
            team = %t.team_name,
            section = %t.section_name,
            leniency = format_args!("{:.3}", t.leniency),
            raw_tp = format_args!("{:.1}", t.raw_total),
            tp = format_args!("{:.1}", t.total),
            rp = format_args!("{:.2}", t.rank_score),
            "final ranking"
        );
    }

    RunSummary {
        sections: sections.values().map(SectionSummary::from).collect(),
        global_mean_raw,
        stats,
    }
}

/// Read every line from `reader`, then score and rank the teams found.
pub fn rank_lines<R: BufRead>(reader: R) -> Result<Ranking> {
    let mut teams = read_records(reader)?;
    Ok(process_with_policy(&mut teams, &ScoringPolicy::default()))
}
