//! # Section Aggregator
//! Groups teams by section and derives each section's leniency coefficient.
//!
//! A section whose juries grade above the population average gets a
//! coefficient > 1. The averager divides by it, so that section's adjusted
//! scores shrink; harsh sections get < 1 and are boosted.

use crate::policy::{ScoringPolicy, FALLBACK_GLOBAL_MEAN};
use crate::record::TeamRecord;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::info;

/// One section of one run. Members are indices into the team list.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub section_id: String,
    pub section_name: String,
    pub members: Vec<usize>,
    /// Every juror score of every member, untrimmed.
    pub scores: Vec<f64>,
    pub mean_raw_score: f64,
    pub leniency_coefficient: f64,
}

/// Diagnostic view of a section after aggregation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionSummary {
    pub section_id: String,
    pub section_name: String,
    pub teams: usize,
    pub mean_raw_score: f64,
    pub leniency: f64,
}

impl From<&Section> for SectionSummary {
    fn from(s: &Section) -> Self {
        Self {
            section_id: s.section_id.clone(),
            section_name: s.section_name.clone(),
            teams: s.members.len(),
            mean_raw_score: s.mean_raw_score,
            leniency: s.leniency_coefficient,
        }
    }
}

/// Sections keyed by id, iterated in id order.
pub type Sections = BTreeMap<String, Section>;

/// Group teams by section id. The first member seen names the section.
pub fn group_sections(teams: &[TeamRecord]) -> Sections {
    let mut sections = Sections::new();
    for (idx, team) in teams.iter().enumerate() {
        let section = sections
            .entry(team.section_id.clone())
            .or_insert_with(|| Section {
                section_id: team.section_id.clone(),
                section_name: team.section_name.clone(),
                members: Vec::new(),
                scores: Vec::new(),
                mean_raw_score: 0.0,
                leniency_coefficient: 1.0,
            });
        section.members.push(idx);
        section.scores.extend(team.all_scores());
    }
    for section in sections.values_mut() {
        section.mean_raw_score = mean(&section.scores).unwrap_or(0.0);
    }
    sections
}

/// Mean over every juror score in every section, or the fallback when there are none.
pub fn global_mean(sections: &Sections) -> f64 {
    let (sum, count) = sections
        .values()
        .flat_map(|s| s.scores.iter())
        .fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));
    if count == 0 {
        FALLBACK_GLOBAL_MEAN
    } else {
        sum / count as f64
    }
}

/// Coefficient for a section mean against the global mean, clamped to policy bounds.
///
/// Missing, non-positive or non-finite inputs give the neutral 1.0.
pub fn leniency_coefficient(mean_raw: f64, global_mean: f64, policy: &ScoringPolicy) -> f64 {
    let ratio = mean_raw / global_mean;
    let coefficient = if global_mean > 0.0 && mean_raw > 0.0 && ratio.is_finite() {
        policy.leniency.apply(ratio)
    } else {
        1.0
    };
    policy.clamp_leniency(coefficient)
}

/// Fill in every section's coefficient and return the global mean used.
pub fn assign_leniency(sections: &mut Sections, policy: &ScoringPolicy) -> f64 {
    let global = global_mean(sections);
    info!(target: "lass::leniency", global_mean = global, "global mean raw score");

    for section in sections.values_mut() {
        section.leniency_coefficient = leniency_coefficient(section.mean_raw_score, global, policy);
        info!(
            target: "lass::leniency",
            section = %section.section_name,
            mean = format_args!("{:.2}", section.mean_raw_score),
            ratio = format_args!("{:.3}", section.mean_raw_score / global),
            leniency = format_args!("{:.3}", section.leniency_coefficient),
            "section leniency"
        );
    }
    global
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::{LeniencyPolicy, LENIENCY_MAX, LENIENCY_MIN};

    fn team(section: &str, grades: &str) -> TeamRecord {
        TeamRecord::new(section, "", "t", "n", "x").with_grades("opponent", grades)
    }

    #[test]
    fn groups_by_id_with_members_in_input_order() {
        let teams = vec![team("B", "4"), team("A", "5"), team("B", "3")];
        let s = group_sections(&teams);
        assert_eq!(s.keys().cloned().collect::<Vec<_>>(), vec!["A", "B"]);
        assert_eq!(s["B"].members, vec![0, 2]);
        assert_eq!(s["A"].members, vec![1]);
        assert!((s["B"].mean_raw_score - 18.0).abs() < 1e-9);
    }

    #[test]
    fn global_mean_weights_every_score_equally() {
        let teams = vec![team("A", "5 5 5"), team("B", "3")];
        let s = group_sections(&teams);
        assert!((global_mean(&s) - (51.0 * 3.0 + 9.0) / 4.0).abs() < 1e-9);
    }

    #[test]
    fn global_mean_fallback_without_scores() {
        let teams = vec![team("A", "x y"), team("B", "")];
        let s = group_sections(&teams);
        assert_eq!(global_mean(&s), FALLBACK_GLOBAL_MEAN);
        assert_eq!(s["A"].mean_raw_score, 0.0);
    }

    #[test]
    fn coefficient_is_one_for_missing_means() {
        let p = ScoringPolicy::default();
        assert_eq!(leniency_coefficient(0.0, 27.0, &p), 1.0);
        assert_eq!(leniency_coefficient(30.0, 0.0, &p), 1.0);
        assert_eq!(leniency_coefficient(-4.0, 27.0, &p), 1.0);
    }

    #[test]
    fn coefficient_always_within_bounds() {
        for policy in [
            ScoringPolicy::default(),
            ScoringPolicy {
                leniency: LeniencyPolicy::damped(),
                ..ScoringPolicy::default()
            },
        ] {
            for mean_raw in [0.001, 1.0, 5.0, 27.0, 60.0, 1e6] {
                let c = leniency_coefficient(mean_raw, 27.0, &policy);
                assert!((LENIENCY_MIN..=LENIENCY_MAX).contains(&c), "{c} out of bounds");
            }
        }
    }

    #[test]
    fn non_finite_means_stay_in_bounds() {
        let damped = ScoringPolicy {
            leniency: LeniencyPolicy::damped(),
            ..ScoringPolicy::default()
        };
        for policy in [ScoringPolicy::default(), damped] {
            for (mean_raw, global) in [
                (f64::INFINITY, f64::INFINITY),
                (f64::INFINITY, 27.0),
                (27.0, f64::INFINITY),
                (f64::NAN, 27.0),
                (27.0, f64::NAN),
                (f64::MAX, f64::MIN_POSITIVE),
            ] {
                let c = leniency_coefficient(mean_raw, global, &policy);
                assert!((LENIENCY_MIN..=LENIENCY_MAX).contains(&c), "{mean_raw}/{global} gave {c}");
            }
        }
        assert_eq!(leniency_coefficient(f64::INFINITY, f64::INFINITY, &ScoringPolicy::default()), 1.0);
    }

    #[test]
    fn huge_numeric_grades_do_not_poison_sections() {
        let teams = vec![team("A", "1e308 1e308"), team("B", "4")];
        let mut s = group_sections(&teams);
        let global = assign_leniency(&mut s, &ScoringPolicy::default());
        assert!(global.is_finite());
        for section in s.values() {
            assert!(section.mean_raw_score.is_finite());
            assert!((LENIENCY_MIN..=LENIENCY_MAX).contains(&section.leniency_coefficient));
        }
    }

    #[test]
    fn damped_and_undamped_differ() {
        let undamped = ScoringPolicy::default();
        let damped = ScoringPolicy {
            leniency: LeniencyPolicy::damped(),
            ..ScoringPolicy::default()
        };
        assert!((leniency_coefficient(34.0, 27.0, &undamped) - 34.0 / 27.0).abs() < 1e-12);
        assert!(
            (leniency_coefficient(34.0, 27.0, &damped) - (1.0 + (34.0 / 27.0 - 1.0) * 0.5)).abs()
                < 1e-12
        );
    }

    #[test]
    fn single_section_is_neutral() {
        let teams = vec![team("A", "4 5"), team("A", "3")];
        let mut s = group_sections(&teams);
        assign_leniency(&mut s, &ScoringPolicy::default());
        assert!((s["A"].leniency_coefficient - 1.0).abs() < 1e-12);
    }

    #[test]
    fn summary_reflects_section() {
        let teams = vec![team("A", "4")];
        let mut s = group_sections(&teams);
        assign_leniency(&mut s, &ScoringPolicy::default());
        let summary = SectionSummary::from(&s["A"]);
        assert_eq!(summary.section_name, "A");
        assert_eq!(summary.teams, 1);
        assert!((summary.mean_raw_score - 27.0).abs() < 1e-9);
    }
}
