// src/lib.rs
//! LASS competition scoring.
//!
//! Pipeline, leaves first:
//! - `grades`:  grade token → numeric score
//! - `record`:  `section|name|team|name|nat|role:grades,...` lines → `TeamRecord`
//! - `trimmed`: outlier-resistant mean, optionally divided by a leniency coefficient
//! - `section`: per-section mean raw score → leniency coefficient
//! - `compose`: role classification and weighted totals
//! - `ranking`: z-scores, rank scores and places
//! - `engine`:  runs the stages over one input
//! - `output`:  JSON / text rendering

pub mod compose;
pub mod engine;
pub mod grades;
pub mod logging;
pub mod metrics;
pub mod output;
pub mod policy;
pub mod ranking;
pub mod record;
pub mod section;
pub mod trimmed;

// ---- Re-exports for stable public API ----
pub use crate::engine::{process_all_teams, process_with_policy, rank_lines, Ranking};
pub use crate::grades::{convert_grade, parse_grade_string};
pub use crate::output::{render_json, render_text, TeamResult};
pub use crate::policy::{LeniencyPolicy, ScoringPolicy, Weights};
pub use crate::record::{parse_team_line, read_records, GradeEntry, RecordError, TeamRecord};
pub use crate::section::SectionSummary;
pub use crate::trimmed::trimmed_average;
