//! # Output
//! Result rows and their renderings (JSON array or plain-text leaderboard).
//!
//! JSON field names are the ones the leaderboard front end reads, so they are
//! kept verbatim (`tp`, `rp`, `z_score`, `rawTP`, ...).

use crate::grades::MAX_GRADE_VALUE;
use crate::record::TeamRecord;
use anyhow::{Context, Result};
use serde::Serialize;
use std::fmt::Write as _;

/// One grade entry as shown in audit views.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GradeView {
    pub task: String,
    pub grade: String,
    pub max: f64,
}

/// One ranked team, ready for serialization.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamResult {
    pub place: u32,
    #[serde(rename = "teamId")]
    pub team_id: String,
    #[serde(rename = "teamName")]
    pub team_name: String,
    pub nationality: String,
    #[serde(rename = "sectionId")]
    pub section_id: String,
    #[serde(rename = "sectionName")]
    pub section_name: String,
    pub tp: f64,
    pub rp: f64,
    /// Same value as `rp`; older clients read this name.
    pub score: f64,
    pub z_score: f64,
    pub leniency: f64,
    #[serde(rename = "rawTP")]
    pub raw_tp: f64,
    pub tasks: Vec<String>,
    pub sci_raw: f64,
    pub rep_raw: f64,
    pub opp_raw: f64,
    pub rev_raw: f64,
    pub sci: f64,
    pub rep: f64,
    pub opp: f64,
    pub rev: f64,
    pub grades: Vec<GradeView>,
}

impl From<&TeamRecord> for TeamResult {
    fn from(t: &TeamRecord) -> Self {
        Self {
            place: t.rank,
            team_id: t.team_id.clone(),
            team_name: t.team_name.clone(),
            nationality: t.nationality.clone(),
            section_id: t.section_id.clone(),
            section_name: t.section_name.clone(),
            tp: t.total,
            rp: t.rank_score,
            score: t.rank_score,
            z_score: round_to(t.z_score, 3),
            leniency: t.leniency,
            raw_tp: t.raw_total,
            tasks: t.tasks(),
            sci_raw: t.raw.sci,
            rep_raw: t.raw.rep,
            opp_raw: t.raw.opp,
            rev_raw: t.raw.rev,
            sci: t.adjusted.sci,
            rep: t.adjusted.rep,
            opp: t.adjusted.opp,
            rev: t.adjusted.rev,
            grades: t
                .grades
                .iter()
                .map(|g| GradeView {
                    task: g.role.clone(),
                    grade: g.raw_text.clone(),
                    max: MAX_GRADE_VALUE,
                })
                .collect(),
        }
    }
}

fn round_to(x: f64, decimals: i32) -> f64 {
    let f = 10f64.powi(decimals);
    let r = (x * f).round() / f;
    // avoid "-0.0" in output
    if r == 0.0 {
        0.0
    } else {
        r
    }
}

/// Render rows as a JSON array (empty population → `[]`).
pub fn render_json(rows: &[TeamResult], pretty: bool) -> Result<String> {
    let s = if pretty {
        serde_json::to_string_pretty(rows)
    } else {
        serde_json::to_string(rows)
    };
    s.context("serializing ranking to JSON")
}

/// Human-friendly name of a task badge.
pub fn task_display_name(task: &str) -> &str {
    match task {
        "reporter_sci" => "Reporter (Sci)",
        "reporter_pres" => "Reporter (Pres)",
        "opponent" => "Opponent",
        "reviewer" => "Reviewer",
        other => other,
    }
}

/// Plain-text leaderboard table; podium places carry a `*`.
pub fn render_text(rows: &[TeamResult]) -> String {
    if rows.is_empty() {
        return "No teams yet.\n".to_string();
    }

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<6} {:<28} {:<6} {:<16} {:>9} {:>8}  Tasks",
        "Place", "Team", "Nat", "Section", "TP", "RP"
    );
    for r in rows {
        let marker = if r.place <= 3 { "*" } else { " " };
        let tasks = if r.tasks.is_empty() {
            "-".to_string()
        } else {
            r.tasks
                .iter()
                .map(|t| task_display_name(t))
                .collect::<Vec<_>>()
                .join(", ")
        };
        let _ = writeln!(
            out,
            "{:<6} {:<28} {:<6} {:<16} {:>9.2} {:>8.2}  {}",
            format!("{}{}", r.place, marker),
            r.team_name,
            r.nationality,
            r.section_name,
            r.tp,
            r.rp,
            tasks
        );
    }
    out
}
