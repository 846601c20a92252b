//! # Team Records
//! Line format, parsed team records and the line reader.
//!
//! One line = one team:
//! `sectionId|sectionName|teamId|teamName|nationality|role:g g g,role:g g`
//!
//! Parsing never fails on bad grades: bad tokens are dropped, pairs without
//! `:` are skipped. The only rejected input is a line without any `|`.

use crate::grades::{dropped_tokens, parse_grade_string};
use crate::metrics::{ensure_metrics_described, LINES_SKIPPED_TOTAL, LINES_TOTAL, SCORES_DROPPED_TOTAL};
use anyhow::{Context, Result};
use metrics::counter;
use serde::Serialize;
use std::io::BufRead;
use thiserror::Error;
use tracing::debug;

/// Section id used when a record leaves the field empty.
pub const DEFAULT_SECTION_ID: &str = "default";

/// Why a line is not a team record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("line is empty")]
    Empty,
    #[error("line has no '|' delimiter")]
    NotARecord,
}

/// Grades one role received, as typed and as scores.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GradeEntry {
    pub role: String,
    pub raw_text: String,
    /// Positive scores in input order.
    pub scores: Vec<f64>,
}

/// Per-role trimmed averages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct RoleAverages {
    pub sci: f64,
    pub rep: f64,
    pub opp: f64,
    pub rev: f64,
}

/// One team, from parse through ranking.
///
/// Identity fields are set by the parser; the rest is filled in by the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct TeamRecord {
    pub team_id: String,
    pub team_name: String,
    pub nationality: String,
    pub section_id: String,
    pub section_name: String,
    pub grades: Vec<GradeEntry>,

    pub raw: RoleAverages,
    pub adjusted: RoleAverages,
    pub raw_total: f64,
    pub total: f64,
    pub rank_score: f64,
    pub z_score: f64,
    pub leniency: f64,
    /// 1-based place; 0 until ranked.
    pub rank: u32,
}

impl TeamRecord {
    /// Fresh record with no derived values yet.
    pub fn new(
        section_id: impl Into<String>,
        section_name: impl Into<String>,
        team_id: impl Into<String>,
        team_name: impl Into<String>,
        nationality: impl Into<String>,
    ) -> Self {
        let mut section_id = section_id.into();
        if section_id.is_empty() {
            section_id = DEFAULT_SECTION_ID.to_string();
        }
        let mut section_name = section_name.into();
        if section_name.is_empty() {
            section_name = section_id.clone();
        }
        Self {
            team_id: team_id.into(),
            team_name: team_name.into(),
            nationality: nationality.into(),
            section_id,
            section_name,
            grades: Vec::new(),
            raw: RoleAverages::default(),
            adjusted: RoleAverages::default(),
            raw_total: 0.0,
            total: 0.0,
            rank_score: 0.0,
            z_score: 0.0,
            leniency: 1.0,
            rank: 0,
        }
    }

    /// Builder style: attach one role's grades.
    pub fn with_grades(mut self, role: &str, raw_text: &str) -> Self {
        self.grades.push(GradeEntry {
            role: role.to_string(),
            raw_text: raw_text.to_string(),
            scores: parse_grade_string(raw_text),
        });
        self
    }

    /// Role names in input order, as shown in the `tasks` column.
    pub fn tasks(&self) -> Vec<String> {
        self.grades.iter().map(|g| g.role.clone()).collect()
    }

    /// Every juror score of every role.
    pub fn all_scores(&self) -> impl Iterator<Item = f64> + '_ {
        self.grades.iter().flat_map(|g| g.scores.iter().copied())
    }
}

/// Parse one input line into a team record.
pub fn parse_team_line(line: &str) -> Result<TeamRecord, RecordError> {
    let line = line.strip_suffix('\r').unwrap_or(line);
    if line.is_empty() {
        return Err(RecordError::Empty);
    }
    if !line.contains('|') {
        return Err(RecordError::NotARecord);
    }

    let mut fields = line.splitn(6, '|');
    let mut next = || fields.next().unwrap_or_default();
    let (section_id, section_name, team_id, team_name, nationality) =
        (next(), next(), next(), next(), next());
    let grades_field = next();

    let mut team = TeamRecord::new(section_id, section_name, team_id, team_name, nationality);
    team.grades = parse_grades_field(grades_field);
    Ok(team)
}

/// `role:grades,role:grades` → entries. Pairs without ':' are skipped.
fn parse_grades_field(field: &str) -> Vec<GradeEntry> {
    let mut out = Vec::new();
    for pair in field.split(',') {
        if pair.is_empty() {
            continue;
        }
        let Some((role, raw)) = pair.split_once(':') else {
            debug!(pair, "skipping grade pair without ':'");
            continue;
        };
        let raw_text = raw.trim();
        let scores = parse_grade_string(raw_text);
        let dropped = dropped_tokens(raw_text, scores.len());
        if dropped > 0 {
            counter!(SCORES_DROPPED_TOTAL).increment(dropped as u64);
        }
        out.push(GradeEntry {
            role: role.trim().to_string(),
            raw_text: raw_text.to_string(),
            scores,
        });
    }
    out
}

/// Read the whole input and keep the lines that are team records, in order.
///
/// Bytes that are not valid UTF-8 become U+FFFD; only I/O failures are errors.
pub fn read_records<R: BufRead>(mut reader: R) -> Result<Vec<TeamRecord>> {
    ensure_metrics_described();
    let mut teams = Vec::new();
    let mut buf = Vec::new();
    let mut line_no = 0usize;
    loop {
        buf.clear();
        let n = reader
            .read_until(b'\n', &mut buf)
            .with_context(|| format!("reading input line {}", line_no + 1))?;
        if n == 0 {
            break;
        }
        line_no += 1;
        if buf.last() == Some(&b'\n') {
            buf.pop();
        }
        let line = String::from_utf8_lossy(&buf);
        counter!(LINES_TOTAL).increment(1);
        match parse_team_line(&line) {
            Ok(team) => teams.push(team),
            Err(RecordError::Empty) => {}
            Err(e) => {
                counter!(LINES_SKIPPED_TOTAL).increment(1);
                debug!(line_no, reason = %e, "skipping line");
            }
        }
    }
    Ok(teams)
}
