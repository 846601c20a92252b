//! Metric names used by the scoring pipeline.
//!
//! The crate only emits through the `metrics` facade; whoever embeds it decides
//! whether a recorder is installed. Without one every call is a no-op.

use metrics::{describe_counter, describe_gauge};
use once_cell::sync::OnceCell;

pub const LINES_TOTAL: &str = "lass_lines_total";
pub const LINES_SKIPPED_TOTAL: &str = "lass_lines_skipped_total";
pub const SCORES_DROPPED_TOTAL: &str = "lass_scores_dropped_total";
pub const TEAMS_RANKED_TOTAL: &str = "lass_teams_ranked_total";
pub const SECTIONS: &str = "lass_sections";

/// One-time metrics registration (so series carry descriptions).
pub fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(LINES_TOTAL, "Input lines read, including skipped ones.");
        describe_counter!(
            LINES_SKIPPED_TOTAL,
            "Lines ignored because they carry no '|' delimiter."
        );
        describe_counter!(
            SCORES_DROPPED_TOTAL,
            "Grade tokens dropped as unparsable or non-positive."
        );
        describe_counter!(TEAMS_RANKED_TOTAL, "Teams that received a place.");
        describe_gauge!(SECTIONS, "Sections seen in the last ranking run.");
    });
}
