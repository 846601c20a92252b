//! # Score Composer
//! Maps grade entries onto the four LASS roles and builds the team totals.
//!
//! Role table (case-sensitive, exact match):
//!
//! | role      | primary         | synonym |
//! |-----------|-----------------|---------|
//! | scientist | `reporter_sci`  | `sci`   |
//! | presenter | `reporter_pres` | `pres`  |
//! | opponent  | `opponent`      | `opp`   |
//! | reviewer  | `reviewer`      | `rev`   |
//!
//! total = SCI * (sci + pres * PRESENTER) + OPP * opp + REV * rev

use crate::policy::Weights;
use crate::record::{GradeEntry, RoleAverages, TeamRecord};
use crate::trimmed::trimmed_average;

/// Canonical LASS roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Scientist,
    Presenter,
    Opponent,
    Reviewer,
}

const ROLE_TABLE: [(Role, &str, &[&str]); 4] = [
    (Role::Scientist, "reporter_sci", &["sci"]),
    (Role::Presenter, "reporter_pres", &["pres"]),
    (Role::Opponent, "opponent", &["opp"]),
    (Role::Reviewer, "reviewer", &["rev"]),
];

impl Role {
    /// Classify a role name; `None` for names outside the table.
    pub fn from_name(name: &str) -> Option<Role> {
        ROLE_TABLE
            .iter()
            .find(|(_, primary, synonyms)| *primary == name || synonyms.contains(&name))
            .map(|(role, _, _)| *role)
    }
}

/// Score lists per role. A role without an entry stays empty.
#[derive(Debug, Clone, Copy, Default)]
pub struct RoleScores<'a> {
    pub sci: &'a [f64],
    pub rep: &'a [f64],
    pub opp: &'a [f64],
    pub rev: &'a [f64],
}

impl<'a> RoleScores<'a> {
    /// Classify entries; when a role appears twice the later entry wins.
    pub fn classify(grades: &'a [GradeEntry]) -> Self {
        let mut out = RoleScores::default();
        for g in grades {
            match Role::from_name(&g.role) {
                Some(Role::Scientist) => out.sci = g.scores.as_slice(),
                Some(Role::Presenter) => out.rep = g.scores.as_slice(),
                Some(Role::Opponent) => out.opp = g.scores.as_slice(),
                Some(Role::Reviewer) => out.rev = g.scores.as_slice(),
                None => {}
            }
        }
        out
    }

    /// Trimmed averages of every role divided by `leniency`.
    pub fn averages(&self, leniency: f64) -> RoleAverages {
        RoleAverages {
            sci: trimmed_average(self.sci, leniency),
            rep: trimmed_average(self.rep, leniency),
            opp: trimmed_average(self.opp, leniency),
            rev: trimmed_average(self.rev, leniency),
        }
    }
}

/// Weighted total of one set of role averages.
pub fn total_performance(avg: &RoleAverages, w: &Weights) -> f64 {
    w.sci * (avg.sci + avg.rep * w.presenter) + w.opp * avg.opp + w.rev * avg.rev
}

/// Fill a team's averages and totals for its section coefficient.
pub fn compose_team(team: &mut TeamRecord, leniency: f64, w: &Weights) {
    let (raw, adjusted) = {
        let scores = RoleScores::classify(&team.grades);
        (scores.averages(1.0), scores.averages(leniency))
    };
    team.leniency = leniency;
    team.raw = raw;
    team.adjusted = adjusted;
    team.raw_total = total_performance(&raw, w);
    team.total = total_performance(&adjusted, w);
}
