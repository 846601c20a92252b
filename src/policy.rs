//! # Scoring Policy
//! Fixed LASS constants: role weights, leniency bounds and the leniency variant.
//!
//! These values decide competition outcomes, so they are compiled in rather than
//! loaded from a file. `ScoringPolicy::default()` is the deployed policy; the
//! other variants exist for audits and tests.

/// Weight of the presentation grade inside the scientist block.
pub const PRESENTER_WEIGHT: f64 = 0.35;
/// Multiplier of the (scientist + weighted presenter) block.
pub const SCI_WEIGHT: f64 = 2.0;
pub const OPP_WEIGHT: f64 = 2.0;
pub const REV_WEIGHT: f64 = 1.0;

/// Lower clamp for the section leniency coefficient.
pub const LENIENCY_MIN: f64 = 0.6;
/// Upper clamp for the section leniency coefficient.
pub const LENIENCY_MAX: f64 = 1.5;

/// Damping factor used by `LeniencyPolicy::damped()`.
pub const DEFAULT_DAMPING: f64 = 0.5;

/// Global mean used when no juror score exists anywhere (grade "4").
pub const FALLBACK_GLOBAL_MEAN: f64 = 27.0;

/// Lower bound for the population standard deviation of totals.
pub const MIN_GLOBAL_STD: f64 = 1.0;

/// Rank scores closer than this share a place.
pub const TIE_EPSILON: f64 = 0.01;

/// Rank score mapping: `RP_CENTER + z * RP_SCALE`.
pub const RP_CENTER: f64 = 50.0;
pub const RP_SCALE: f64 = 10.0;

/// Role weights of the total performance formula.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Weights {
    pub presenter: f64,
    pub sci: f64,
    pub opp: f64,
    pub rev: f64,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            presenter: PRESENTER_WEIGHT,
            sci: SCI_WEIGHT,
            opp: OPP_WEIGHT,
            rev: REV_WEIGHT,
        }
    }
}

/// How a section's raw mean ratio becomes its leniency coefficient.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LeniencyPolicy {
    /// `coefficient = ratio`
    Undamped,
    /// `coefficient = 1 + (ratio - 1) * factor`, factor in [0, 1].
    Damped { factor: f64 },
}

impl LeniencyPolicy {
    pub fn damped() -> Self {
        LeniencyPolicy::Damped {
            factor: DEFAULT_DAMPING,
        }
    }

    /// Coefficient before clamping.
    pub fn apply(&self, ratio: f64) -> f64 {
        match *self {
            LeniencyPolicy::Undamped => ratio,
            LeniencyPolicy::Damped { factor } => 1.0 + (ratio - 1.0) * factor.clamp(0.0, 1.0),
        }
    }
}

/// Complete policy consumed by the engine.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScoringPolicy {
    pub weights: Weights,
    pub leniency: LeniencyPolicy,
    pub leniency_min: f64,
    pub leniency_max: f64,
}

impl Default for ScoringPolicy {
    /// Deployed policy: undamped leniency clamped to [0.6, 1.5], SCI weight 2.0.
    fn default() -> Self {
        Self {
            weights: Weights::default(),
            leniency: LeniencyPolicy::Undamped,
            leniency_min: LENIENCY_MIN,
            leniency_max: LENIENCY_MAX,
        }
    }
}

impl ScoringPolicy {
    /// Clamp a coefficient into the policy bounds. NaN maps to the upper bound.
    pub fn clamp_leniency(&self, coefficient: f64) -> f64 {
        if coefficient.is_nan() {
            return self.leniency_max;
        }
        coefficient.clamp(self.leniency_min, self.leniency_max)
    }
}
