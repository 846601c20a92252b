//! Outlier-resistant mean of juror scores.

/// Trimmed average divided by `leniency`.
///
/// With three or more scores one lowest and one highest value are dropped
/// (single occurrences, not every tie). Empty input yields 0.0.
pub fn trimmed_average(scores: &[f64], leniency: f64) -> f64 {
    if scores.is_empty() {
        return 0.0;
    }
    let mut sorted = scores.to_vec();
    sorted.sort_by(f64::total_cmp);

    let kept = if sorted.len() >= 3 {
        &sorted[1..sorted.len() - 1]
    } else {
        &sorted[..]
    };

    let avg = kept.iter().sum::<f64>() / kept.len() as f64;
    avg / leniency
}

/// Raw and leniency-adjusted trimmed averages in one call.
pub fn raw_and_adjusted(scores: &[f64], leniency: f64) -> (f64, f64) {
    (trimmed_average(scores, 1.0), trimmed_average(scores, leniency))
}
