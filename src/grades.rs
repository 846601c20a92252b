//! Grade conversion: jury grade tokens ("4+", "5-", ...) to numeric scores.

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Highest value in the grade table ("5+").
pub const MAX_GRADE_VALUE: f64 = 60.0;

/// Numeric tokens above this are treated as unparsable. Keeps every sum,
/// mean and deviation downstream finite.
pub const MAX_NUMERIC_GRADE: f64 = 1.0e9;

static GRADE_MAP: Lazy<HashMap<&'static str, f64>> = Lazy::new(|| {
    HashMap::from([
        ("2", 2.0),
        ("3-", 5.0),
        ("3", 9.0),
        ("3+", 14.0),
        ("4-", 20.0),
        ("4", 27.0),
        ("4+", 34.0),
        ("5-", 42.0),
        ("5", 51.0),
        ("5+", 60.0),
    ])
});

/// Convert one grade token to its score.
///
/// Named grades come from the table; anything else is read as the longest
/// decimal number at the start of the token ("27pts" is 27). Tokens without a
/// leading number, or whose magnitude exceeds `MAX_NUMERIC_GRADE`, yield 0.0,
/// which callers treat as "no grade".
pub fn convert_grade(token: &str) -> f64 {
    if let Some(&v) = GRADE_MAP.get(token) {
        return v;
    }
    match leading_number(token) {
        Some(v) if v.is_finite() && v.abs() <= MAX_NUMERIC_GRADE => v,
        _ => 0.0,
    }
}

/// Parse the longest `[+-]digits[.digits][e[+-]digits]` prefix of `token`.
fn leading_number(token: &str) -> Option<f64> {
    let bytes = token.as_bytes();
    let digits_from = |mut i: usize| {
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        i
    };

    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }
    let int_end = digits_from(end);
    let mut mantissa_digits = int_end - end;
    end = int_end;
    if bytes.get(end) == Some(&b'.') {
        let frac_end = digits_from(end + 1);
        mantissa_digits += frac_end - end - 1;
        end = frac_end;
    }
    if mantissa_digits == 0 {
        return None;
    }
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let exp_end = digits_from(exp);
        if exp_end > exp {
            end = exp_end;
        }
    }
    token[..end].parse::<f64>().ok()
}

/// Split a whitespace separated grade list and keep the positive scores, in order.
pub fn parse_grade_string(grades: &str) -> Vec<f64> {
    grades
        .split_whitespace()
        .map(convert_grade)
        .filter(|&v| v > 0.0)
        .collect()
}

/// Number of tokens in `grades` that did not produce a usable score.
pub(crate) fn dropped_tokens(grades: &str, kept: usize) -> usize {
    grades.split_whitespace().count().saturating_sub(kept)
}
