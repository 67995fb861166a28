//! # Satisfying Rounding Module
//!
//! Rounds numbers to "aesthetically pleasing" values within a relative tolerance.
//!
//! Candidates are the multiples of `factor * 10^power` for the factors
//! `[1.0, 0.5, 0.25, 0.1, 0.05]`, where `power` is the magnitude of the input.
//! Every candidate that lands inside `[x * (1 - tol), x * (1 + tol)]` is kept,
//! across all factors, and the one closest to `x` wins. Evaluating only the first
//! factor with a hit gives 3 for 3.11 instead of 3.1.
//!
//! Examples: 1.23 → 1.25, 3.11 → 3.1, 998 → 1000, 2/3 → 0.67

use crate::errors::{AnnotateError, AnnotateResult};
use crate::numeric_literal::round_to_places;
use tracing::trace;

/// Scale factors in preference order
const FACTORS: [f64; 5] = [1.0, 0.5, 0.25, 0.1, 0.05];

/// Round `x` to the closest "nice" value within `tolerance`
///
/// Ties keep the candidate found first. If no candidate exists, `x` is rounded
/// to the precision implied by the tolerance (`-floor(log10(tolerance))`
/// decimal places).
///
/// # Errors
///
/// `InvalidArgument` when `x` is negative or not a number, or `tolerance` is not
/// strictly between 0 and 1.
///
/// # Examples
///
/// ```rust
/// use recipe_annotate::rounding::round_satisfying;
///
/// assert_eq!(round_satisfying(3.11, 0.05).unwrap(), 3.1);
/// assert_eq!(round_satisfying(998.0, 0.05).unwrap(), 1000.0);
/// assert!(round_satisfying(-1.0, 0.05).is_err());
/// ```
pub fn round_satisfying(x: f64, tolerance: f64) -> AnnotateResult<f64> {
    if x.is_nan() || x < 0.0 {
        return Err(AnnotateError::InvalidArgument(format!(
            "x must be >= 0.0, got {x}"
        )));
    }
    if !(tolerance > 0.0 && tolerance < 1.0) {
        return Err(AnnotateError::InvalidArgument(format!(
            "tolerance must be between 0.0 and 1.0 (exclusive), got {tolerance}"
        )));
    }
    if x == 0.0 {
        return Ok(0.0);
    }
    if x.is_infinite() {
        return Err(AnnotateError::InvalidArgument("x must be finite".to_string()));
    }

    let precision = (-tolerance.log10().floor()) as u32;
    let lower = x * (1.0 - tolerance);
    let upper = x * (1.0 + tolerance);
    if !upper.is_finite() {
        return Err(AnnotateError::InvalidArgument(format!(
            "x is too large to round, got {x}"
        )));
    }
    let power = x.log10().floor() as i32;

    let mut candidates: Vec<f64> = Vec::new();
    for factor in FACTORS {
        let step = factor * 10f64.powi(power);
        let (start, end) = ((lower / step).floor(), (upper / step).ceil());
        if !(start.is_finite() && end.is_finite()) {
            continue;
        }

        for i in (start as i64)..=(end as i64) {
            let candidate = round_to_places(i as f64 * step, precision);
            if lower <= candidate && candidate <= upper && !candidates.contains(&candidate) {
                candidates.push(candidate);
            }
        }
    }

    let mut best: Option<f64> = None;
    for candidate in candidates {
        match best {
            Some(current) if (candidate - x).abs() >= (current - x).abs() => {}
            _ => best = Some(candidate),
        }
    }

    let result = best.unwrap_or_else(|| round_to_places(x, precision));
    trace!("round_satisfying({}, {}) = {}", x, tolerance, result);
    Ok(result)
}

/// Round a signed value by its magnitude, keeping the sign
///
/// Used for temperatures, which go below zero after conversion.
pub fn round_satisfying_signed(x: f64, tolerance: f64) -> AnnotateResult<f64> {
    let rounded = round_satisfying(x.abs(), tolerance)?;
    Ok(if x < 0.0 { -rounded } else { rounded })
}
