//! Derived daily change metric.

/// Computes the intraday change from open to close, in percent, rounded to
/// two decimal places.
///
/// Returns `0.0` when `open` is zero. Validation rejects non-positive opens,
/// so the pipeline never reaches that branch.
///
/// ```
/// use dailybars_types::compute_daily_change;
///
/// assert_eq!(compute_daily_change(100.0, 110.0), 10.0);
/// assert_eq!(compute_daily_change(50.0, 45.0), -10.0);
/// ```
#[must_use]
pub fn compute_daily_change(open: f64, close: f64) -> f64 {
    if open == 0.0 {
        return 0.0;
    }
    round_to_cents((close - open) / open * 100.0)
}

/// Rounds half away from zero to two decimal places.
fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
