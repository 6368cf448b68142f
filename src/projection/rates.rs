//! Annual to monthly rate conversion

/// Months per year used throughout the projection
pub const MONTHS_PER_YEAR: u32 = 12;

/// Convert an annual escalation rate to the equivalent monthly compounding rate
///
/// `(1 + r)^(1/12) - 1`, so that twelve monthly steps reproduce `r` exactly.
/// Returns 0 for a zero or non-finite rate, and for `r <= -1` where the root
/// is undefined.
pub fn annual_to_monthly_rate(annual_rate: f64) -> f64 {
    if !annual_rate.is_finite() || annual_rate == 0.0 || annual_rate <= -1.0 {
        return 0.0;
    }
    (1.0 + annual_rate).powf(1.0 / MONTHS_PER_YEAR as f64) - 1.0
}
