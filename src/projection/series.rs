//! Escalating monthly series: cumulative sums and year-end snapshots

use serde::{Deserialize, Serialize};

use super::rates::{annual_to_monthly_rate, MONTHS_PER_YEAR};
use crate::input::clamp;

/// Upper bound for a monthly amount; keeps malformed input from producing runaway totals
pub const MAX_MONTHLY_BASE: f64 = 1e9;

/// Shortest projection horizon (years)
pub const MIN_YEARS: u32 = 1;

/// Longest projection horizon (years)
pub const MAX_YEARS: u32 = 30;

pub fn clamp_monthly_base(monthly_base: f64) -> f64 {
    clamp(monthly_base, 0.0, MAX_MONTHLY_BASE)
}

pub fn clamp_years(years: u32) -> u32 {
    years.clamp(MIN_YEARS, MAX_YEARS)
}

/// Cumulative sum of `horizon_years * 12` monthly terms `base * (1 + rm)^i`
///
/// Uses the closed geometric form; falls back to `base * months` at a zero rate.
pub fn sum_series(monthly_base: f64, annual_rate: f64, horizon_years: u32) -> f64 {
    let base = clamp_monthly_base(monthly_base);
    let months = clamp_years(horizon_years) * MONTHS_PER_YEAR;
    let rm = annual_to_monthly_rate(annual_rate);

    if rm == 0.0 {
        base * months as f64
    } else {
        base * ((1.0 + rm).powi(months as i32) - 1.0) / rm
    }
}

/// Monthly amount in the last month of `year`: `base * (1 + rm)^(year*12 - 1)`
pub fn month_at_end_of_year(monthly_base: f64, annual_rate: f64, year: u32) -> f64 {
    let base = clamp_monthly_base(monthly_base);
    let months = clamp_years(year) * MONTHS_PER_YEAR - 1;
    let rm = annual_to_monthly_rate(annual_rate);

    base * (1.0 + rm).powi(months as i32)
}

/// Month-by-month amounts, starting at the base (month 1)
pub fn monthly_amounts(monthly_base: f64, annual_rate: f64) -> impl Iterator<Item = f64> {
    let base = clamp_monthly_base(monthly_base);
    let growth = 1.0 + annual_to_monthly_rate(annual_rate);
    std::iter::successors(Some(base), move |m| Some(m * growth))
}

/// A monthly amount escalating at an annual rate over a horizon
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EscalatingSeries {
    /// Amount in month 1
    pub monthly_base: f64,

    /// Annual escalation rate (fraction)
    pub annual_rate: f64,

    /// Number of years summed by [`EscalatingSeries::total`]
    pub horizon_years: u32,
}

impl EscalatingSeries {
    /// Create a series; the base and horizon are clamped into range
    pub fn new(monthly_base: f64, annual_rate: f64, horizon_years: u32) -> Self {
        Self {
            monthly_base: clamp_monthly_base(monthly_base),
            annual_rate: if annual_rate.is_finite() { annual_rate } else { 0.0 },
            horizon_years: clamp_years(horizon_years),
        }
    }

    pub fn monthly_rate(&self) -> f64 {
        annual_to_monthly_rate(self.annual_rate)
    }

    /// Cumulative total over the full horizon
    pub fn total(&self) -> f64 {
        sum_series(self.monthly_base, self.annual_rate, self.horizon_years)
    }

    pub fn month_at_end_of_year(&self, year: u32) -> f64 {
        month_at_end_of_year(self.monthly_base, self.annual_rate, year)
    }

    /// Point-in-time figures at `year` (clamped to 1..=30)
    pub fn snapshot(&self, year: u32) -> YearSnapshot {
        let year = clamp_years(year);
        let monthly_amount = self.month_at_end_of_year(year);
        YearSnapshot {
            year,
            monthly_amount,
            annual_amount: monthly_amount * MONTHS_PER_YEAR as f64,
            cumulative_total: sum_series(self.monthly_base, self.annual_rate, year),
        }
    }
}

/// Derived figures for a series at a given year
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YearSnapshot {
    pub year: u32,

    /// Amount in the last month of the year
    pub monthly_amount: f64,

    /// `monthly_amount * 12`
    pub annual_amount: f64,

    /// Sum of all months from month 1 through the end of the year
    pub cumulative_total: f64,
}
