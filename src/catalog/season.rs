//! Season buckets and the energy rates used for arbitrage estimates

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::CatalogEntry;

/// Energy value assumptions for one season bucket ($/kWh)
///
/// `peak_value_per_kwh` drives the simple delta model; `on_peak_rate` and
/// `off_peak_rate` drive the two-rate model. The built-in figures are rough
/// estimates, not tariff quotes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonRate {
    /// Selector key, e.g. "SUMMER"
    pub key: String,

    /// Display label
    pub label: String,

    /// Value of moving one kWh into the peak window
    pub peak_value_per_kwh: f64,

    /// Price of energy discharged during the on-peak window
    pub on_peak_rate: f64,

    /// Price of energy charged during the super-off-peak window
    pub off_peak_rate: f64,
}

impl SeasonRate {
    pub fn defaults() -> Vec<Self> {
        vec![
            Self::new("SUMMER", "Summer (May-Oct)", 0.18, 0.225, 0.045),
            Self::new("SUMMER_PEAK", "Summer peak (Jul-Aug)", 0.24, 0.29, 0.05),
            Self::new("WINTER", "Winter (Nov-Apr)", 0.12, 0.16, 0.04),
        ]
    }

    fn new(key: &str, label: &str, peak_value: f64, on_peak: f64, off_peak: f64) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            peak_value_per_kwh: peak_value,
            on_peak_rate: on_peak,
            off_peak_rate: off_peak,
        }
    }

    /// On-peak minus off-peak
    pub fn spread(&self) -> f64 {
        self.on_peak_rate - self.off_peak_rate
    }
}

impl CatalogEntry for SeasonRate {
    const KIND: &'static str = "season";

    fn key(&self) -> &str {
        &self.key
    }

    fn validate(&self) -> Result<(), String> {
        let fields = [
            ("peak_value_per_kwh", self.peak_value_per_kwh),
            ("on_peak_rate", self.on_peak_rate),
            ("off_peak_rate", self.off_peak_rate),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(format!("{} must be a non-negative number, got {}", name, value));
            }
        }
        Ok(())
    }
}

/// Default season key for a calendar month (1-12)
pub fn season_for_month(month: u32) -> &'static str {
    match month {
        7 | 8 => "SUMMER_PEAK",
        5..=10 => "SUMMER",
        _ => "WINTER",
    }
}

/// Default season key for a date
pub fn season_for_date(date: NaiveDate) -> &'static str {
    season_for_month(date.month())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_spreads_match_peak_values() {
        for season in SeasonRate::defaults() {
            approx::assert_abs_diff_eq!(season.spread(), season.peak_value_per_kwh, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_season_for_month() {
        assert_eq!(season_for_month(1), "WINTER");
        assert_eq!(season_for_month(4), "WINTER");
        assert_eq!(season_for_month(5), "SUMMER");
        assert_eq!(season_for_month(7), "SUMMER_PEAK");
        assert_eq!(season_for_month(8), "SUMMER_PEAK");
        assert_eq!(season_for_month(10), "SUMMER");
        assert_eq!(season_for_month(11), "WINTER");
    }

    #[test]
    fn test_season_for_date() {
        let date = NaiveDate::from_ymd_opt(2026, 7, 15).unwrap();
        assert_eq!(season_for_date(date), "SUMMER_PEAK");
        let date = NaiveDate::from_ymd_opt(2026, 12, 1).unwrap();
        assert_eq!(season_for_date(date), "WINTER");
    }
}
