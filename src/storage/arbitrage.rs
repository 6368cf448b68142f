//! Energy arbitrage: value of shifting daily load from off-peak charging to peak discharge

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::catalog::{season_for_date, Catalog, Catalogs, SeasonRate};
use crate::format::{money2, percent};
use crate::input::clamp;

/// Days in a billing month for arbitrage estimates
pub const DAYS_PER_MONTH: f64 = 30.0;

/// Largest daily shift accepted (kWh)
pub const MAX_KWH_PER_DAY: f64 = 300.0;

/// Efficiency floor; keeps the two-rate model away from division by zero
pub const MIN_ROUND_TRIP_EFFICIENCY: f64 = 0.01;

pub const DEFAULT_KWH_PER_DAY: f64 = 10.0;
pub const DEFAULT_ROUND_TRIP_EFFICIENCY: f64 = 0.9;

/// Pricing model for an arbitrage estimate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArbitrageModel {
    /// Buy `shifted / efficiency` off-peak, sell `shifted` on-peak
    #[default]
    TwoRate,
    /// `shifted * peak_value * efficiency`
    SimpleDelta,
}

pub fn clamp_efficiency(round_trip_efficiency: f64) -> f64 {
    clamp(round_trip_efficiency, MIN_ROUND_TRIP_EFFICIENCY, 1.0)
}

pub fn clamp_kwh_per_day(kwh_per_day: f64) -> f64 {
    clamp(kwh_per_day, 0.0, MAX_KWH_PER_DAY)
}

/// Energy bought to deliver `shifted_kwh` after round-trip losses
pub fn charged_kwh(shifted_kwh: f64, round_trip_efficiency: f64) -> f64 {
    shifted_kwh / clamp_efficiency(round_trip_efficiency)
}

/// Daily value under the two-rate model
pub fn two_rate_daily_value(shifted_kwh: f64, round_trip_efficiency: f64, season: &SeasonRate) -> f64 {
    shifted_kwh * season.on_peak_rate - charged_kwh(shifted_kwh, round_trip_efficiency) * season.off_peak_rate
}

/// Daily value under the simple delta model
pub fn simple_delta_daily_value(shifted_kwh: f64, round_trip_efficiency: f64, season: &SeasonRate) -> f64 {
    shifted_kwh * season.peak_value_per_kwh * clamp_efficiency(round_trip_efficiency)
}

/// Arbitrage estimate for one season
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArbitrageEstimate {
    pub model: ArbitrageModel,
    pub season_key: String,
    pub season_label: String,
    pub kwh_shifted_per_day: f64,
    pub kwh_charged_per_day: f64,
    pub round_trip_efficiency: f64,
    pub daily_value: f64,
    pub monthly_value: f64,
    pub detail: String,
}

impl ArbitrageEstimate {
    pub fn display(&self) -> ArbitrageDisplay {
        ArbitrageDisplay {
            monthly_value: money2(self.monthly_value),
            detail: self.detail.clone(),
        }
    }
}

/// Formatted arbitrage figures
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArbitrageDisplay {
    pub monthly_value: String,
    pub detail: String,
}

/// Estimates arbitrage value against an injected season-rate table
#[derive(Debug, Clone)]
pub struct ArbitrageEngine {
    seasons: Catalog<SeasonRate>,
    model: ArbitrageModel,
    days_per_month: f64,
}

impl ArbitrageEngine {
    pub fn new(seasons: Catalog<SeasonRate>, model: ArbitrageModel) -> Self {
        Self {
            seasons,
            model,
            days_per_month: DAYS_PER_MONTH,
        }
    }

    pub fn from_catalogs(catalogs: &Catalogs, model: ArbitrageModel) -> Self {
        Self::new(catalogs.seasons.clone(), model)
    }

    /// Override the billing-month length (non-positive values are ignored)
    pub fn with_days_per_month(mut self, days: f64) -> Self {
        if days.is_finite() && days > 0.0 {
            self.days_per_month = days;
        }
        self
    }

    pub fn model(&self) -> ArbitrageModel {
        self.model
    }

    pub fn seasons(&self) -> &Catalog<SeasonRate> {
        &self.seasons
    }

    /// Season bucket for a calendar date
    pub fn season_for_date(&self, date: NaiveDate) -> &SeasonRate {
        self.seasons.resolve(Some(season_for_date(date)))
    }

    pub fn estimate(&self, season: Option<&str>, kwh_per_day: f64, round_trip_efficiency: f64) -> ArbitrageEstimate {
        let season = self.seasons.resolve(season);
        let shifted = clamp_kwh_per_day(kwh_per_day);
        let efficiency = clamp_efficiency(round_trip_efficiency);
        let charged = charged_kwh(shifted, efficiency);

        let daily_value = match self.model {
            ArbitrageModel::TwoRate => two_rate_daily_value(shifted, efficiency, season),
            ArbitrageModel::SimpleDelta => simple_delta_daily_value(shifted, efficiency, season),
        };

        let detail = match self.model {
            ArbitrageModel::TwoRate => format!(
                "Estimate charges {:.1} kWh/day at {} and discharges {} kWh/day at {} per kWh, RTE {}. \
                 Not a guaranteed credit.",
                charged,
                money2(season.off_peak_rate),
                shifted,
                money2(season.on_peak_rate),
                percent(efficiency)
            ),
            ArbitrageModel::SimpleDelta => format!(
                "Estimate uses value {} per kWh, {} kWh/day shifted, RTE {}. Not a guaranteed credit.",
                money2(season.peak_value_per_kwh),
                shifted,
                percent(efficiency)
            ),
        };

        ArbitrageEstimate {
            model: self.model,
            season_key: season.key.clone(),
            season_label: season.label.clone(),
            kwh_shifted_per_day: shifted,
            kwh_charged_per_day: charged,
            round_trip_efficiency: efficiency,
            daily_value,
            monthly_value: daily_value * self.days_per_month,
            detail,
        }
    }
}

impl Default for ArbitrageEngine {
    fn default() -> Self {
        Self::from_catalogs(&Catalogs::default_catalogs(), ArbitrageModel::default())
    }
}
