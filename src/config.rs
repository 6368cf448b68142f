//! Estimator configuration: input defaults and formula policies
//!
//! Every field has a default, so a JSON file only needs the keys it changes:
//!
//! ```json
//! { "input_mode": "strict", "arbitrage_model": "simple_delta",
//!   "defaults": { "utility_escalation": 0.07 } }
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::Result;
use crate::input::InputMode;
use crate::projection::ProjectionConfig;
use crate::storage::{
    ArbitrageModel, DAYS_PER_MONTH, DEFAULT_KWH_PER_DAY, DEFAULT_PERFORMANCE_FACTOR,
    DEFAULT_ROUND_TRIP_EFFICIENCY,
};

/// Values used when an input is missing, blank or (in lenient mode) unparseable
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputDefaults {
    pub monthly_bill: f64,
    pub monthly_solar: f64,
    pub horizon_years: u32,
    pub utility_escalation: f64,
    pub solar_escalation: f64,
    pub battery_quantity: u32,
    pub performance_factor: f64,
    pub kwh_shifted_per_day: f64,
    pub round_trip_efficiency: f64,
}

impl Default for InputDefaults {
    fn default() -> Self {
        Self {
            monthly_bill: 0.0,
            monthly_solar: 0.0,
            horizon_years: 25,
            utility_escalation: 0.09,
            solar_escalation: 0.0,
            battery_quantity: 1,
            performance_factor: DEFAULT_PERFORMANCE_FACTOR,
            kwh_shifted_per_day: DEFAULT_KWH_PER_DAY,
            round_trip_efficiency: DEFAULT_ROUND_TRIP_EFFICIENCY,
        }
    }
}

/// Top-level estimator configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimatorConfig {
    pub input_mode: InputMode,
    pub defaults: InputDefaults,
    pub projection: ProjectionConfig,
    pub arbitrage_model: ArbitrageModel,
    pub days_per_month: f64,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            input_mode: InputMode::Lenient,
            defaults: InputDefaults::default(),
            projection: ProjectionConfig::default(),
            arbitrage_model: ArbitrageModel::TwoRate,
            days_per_month: DAYS_PER_MONTH,
        }
    }
}

impl EstimatorConfig {
    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_json_path(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EstimatorError;
    use crate::projection::{RatePolicy, SavingsPolicy};

    #[test]
    fn test_empty_json_is_default() {
        let config = EstimatorConfig::from_json_str("{}").unwrap();
        assert_eq!(config, EstimatorConfig::default());
        assert_eq!(config.defaults.utility_escalation, 0.09);
        assert_eq!(config.defaults.performance_factor, 0.85);
        assert_eq!(config.defaults.horizon_years, 25);
    }

    #[test]
    fn test_partial_override() {
        let config = EstimatorConfig::from_json_str(
            r#"{
                "input_mode": "strict",
                "arbitrage_model": "simple_delta",
                "projection": { "savings_policy": "floor_at_zero" },
                "defaults": { "utility_escalation": 0.07 }
            }"#,
        )
        .unwrap();

        assert_eq!(config.input_mode, InputMode::Strict);
        assert_eq!(config.arbitrage_model, ArbitrageModel::SimpleDelta);
        assert_eq!(config.projection.savings_policy, SavingsPolicy::FloorAtZero);
        assert_eq!(config.projection.rate_policy, RatePolicy::Clamped);
        assert_eq!(config.defaults.utility_escalation, 0.07);
        assert_eq!(config.defaults.round_trip_efficiency, 0.9);
    }

    #[test]
    fn test_bad_json_is_error() {
        let err = EstimatorConfig::from_json_str("{ \"input_mode\": \"loose\" }").unwrap_err();
        assert!(matches!(err, EstimatorError::Json(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = EstimatorConfig::from_json_path(Path::new("no/such/config.json")).unwrap_err();
        assert!(matches!(err, EstimatorError::Io(_)));
    }
}
