//! Request adapter between a UI layer and the engines
//!
//! Accepts raw field values (JSON numbers or strings), sanitizes them, runs the
//! requested calculations and returns raw results next to display strings.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::catalog::{season_for_date, Catalogs};
use crate::config::EstimatorConfig;
use crate::error::{InputResult, Result};
use crate::input::{RawValue, Sanitizer};
use crate::projection::{
    EscalatingSeries, ProjectionEngine, RatePolicy, SavingsDisplay, SavingsProjection, SavingsSchedule,
    MAX_MONTHLY_BASE, MAX_YEARS, MIN_YEARS,
};
use crate::storage::{
    ArbitrageDisplay, ArbitrageEngine, ArbitrageEstimate, BatteryCreditEngine, CreditDisplay,
    CreditEstimate, CreditInputs, MAX_DISCHARGE_CAP_KW, MAX_KWH_PER_DAY, MAX_QUANTITY,
    MIN_ROUND_TRIP_EFFICIENCY,
};

/// Savings calculator fields
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SavingsRequest {
    pub monthly_bill: Option<RawValue>,
    pub monthly_solar: Option<RawValue>,
    pub years: Option<RawValue>,
    pub utility_escalation: Option<RawValue>,
    pub solar_escalation: Option<RawValue>,
    /// Include the year-by-year schedule in the response
    pub include_schedule: bool,
}

/// Battery credit fields
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BatteryRequest {
    pub program: Option<String>,
    pub battery_model: Option<String>,
    pub quantity: Option<RawValue>,
    pub performance_factor: Option<RawValue>,
    pub committed_kw_per_unit: Option<RawValue>,
}

/// Arbitrage fields; `date` picks the season when `season` is absent
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ArbitrageRequest {
    pub season: Option<String>,
    pub date: Option<NaiveDate>,
    pub kwh_shifted_per_day: Option<RawValue>,
    pub round_trip_efficiency: Option<RawValue>,
}

/// Any combination of the three calculators
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimateRequest {
    pub savings: Option<SavingsRequest>,
    pub battery: Option<BatteryRequest>,
    pub arbitrage: Option<ArbitrageRequest>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SavingsSection {
    pub result: SavingsProjection,
    pub display: SavingsDisplay,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule: Option<SavingsSchedule>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatterySection {
    pub result: CreditEstimate,
    pub display: CreditDisplay,
}

#[derive(Debug, Clone, Serialize)]
pub struct ArbitrageSection {
    pub result: ArbitrageEstimate,
    pub display: ArbitrageDisplay,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct EstimateResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub savings: Option<SavingsSection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub battery: Option<BatterySection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arbitrage: Option<ArbitrageSection>,
}

/// Configured engines plus the input sanitizer
#[derive(Debug, Clone)]
pub struct Estimator {
    config: EstimatorConfig,
    sanitizer: Sanitizer,
    projection: ProjectionEngine,
    credit: BatteryCreditEngine,
    arbitrage: ArbitrageEngine,
}

impl Estimator {
    pub fn new(catalogs: &Catalogs, config: EstimatorConfig) -> Self {
        Self {
            sanitizer: Sanitizer::new(config.input_mode),
            projection: ProjectionEngine::new(config.projection),
            credit: BatteryCreditEngine::from_catalogs(catalogs),
            arbitrage: ArbitrageEngine::from_catalogs(catalogs, config.arbitrage_model)
                .with_days_per_month(config.days_per_month),
            config,
        }
    }

    pub fn config(&self) -> &EstimatorConfig {
        &self.config
    }

    pub fn projection_engine(&self) -> &ProjectionEngine {
        &self.projection
    }

    pub fn credit_engine(&self) -> &BatteryCreditEngine {
        &self.credit
    }

    pub fn arbitrage_engine(&self) -> &ArbitrageEngine {
        &self.arbitrage
    }

    fn escalation(&self, field: &'static str, raw: Option<&RawValue>, fallback: f64) -> InputResult<f64> {
        let (min, max) = match self.config.projection.rate_policy {
            RatePolicy::Clamped => (0.0, 1.0),
            RatePolicy::Unbounded => (f64::MIN, f64::MAX),
        };
        self.sanitizer.number(field, raw, fallback, min, max)
    }

    /// Sanitized utility and solar series; the horizon doubles as the snapshot year
    pub fn savings_series(
        &self,
        request: &SavingsRequest,
    ) -> InputResult<(EscalatingSeries, EscalatingSeries)> {
        let d = &self.config.defaults;
        let s = &self.sanitizer;

        let bill = s.number("monthly_bill", request.monthly_bill.as_ref(), d.monthly_bill, 0.0, MAX_MONTHLY_BASE)?;
        let solar = s.number("monthly_solar", request.monthly_solar.as_ref(), d.monthly_solar, 0.0, MAX_MONTHLY_BASE)?;
        let years = s.integer("years", request.years.as_ref(), d.horizon_years, MIN_YEARS, MAX_YEARS)?;
        let utility_esc = self.escalation("utility_escalation", request.utility_escalation.as_ref(), d.utility_escalation)?;
        let solar_esc = self.escalation("solar_escalation", request.solar_escalation.as_ref(), d.solar_escalation)?;

        Ok((
            EscalatingSeries::new(bill, utility_esc, years),
            EscalatingSeries::new(solar, solar_esc, years),
        ))
    }

    pub fn savings(&self, request: &SavingsRequest) -> InputResult<SavingsSection> {
        let (utility, solar) = self.savings_series(request)?;
        let result = self.projection.project_savings(&utility, &solar, utility.horizon_years);
        let schedule = request
            .include_schedule
            .then(|| self.projection.schedule(&utility, &solar));

        Ok(SavingsSection {
            display: result.display(),
            result,
            schedule,
        })
    }

    pub fn battery(&self, request: &BatteryRequest) -> InputResult<BatterySection> {
        let d = &self.config.defaults;
        let s = &self.sanitizer;

        let inputs = CreditInputs {
            battery: request.battery_model.clone(),
            program: request.program.clone(),
            quantity: s.integer("quantity", request.quantity.as_ref(), d.battery_quantity, 0, MAX_QUANTITY)?,
            performance_factor: s.number(
                "performance_factor",
                request.performance_factor.as_ref(),
                d.performance_factor,
                0.0,
                1.0,
            )?,
            committed_kw_per_unit: s.optional_number(
                "committed_kw_per_unit",
                request.committed_kw_per_unit.as_ref(),
                0.0,
                MAX_DISCHARGE_CAP_KW,
            )?,
        };

        let result = self.credit.estimate(&inputs);
        Ok(BatterySection {
            display: result.display(),
            result,
        })
    }

    pub fn arbitrage(&self, request: &ArbitrageRequest) -> InputResult<ArbitrageSection> {
        let d = &self.config.defaults;
        let s = &self.sanitizer;

        let kwh = s.number(
            "kwh_shifted_per_day",
            request.kwh_shifted_per_day.as_ref(),
            d.kwh_shifted_per_day,
            0.0,
            MAX_KWH_PER_DAY,
        )?;
        let efficiency = s.number(
            "round_trip_efficiency",
            request.round_trip_efficiency.as_ref(),
            d.round_trip_efficiency,
            MIN_ROUND_TRIP_EFFICIENCY,
            1.0,
        )?;
        let season = request
            .season
            .as_deref()
            .or_else(|| request.date.map(season_for_date));

        let result = self.arbitrage.estimate(season, kwh, efficiency);
        Ok(ArbitrageSection {
            display: result.display(),
            result,
        })
    }

    /// Run every calculator present in the request
    pub fn handle(&self, request: &EstimateRequest) -> InputResult<EstimateResponse> {
        Ok(EstimateResponse {
            savings: request.savings.as_ref().map(|r| self.savings(r)).transpose()?,
            battery: request.battery.as_ref().map(|r| self.battery(r)).transpose()?,
            arbitrage: request.arbitrage.as_ref().map(|r| self.arbitrage(r)).transpose()?,
        })
    }

    /// JSON in, JSON out
    pub fn handle_json(&self, body: &str) -> Result<String> {
        let request: EstimateRequest = serde_json::from_str(body)?;
        let response = self.handle(&request)?;
        Ok(serde_json::to_string_pretty(&response)?)
    }
}

impl Default for Estimator {
    fn default() -> Self {
        Self::new(&Catalogs::default_catalogs(), EstimatorConfig::default())
    }
}
