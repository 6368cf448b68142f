//! Storage incentive program compensation terms

use serde::{Deserialize, Serialize};

use super::CatalogEntry;

/// Compensation terms for one incentive program
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgramTerms {
    /// Selector key, e.g. "SRP_BATTERY_PARTNER"
    pub key: String,

    /// Display label
    pub label: String,

    /// Dollars paid per committed kW per season
    pub rate_per_kw_per_season: f64,

    /// Number of paid seasons per year
    pub seasons_per_year: u32,

    /// Payout note shown next to the estimate
    pub description: String,
}

impl ProgramTerms {
    /// SRP Battery Partner first, so unknown program keys resolve to it
    pub fn defaults() -> Vec<Self> {
        vec![
            Self {
                key: "SRP_BATTERY_PARTNER".to_string(),
                label: "SRP Battery Partner".to_string(),
                rate_per_kw_per_season: 55.0,
                seasons_per_year: 2,
                description: "SRP Battery Partner uses $55 per kW per season (2 seasons/year). \
                    Displayed as an annualized monthly average. Actual depends on measured \
                    additional event capacity."
                    .to_string(),
            },
            Self {
                key: "APS_TESLA_VPP".to_string(),
                label: "APS Tesla VPP (Powerwall)".to_string(),
                // Estimate, not a contractual figure
                rate_per_kw_per_season: 110.0,
                seasons_per_year: 1,
                description: "APS VPP estimate uses assumed $/kW seasonal value and a typical \
                    additional event capacity estimate. Actual depends on APS terms + events + \
                    performance."
                    .to_string(),
            },
        ]
    }

    /// Dollars per committed kW per year
    pub fn annual_rate_per_kw(&self) -> f64 {
        self.rate_per_kw_per_season * self.seasons_per_year as f64
    }
}

impl CatalogEntry for ProgramTerms {
    const KIND: &'static str = "program";

    fn key(&self) -> &str {
        &self.key
    }

    fn validate(&self) -> Result<(), String> {
        if !self.rate_per_kw_per_season.is_finite() || self.rate_per_kw_per_season < 0.0 {
            return Err(format!(
                "rate_per_kw_per_season must be a non-negative number, got {}",
                self.rate_per_kw_per_season
            ));
        }
        if self.seasons_per_year == 0 {
            return Err("seasons_per_year must be at least 1".to_string());
        }
        Ok(())
    }
}
