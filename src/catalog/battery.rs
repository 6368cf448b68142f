//! Battery model nameplate specifications

use serde::{Deserialize, Serialize};

use super::CatalogEntry;

/// Nameplate figures for one selectable battery model (per unit)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatterySpec {
    /// Selector key, e.g. "PW3"
    pub key: String,

    /// Display label
    pub label: String,

    /// Usable energy capacity per unit (kWh)
    pub usable_capacity_kwh: f64,

    /// Maximum continuous discharge per unit (kW)
    pub max_discharge_kw: f64,

    /// Conservative additional event capacity assumed per unit (kW)
    pub default_committed_kw: f64,
}

impl BatterySpec {
    /// Tesla Powerwall 3 and FranklinWH aPower
    pub fn defaults() -> Vec<Self> {
        vec![
            Self {
                key: "PW3".to_string(),
                label: "Tesla Powerwall 3".to_string(),
                usable_capacity_kwh: 13.5,
                max_discharge_kw: 11.5,
                default_committed_kw: 2.0,
            },
            Self {
                key: "FRANKLIN".to_string(),
                label: "FranklinWH (aPower)".to_string(),
                usable_capacity_kwh: 13.6,
                max_discharge_kw: 5.0,
                default_committed_kw: 2.0,
            },
        ]
    }
}

impl CatalogEntry for BatterySpec {
    const KIND: &'static str = "battery";

    fn key(&self) -> &str {
        &self.key
    }

    fn validate(&self) -> Result<(), String> {
        let fields = [
            ("usable_capacity_kwh", self.usable_capacity_kwh),
            ("max_discharge_kw", self.max_discharge_kw),
            ("default_committed_kw", self.default_committed_kw),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(format!("{} must be a non-negative number, got {}", name, value));
            }
        }
        Ok(())
    }
}
