//! Battery program credit estimate
//!
//! Programs pay for a committed average discharge capacity during event
//! windows. The committed figure is a conservative per-unit estimate scaled by
//! quantity and performance, and can never exceed what the derated fleet can
//! physically discharge.

use serde::{Deserialize, Serialize};

use crate::catalog::{BatterySpec, Catalog, Catalogs, ProgramTerms};
use crate::format::{fixed, money0, money2};
use crate::input::clamp;
use crate::projection::MONTHS_PER_YEAR;

/// Largest battery count accepted
pub const MAX_QUANTITY: u32 = 99;

/// Upper bound for any discharge capability figure (kW)
pub const MAX_DISCHARGE_CAP_KW: f64 = 1e6;

/// Default performance derate applied to nameplate figures
pub const DEFAULT_PERFORMANCE_FACTOR: f64 = 0.85;

/// Derated fleet capability
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DerivedCapacity {
    pub usable_kwh: f64,
    pub power_kw: f64,
}

/// Fleet capacity after quantity and performance derate
///
/// Quantity is clamped to 0..=99, the performance factor to [0, 1].
pub fn derive_capacity(spec: &BatterySpec, quantity: u32, performance_factor: f64) -> DerivedCapacity {
    let qty = quantity.min(MAX_QUANTITY) as f64;
    let perf = clamp(performance_factor, 0.0, 1.0);

    DerivedCapacity {
        usable_kwh: spec.usable_capacity_kwh * qty * perf,
        power_kw: spec.max_discharge_kw * qty * perf,
    }
}

/// Committed kW: `per_unit * quantity * performance`, bounded by `discharge_cap_kw`
pub fn estimate_committed_kw(
    quantity: u32,
    performance_factor: f64,
    discharge_cap_kw: f64,
    committed_kw_per_unit: f64,
) -> f64 {
    let qty = quantity.min(MAX_QUANTITY) as f64;
    let perf = clamp(performance_factor, 0.0, 1.0);
    let cap = clamp(discharge_cap_kw, 0.0, MAX_DISCHARGE_CAP_KW);
    let per_unit = clamp(committed_kw_per_unit, 0.0, MAX_DISCHARGE_CAP_KW);

    clamp(per_unit * qty * perf, 0.0, cap)
}

/// Annual program payment and its annualized monthly average
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProgramCredit {
    pub annual: f64,
    /// `annual / 12`; programs pay seasonally, so this is an average, not a payment
    pub monthly_average: f64,
}

pub fn compute_monthly_credit(program: &ProgramTerms, committed_kw: f64) -> ProgramCredit {
    let committed_kw = clamp(committed_kw, 0.0, MAX_DISCHARGE_CAP_KW);
    let annual = committed_kw * program.rate_per_kw_per_season * program.seasons_per_year as f64;

    ProgramCredit {
        annual,
        monthly_average: annual / MONTHS_PER_YEAR as f64,
    }
}

/// Inputs for a credit estimate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditInputs {
    /// Battery catalog key; unknown keys use the first battery
    pub battery: Option<String>,

    /// Program catalog key; unknown keys use the first program
    pub program: Option<String>,

    pub quantity: u32,

    pub performance_factor: f64,

    /// Overrides the battery's default committed kW per unit
    pub committed_kw_per_unit: Option<f64>,
}

impl Default for CreditInputs {
    fn default() -> Self {
        Self {
            battery: None,
            program: None,
            quantity: 1,
            performance_factor: DEFAULT_PERFORMANCE_FACTOR,
            committed_kw_per_unit: None,
        }
    }
}

/// Complete credit estimate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditEstimate {
    pub battery_key: String,
    pub battery_label: String,
    pub program_key: String,
    pub program_label: String,
    pub quantity: u32,
    pub performance_factor: f64,
    pub capacity: DerivedCapacity,
    pub committed_kw: f64,
    pub credit: ProgramCredit,
    pub note: String,
}

impl CreditEstimate {
    pub fn display(&self) -> CreditDisplay {
        CreditDisplay {
            usable_kwh: fixed(self.capacity.usable_kwh, 1),
            power_kw: fixed(self.capacity.power_kw, 1),
            committed_kw: fixed(self.committed_kw, 2),
            monthly_credit: money2(self.credit.monthly_average),
            annual_credit: money0(self.credit.annual),
            note: self.note.clone(),
        }
    }
}

/// Formatted credit figures
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditDisplay {
    pub usable_kwh: String,
    pub power_kw: String,
    pub committed_kw: String,
    pub monthly_credit: String,
    pub annual_credit: String,
    pub note: String,
}

/// Estimates program credits against injected battery and program catalogs
#[derive(Debug, Clone)]
pub struct BatteryCreditEngine {
    batteries: Catalog<BatterySpec>,
    programs: Catalog<ProgramTerms>,
}

impl BatteryCreditEngine {
    pub fn new(batteries: Catalog<BatterySpec>, programs: Catalog<ProgramTerms>) -> Self {
        Self { batteries, programs }
    }

    pub fn from_catalogs(catalogs: &Catalogs) -> Self {
        Self::new(catalogs.batteries.clone(), catalogs.programs.clone())
    }

    pub fn batteries(&self) -> &Catalog<BatterySpec> {
        &self.batteries
    }

    pub fn programs(&self) -> &Catalog<ProgramTerms> {
        &self.programs
    }

    /// Derived capacity for a battery key, as shown next to the selectors
    pub fn capacity(&self, battery: Option<&str>, quantity: u32, performance_factor: f64) -> DerivedCapacity {
        derive_capacity(self.batteries.resolve(battery), quantity, performance_factor)
    }

    pub fn estimate(&self, inputs: &CreditInputs) -> CreditEstimate {
        let spec = self.batteries.resolve(inputs.battery.as_deref());
        let program = self.programs.resolve(inputs.program.as_deref());

        let quantity = inputs.quantity.min(MAX_QUANTITY);
        let performance_factor = clamp(inputs.performance_factor, 0.0, 1.0);

        let capacity = derive_capacity(spec, quantity, performance_factor);
        let per_unit = inputs
            .committed_kw_per_unit
            .filter(|kw| kw.is_finite())
            .unwrap_or(spec.default_committed_kw);
        let committed_kw = estimate_committed_kw(quantity, performance_factor, capacity.power_kw, per_unit);
        let credit = compute_monthly_credit(program, committed_kw);

        let note = format!(
            "{} Est. additional event capacity used: {} kW. Battery: {}.",
            program.description,
            fixed(committed_kw, 2),
            spec.label
        );

        CreditEstimate {
            battery_key: spec.key.clone(),
            battery_label: spec.label.clone(),
            program_key: program.key.clone(),
            program_label: program.label.clone(),
            quantity,
            performance_factor,
            capacity,
            committed_kw,
            credit,
            note,
        }
    }
}

impl Default for BatteryCreditEngine {
    fn default() -> Self {
        Self::from_catalogs(&Catalogs::default_catalogs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn pw3() -> BatterySpec {
        BatterySpec::defaults().remove(0)
    }

    fn srp() -> ProgramTerms {
        ProgramTerms::defaults().remove(0)
    }

    #[test]
    fn test_powerwall_scenario() {
        let capacity = derive_capacity(&pw3(), 2, 0.85);
        assert_abs_diff_eq!(capacity.power_kw, 19.55, epsilon = 1e-9);
        assert_abs_diff_eq!(capacity.usable_kwh, 22.95, epsilon = 1e-9);

        let committed = estimate_committed_kw(2, 0.85, capacity.power_kw, 2.0);
        assert_abs_diff_eq!(committed, 3.4, epsilon = 1e-12);
    }

    #[test]
    fn test_srp_credit_scenario() {
        let credit = compute_monthly_credit(&srp(), 3.4);
        assert_abs_diff_eq!(credit.annual, 374.0, epsilon = 1e-9);
        assert_abs_diff_eq!(credit.monthly_average, 31.17, epsilon = 0.005);
    }

    #[test]
    fn test_committed_kw_never_exceeds_cap() {
        for per_unit in [0.0, 0.5, 2.0, 5.0, 12.0, 100.0] {
            for qty in [0, 1, 2, 7, 99, 500] {
                for perf in [0.0, 0.3, 0.85, 1.0, 1.7] {
                    for cap in [0.0, 1.0, 5.0, 19.55, 1e7] {
                        let kw = estimate_committed_kw(qty, perf, cap, per_unit);
                        assert!(kw <= cap, "{} > cap {}", kw, cap);
                        assert!(kw >= 0.0);
                    }
                }
            }
        }
    }

    #[test]
    fn test_committed_kw_clamped_by_franklin_power() {
        // FranklinWH: 5 kW per unit, so a 6 kW/unit commitment is capped
        let franklin = BatterySpec::defaults().remove(1);
        let capacity = derive_capacity(&franklin, 1, 1.0);
        assert_eq!(estimate_committed_kw(1, 1.0, capacity.power_kw, 6.0), 5.0);
    }

    #[test]
    fn test_credit_linear_in_committed_kw() {
        let program = srp();
        for kw in [0.5, 1.0, 3.4, 10.0] {
            let single = compute_monthly_credit(&program, kw);
            let double = compute_monthly_credit(&program, kw * 2.0);
            assert_relative_eq!(double.annual, single.annual * 2.0);
            assert_relative_eq!(double.monthly_average, single.monthly_average * 2.0);
        }
    }

    #[test]
    fn test_derive_capacity_clamps() {
        let capacity = derive_capacity(&pw3(), 150, 1.5);
        assert_eq!(capacity.power_kw, 11.5 * 99.0);
        assert_eq!(derive_capacity(&pw3(), 0, 0.85).power_kw, 0.0);
        assert_eq!(derive_capacity(&pw3(), 1, f64::NAN).usable_kwh, 0.0);
    }

    #[test]
    fn test_engine_estimate_defaults() {
        let engine = BatteryCreditEngine::default();
        let estimate = engine.estimate(&CreditInputs {
            quantity: 2,
            ..Default::default()
        });

        assert_eq!(estimate.battery_key, "PW3");
        assert_eq!(estimate.program_key, "SRP_BATTERY_PARTNER");
        assert_abs_diff_eq!(estimate.committed_kw, 3.4, epsilon = 1e-12);

        let display = estimate.display();
        assert_eq!(display.monthly_credit, "$31.17");
        assert_eq!(display.annual_credit, "$374");
        assert_eq!(display.committed_kw, "3.40");
        assert_eq!(display.usable_kwh, "23.0");
        assert!(display.note.contains("annualized monthly average"));
        assert!(display.note.ends_with("Est. additional event capacity used: 3.40 kW. Battery: Tesla Powerwall 3."));
    }

    #[test]
    fn test_engine_aps_program() {
        let engine = BatteryCreditEngine::default();
        let estimate = engine.estimate(&CreditInputs {
            battery: Some("FRANKLIN".to_string()),
            program: Some("APS_TESLA_VPP".to_string()),
            quantity: 1,
            performance_factor: 1.0,
            committed_kw_per_unit: None,
        });

        assert_eq!(estimate.committed_kw, 2.0);
        assert_eq!(estimate.credit.annual, 220.0);
        assert!(estimate.note.starts_with("APS VPP estimate"));
    }

    #[test]
    fn test_engine_unknown_keys_and_override() {
        let engine = BatteryCreditEngine::default();
        let estimate = engine.estimate(&CreditInputs {
            battery: Some("UNKNOWN".to_string()),
            program: Some("UNKNOWN".to_string()),
            quantity: 1,
            performance_factor: 1.0,
            committed_kw_per_unit: Some(50.0),
        });

        assert_eq!(estimate.battery_key, "PW3");
        assert_eq!(estimate.program_key, "SRP_BATTERY_PARTNER");
        assert_eq!(estimate.committed_kw, 11.5);
    }

    #[test]
    fn test_synthetic_catalog() {
        let battery = BatterySpec {
            key: "TEST".to_string(),
            label: "Test cell".to_string(),
            usable_capacity_kwh: 10.0,
            max_discharge_kw: 4.0,
            default_committed_kw: 1.0,
        };
        let program = ProgramTerms {
            key: "FLAT".to_string(),
            label: "Flat".to_string(),
            rate_per_kw_per_season: 120.0,
            seasons_per_year: 1,
            description: "Flat test program.".to_string(),
        };
        let engine = BatteryCreditEngine::new(
            Catalog::new(vec![battery]).unwrap(),
            Catalog::new(vec![program]).unwrap(),
        );

        let estimate = engine.estimate(&CreditInputs {
            quantity: 3,
            performance_factor: 1.0,
            ..Default::default()
        });

        assert_eq!(estimate.committed_kw, 3.0);
        assert_eq!(estimate.credit.annual, 360.0);
        assert_eq!(estimate.credit.monthly_average, 30.0);
    }
}
