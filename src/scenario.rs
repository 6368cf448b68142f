//! Scenario runner for batches of savings projections
//!
//! Holds one configured engine and runs many independent projections across
//! the rayon thread pool, e.g. every solar escalation option a UI offers.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::projection::{EscalatingSeries, ProjectionConfig, ProjectionEngine, SavingsProjection};

/// Solar escalation options offered by the estimator
pub const STANDARD_SOLAR_ESCALATIONS: [f64; 6] = [0.0, 0.01, 0.02, 0.029, 0.039, 0.05];

/// One projection to run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SavingsScenario {
    pub utility: EscalatingSeries,
    pub solar: EscalatingSeries,
    pub snapshot_year: u32,
}

/// Result of a sweep over one varying parameter
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SweepPoint {
    /// The parameter value for this point (escalation rate or horizon years)
    pub value: f64,
    pub projection: SavingsProjection,
}

/// Runs savings projections in batches
#[derive(Debug, Clone, Default)]
pub struct ScenarioRunner {
    engine: ProjectionEngine,
}

impl ScenarioRunner {
    pub fn new(config: ProjectionConfig) -> Self {
        Self {
            engine: ProjectionEngine::new(config),
        }
    }

    pub fn with_engine(engine: ProjectionEngine) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &ProjectionEngine {
        &self.engine
    }

    /// Run a single scenario
    pub fn run(&self, scenario: &SavingsScenario) -> SavingsProjection {
        self.engine
            .project_savings(&scenario.utility, &scenario.solar, scenario.snapshot_year)
    }

    /// Run scenarios in parallel; output order matches input order
    pub fn run_batch(&self, scenarios: &[SavingsScenario]) -> Vec<SavingsProjection> {
        scenarios.par_iter().map(|s| self.run(s)).collect()
    }

    /// Vary the solar escalation rate, holding everything else fixed
    pub fn solar_escalation_sweep(
        &self,
        utility: EscalatingSeries,
        solar: EscalatingSeries,
        rates: &[f64],
    ) -> Vec<SweepPoint> {
        rates
            .par_iter()
            .map(|&rate| {
                let solar = EscalatingSeries { annual_rate: rate, ..solar };
                SweepPoint {
                    value: rate,
                    projection: self.engine.project_savings(&utility, &solar, utility.horizon_years),
                }
            })
            .collect()
    }

    /// Vary the horizon (snapshot at each horizon's final year)
    pub fn horizon_sweep(
        &self,
        utility: EscalatingSeries,
        solar: EscalatingSeries,
        horizons: &[u32],
    ) -> Vec<SweepPoint> {
        horizons
            .par_iter()
            .map(|&years| {
                let utility = EscalatingSeries::new(utility.monthly_base, utility.annual_rate, years);
                let solar = EscalatingSeries::new(solar.monthly_base, solar.annual_rate, years);
                SweepPoint {
                    value: years as f64,
                    projection: self.engine.project_savings(&utility, &solar, years),
                }
            })
            .collect()
    }
}
