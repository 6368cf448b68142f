//! Savings projection engine: utility bill vs. solar payment

use serde::{Deserialize, Serialize};

use super::rates::MONTHS_PER_YEAR;
use super::schedule::{SavingsSchedule, YearRow};
use super::series::{clamp_years, monthly_amounts, EscalatingSeries};
use crate::format::{money0, money2};
use crate::input::clamp;

/// Sign handling for the snapshot-year monthly savings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SavingsPolicy {
    /// Report negative savings when the solar payment exceeds the bill
    #[default]
    Signed,
    /// Floor monthly and annual snapshot savings at zero
    FloorAtZero,
}

/// Treatment of escalation rates before projecting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RatePolicy {
    /// Clamp escalation rates into [0, 1]
    #[default]
    Clamped,
    /// Use rates as given (non-finite rates still count as zero)
    Unbounded,
}

impl RatePolicy {
    pub fn apply(&self, annual_rate: f64) -> f64 {
        match self {
            RatePolicy::Clamped => clamp(annual_rate, 0.0, 1.0),
            RatePolicy::Unbounded if annual_rate.is_finite() => annual_rate,
            RatePolicy::Unbounded => 0.0,
        }
    }
}

/// Configuration for a projection engine
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectionConfig {
    #[serde(default)]
    pub savings_policy: SavingsPolicy,

    #[serde(default)]
    pub rate_policy: RatePolicy,
}

/// Utility vs. solar comparison over a horizon, with a snapshot year
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SavingsProjection {
    pub horizon_years: u32,
    pub snapshot_year: u32,

    // Cumulative totals over the horizon
    pub utility_total: f64,
    pub solar_total: f64,
    pub savings: f64,

    // Snapshot-year figures
    pub monthly_utility: f64,
    pub monthly_solar: f64,
    pub monthly_savings: f64,
    pub annual_savings: f64,
}

impl SavingsProjection {
    /// Display strings: whole dollars for totals, cents for snapshot figures
    pub fn display(&self) -> SavingsDisplay {
        SavingsDisplay {
            utility_total: money0(self.utility_total),
            solar_total: money0(self.solar_total),
            savings: money0(self.savings),
            snapshot_year: self.snapshot_year.to_string(),
            monthly_utility: money2(self.monthly_utility),
            monthly_solar: money2(self.monthly_solar),
            monthly_savings: money2(self.monthly_savings),
            annual_savings: money2(self.annual_savings),
        }
    }
}

/// Formatted savings figures
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavingsDisplay {
    pub utility_total: String,
    pub solar_total: String,
    pub savings: String,
    pub snapshot_year: String,
    pub monthly_utility: String,
    pub monthly_solar: String,
    pub monthly_savings: String,
    pub annual_savings: String,
}

/// Projects utility and solar costs and differences them into savings
#[derive(Debug, Clone, Default)]
pub struct ProjectionEngine {
    config: ProjectionConfig,
}

impl ProjectionEngine {
    pub fn new(config: ProjectionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ProjectionConfig {
        &self.config
    }

    /// Apply the rate policy to a series
    fn normalize(&self, series: &EscalatingSeries) -> EscalatingSeries {
        EscalatingSeries::new(
            series.monthly_base,
            self.config.rate_policy.apply(series.annual_rate),
            series.horizon_years,
        )
    }

    /// Cumulative totals over each series' horizon and the snapshot at `year`
    pub fn project_savings(
        &self,
        utility: &EscalatingSeries,
        solar: &EscalatingSeries,
        year: u32,
    ) -> SavingsProjection {
        let utility = self.normalize(utility);
        let solar = self.normalize(solar);
        let year = clamp_years(year);

        let utility_total = utility.total();
        let solar_total = solar.total();

        let monthly_utility = utility.month_at_end_of_year(year);
        let monthly_solar = solar.month_at_end_of_year(year);
        let monthly_savings = match self.config.savings_policy {
            SavingsPolicy::Signed => monthly_utility - monthly_solar,
            SavingsPolicy::FloorAtZero => (monthly_utility - monthly_solar).max(0.0),
        };

        SavingsProjection {
            horizon_years: utility.horizon_years,
            snapshot_year: year,
            utility_total,
            solar_total,
            savings: utility_total - solar_total,
            monthly_utility,
            monthly_solar,
            monthly_savings,
            annual_savings: monthly_savings * MONTHS_PER_YEAR as f64,
        }
    }

    /// Year-by-year breakdown over the utility series' horizon
    pub fn schedule(&self, utility: &EscalatingSeries, solar: &EscalatingSeries) -> SavingsSchedule {
        let utility = self.normalize(utility);
        let solar = self.normalize(solar);
        let months = (utility.horizon_years * MONTHS_PER_YEAR) as usize;

        let mut schedule = SavingsSchedule::new(utility.horizon_years);
        let mut row = YearRow::new(1);

        let pairs = monthly_amounts(utility.monthly_base, utility.annual_rate)
            .zip(monthly_amounts(solar.monthly_base, solar.annual_rate))
            .take(months);

        for (index, (utility_month, solar_month)) in pairs.enumerate() {
            row.utility_annual += utility_month;
            row.solar_annual += solar_month;

            if (index + 1) % MONTHS_PER_YEAR as usize == 0 {
                row.utility_monthly = utility_month;
                row.solar_monthly = solar_month;
                row.utility_cumulative += row.utility_annual;
                row.solar_cumulative += row.solar_annual;
                row.cumulative_savings = row.utility_cumulative - row.solar_cumulative;

                let next = row.next_year();
                schedule.add_row(row);
                row = next;
            }
        }

        schedule
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn scenario() -> (EscalatingSeries, EscalatingSeries) {
        (
            EscalatingSeries::new(200.0, 0.09, 25),
            EscalatingSeries::new(150.0, 0.0, 25),
        )
    }

    #[test]
    fn test_reference_scenario() {
        let engine = ProjectionEngine::default();
        let (utility, solar) = scenario();

        let result = engine.project_savings(&utility, &solar, 25);

        assert_eq!(result.solar_total, 45_000.0);
        assert_abs_diff_eq!(result.utility_total, 211_537.080_439_715, epsilon = 1e-6);
        assert_relative_eq!(result.savings, result.utility_total - 45_000.0);
        assert_abs_diff_eq!(result.monthly_utility, 1712.275_211_028_56, epsilon = 1e-6);
        assert_eq!(result.monthly_solar, 150.0);
        assert_relative_eq!(result.annual_savings, result.monthly_savings * 12.0);
    }

    #[test]
    fn test_reference_scenario_display() {
        let engine = ProjectionEngine::default();
        let (utility, solar) = scenario();

        let display = engine.project_savings(&utility, &solar, 25).display();

        assert_eq!(display.utility_total, "$211,537");
        assert_eq!(display.solar_total, "$45,000");
        assert_eq!(display.savings, "$166,537");
        assert_eq!(display.snapshot_year, "25");
        assert_eq!(display.monthly_utility, "$1,712.28");
        assert_eq!(display.monthly_solar, "$150.00");
        assert_eq!(display.monthly_savings, "$1,562.28");
    }

    fn parse_money(display: &str) -> f64 {
        display.replace(['$', ','], "").parse().unwrap()
    }

    #[test]
    fn test_display_at_input_bounds_matches_raw_values() {
        let engine = ProjectionEngine::default();
        let utility = EscalatingSeries::new(1e9, 1.0, 30);
        let solar = EscalatingSeries::new(0.0, 0.0, 30);

        let result = engine.project_savings(&utility, &solar, 30);
        let display = result.display();

        assert!(result.monthly_utility > 1e18);
        assert_relative_eq!(parse_money(&display.monthly_utility), result.monthly_utility, max_relative = 1e-12);
        assert_relative_eq!(parse_money(&display.annual_savings), result.annual_savings, max_relative = 1e-12);
        assert_relative_eq!(parse_money(&display.utility_total), result.utility_total, max_relative = 1e-12);
        assert_ne!(display.monthly_utility, display.annual_savings);
    }

    #[test]
    fn test_unbounded_overflow_displays_infinity() {
        let engine = ProjectionEngine::new(ProjectionConfig {
            rate_policy: RatePolicy::Unbounded,
            ..Default::default()
        });
        let utility = EscalatingSeries::new(1e9, 1e300, 30);
        let solar = EscalatingSeries::new(0.0, 0.0, 30);

        let display = engine.project_savings(&utility, &solar, 30).display();

        assert_eq!(display.utility_total, "$∞");
        assert_eq!(display.savings, "$∞");
    }

    #[test]
    fn test_negative_savings_keep_sign_by_default() {
        let engine = ProjectionEngine::default();
        let utility = EscalatingSeries::new(100.0, 0.0, 10);
        let solar = EscalatingSeries::new(180.0, 0.0, 10);

        let result = engine.project_savings(&utility, &solar, 10);

        assert_eq!(result.monthly_savings, -80.0);
        assert_eq!(result.annual_savings, -960.0);
        assert_eq!(result.savings, -9_600.0);
        assert_eq!(result.display().monthly_savings, "-$80.00");
    }

    #[test]
    fn test_floor_at_zero_policy() {
        let engine = ProjectionEngine::new(ProjectionConfig {
            savings_policy: SavingsPolicy::FloorAtZero,
            ..Default::default()
        });
        let utility = EscalatingSeries::new(100.0, 0.0, 10);
        let solar = EscalatingSeries::new(180.0, 0.0, 10);

        let result = engine.project_savings(&utility, &solar, 10);

        assert_eq!(result.monthly_savings, 0.0);
        assert_eq!(result.annual_savings, 0.0);
        // Cumulative savings are never floored
        assert_eq!(result.savings, -9_600.0);
    }

    #[test]
    fn test_rate_policy() {
        assert_eq!(RatePolicy::Clamped.apply(1.5), 1.0);
        assert_eq!(RatePolicy::Clamped.apply(-0.2), 0.0);
        assert_eq!(RatePolicy::Unbounded.apply(1.5), 1.5);
        assert_eq!(RatePolicy::Unbounded.apply(f64::NAN), 0.0);

        let clamped = ProjectionEngine::default();
        let unbounded = ProjectionEngine::new(ProjectionConfig {
            rate_policy: RatePolicy::Unbounded,
            ..Default::default()
        });
        let utility = EscalatingSeries::new(100.0, 2.0, 5);
        let solar = EscalatingSeries::new(0.0, 0.0, 5);

        let a = clamped.project_savings(&utility, &solar, 5);
        let b = unbounded.project_savings(&utility, &solar, 5);
        assert!(b.utility_total > a.utility_total);
    }

    #[test]
    fn test_snapshot_year_is_clamped() {
        let engine = ProjectionEngine::default();
        let (utility, solar) = scenario();
        assert_eq!(engine.project_savings(&utility, &solar, 0).snapshot_year, 1);
        assert_eq!(engine.project_savings(&utility, &solar, 31).snapshot_year, 30);
    }

    #[test]
    fn test_idempotent() {
        let engine = ProjectionEngine::default();
        let (utility, solar) = scenario();
        assert_eq!(
            engine.project_savings(&utility, &solar, 25),
            engine.project_savings(&utility, &solar, 25)
        );
    }

    #[test]
    fn test_schedule_agrees_with_projection() {
        let engine = ProjectionEngine::default();
        let (utility, solar) = scenario();

        let projection = engine.project_savings(&utility, &solar, 25);
        let schedule = engine.schedule(&utility, &solar);

        assert_eq!(schedule.rows.len(), 25);
        let last = schedule.rows.last().unwrap();
        assert_eq!(last.year, 25);
        assert_relative_eq!(last.utility_cumulative, projection.utility_total, max_relative = 1e-10);
        assert_relative_eq!(last.solar_cumulative, projection.solar_total, max_relative = 1e-12);
        assert_relative_eq!(last.utility_monthly, projection.monthly_utility, max_relative = 1e-10);
        assert_relative_eq!(last.cumulative_savings, projection.savings, max_relative = 1e-9);
    }

    #[test]
    fn test_schedule_first_year() {
        let engine = ProjectionEngine::default();
        let utility = EscalatingSeries::new(100.0, 0.0, 3);
        let solar = EscalatingSeries::new(40.0, 0.0, 3);

        let schedule = engine.schedule(&utility, &solar);
        let first = &schedule.rows[0];

        assert_eq!(first.year, 1);
        assert_eq!(first.utility_annual, 1200.0);
        assert_eq!(first.solar_annual, 480.0);
        assert_eq!(first.cumulative_savings, 720.0);
        assert_eq!(schedule.rows[2].cumulative_savings, 2160.0);
    }
}
