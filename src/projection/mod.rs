//! Escalating-cost projection: utility bill vs. solar payment

mod rates;
mod series;
mod engine;
mod schedule;

pub use rates::{annual_to_monthly_rate, MONTHS_PER_YEAR};
pub use series::{
    clamp_years, month_at_end_of_year, monthly_amounts, sum_series, EscalatingSeries, YearSnapshot,
    MAX_MONTHLY_BASE, MAX_YEARS, MIN_YEARS,
};
pub use engine::{
    ProjectionConfig, ProjectionEngine, RatePolicy, SavingsDisplay, SavingsPolicy, SavingsProjection,
};
pub use schedule::{SavingsSchedule, ScheduleSummary, YearRow};
