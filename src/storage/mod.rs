//! Battery storage estimates: program credits and energy arbitrage

mod credit;
mod arbitrage;

pub use credit::{
    compute_monthly_credit, derive_capacity, estimate_committed_kw, BatteryCreditEngine, CreditDisplay,
    CreditEstimate, CreditInputs, DerivedCapacity, ProgramCredit, DEFAULT_PERFORMANCE_FACTOR,
    MAX_DISCHARGE_CAP_KW, MAX_QUANTITY,
};
pub use arbitrage::{
    charged_kwh, clamp_efficiency, clamp_kwh_per_day, simple_delta_daily_value, two_rate_daily_value,
    ArbitrageDisplay, ArbitrageEngine, ArbitrageEstimate, ArbitrageModel, DAYS_PER_MONTH,
    DEFAULT_KWH_PER_DAY, DEFAULT_ROUND_TRIP_EFFICIENCY, MAX_KWH_PER_DAY, MIN_ROUND_TRIP_EFFICIENCY,
};
