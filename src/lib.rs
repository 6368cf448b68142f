//! Solar Estimator - savings projection and battery program estimates
//!
//! This library provides:
//! - Utility bill vs. solar payment projections under monthly-compounded escalation
//! - Battery incentive program credit estimates bounded by fleet discharge capability
//! - Energy arbitrage estimates (two-rate or simple delta pricing)
//! - Lenient input coercion with an optional strict mode, and display formatting
//! - Parallel scenario sweeps

pub mod error;
pub mod input;
pub mod format;
pub mod catalog;
pub mod projection;
pub mod storage;
pub mod config;
pub mod scenario;
pub mod request;

// Re-export commonly used types
pub use catalog::Catalogs;
pub use config::EstimatorConfig;
pub use error::{EstimatorError, InputError, InputResult, CatalogError};
pub use projection::{EscalatingSeries, ProjectionEngine, SavingsProjection};
pub use storage::{ArbitrageEngine, BatteryCreditEngine};
pub use scenario::ScenarioRunner;
pub use request::{Estimator, EstimateRequest, EstimateResponse};
