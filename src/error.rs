//! Error types for catalog loading, strict input validation and configuration

use thiserror::Error;

/// Rejections raised by the strict input mode
///
/// The lenient mode never produces these; it coerces and clamps instead.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    #[error("{field}: '{raw}' is not a number")]
    NotANumber { field: &'static str, raw: String },

    #[error("{field}: {value} is outside [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
}

/// Problems with catalog data (built-in or loaded from CSV)
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("{0} catalog has no entries")]
    Empty(&'static str),

    #[error("{catalog} catalog has duplicate key '{key}'")]
    DuplicateKey { catalog: &'static str, key: String },

    #[error("{catalog} entry '{key}' is invalid: {reason}")]
    InvalidEntry {
        catalog: &'static str,
        key: String,
        reason: String,
    },

    #[error("catalog file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("catalog CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Top-level error for the estimator
#[derive(Debug, Error)]
pub enum EstimatorError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("config file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config parse error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, EstimatorError>;

/// Result of sanitizing or validating request input
pub type InputResult<T> = std::result::Result<T, InputError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_error_messages() {
        let err = InputError::NotANumber { field: "bill", raw: "abc".to_string() };
        assert_eq!(err.to_string(), "bill: 'abc' is not a number");

        let err = InputError::OutOfRange { field: "years", value: 45.0, min: 1.0, max: 30.0 };
        assert_eq!(err.to_string(), "years: 45 is outside [1, 30]");
    }

    #[test]
    fn test_input_error_wraps_transparently() {
        let err: EstimatorError = InputError::NotANumber { field: "perf", raw: "x".into() }.into();
        assert_eq!(err.to_string(), "perf: 'x' is not a number");
    }

    #[test]
    fn test_input_result_propagates_into_estimator_result() {
        fn checked(value: f64) -> InputResult<f64> {
            if value < 0.0 {
                return Err(InputError::OutOfRange { field: "bill", value, min: 0.0, max: 1e9 });
            }
            Ok(value)
        }
        fn run(value: f64) -> Result<f64> {
            Ok(checked(value)? * 2.0)
        }

        assert_eq!(run(2.0).unwrap(), 4.0);
        assert!(matches!(run(-1.0), Err(EstimatorError::Input(InputError::OutOfRange { field: "bill", .. }))));
    }
}
