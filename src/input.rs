//! Input coercion for raw UI values
//!
//! Every value that reaches an engine passes through a [`Sanitizer`]. In the
//! default lenient mode the sanitizer is total: unparseable values fall back to
//! a named default and out-of-range values are clamped. The strict mode is for
//! tests and tooling and rejects the same values with an [`InputError`].

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{InputError, InputResult};

/// How malformed or out-of-range input is treated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputMode {
    /// Coerce to defaults and clamp into range
    #[default]
    Lenient,
    /// Reject with an error
    Strict,
}

/// A raw value as supplied by the UI layer: a JSON number or a text field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Number(f64),
    Text(String),
}

impl RawValue {
    /// Blank text counts as "not supplied"
    fn is_blank(&self) -> bool {
        matches!(self, RawValue::Text(s) if s.trim().is_empty())
    }

    fn parse(&self) -> Option<f64> {
        let value = match self {
            RawValue::Number(n) => *n,
            RawValue::Text(s) => s.trim().parse::<f64>().ok()?,
        };
        value.is_finite().then_some(value)
    }

    fn describe(&self) -> String {
        match self {
            RawValue::Number(n) => n.to_string(),
            RawValue::Text(s) => s.clone(),
        }
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        RawValue::Number(value)
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::Text(value.to_string())
    }
}

/// Clamp that maps NaN to `min`
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    if value.is_nan() {
        return min;
    }
    value.max(min).min(max)
}

/// Converts raw values into finite, in-range numbers
#[derive(Debug, Clone, Copy, Default)]
pub struct Sanitizer {
    mode: InputMode,
}

impl Sanitizer {
    pub fn new(mode: InputMode) -> Self {
        Self { mode }
    }

    pub fn lenient() -> Self {
        Self::new(InputMode::Lenient)
    }

    pub fn strict() -> Self {
        Self::new(InputMode::Strict)
    }

    pub fn mode(&self) -> InputMode {
        self.mode
    }

    /// Read a real-valued input, falling back to `fallback` when missing or blank
    pub fn number(
        &self,
        field: &'static str,
        raw: Option<&RawValue>,
        fallback: f64,
        min: f64,
        max: f64,
    ) -> InputResult<f64> {
        let value = match raw {
            None => fallback,
            Some(raw) if raw.is_blank() => fallback,
            Some(raw) => match raw.parse() {
                Some(value) => value,
                None => {
                    if self.mode == InputMode::Strict {
                        return Err(InputError::NotANumber { field, raw: raw.describe() });
                    }
                    debug!("{}: '{}' is not a number, using {}", field, raw.describe(), fallback);
                    fallback
                }
            },
        };

        if value < min || value > max || value.is_nan() {
            if self.mode == InputMode::Strict {
                return Err(InputError::OutOfRange { field, value, min, max });
            }
            let clamped = clamp(value, min, max);
            debug!("{}: {} clamped to {}", field, value, clamped);
            return Ok(clamped);
        }

        Ok(value)
    }

    /// Read an input that has no fixed default
    ///
    /// Missing or blank values give `None`; so do unparseable values in lenient mode.
    pub fn optional_number(
        &self,
        field: &'static str,
        raw: Option<&RawValue>,
        min: f64,
        max: f64,
    ) -> InputResult<Option<f64>> {
        let Some(raw) = raw.filter(|r| !r.is_blank()) else {
            return Ok(None);
        };
        if raw.parse().is_none() && self.mode == InputMode::Lenient {
            debug!("{}: '{}' is not a number, ignoring", field, raw.describe());
            return Ok(None);
        }
        // Parseable (or strict): the fallback is never used
        self.number(field, Some(raw), min, min, max).map(Some)
    }

    /// Read an integer input; fractional values are truncated toward zero
    pub fn integer(
        &self,
        field: &'static str,
        raw: Option<&RawValue>,
        fallback: u32,
        min: u32,
        max: u32,
    ) -> InputResult<u32> {
        let value = self.number(field, raw, fallback as f64, min as f64, max as f64)?;
        Ok(value.trunc() as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lenient_missing_and_blank_use_fallback() {
        let s = Sanitizer::lenient();
        assert_eq!(s.number("esc", None, 0.09, 0.0, 1.0).unwrap(), 0.09);
        assert_eq!(s.number("esc", Some(&"   ".into()), 0.09, 0.0, 1.0).unwrap(), 0.09);
    }

    #[test]
    fn test_lenient_garbage_uses_fallback() {
        let s = Sanitizer::lenient();
        assert_eq!(s.number("perf", Some(&"abc".into()), 0.85, 0.0, 1.0).unwrap(), 0.85);
        assert_eq!(s.number("perf", Some(&"NaN".into()), 0.85, 0.0, 1.0).unwrap(), 0.85);
        assert_eq!(s.number("perf", Some(&RawValue::Number(f64::INFINITY)), 0.85, 0.0, 1.0).unwrap(), 0.85);
    }

    #[test]
    fn test_lenient_clamps() {
        let s = Sanitizer::lenient();
        assert_eq!(s.number("bill", Some(&"-50".into()), 0.0, 0.0, 1e9).unwrap(), 0.0);
        assert_eq!(s.number("bill", Some(&RawValue::Number(5e12)), 0.0, 0.0, 1e9).unwrap(), 1e9);
        assert_eq!(s.integer("years", Some(&"45".into()), 25, 1, 30).unwrap(), 30);
        assert_eq!(s.integer("years", Some(&"0".into()), 25, 1, 30).unwrap(), 1);
    }

    #[test]
    fn test_integer_truncates() {
        let s = Sanitizer::lenient();
        assert_eq!(s.integer("qty", Some(&" 2.9 ".into()), 1, 0, 99).unwrap(), 2);
        assert_eq!(s.integer("qty", None, 1, 0, 99).unwrap(), 1);
    }

    #[test]
    fn test_strict_rejects() {
        let s = Sanitizer::strict();
        assert!(matches!(
            s.number("bill", Some(&"12x".into()), 0.0, 0.0, 1e9),
            Err(InputError::NotANumber { field: "bill", .. })
        ));
        assert!(matches!(
            s.integer("years", Some(&RawValue::Number(31.0)), 25, 1, 30),
            Err(InputError::OutOfRange { field: "years", .. })
        ));
        // Missing values still take the documented default
        assert_eq!(s.number("esc", None, 0.09, 0.0, 1.0).unwrap(), 0.09);
    }

    #[test]
    fn test_optional_number() {
        let lenient = Sanitizer::lenient();
        assert_eq!(lenient.optional_number("kw", None, 0.0, 10.0).unwrap(), None);
        assert_eq!(lenient.optional_number("kw", Some(&"".into()), 0.0, 10.0).unwrap(), None);
        assert_eq!(lenient.optional_number("kw", Some(&"oops".into()), 0.0, 10.0).unwrap(), None);
        assert_eq!(lenient.optional_number("kw", Some(&"25".into()), 0.0, 10.0).unwrap(), Some(10.0));

        let strict = Sanitizer::strict();
        assert!(strict.optional_number("kw", Some(&"oops".into()), 0.0, 10.0).is_err());
        assert_eq!(strict.optional_number("kw", Some(&"2.5".into()), 0.0, 10.0).unwrap(), Some(2.5));
    }

    #[test]
    fn test_raw_value_deserializes_numbers_and_strings() {
        let n: RawValue = serde_json::from_str("200").unwrap();
        let t: RawValue = serde_json::from_str("\"150.5\"").unwrap();
        assert_eq!(n, RawValue::Number(200.0));
        assert_eq!(t.parse(), Some(150.5));
    }

    #[test]
    fn test_clamp_nan() {
        assert_eq!(clamp(f64::NAN, 0.0, 1.0), 0.0);
        assert_eq!(clamp(0.5, 0.0, 1.0), 0.5);
    }
}
