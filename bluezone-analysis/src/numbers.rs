//! Numeric conversion helpers centralizing lossy casts and lenient JSON reads.

use num_traits::cast::cast;
use serde_json::Value;

/// Convert a count to f64 while allowing precision loss in a single location.
#[must_use]
pub fn count_to_f64(value: usize) -> f64 {
    cast::<usize, f64>(value).unwrap_or(0.0)
}

/// Keep finite values, map NaN and infinities to `None`.
#[must_use]
pub fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

/// Read a JSON value as a number the way a loosely written run document means it.
///
/// Numbers and numeric strings convert; booleans read as 1 and 0. Null, arrays,
/// objects and non-finite results read as absent.
#[must_use]
pub fn lenient_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64().and_then(finite),
        Value::String(text) => text.trim().parse::<f64>().ok().and_then(finite),
        Value::Bool(flag) => Some(if *flag { 1.0 } else { 0.0 }),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
