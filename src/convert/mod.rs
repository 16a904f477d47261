//! Conversion of raw cell text into typed values

mod json;

use crate::error::ConvertError;
use crate::model::{Scalar, TypeTag, Value};

pub use json::{from_json, parse_structured};

/// Longest source text that is stored as a 32-bit float
const FLOAT32_MAX_CHARS: usize = 7;

/// Convert one cell according to its column type
pub fn convert(tag: TypeTag, raw: &str) -> Result<Value, ConvertError> {
    match tag {
        TypeTag::Int => to_int(raw, true).ok_or_else(|| ConvertError::InvalidInt(raw.to_string())),
        TypeTag::Float => to_float(raw).ok_or_else(|| ConvertError::InvalidFloat(raw.to_string())),
        TypeTag::String => Ok(Value::Str(raw.to_string())),
        TypeTag::Auto => Ok(auto(raw)),
        TypeTag::List(scalar) => json::parse_list(tag, scalar, raw),
        TypeTag::NestedList(scalar) => json::parse_nested_list(tag, scalar, raw),
    }
}

/// Parse a base-10 integer.
///
/// With `truncate`, everything from the first `.` is dropped first, so
/// `"12.9"` reads as 12.
pub fn to_int(raw: &str, truncate: bool) -> Option<Value> {
    let digits = if truncate {
        raw.split('.').next().unwrap_or(raw)
    } else {
        raw
    };
    digits.parse::<i64>().ok().map(Value::Int)
}

/// Parse a float, narrowing short literals to 32 bits.
///
/// Text of at most seven characters whose magnitude fits an `f32` is
/// stored as `Float32`; anything longer keeps full precision.
pub fn to_float(raw: &str) -> Option<Value> {
    let value = raw.parse::<f64>().ok().filter(|v| v.is_finite())?;
    if raw.len() <= FLOAT32_MAX_CHARS && fits_f32(value) {
        Some(Value::Float32(value as f32))
    } else {
        Some(Value::Float64(value))
    }
}

fn fits_f32(value: f64) -> bool {
    let magnitude = value.abs();
    magnitude == 0.0
        || (magnitude >= f32::from_bits(1) as f64 && magnitude <= f32::MAX as f64)
}

/// Integer if possible, else float
pub fn to_number(raw: &str) -> Option<Value> {
    to_int(raw, false).or_else(|| to_float(raw))
}

/// Best-effort interpretation: number, then JSON object or array, then the
/// raw text unchanged.
pub fn auto(raw: &str) -> Value {
    to_number(raw)
        .or_else(|| parse_structured(raw))
        .unwrap_or_else(|| Value::Str(raw.to_string()))
}

impl Scalar {
    /// Whether a JSON element is acceptable for this element type
    pub(crate) fn accepts(self, value: &serde_json::Value) -> bool {
        match self {
            Scalar::Int => value.as_i64().is_some(),
            Scalar::Float => value.is_number(),
            Scalar::String => value.is_string(),
            Scalar::Any => true,
        }
    }
}
