use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Largest integer an `f64` holds exactly; beyond it integral values keep float form.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// The value half of a history entry.
///
/// Persisted history written by older clients may carry a string or a
/// `null` (non-finite results serialize that way), so all three shapes
/// are accepted on read.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ResultValue {
    Number(f64),
    Text(String),
    Null,
}

impl ResultValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            ResultValue::Number(n) => Some(*n),
            _ => None,
        }
    }
}

impl From<f64> for ResultValue {
    fn from(value: f64) -> Self {
        ResultValue::Number(value)
    }
}

impl From<String> for ResultValue {
    fn from(value: String) -> Self {
        ResultValue::Text(value)
    }
}

impl Serialize for ResultValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            // Integral values go out as JSON integers: `14`, not `14.0`.
            ResultValue::Number(n) if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER => {
                serializer.serialize_i64(*n as i64)
            }
            ResultValue::Number(n) => serializer.serialize_f64(*n),
            ResultValue::Text(s) => serializer.serialize_str(s),
            ResultValue::Null => serializer.serialize_unit(),
        }
    }
}

impl fmt::Display for ResultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResultValue::Number(n) => f.write_str(&format_number(*n)),
            ResultValue::Text(s) => f.write_str(s),
            ResultValue::Null => f.write_str("null"),
        }
    }
}

/// One past evaluation. Field order is the persisted key order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub expression: String,
    pub result: ResultValue,
    pub timestamp: String,
}

impl HistoryRecord {
    pub fn new(
        expression: impl Into<String>,
        result: impl Into<ResultValue>,
        timestamp: impl Into<String>,
    ) -> Self {
        Self {
            expression: expression.into(),
            result: result.into(),
            timestamp: timestamp.into(),
        }
    }
}

/// Formats a number the way a browser stringifies it.
///
/// Plain decimal notation with the shortest round-tripping digits inside
/// `[1e-6, 1e21)`, exponent notation with an explicit sign outside it.
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }

    let abs = value.abs();
    if (1e-6..1e21).contains(&abs) {
        return format!("{}", value);
    }

    let exp = format!("{:e}", value);
    match exp.split_once('e') {
        Some((mantissa, power)) if !power.starts_with('-') => format!("{}e+{}", mantissa, power),
        _ => exp,
    }
}
