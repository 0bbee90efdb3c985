//! Custom deserializers for lenient parsing of oracle output.
//!
//! The oracle is a best-effort text system, so numeric fields sometimes arrive
//! as strings and list fields as `null`. These deserializers accept those
//! shapes while still rejecting values that cannot be interpreted at all.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Deserializes a float from a JSON number or a numeric string.
///
/// # Accepted Formats
///
/// * **Number**: `0.75`, `1`
/// * **String numeric**: `"0.75"`, `" 0.3 "`
///
/// Range checking is left to validation so the original value can be reported.
pub fn de_f64_forgiving<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;
    match Value::deserialize(deserializer)? {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| D::Error::custom("invalid numeric for score")),
        Value::String(s) => s.trim().parse::<f64>().map_err(|_| {
            D::Error::custom(format!("Invalid score '{}'. Expected a number 0.0-1.0", s))
        }),
        other => Err(D::Error::custom(format!(
            "invalid type for score: {}",
            other
        ))),
    }
}

/// Deserializes a line number from an integer, an integral float, or a numeric string.
///
/// Negative and fractional values are rejected.
pub fn de_u32_forgiving<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;
    let val = match Value::deserialize(deserializer)? {
        Value::Number(n) => {
            if let Some(u) = n.as_u64() {
                u as f64
            } else if let Some(f) = n.as_f64() {
                f
            } else {
                return Err(D::Error::custom("invalid numeric for line_number"));
            }
        }
        Value::String(s) => s.trim().parse::<f64>().map_err(|_| {
            D::Error::custom(format!("Invalid line_number '{}'", s))
        })?,
        other => {
            return Err(D::Error::custom(format!(
                "invalid type for line_number: {}",
                other
            )));
        }
    };
    if !val.is_finite() || val < 0.0 || val.fract() != 0.0 || val > u32::MAX as f64 {
        return Err(D::Error::custom(format!(
            "line_number must be a non-negative integer, got {}",
            val
        )));
    }
    Ok(val as u32)
}

/// `null` and missing become an empty string
pub fn de_string_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accepts a list of strings, a single string, or `null`.
///
/// Blank entries are dropped and surrounding whitespace trimmed; cue labels
/// are otherwise kept verbatim so unknown ones can be reported.
pub fn de_string_list_forgiving<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;
    let items = match Value::deserialize(deserializer)? {
        Value::Null => Vec::new(),
        Value::String(s) => vec![s],
        Value::Array(arr) => arr
            .into_iter()
            .map(|v| match v {
                Value::String(s) => Ok(s),
                other => Err(D::Error::custom(format!(
                    "invalid cue entry: {}",
                    other
                ))),
            })
            .collect::<Result<Vec<_>, _>>()?,
        other => {
            return Err(D::Error::custom(format!(
                "invalid type for cue list: {}",
                other
            )));
        }
    };
    Ok(items
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect())
}
