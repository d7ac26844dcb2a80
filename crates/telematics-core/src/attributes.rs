//! Raw attribute mapping and typed lookups over it

use std::str::FromStr;

use serde_json::Value;

use crate::error::{StateError, StateResult};

/// Flat key-value snapshot of a vehicle's reported telemetry, as returned by
/// the backend. Values are strings, numbers or booleans.
pub type AttributeMap = serde_json::Map<String, Value>;

/// Look up a key, failing if it is absent
pub(crate) fn value<'a>(map: &'a AttributeMap, key: &str) -> StateResult<&'a Value> {
    map.get(key)
        .ok_or_else(|| StateError::MissingAttribute(key.to_string()))
}

/// Read a string attribute.
///
/// Numbers and booleans are rejected: unit tags and enum values are always
/// strings on the wire.
pub(crate) fn string<'a>(map: &'a AttributeMap, key: &str) -> StateResult<&'a str> {
    match value(map, key)? {
        Value::String(s) => Ok(s.as_str()),
        other => Err(StateError::invalid(key, format!("expected string, got {}", other))),
    }
}

/// Read a floating point attribute from a JSON number or decimal string
pub(crate) fn float(map: &AttributeMap, key: &str) -> StateResult<f64> {
    let parsed = match value(map, key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    match parsed {
        Some(v) if v.is_finite() => Ok(v),
        _ => Err(StateError::invalid(key, "expected a number")),
    }
}

/// Read a non-negative integer attribute.
///
/// Integral floats (`"2201.0"`) are accepted since the backend is not
/// consistent about how it renders counters.
pub(crate) fn unsigned(map: &AttributeMap, key: &str) -> StateResult<u64> {
    let raw = value(map, key)?;
    if let Value::Number(n) = raw {
        if let Some(v) = n.as_u64() {
            return Ok(v);
        }
    }
    if let Value::String(s) = raw {
        if let Ok(v) = s.trim().parse::<u64>() {
            return Ok(v);
        }
    }

    let v = float(map, key)?;
    if v >= 0.0 && v.fract() == 0.0 && v <= u64::MAX as f64 {
        Ok(v as u64)
    } else {
        Err(StateError::invalid(
            key,
            format!("expected a non-negative integer, got {}", v),
        ))
    }
}

/// Read a string attribute and parse it into an enumeration
pub(crate) fn parsed<T>(map: &AttributeMap, key: &str) -> StateResult<T>
where
    T: FromStr<Err = StateError>,
{
    let raw = string(map, key)?;
    raw.parse::<T>().map_err(|e| match e {
        StateError::InvalidAttribute { reason, .. } => StateError::invalid(key, reason),
        other => other,
    })
}
