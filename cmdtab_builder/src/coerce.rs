use std::collections::BTreeMap;
use thiserror::Error;

use crate::constant::*;
use crate::model::{Kind, Number, Value};
use crate::schema::Inclusion;

#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum CoercionError {
    #[error("cannot convert '{token}' to {kind}.")]
    Invalid { token: String, kind: Kind },

    #[error("'{token}' is not amongst the allowed values.")]
    Excluded { token: String },
}

/// Convert a raw token into a value of `kind`.
pub(crate) fn coerce(raw: &str, kind: Kind) -> Result<Value, CoercionError> {
    let invalid = || CoercionError::Invalid {
        token: raw.to_string(),
        kind,
    };

    match kind {
        Kind::String | Kind::Greedy => Ok(Value::String(raw.to_string())),
        Kind::Numeric => parse_number(raw).map(Value::Numeric).ok_or_else(invalid),
        Kind::Boolean => parse_bool(raw).map(Value::Boolean).ok_or_else(invalid),
        Kind::Array => Ok(Value::Array(split_array(raw))),
        Kind::Hash => parse_hash(raw).map(Value::Hash).ok_or_else(invalid),
    }
}

/// Check a coerced value against the declared inclusion constraint.
/// An array is checked item by item.
pub(crate) fn check_inclusion(
    value: &Value,
    allowed: Option<&Inclusion>,
) -> Result<(), CoercionError> {
    let allowed = match allowed {
        Some(allowed) => allowed,
        None => return Ok(()),
    };

    let excluded = match value {
        Value::Array(items) => items
            .iter()
            .find(|item| !allowed.contains(&Value::String(item.to_string())))
            .cloned(),
        _ if allowed.contains(value) => None,
        _ => Some(value.to_string()),
    };

    match excluded {
        Some(token) => Err(CoercionError::Excluded { token }),
        None => Ok(()),
    }
}

pub(crate) fn parse_number(raw: &str) -> Option<Number> {
    if let Ok(i) = raw.parse::<i64>() {
        return Some(Number::Integer(i));
    }

    match raw.parse::<f64>() {
        // Reject the non-lexical forms f64 accepts, such as "inf" and "NaN".
        Ok(f) if f.is_finite() => Some(Number::Float(f)),
        _ => None,
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" => Some(true),
        "false" | "no" | "0" => Some(false),
        _ => None,
    }
}

fn split_array(raw: &str) -> Vec<String> {
    raw.split(ARRAY_DELIMITER)
        .filter(|item| !item.is_empty())
        .map(String::from)
        .collect()
}

// The first ':' of each pair separates key from value; later ones belong to the value.
fn parse_hash(raw: &str) -> Option<BTreeMap<String, String>> {
    let mut map = BTreeMap::default();

    for pair in raw.split(ARRAY_DELIMITER).filter(|pair| !pair.is_empty()) {
        match pair.split_once(HASH_DELIMITER) {
            Some((key, value)) if !key.is_empty() => {
                map.insert(key.to_string(), value.to_string());
            }
            _ => return None,
        }
    }

    if map.is_empty() {
        None
    } else {
        Some(map)
    }
}
