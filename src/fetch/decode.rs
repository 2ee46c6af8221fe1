use serde_json::Value;

use crate::domain::PriceQuote;
use crate::error::DayFetchFailure;

use super::DayResult;

/// Follow `path` through nested objects. `None` when any segment is absent.
pub fn walk_json_path<'a>(root: &'a Value, path: &[&str]) -> Option<&'a Value> {
    let mut cursor = root;
    for segment in path {
        cursor = cursor.get(*segment)?;
    }
    Some(cursor)
}

pub fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Decode a history payload body into the price found at `path`.
pub fn decode_price(body: &str, path: &[&str]) -> DayResult<PriceQuote> {
    let root: Value = serde_json::from_str(body)?;

    let value = walk_json_path(&root, path).ok_or_else(|| DayFetchFailure::MissingPrice {
        path: path.join("."),
    })?;

    value
        .as_f64()
        .and_then(PriceQuote::new)
        .ok_or_else(|| DayFetchFailure::InvalidPrice(value_to_string(value)))
}
