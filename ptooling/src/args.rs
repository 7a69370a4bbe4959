//! JSON argument parsing helpers for function and trait-based tools.
//!
//! ```rust
//! use ptooling::{optional_i64, parse_json_object, required_string};
//!
//! let args = parse_json_object(r#"{"location":"Bangkok","days":2}"#).expect("object should parse");
//! assert_eq!(required_string(&args, "location").expect("location"), "Bangkok");
//! assert_eq!(optional_i64(&args, "days"), Some(2));
//! ```

use serde_json::{Map, Value};

use crate::ToolError;

pub fn parse_json_value(args_json: &str) -> Result<Value, ToolError> {
    serde_json::from_str(args_json).map_err(|err| ToolError::malformed_arguments(err.to_string()))
}

/// Parses a model-supplied argument payload. A JSON `null` decodes to an empty map.
pub fn parse_json_object(args_json: &str) -> Result<Map<String, Value>, ToolError> {
    match parse_json_value(args_json)? {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(Map::new()),
        _ => Err(ToolError::malformed_arguments(
            "expected JSON object arguments",
        )),
    }
}

pub fn required_string(args: &Map<String, Value>, key: &str) -> Result<String, ToolError> {
    optional_string(args, key)
        .ok_or_else(|| ToolError::invalid_arguments(format!("missing '{key}'")))
}

/// Non-blank string value, trimmed.
pub fn optional_string(args: &Map<String, Value>, key: &str) -> Option<String> {
    args.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(ToString::to_string)
}

pub fn optional_f64(args: &Map<String, Value>, key: &str) -> Option<f64> {
    args.get(key).and_then(Value::as_f64)
}

/// Integer value; fractional numbers are truncated toward zero.
pub fn optional_i64(args: &Map<String, Value>, key: &str) -> Option<i64> {
    let value = args.get(key)?;
    value
        .as_i64()
        .or_else(|| value.as_f64().map(|number| number.trunc() as i64))
}
