//! Reducing free-form model replies to a JSON object.
//!
//! Models are told to answer with JSON only but often wrap the answer in a
//! markdown code fence or surround it with prose. [`extract_json`] strips an
//! optional fence, then falls back to the outermost `{ ... }` span. Anything
//! that still fails to parse is a [`TravelPlannerError::MalformedModelResponse`]
//! carrying the raw text.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{Result, TravelPlannerError};

const FENCE: &str = "```";

/// Parse a model reply into a JSON object
pub fn extract_json(raw: &str) -> Result<Value> {
    let candidate = strip_code_fence(raw.trim());

    let reason = match serde_json::from_str::<Value>(candidate) {
        Ok(Value::Object(map)) => return Ok(Value::Object(map)),
        // Valid JSON of the wrong shape is not worth guessing around
        Ok(other) => {
            return Err(TravelPlannerError::malformed(
                raw,
                format!("expected a JSON object, found {}", json_type(&other)),
            ));
        }
        Err(e) => e.to_string(),
    };

    let Some(sliced) = outermost_braces(candidate) else {
        return Err(TravelPlannerError::malformed(
            raw,
            format!("no JSON object found: {reason}"),
        ));
    };

    match serde_json::from_str::<Value>(sliced) {
        Ok(Value::Object(map)) => {
            tracing::debug!("Recovered JSON object by brace slicing");
            Ok(Value::Object(map))
        }
        Ok(other) => Err(TravelPlannerError::malformed(
            raw,
            format!("expected a JSON object, found {}", json_type(&other)),
        )),
        Err(e) => Err(TravelPlannerError::malformed(raw, e.to_string())),
    }
}

/// [`extract_json`] followed by typed deserialization. A shape mismatch is
/// reported as a malformed response as well.
pub fn extract_as<T: DeserializeOwned>(raw: &str) -> Result<T> {
    let value = extract_json(raw)?;
    serde_json::from_value(value).map_err(|e| TravelPlannerError::malformed(raw, e.to_string()))
}

/// Remove a leading fence (with an optional `json` tag) and a trailing fence
fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix(FENCE) else {
        return text;
    };
    let rest = match rest.get(..4) {
        Some(tag) if tag.eq_ignore_ascii_case("json") => &rest[4..],
        _ => rest,
    };
    let rest = rest.strip_suffix(FENCE).unwrap_or(rest);
    rest.trim()
}

/// Slice from the first `{` to the last `}` inclusive
fn outermost_braces(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (start < end).then(|| &text[start..=end])
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
