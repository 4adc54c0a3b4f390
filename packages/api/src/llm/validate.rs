use serde_json::Value;

use crate::error::{CopilotError, Result};
use crate::llm::normalize::{coerce_scalar, to_string_array};
use crate::types::DebugReport;

/// Required report fields, in check order. The first missing key is the one
/// named in the error; there is no aggregation.
pub const REQUIRED_FIELDS: [&str; 4] =
    ["error_type", "root_cause", "fix_suggestions", "prevention"];

/// Validate a parsed model output against the report contract and coerce it
/// into the wire-stable shape.
pub fn validate_report(value: &Value) -> Result<DebugReport> {
    let obj = value.as_object().ok_or_else(|| {
        CopilotError::SchemaValidation("model output is not a JSON object".into())
    })?;

    for key in REQUIRED_FIELDS {
        if !obj.contains_key(key) {
            return Err(CopilotError::SchemaValidation(format!(
                "missing field: {key}"
            )));
        }
    }

    Ok(DebugReport {
        error_type: coerce_scalar(&obj["error_type"]),
        root_cause: to_string_array(&obj["root_cause"]),
        fix_suggestions: to_string_array(&obj["fix_suggestions"]),
        prevention: to_string_array(&obj["prevention"]),
    })
}
