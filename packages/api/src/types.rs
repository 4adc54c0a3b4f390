use serde::{Deserialize, Serialize};
use serde_json::Value;

/// `POST /parse` request body.
#[derive(Debug, Clone, Deserialize)]
pub struct ParseRequest {
    /// The user's pasted debugging text, as-is.
    pub raw_input: String,
}

/// `POST /debug` request body.
#[derive(Debug, Clone, Deserialize)]
pub struct DebugRequest {
    /// The original pasted text, kept for extra context.
    pub raw_input: String,
    /// Structured extraction produced by the parse step.
    pub parsed: Value,
    /// Optional pre-fetched similar-bug text; retrieval itself is external.
    #[serde(default)]
    pub similar_bugs: Option<String>,
}

/// The validated four-field report returned to callers.
///
/// Wire-stable: field names and array-of-string typing must not change
/// without a version bump.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebugReport {
    pub error_type: String,
    pub root_cause: Vec<String>,
    pub fix_suggestions: Vec<String>,
    pub prevention: Vec<String>,
}

/// `POST /debug` response body.
#[derive(Debug, Clone, Serialize)]
pub struct DebugResponse {
    #[serde(flatten)]
    pub report: DebugReport,
    /// Raw text of the model attempt that produced the accepted report.
    pub raw_model_output: String,
}

/// `POST /parse` response body.
#[derive(Debug, Clone, Serialize)]
pub struct ParseResponse {
    pub parsed: Value,
    pub raw_model_output: String,
}

/// `GET /health` response body.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub ok: bool,
}
