use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{CopilotError, Result};
use crate::llm::client::LlmClient;
use crate::llm::normalize::strip_code_fences;
use crate::llm::validate::validate_report;
use crate::types::DebugReport;

/// Appended to the original prompt when the first report attempt fails.
pub const RETRY_INSTRUCTION: &str = "\n\nYour output did not meet the required format. \
     Please output JSON only and include fields \
     error_type/root_cause/fix_suggestions/prevention.";

/// Appended to the original prompt when the first extraction attempt fails.
pub const RETRY_INSTRUCTION_JSON: &str = "\n\nYour output did not meet the required format. \
     Please output a single JSON object only, with no explanations or \
     markdown fences.";

/// Only the first 800 characters of a rejected raw output survive into logs.
const RAW_SNIPPET_LIMIT: usize = 800;

/// Which of the two allowed gateway calls produced the output being parsed.
/// There is no third state: a failure on `Retry` propagates to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attempt {
    First,
    Retry,
}

impl Attempt {
    pub fn as_str(self) -> &'static str {
        match self {
            Attempt::First => "first",
            Attempt::Retry => "retry",
        }
    }
}

fn log_raw_snippet(raw: &str, reason: &str) {
    let snippet: String = raw.chars().take(RAW_SNIPPET_LIMIT).collect();
    warn!(reason = %reason, snippet = %snippet, "model output rejected");
}

/// Fence-strip and parse raw model text. On failure, the snippet logged is
/// taken from the original raw text, not the stripped text.
fn parse_model_output(raw: &str, attempt: Attempt) -> Result<Value> {
    let stripped = strip_code_fences(raw);
    serde_json::from_str(stripped).map_err(|e| {
        log_raw_snippet(raw, &format!("{}:json", attempt.as_str()));
        CopilotError::ModelOutputParse(e)
    })
}

fn interpret_report(raw: &str, attempt: Attempt) -> Result<DebugReport> {
    let value = parse_model_output(raw, attempt)?;
    validate_report(&value).map_err(|e| {
        log_raw_snippet(raw, &format!("{}:schema", attempt.as_str()));
        e
    })
}

/// The extraction contract is looser than the report's, but still requires
/// a JSON object: a bare scalar or array is a schema failure, routed
/// through the same one-retry path.
fn interpret_json(raw: &str, attempt: Attempt) -> Result<Value> {
    let value = parse_model_output(raw, attempt)?;
    if !value.is_object() {
        log_raw_snippet(raw, &format!("{}:schema", attempt.as_str()));
        return Err(CopilotError::SchemaValidation(
            "model output is not a JSON object".into(),
        ));
    }
    Ok(value)
}

/// Invoke the gateway and interpret the output as a debug report, retrying
/// exactly once with a corrective prompt on parse or schema failure.
///
/// Returns the report together with the raw text of the attempt that
/// produced it. Gateway failures propagate immediately from either call;
/// a parse/schema failure on the retry propagates unhandled.
pub async fn run_with_retry<C: LlmClient + ?Sized>(
    client: &C,
    prompt: &str,
) -> Result<(DebugReport, String)> {
    let raw = client.invoke(prompt).await?;

    match interpret_report(&raw, Attempt::First) {
        Ok(report) => Ok((report, raw)),
        Err(e) if e.is_retryable() => {
            debug!(error = %e, "first attempt rejected, retrying once with corrective prompt");
            let retry_prompt = format!("{prompt}{RETRY_INSTRUCTION}");
            let raw_retry = client.invoke(&retry_prompt).await?;
            let report = interpret_report(&raw_retry, Attempt::Retry)?;
            Ok((report, raw_retry))
        }
        Err(e) => Err(e),
    }
}

/// Same two-attempt policy for outputs that only need to be a JSON object
/// (the extraction path), without per-field validation.
pub async fn run_json_with_retry<C: LlmClient + ?Sized>(
    client: &C,
    prompt: &str,
) -> Result<(Value, String)> {
    let raw = client.invoke(prompt).await?;

    match interpret_json(&raw, Attempt::First) {
        Ok(value) => Ok((value, raw)),
        Err(e) if e.is_retryable() => {
            debug!(error = %e, "first attempt rejected, retrying once with corrective prompt");
            let retry_prompt = format!("{prompt}{RETRY_INSTRUCTION_JSON}");
            let raw_retry = client.invoke(&retry_prompt).await?;
            let value = interpret_json(&raw_retry, Attempt::Retry)?;
            Ok((value, raw_retry))
        }
        Err(e) => Err(e),
    }
}
