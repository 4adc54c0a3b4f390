//! Pure inference flows: prompt construction plus the two-attempt model
//! runs. No persistence here; sessions and messages are owned by an
//! external service.

use serde_json::Value;

use crate::error::{CopilotError, Result};
use crate::llm::{
    build_diagnosis_prompt, build_extraction_prompt, run_json_with_retry, run_with_retry,
    LlmClient,
};
use crate::types::{DebugReport, DebugRequest, ParseRequest};

/// Extract structured debugging fields from raw pasted text.
///
/// Returns the extraction JSON object and the raw text of the accepted
/// model attempt.
pub async fn run_extract<C: LlmClient + ?Sized>(
    client: &C,
    req: &ParseRequest,
) -> Result<(Value, String)> {
    require_raw_input(&req.raw_input)?;
    let prompt = build_extraction_prompt(&req.raw_input);
    run_json_with_retry(client, &prompt).await
}

/// Produce a structured diagnosis from raw text, a prior extraction and
/// optional similar-bug text.
pub async fn run_diagnose<C: LlmClient + ?Sized>(
    client: &C,
    req: &DebugRequest,
) -> Result<(DebugReport, String)> {
    require_raw_input(&req.raw_input)?;
    let prompt =
        build_diagnosis_prompt(&req.raw_input, &req.parsed, req.similar_bugs.as_deref());
    run_with_retry(client, &prompt).await
}

fn require_raw_input(raw_input: &str) -> Result<()> {
    if raw_input.trim().is_empty() {
        return Err(CopilotError::InvalidInput(
            "raw_input must not be empty".into(),
        ));
    }
    Ok(())
}
