use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::config::LlmConfig;
use crate::error::CopilotError;
use crate::llm::OllamaClient;
use crate::service;
use crate::types::{
    DebugRequest, DebugResponse, HealthResponse, ParseRequest, ParseResponse,
};

impl IntoResponse for CopilotError {
    fn into_response(self) -> Response {
        let status = match &self {
            // Gateway-class failures: the inference endpoint is the problem.
            CopilotError::LlmApiRequest(_)
            | CopilotError::LlmApiError { .. }
            | CopilotError::LlmResponseParse(_) => StatusCode::BAD_GATEWAY,
            CopilotError::InvalidInput(_) => StatusCode::UNPROCESSABLE_ENTITY,
            // Parse/schema failures after the retry are a backend reasoning
            // problem, not a user-input error.
            CopilotError::ModelOutputParse(_) | CopilotError::SchemaValidation(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        // The message never carries the raw model text; only the bounded
        // diagnostic snippet in the logs does.
        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { ok: true })
}

/// Run the extraction flow over pasted text.
pub async fn parse(
    Json(req): Json<ParseRequest>,
) -> Result<Json<ParseResponse>, CopilotError> {
    let config = LlmConfig::from_env();
    let client = OllamaClient::new(&config)?;

    let (parsed, raw) = service::run_extract(&client, &req)
        .await
        .inspect_err(|e| tracing::error!(error = %e, "parse request failed"))?;

    Ok(Json(ParseResponse {
        parsed,
        raw_model_output: raw,
    }))
}

/// Run the diagnosis flow over pasted text plus a prior extraction.
pub async fn debug(
    Json(req): Json<DebugRequest>,
) -> Result<Json<DebugResponse>, CopilotError> {
    let config = LlmConfig::from_env();
    let client = OllamaClient::new(&config)?;

    let (report, raw) = service::run_diagnose(&client, &req)
        .await
        .inspect_err(|e| tracing::error!(error = %e, "debug request failed"))?;

    Ok(Json(DebugResponse {
        report,
        raw_model_output: raw,
    }))
}
