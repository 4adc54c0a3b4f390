use thiserror::Error;

#[derive(Debug, Error)]
pub enum CopilotError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("LLM API request failed: {0}")]
    LlmApiRequest(#[from] reqwest::Error),

    #[error("LLM API error (status {status}): {message}")]
    LlmApiError { status: u16, message: String },

    #[error("failed to parse LLM response envelope: {0}")]
    LlmResponseParse(String),

    #[error("model output is not valid JSON: {0}")]
    ModelOutputParse(#[source] serde_json::Error),

    #[error("schema validation failed: {0}")]
    SchemaValidation(String),
}

impl CopilotError {
    /// Parse and schema failures are the only kinds the orchestrator may
    /// answer with a corrective retry. Gateway failures never retry.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            CopilotError::ModelOutputParse(_) | CopilotError::SchemaValidation(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, CopilotError>;
