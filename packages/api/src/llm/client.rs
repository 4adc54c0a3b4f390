use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::config::{LlmConfig, Mode};
use crate::error::{CopilotError, Result};

/// Fixed system instruction sent in chat mode to maximize format stability.
const SYSTEM_PROMPT: &str = "You are a senior debugging assistant. Output JSON only.";

/// Low temperature keeps chat-mode decoding deterministic enough for JSON.
const CHAT_TEMPERATURE: f64 = 0.2;

/// Trait for model gateways, enabling mocking in tests.
///
/// One external call per invocation; no internal retry. Retries, when they
/// happen at all, are the orchestrator's business.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Send a prompt to the inference endpoint and return its raw text.
    async fn invoke(&self, prompt: &str) -> Result<String>;
}

/// Ollama HTTP client implementation.
pub struct OllamaClient {
    http: reqwest::Client,
    config: LlmConfig,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    stream: bool,
    options: ChatOptions,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
struct ChatOptions {
    temperature: f64,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    message: Option<ChatResponseMessage>,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: Option<String>,
}

impl OllamaClient {
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs_f64(config.timeout_secs))
            .build()
            .map_err(CopilotError::LlmApiRequest)?;

        Ok(Self {
            http,
            config: config.clone(),
        })
    }

    async fn invoke_chat(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/api/chat", self.config.base_url);
        let body = ChatRequest {
            model: &self.config.model,
            stream: false,
            options: ChatOptions {
                temperature: CHAT_TEMPERATURE,
            },
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
        };

        let resp = self.http.post(&url).json(&body).send().await?;
        let status = resp.status().as_u16();

        if status >= 400 {
            let message = resp.text().await.unwrap_or_default();
            return Err(CopilotError::LlmApiError { status, message });
        }

        let data: ChatResponse = resp
            .json()
            .await
            .map_err(|e| CopilotError::LlmResponseParse(e.to_string()))?;

        // Absent message/content means the model streamed nothing; the
        // permissive empty-string default lets the parse layer report it.
        Ok(data.message.and_then(|m| m.content).unwrap_or_default())
    }

    async fn invoke_generate(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/api/generate", self.config.base_url);
        let body = GenerateRequest {
            model: &self.config.model,
            prompt,
            stream: false,
        };

        let resp = self.http.post(&url).json(&body).send().await?;
        let status = resp.status().as_u16();
        let text = resp.text().await?;
        debug!(status, body = %text, "generate response");

        if status >= 400 {
            return Err(CopilotError::LlmApiError {
                status,
                message: text,
            });
        }

        let data: GenerateResponse = serde_json::from_str(&text)
            .map_err(|e| CopilotError::LlmResponseParse(e.to_string()))?;

        Ok(data.response.unwrap_or_default())
    }
}

#[async_trait]
impl LlmClient for OllamaClient {
    async fn invoke(&self, prompt: &str) -> Result<String> {
        debug!(
            base_url = %self.config.base_url,
            model = %self.config.model,
            mode = self.config.mode.as_str(),
            timeout_secs = self.config.timeout_secs,
            "model call"
        );

        match self.config.mode {
            Mode::Chat => self.invoke_chat(prompt).await,
            Mode::Generate => self.invoke_generate(prompt).await,
        }
    }
}

/// Test utilities for the model gateway.
#[cfg(any(test, feature = "test-utils"))]
pub mod test_support {
    use super::*;
    use std::sync::Mutex;

    /// Mock gateway for testing. Returns pre-configured responses in order
    /// and records every prompt it was invoked with.
    pub struct MockLlmClient {
        responses: Mutex<Vec<Result<String>>>,
        prompts: Mutex<Vec<String>>,
    }

    impl MockLlmClient {
        pub fn new(responses: Vec<Result<String>>) -> Self {
            // Reverse so we can pop from the end
            let mut responses = responses;
            responses.reverse();
            Self {
                responses: Mutex::new(responses),
                prompts: Mutex::new(Vec::new()),
            }
        }

        pub fn with_response(content: &str) -> Self {
            Self::new(vec![Ok(content.to_string())])
        }

        pub fn with_responses(contents: Vec<&str>) -> Self {
            Self::new(contents.into_iter().map(|c| Ok(c.to_string())).collect())
        }

        /// Prompts received so far, in invocation order.
        pub fn prompts(&self) -> Vec<String> {
            self.prompts
                .lock()
                .map(|p| p.clone())
                .unwrap_or_default()
        }
    }

    #[async_trait]
    impl LlmClient for MockLlmClient {
        async fn invoke(&self, prompt: &str) -> Result<String> {
            self.prompts
                .lock()
                .map_err(|e| CopilotError::LlmResponseParse(format!("mock lock poisoned: {e}")))?
                .push(prompt.to_string());

            let mut responses = self.responses.lock().map_err(|e| {
                CopilotError::LlmResponseParse(format!("mock lock poisoned: {e}"))
            })?;
            responses.pop().unwrap_or_else(|| {
                Err(CopilotError::LlmResponseParse(
                    "mock has no more responses".into(),
                ))
            })
        }
    }
}
