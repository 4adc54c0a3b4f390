use std::env;

/// Wire mode for the inference endpoint.
///
/// `chat` sends a system + user message pair to `/api/chat`; `generate`
/// sends the bare prompt to `/api/generate`. Anything that is not
/// `generate` falls back to chat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Chat,
    Generate,
}

impl Mode {
    pub fn parse(value: &str) -> Self {
        if value.eq_ignore_ascii_case("generate") {
            Mode::Generate
        } else {
            Mode::Chat
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Chat => "chat",
            Mode::Generate => "generate",
        }
    }
}

/// Configuration for the model gateway.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub base_url: String,
    pub model: String,
    pub mode: Mode,
    /// Per-call timeout in seconds. Fractional values are allowed
    /// (`OLLAMA_TIMEOUT=1.5`).
    pub timeout_secs: f64,
}

impl LlmConfig {
    /// Load configuration from environment variables.
    ///
    /// Resolved at call time rather than cached at startup, so overrides
    /// change effective behavior without a reload step. Every variable has
    /// a default; this never fails.
    pub fn from_env() -> Self {
        let base_url = env::var("OLLAMA_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:11434".into());
        let model =
            env::var("OLLAMA_MODEL").unwrap_or_else(|_| "qwen2.5:7b-instruct".into());
        let mode = env::var("OLLAMA_MODE")
            .map(|v| Mode::parse(&v))
            .unwrap_or(Mode::Chat);
        let timeout_secs = env::var("OLLAMA_TIMEOUT")
            .ok()
            .and_then(|v| parse_timeout_secs(&v))
            .unwrap_or(120.0);

        Self {
            base_url,
            model,
            mode,
            timeout_secs,
        }
    }

    /// Create a config builder for testing.
    pub fn builder() -> LlmConfigBuilder {
        LlmConfigBuilder {
            base_url: "http://localhost:11434".into(),
            model: "qwen2.5:7b-instruct".into(),
            mode: Mode::Chat,
            timeout_secs: 120.0,
        }
    }
}

/// A timeout value from the environment: any positive, finite number of
/// seconds, fractional included.
fn parse_timeout_secs(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|t| t.is_finite() && *t > 0.0)
}

/// Builder for constructing `LlmConfig` in tests.
pub struct LlmConfigBuilder {
    base_url: String,
    model: String,
    mode: Mode,
    timeout_secs: f64,
}

impl LlmConfigBuilder {
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    pub fn timeout_secs(mut self, timeout_secs: f64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    pub fn build(self) -> LlmConfig {
        LlmConfig {
            base_url: self.base_url,
            model: self.model,
            mode: self.mode,
            timeout_secs: self.timeout_secs,
        }
    }
}
