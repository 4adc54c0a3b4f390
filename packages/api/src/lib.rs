pub mod config;
pub mod error;
pub mod handlers;
pub mod llm;
pub mod service;
pub mod types;

pub use config::{LlmConfig, Mode};
pub use error::{CopilotError, Result};

use axum::routing::{get, post};
use axum::Router;

/// The API surface: health check plus the two inference operations.
pub fn router() -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/parse", post(handlers::parse))
        .route("/debug", post(handlers::debug))
}
