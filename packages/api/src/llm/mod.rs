mod client;
mod normalize;
mod prompt;
mod runner;
mod validate;

pub use client::{LlmClient, OllamaClient};
#[cfg(any(test, feature = "test-utils"))]
pub use client::test_support::MockLlmClient;
pub use normalize::{strip_code_fences, to_string_array};
pub use prompt::{build_diagnosis_prompt, build_extraction_prompt};
pub use runner::{
    run_json_with_retry, run_with_retry, Attempt, RETRY_INSTRUCTION, RETRY_INSTRUCTION_JSON,
};
pub use validate::{validate_report, REQUIRED_FIELDS};
