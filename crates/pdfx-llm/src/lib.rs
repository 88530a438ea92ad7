//! pdfx LLM connectivity layer
//!
//! Checks that a chat-completion API is reachable with the configured key
//! before extraction work is pointed at it.
//!
//! # Providers
//!
//! - `MockProvider`: Deterministic mock for testing
//! - `OpenAiProvider`: OpenAI-compatible chat completions API
//!
//! # Examples
//!
//! ```
//! use pdfx_llm::{probe, MockProvider};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let provider = MockProvider::new("hello");
//! let report = probe(&provider).await.unwrap();
//! assert_eq!(report.reply, "hello");
//! # }
//! ```

#![warn(missing_docs)]

pub mod openai;

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use thiserror::Error;

pub use openai::OpenAiProvider;

/// Prompt sent by [`probe`]
pub const PROBE_PROMPT: &str = "Say 'hello'";

/// Token budget for [`probe`]
pub const PROBE_MAX_TOKENS: u32 = 5;

/// Errors that can occur during LLM operations
#[derive(Error, Debug)]
pub enum LlmError {
    /// No API key configured
    #[error("API key not set (expected in {0})")]
    MissingApiKey(String),

    /// Key rejected by the provider
    #[error("Authentication failed: {0}")]
    Unauthorized(String),

    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Invalid response from LLM
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),
}

/// A chat-completion backend
pub trait LlmProvider {
    /// Model name requests are sent to
    fn model(&self) -> &str;

    /// Complete a single user message
    fn complete(
        &self,
        prompt: &str,
        max_tokens: u32,
    ) -> impl Future<Output = Result<String, LlmError>> + Send;
}

/// Result of a connectivity probe
#[derive(Debug, Clone)]
pub struct ProbeReport {
    /// Model that answered
    pub model: String,
    /// Reply text
    pub reply: String,
    /// Round-trip time
    pub elapsed: Duration,
}

/// Send a trivial prompt and report the reply
pub async fn probe<P: LlmProvider>(provider: &P) -> Result<ProbeReport, LlmError> {
    let start = Instant::now();
    let reply = provider.complete(PROBE_PROMPT, PROBE_MAX_TOKENS).await?;
    let elapsed = start.elapsed();

    tracing::info!("Model {} answered in {:?}", provider.model(), elapsed);

    Ok(ProbeReport {
        model: provider.model().to_string(),
        reply,
        elapsed,
    })
}

/// Presence and length of an API key, without revealing it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyInfo {
    /// Whether a non-empty key is set
    pub present: bool,
    /// Key length in characters
    pub length: usize,
}

impl KeyInfo {
    /// Describe `key`
    pub fn of(key: Option<&str>) -> Self {
        let length = key.map(|k| k.chars().count()).unwrap_or(0);
        Self {
            present: length > 0,
            length,
        }
    }
}

/// Mock LLM provider for deterministic testing
///
/// This provider returns pre-configured responses without making any network calls.
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_response: String,
    responses: Arc<Mutex<HashMap<String, Result<String, String>>>>,
    call_count: Arc<Mutex<usize>>,
}

impl MockProvider {
    /// Create a new MockProvider with a fixed response for all prompts
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            responses: Arc::new(Mutex::new(HashMap::new())),
            call_count: Arc::new(Mutex::new(0)),
        }
    }

    /// Add a specific response for a given prompt
    pub fn add_response(&mut self, prompt: impl Into<String>, response: impl Into<String>) {
        self.responses
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .insert(prompt.into(), Ok(response.into()));
    }

    /// Configure to return a communication error for a specific prompt
    pub fn add_error(&mut self, prompt: impl Into<String>, message: impl Into<String>) {
        self.responses
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .insert(prompt.into(), Err(message.into()));
    }

    /// Get the number of times complete was called
    pub fn call_count(&self) -> usize {
        *self.call_count.lock().unwrap_or_else(|p| p.into_inner())
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("Default mock response")
    }
}

impl LlmProvider for MockProvider {
    fn model(&self) -> &str {
        "mock"
    }

    async fn complete(&self, prompt: &str, _max_tokens: u32) -> Result<String, LlmError> {
        *self.call_count.lock().unwrap_or_else(|p| p.into_inner()) += 1;

        let responses = self.responses.lock().unwrap_or_else(|p| p.into_inner());
        match responses.get(prompt) {
            Some(Ok(response)) => Ok(response.clone()),
            Some(Err(message)) => Err(LlmError::Communication(message.clone())),
            None => Ok(self.default_response.clone()),
        }
    }
}
