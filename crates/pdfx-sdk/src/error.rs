//! Error types for the pdfx SDK.

use thiserror::Error;

/// SDK operation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SdkError {
    /// Request rejected locally before reaching the network
    #[error("Validation error: {0}")]
    Validation(String),

    /// Transport, timeout or service failure
    #[error("Network error: {0}")]
    Network(String),

    /// Job unknown to the service
    #[error("Job not found: {0}")]
    NotFound(String),

    /// Response body could not be decoded
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Base URL cannot be used to build endpoints
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl SdkError {
    /// The message carried by the error, without the kind prefix
    pub fn message(&self) -> &str {
        match self {
            SdkError::Validation(m)
            | SdkError::Network(m)
            | SdkError::NotFound(m)
            | SdkError::InvalidResponse(m)
            | SdkError::InvalidUrl(m) => m,
        }
    }
}

impl From<reqwest::Error> for SdkError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            SdkError::Network(format!("Request timed out: {}", e))
        } else if e.is_connect() {
            SdkError::Network(format!("Connection failed: {}", e))
        } else if e.is_decode() {
            SdkError::InvalidResponse(e.to_string())
        } else if e.is_status() {
            match e.status() {
                Some(status) if status == reqwest::StatusCode::NOT_FOUND => {
                    SdkError::NotFound(e.to_string())
                }
                Some(status) if status.is_server_error() => {
                    SdkError::Network(format!("Server error (HTTP {})", status))
                }
                Some(status) => SdkError::Network(format!("HTTP {}: {}", status, e)),
                None => SdkError::Network(e.to_string()),
            }
        } else {
            SdkError::Network(e.to_string())
        }
    }
}

impl From<serde_json::Error> for SdkError {
    fn from(e: serde_json::Error) -> Self {
        SdkError::InvalidResponse(format!("JSON parsing error: {}", e))
    }
}
