//! Error types for controller operations

use crate::state::ExtractionStatus;
use pdfx_domain::TemplateId;
use pdfx_sdk::SdkError;
use thiserror::Error;

/// Errors that can occur while driving an extraction session
#[derive(Error, Debug)]
pub enum ControllerError {
    /// Missing file or template; nothing was sent
    #[error("{0}")]
    Validation(String),

    /// Action not allowed in the current state
    #[error("Cannot {action} while {from}")]
    InvalidTransition {
        /// State the controller was in
        from: ExtractionStatus,
        /// Attempted action
        action: &'static str,
    },

    /// Template id not among the loaded templates
    #[error("Unknown template: {0}")]
    UnknownTemplate(TemplateId),

    /// File position out of range
    #[error("No file at position {0}")]
    NoSuchFile(usize),

    /// Service returned a job that already failed
    #[error("Extraction job {job_id} failed: {message}")]
    JobFailed {
        /// Job identifier
        job_id: String,
        /// Service message
        message: String,
    },

    /// Result download failed
    #[error("Failed to download file. Please try again.")]
    DownloadFailed(#[source] SdkError),

    /// Submission failed
    #[error(transparent)]
    Sdk(#[from] SdkError),
}
