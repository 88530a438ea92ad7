//! UI state owned by the controller.

use pdfx_domain::{ExtractionJob, Template, UploadedFile};
use std::fmt;

/// Where the session is in the extraction flow
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ExtractionStatus {
    /// Selecting files and a template
    #[default]
    Idle,

    /// Submission sent, ramp below its cap
    Uploading,

    /// Submission sent, ramp at its cap, waiting for the service
    Processing,

    /// Service returned a job
    Completed,

    /// Submission failed
    Error,
}

impl ExtractionStatus {
    /// Get the status name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            ExtractionStatus::Idle => "idle",
            ExtractionStatus::Uploading => "uploading",
            ExtractionStatus::Processing => "processing",
            ExtractionStatus::Completed => "completed",
            ExtractionStatus::Error => "error",
        }
    }

    /// Whether a submission is outstanding
    pub fn is_in_flight(&self) -> bool {
        matches!(self, ExtractionStatus::Uploading | ExtractionStatus::Processing)
    }

    /// Whether the session can only be left through a reset
    pub fn is_terminal(&self) -> bool {
        matches!(self, ExtractionStatus::Completed | ExtractionStatus::Error)
    }
}

impl fmt::Display for ExtractionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot of everything the presentation layer renders
///
/// `UiState::default()` is the initial idle state, and a reset restores it
/// exactly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UiState {
    /// Current status
    pub status: ExtractionStatus,

    /// Progress percentage, 0 to 100
    pub progress: u8,

    /// Message shown to the user, if any
    pub error: Option<String>,

    /// Job returned by the last successful submission
    pub result: Option<ExtractionJob>,

    /// Selected PDF files
    pub files: Vec<UploadedFile>,

    /// Selected template
    pub selected_template: Option<Template>,
}

impl UiState {
    /// Whether an extraction could start from this state
    pub fn can_extract(&self) -> bool {
        self.status == ExtractionStatus::Idle
            && !self.files.is_empty()
            && self.selected_template.is_some()
    }

    /// Total size of the selected files
    pub fn total_bytes(&self) -> u64 {
        self.files.iter().map(|f| f.size).sum()
    }
}
