//! Job module - extraction runs created by the service

use crate::template::TemplateId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Status of an extraction job
///
/// The service reports `success` for finished jobs; it is accepted as an
/// alias of `completed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    /// Accepted, not yet started
    #[serde(alias = "pending", alias = "queued")]
    Submitted,

    /// Extraction in progress
    Processing,

    /// Output spreadsheet is ready
    #[serde(alias = "success")]
    Completed,

    /// Extraction failed
    #[serde(alias = "error")]
    Failed,
}

impl JobStatus {
    /// Get the status name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Submitted => "submitted",
            JobStatus::Processing => "processing",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
        }
    }

    /// Whether the job will not change status again
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One extraction run as reported by the service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionJob {
    /// Opaque job identifier
    pub job_id: String,

    /// Current status
    pub status: JobStatus,

    /// Optional human readable message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Template the service actually applied
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_used: Option<TemplateId>,

    /// Download link as reported by the service
    ///
    /// Kept for display only; results are always fetched by job id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
}

impl ExtractionJob {
    /// Create a job with no optional fields
    pub fn new(job_id: impl Into<String>, status: JobStatus) -> Self {
        Self {
            job_id: job_id.into(),
            status,
            message: None,
            template_used: None,
            download_url: None,
        }
    }

    /// Set the message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Path of the result spreadsheet, relative to the service base URL
    ///
    /// Always derived from the job id so the link shown to the user is the
    /// one the client fetches.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdfx_domain::{ExtractionJob, JobStatus};
    ///
    /// let job = ExtractionJob::new("abc123", JobStatus::Completed);
    /// assert_eq!(job.download_path(), "/api/download/abc123");
    /// ```
    pub fn download_path(&self) -> String {
        format!("/api/download/{}", self.job_id)
    }

    /// Whether a result can be downloaded for this job
    pub fn is_downloadable(&self) -> bool {
        !self.job_id.is_empty() && self.status != JobStatus::Failed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_service_response() {
        let json = r#"{
            "job_id": "0b7e4c1a-6f0e-4a57-9b43-2d1f6f4b2a10",
            "status": "success",
            "message": "Data extracted successfully using Template 1",
            "template_used": 1,
            "download_url": "/api/download/0b7e4c1a-6f0e-4a57-9b43-2d1f6f4b2a10",
            "debug_info": {"files_processed": 1}
        }"#;

        let job: ExtractionJob = serde_json::from_str(json).unwrap();
        assert_eq!(job.status, JobStatus::Completed);
        assert_eq!(job.template_used, Some(1));
        assert_eq!(
            job.download_path(),
            "/api/download/0b7e4c1a-6f0e-4a57-9b43-2d1f6f4b2a10"
        );
    }

    #[test]
    fn test_parse_minimal_response() {
        let job: ExtractionJob =
            serde_json::from_str(r#"{"job_id": "abc123", "status": "completed"}"#).unwrap();
        assert_eq!(job, ExtractionJob::new("abc123", JobStatus::Completed));
        assert!(job.is_downloadable());
    }

    #[test]
    fn test_unknown_status_is_rejected() {
        let result: Result<ExtractionJob, _> =
            serde_json::from_str(r#"{"job_id": "x", "status": "exploded"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_status_aliases() {
        for (wire, status) in [
            ("\"success\"", JobStatus::Completed),
            ("\"queued\"", JobStatus::Submitted),
            ("\"error\"", JobStatus::Failed),
        ] {
            assert_eq!(serde_json::from_str::<JobStatus>(wire).unwrap(), status);
        }
        assert!(JobStatus::Failed.is_terminal());
        assert!(!JobStatus::Processing.is_terminal());
    }

    #[test]
    fn test_download_path_ignores_reported_url() {
        let mut job = ExtractionJob::new("j1", JobStatus::Completed);
        job.download_url = Some(String::new());
        assert_eq!(job.download_path(), "/api/download/j1");

        job.download_url = Some("https://cdn.example/x.xlsx".into());
        assert_eq!(job.download_path(), "/api/download/j1");
    }

    #[test]
    fn test_serialization_skips_missing_fields() {
        let job = ExtractionJob::new("j1", JobStatus::Submitted).with_message("queued");
        let json = serde_json::to_value(&job).unwrap();
        assert_eq!(json["status"], "submitted");
        assert_eq!(json["message"], "queued");
        assert!(json.get("download_url").is_none());
    }
}
