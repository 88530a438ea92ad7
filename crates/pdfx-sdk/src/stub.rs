//! In-memory transport for tests.

use crate::error::SdkError;
use crate::transport::{ExtractRequest, HealthStatus, Transport};
use pdfx_domain::{default_templates, ExtractionJob, JobStatus, Template, TemplateId};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

/// Number of calls made to each endpoint
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallCounts {
    /// `POST /api/extract`
    pub submit: usize,
    /// `GET /api/templates`
    pub templates: usize,
    /// `GET /api/download/{job_id}`
    pub download: usize,
    /// `GET /api/health`
    pub health: usize,
}

impl CallCounts {
    /// Total calls across all endpoints
    pub fn total(&self) -> usize {
        self.submit + self.templates + self.download + self.health
    }
}

/// What the stub saw on the last submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedSubmission {
    /// File names in submission order
    pub file_names: Vec<String>,
    /// Sum of file sizes
    pub total_bytes: u64,
    /// Template id sent
    pub template_id: TemplateId,
}

#[derive(Debug)]
struct StubState {
    submit_reply: Result<ExtractionJob, SdkError>,
    templates_reply: Result<Vec<Template>, SdkError>,
    health_reply: Result<HealthStatus, SdkError>,
    downloads: HashMap<String, Vec<u8>>,
    calls: CallCounts,
    last_submission: Option<RecordedSubmission>,
}

impl Default for StubState {
    fn default() -> Self {
        Self {
            submit_reply: Ok(ExtractionJob::new("stub-job", JobStatus::Completed)),
            templates_reply: Ok(default_templates()),
            health_reply: Ok(HealthStatus {
                status: "healthy".to_string(),
                service: "PDF Extraction Tool".to_string(),
            }),
            downloads: HashMap::new(),
            calls: CallCounts::default(),
            last_submission: None,
        }
    }
}

/// Transport that answers from canned replies without any network access
///
/// Clones share state, so a test can keep one handle for assertions while
/// the client under test owns another.
///
/// # Examples
///
/// ```
/// use pdfx_domain::{ExtractionJob, JobStatus};
/// use pdfx_sdk::{ExtractionClient, StubTransport};
///
/// let stub = StubTransport::new()
///     .with_job(ExtractionJob::new("abc123", JobStatus::Completed));
/// let client = ExtractionClient::with_transport(stub.clone());
///
/// assert_eq!(stub.calls().total(), 0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct StubTransport {
    state: Arc<Mutex<StubState>>,
    latency: Duration,
}

impl StubTransport {
    /// Create a stub that accepts every submission as `stub-job`
    pub fn new() -> Self {
        Self::default()
    }

    /// Reply to submissions with `job`
    pub fn with_job(self, job: ExtractionJob) -> Self {
        self.lock().submit_reply = Ok(job);
        self
    }

    /// Fail submissions with `error`
    pub fn with_submit_error(self, error: SdkError) -> Self {
        self.lock().submit_reply = Err(error);
        self
    }

    /// Reply to template fetches with `templates`
    pub fn with_templates(self, templates: Vec<Template>) -> Self {
        self.lock().templates_reply = Ok(templates);
        self
    }

    /// Fail template fetches with `error`
    pub fn with_templates_error(self, error: SdkError) -> Self {
        self.lock().templates_reply = Err(error);
        self
    }

    /// Fail health checks with `error`
    pub fn with_health_error(self, error: SdkError) -> Self {
        self.lock().health_reply = Err(error);
        self
    }

    /// Serve `content` for `job_id`; other ids are not found
    pub fn with_download(self, job_id: impl Into<String>, content: Vec<u8>) -> Self {
        self.lock().downloads.insert(job_id.into(), content);
        self
    }

    /// Delay every reply by `latency` (use with tokio's paused clock)
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Calls made so far
    pub fn calls(&self) -> CallCounts {
        self.lock().calls
    }

    /// Last submission received, if any
    pub fn last_submission(&self) -> Option<RecordedSubmission> {
        self.lock().last_submission.clone()
    }

    fn lock(&self) -> MutexGuard<'_, StubState> {
        // A panicking test thread must not hide the stub from the others.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    async fn delay(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

impl Transport for StubTransport {
    fn base_url(&self) -> &str {
        "http://stub.invalid"
    }

    async fn submit(&self, request: ExtractRequest<'_>) -> Result<ExtractionJob, SdkError> {
        let reply = {
            let mut state = self.lock();
            state.calls.submit += 1;
            state.last_submission = Some(RecordedSubmission {
                file_names: request.files.iter().map(|f| f.name.clone()).collect(),
                total_bytes: request.total_bytes(),
                template_id: request.template_id,
            });
            state.submit_reply.clone()
        };

        self.delay().await;
        reply
    }

    async fn templates(&self) -> Result<Vec<Template>, SdkError> {
        let reply = {
            let mut state = self.lock();
            state.calls.templates += 1;
            state.templates_reply.clone()
        };

        self.delay().await;
        reply
    }

    async fn download(&self, job_id: &str) -> Result<Vec<u8>, SdkError> {
        let reply = {
            let mut state = self.lock();
            state.calls.download += 1;
            state
                .downloads
                .get(job_id)
                .cloned()
                .ok_or_else(|| SdkError::NotFound(job_id.to_string()))
        };

        self.delay().await;
        reply
    }

    async fn health(&self) -> Result<HealthStatus, SdkError> {
        let reply = {
            let mut state = self.lock();
            state.calls.health += 1;
            state.health_reply.clone()
        };

        self.delay().await;
        reply
    }
}
