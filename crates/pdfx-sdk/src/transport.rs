//! Transport boundary between the client and the extraction service.

use crate::error::SdkError;
use pdfx_domain::{ExtractionJob, Template, TemplateId, UploadedFile};
use serde::{Deserialize, Serialize};
use std::future::Future;

/// Payload of one extraction submission
#[derive(Debug, Clone, Copy)]
pub struct ExtractRequest<'a> {
    /// Files sent as repeated `files` multipart parts
    pub files: &'a [UploadedFile],
    /// Template sent as the `template_id` form field
    pub template_id: TemplateId,
}

impl ExtractRequest<'_> {
    /// Sum of all file sizes in bytes
    pub fn total_bytes(&self) -> u64 {
        self.files.iter().map(|f| f.size).sum()
    }
}

/// Health report from `GET /api/health`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    /// Overall status, `healthy` when the service is up
    pub status: String,
    /// Service name
    #[serde(default)]
    pub service: String,
}

impl HealthStatus {
    /// Whether the service reports itself healthy
    pub fn is_healthy(&self) -> bool {
        self.status.eq_ignore_ascii_case("healthy")
    }
}

/// Wire-level access to the extraction service
///
/// Implementations perform exactly one request per call and do no
/// validation; [`crate::ExtractionClient`] checks requests first.
pub trait Transport {
    /// Base URL every endpoint is resolved against
    fn base_url(&self) -> &str;

    /// `POST /api/extract`
    fn submit(
        &self,
        request: ExtractRequest<'_>,
    ) -> impl Future<Output = Result<ExtractionJob, SdkError>> + Send;

    /// `GET /api/templates`
    fn templates(&self) -> impl Future<Output = Result<Vec<Template>, SdkError>> + Send;

    /// `GET /api/download/{job_id}`
    fn download(&self, job_id: &str) -> impl Future<Output = Result<Vec<u8>, SdkError>> + Send;

    /// `GET /api/health`
    fn health(&self) -> impl Future<Output = Result<HealthStatus, SdkError>> + Send;
}
