//! Extraction service client.

use crate::error::SdkError;
use crate::http::HttpTransport;
use crate::transport::{ExtractRequest, HealthStatus, Transport};
use pdfx_domain::{ExtractionJob, Template, TemplateId, UploadedFile};
use tracing::{debug, info, warn};

/// Client for the PDF extraction service
///
/// Generic over its [`Transport`] so tests can substitute a [`crate::StubTransport`].
#[derive(Debug, Clone)]
pub struct ExtractionClient<T = HttpTransport> {
    transport: T,
}

impl ExtractionClient<HttpTransport> {
    /// Create a client talking HTTP to `base_url`
    pub fn new(base_url: &str) -> Result<Self, SdkError> {
        Ok(Self::with_transport(HttpTransport::new(base_url)?))
    }
}

impl<T: Transport> ExtractionClient<T> {
    /// Create a client over an explicit transport
    pub fn with_transport(transport: T) -> Self {
        Self { transport }
    }

    /// Base URL of the service
    pub fn base_url(&self) -> &str {
        self.transport.base_url()
    }

    /// Submit files for extraction with the given template
    ///
    /// # Errors
    ///
    /// - [`SdkError::Validation`] if `files` is empty or `template_id` is
    ///   `None`; the transport is not called
    /// - [`SdkError::Network`] on transport or service failure
    pub async fn submit_extraction(
        &self,
        files: &[UploadedFile],
        template_id: Option<TemplateId>,
    ) -> Result<ExtractionJob, SdkError> {
        if files.is_empty() {
            return Err(SdkError::Validation(
                "At least one PDF file is required".to_string(),
            ));
        }
        let template_id = template_id
            .ok_or_else(|| SdkError::Validation("A template must be selected".to_string()))?;

        let request = ExtractRequest { files, template_id };
        info!(
            "Submitting {} file(s) ({} bytes) with template {}",
            files.len(),
            request.total_bytes(),
            template_id
        );

        match self.transport.submit(request).await {
            Ok(job) => {
                info!("Extraction job {} returned status {}", job.job_id, job.status);
                Ok(job)
            }
            Err(e) => {
                warn!("Extraction submission failed: {}", e);
                Err(e)
            }
        }
    }

    /// Fetch the templates the service offers
    ///
    /// A failure here is not fatal to callers; they are expected to fall back
    /// to [`pdfx_domain::default_templates`].
    pub async fn fetch_templates(&self) -> Result<Vec<Template>, SdkError> {
        let templates = self.transport.templates().await?;
        debug!("Fetched {} template(s)", templates.len());
        Ok(templates)
    }

    /// Download the result spreadsheet of a job
    ///
    /// # Errors
    ///
    /// - [`SdkError::Validation`] if `job_id` is empty
    /// - [`SdkError::NotFound`] if the service does not know the job
    /// - [`SdkError::Network`] otherwise
    pub async fn download_result(&self, job_id: &str) -> Result<Vec<u8>, SdkError> {
        if job_id.trim().is_empty() {
            return Err(SdkError::Validation("Job id must not be empty".to_string()));
        }

        let content = self.transport.download(job_id).await?;
        info!("Downloaded {} bytes for job {}", content.len(), job_id);
        Ok(content)
    }

    /// Query service health
    pub async fn health(&self) -> Result<HealthStatus, SdkError> {
        self.transport.health().await
    }

    /// Absolute URL of a job's result spreadsheet
    ///
    /// Same resource [`ExtractionClient::download_result`] fetches.
    pub fn download_url(&self, job: &ExtractionJob) -> String {
        format!("{}{}", self.base_url(), job.download_path())
    }
}
