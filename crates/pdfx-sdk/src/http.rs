//! reqwest-backed transport.

use crate::error::SdkError;
use crate::transport::{ExtractRequest, HealthStatus, Transport};
use pdfx_domain::{ExtractionJob, Template, SPREADSHEET_MIME};
use reqwest::multipart::{Form, Part};
use reqwest::{Response, StatusCode, Url};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// Default service endpoint
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Request timeout in milliseconds (5 minutes, uploads can be large)
pub const REQUEST_TIMEOUT_MS: u64 = 300_000;

/// Template list as returned by the service
///
/// The service wraps the list in an object; a bare array is accepted too.
#[derive(Deserialize)]
#[serde(untagged)]
enum TemplatesPayload {
    Wrapped { templates: Vec<Template> },
    Bare(Vec<Template>),
}

impl TemplatesPayload {
    fn into_templates(self) -> Vec<Template> {
        match self {
            TemplatesPayload::Wrapped { templates } => templates,
            TemplatesPayload::Bare(templates) => templates,
        }
    }
}

/// FastAPI error body
#[derive(Deserialize)]
struct ErrorBody {
    detail: serde_json::Value,
}

/// HTTP transport for the extraction service
#[derive(Debug, Clone)]
pub struct HttpTransport {
    base_url: Url,
    base_url_text: String,
    client: reqwest::Client,
    timeout: Option<Duration>,
}

impl HttpTransport {
    /// Create a transport with the fixed request timeout
    ///
    /// # Errors
    ///
    /// Returns [`SdkError::InvalidUrl`] if `base_url` is not an absolute
    /// http(s) URL.
    pub fn new(base_url: &str) -> Result<Self, SdkError> {
        Self::with_timeout(base_url, Duration::from_millis(REQUEST_TIMEOUT_MS))
    }

    /// Create a transport whose requests give up after `timeout`
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, SdkError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SdkError::Network(format!("Failed to build HTTP client: {}", e)))?;

        let mut transport = Self::with_client(base_url, client)?;
        transport.timeout = Some(timeout);
        Ok(transport)
    }

    /// Create a transport around an existing reqwest client
    pub fn with_client(base_url: &str, client: reqwest::Client) -> Result<Self, SdkError> {
        let parsed = Url::parse(base_url)
            .map_err(|e| SdkError::InvalidUrl(format!("{}: {}", base_url, e)))?;

        if !matches!(parsed.scheme(), "http" | "https") || parsed.cannot_be_a_base() {
            return Err(SdkError::InvalidUrl(format!(
                "{}: expected an http(s) base URL",
                base_url
            )));
        }

        Ok(Self {
            base_url_text: base_url.trim_end_matches('/').to_string(),
            base_url: parsed,
            client,
            timeout: None,
        })
    }

    /// Per-request timeout, `None` when the reqwest client was supplied
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Resolve `segments` below the base URL, percent-encoding each one
    fn endpoint(&self, segments: &[&str]) -> Result<Url, SdkError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| SdkError::InvalidUrl(self.base_url_text.clone()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

/// Turn a non-success response into an error carrying the service detail
async fn error_for_status(response: Response) -> Result<Response, SdkError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let detail = match serde_json::from_str::<ErrorBody>(&body) {
        Ok(ErrorBody {
            detail: serde_json::Value::String(text),
        }) => text,
        Ok(ErrorBody { detail }) => detail.to_string(),
        Err(_) if body.trim().is_empty() => "Unknown error".to_string(),
        Err(_) => body,
    };

    Err(SdkError::Network(format!("HTTP {}: {}", status, detail)))
}

impl Transport for HttpTransport {
    fn base_url(&self) -> &str {
        &self.base_url_text
    }

    async fn submit(&self, request: ExtractRequest<'_>) -> Result<ExtractionJob, SdkError> {
        let url = self.endpoint(&["api", "extract"])?;

        let mut form = Form::new();
        for file in request.files {
            let part = Part::bytes(file.content.clone())
                .file_name(file.name.clone())
                .mime_str(&file.mime_type)
                .map_err(|e| {
                    SdkError::Validation(format!("Invalid MIME type for {}: {}", file.name, e))
                })?;
            form = form.part("files", part);
        }
        let form = form.text("template_id", request.template_id.to_string());

        debug!(
            "POST {} ({} files, {} bytes, template {})",
            url,
            request.files.len(),
            request.total_bytes(),
            request.template_id
        );

        let response = self.client.post(url).multipart(form).send().await?;
        let response = error_for_status(response).await?;

        Ok(response.json::<ExtractionJob>().await?)
    }

    async fn templates(&self) -> Result<Vec<Template>, SdkError> {
        let url = self.endpoint(&["api", "templates"])?;
        debug!("GET {}", url);

        let response = self.client.get(url).send().await?;
        let response = error_for_status(response).await?;

        let payload: TemplatesPayload = response.json().await?;
        Ok(payload.into_templates())
    }

    async fn download(&self, job_id: &str) -> Result<Vec<u8>, SdkError> {
        let url = self.endpoint(&["api", "download", job_id])?;
        debug!("GET {}", url);

        let response = self.client.get(url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(SdkError::NotFound(job_id.to_string()));
        }
        let response = error_for_status(response).await?;

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        if !content_type.starts_with(SPREADSHEET_MIME) {
            debug!("Unexpected content type for job {}: {:?}", job_id, content_type);
        }

        Ok(response.bytes().await?.to_vec())
    }

    async fn health(&self) -> Result<HealthStatus, SdkError> {
        let url = self.endpoint(&["api", "health"])?;
        debug!("GET {}", url);

        let response = self.client.get(url).send().await?;
        let response = error_for_status(response).await?;

        Ok(response.json::<HealthStatus>().await?)
    }
}
