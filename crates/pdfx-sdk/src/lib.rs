//! pdfx Rust SDK
//!
//! Client library for the remote PDF extraction service.
//!
//! The client is split in two layers:
//!
//! - a [`Transport`] speaks the service's HTTP surface (`POST /api/extract`,
//!   `GET /api/templates`, `GET /api/download/{job_id}`, `GET /api/health`).
//!   [`HttpTransport`] is the reqwest implementation, [`StubTransport`] an
//!   in-memory one for tests.
//! - [`ExtractionClient`] validates requests before they reach the transport
//!   and logs every call.
//!
//! # Example
//!
//! ```no_run
//! use pdfx_domain::UploadedFile;
//! use pdfx_sdk::ExtractionClient;
//!
//! # async fn demo() -> Result<(), pdfx_sdk::SdkError> {
//! let client = ExtractionClient::new("http://localhost:8000")?;
//!
//! let file = UploadedFile::from_path("statement.pdf").expect("readable file");
//! let job = client.submit_extraction(&[file], Some(1)).await?;
//! let spreadsheet = client.download_result(&job.job_id).await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod client;
mod error;
mod http;
mod stub;
mod transport;

pub use client::ExtractionClient;
pub use error::SdkError;
pub use http::{HttpTransport, DEFAULT_BASE_URL, REQUEST_TIMEOUT_MS};
pub use stub::{CallCounts, RecordedSubmission, StubTransport};
pub use transport::{ExtractRequest, HealthStatus, Transport};
