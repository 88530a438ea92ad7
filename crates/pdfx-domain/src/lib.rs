//! pdfx Domain Layer
//!
//! Core data model shared by every pdfx crate: the files a user uploads, the
//! extraction templates offered by the service, and the jobs it returns.
//!
//! ## Key Concepts
//!
//! - **Template**: a named extraction schema selecting which fields the remote
//!   service extracts from a PDF
//! - **Job**: an opaque handle for one extraction run, later used to fetch the
//!   output spreadsheet
//! - **UploadedFile**: a PDF held in memory, ready to be sent as a multipart part
//!
//! This crate performs no I/O beyond reading a file from disk on request.
//! Transport lives in `pdfx-sdk`, state handling in `pdfx-controller`.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod file;
pub mod filename;
pub mod job;
pub mod template;

// Re-exports for convenience
pub use file::{format_size, UploadedFile, OCTET_STREAM_MIME, PDF_MIME};
pub use filename::{result_filename, SPREADSHEET_MIME};
pub use job::{ExtractionJob, JobStatus};
pub use template::{default_templates, Template, TemplateId};
