//! pdfx UI State Controller
//!
//! Drives one extraction session through its states:
//!
//! ```text
//! idle ──extract──▶ uploading ──ramp cap──▶ processing
//!                       │                       │
//!                       └───────┬───────────────┘
//!                               ▼
//!                      completed | error ──reset──▶ idle
//! ```
//!
//! The service reports no incremental progress, so while a submission is in
//! flight a [`ProgressRamp`] advances the progress value on a timer, capped
//! below 100 until the call settles. The timer and the network call are
//! joined in one `select!` loop, so the timer stops the moment the call
//! settles.
//!
//! State changes are published through a `tokio::sync::watch` channel; see
//! [`ExtractionController::subscribe`].

#![warn(missing_docs)]

mod controller;
mod error;
mod ramp;
mod state;

pub use controller::{
    DownloadedResult, ExtractionController, FileSelection, TemplateSource, CANCELLED_MESSAGE,
    DOWNLOAD_FAILED_MESSAGE, NO_FILES_MESSAGE, NO_TEMPLATE_MESSAGE,
};
pub use error::ControllerError;
pub use ramp::{ProgressRamp, MAX_RAMP_CAP};
pub use state::{ExtractionStatus, UiState};
