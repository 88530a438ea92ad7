//! Extraction session state machine.

use crate::error::ControllerError;
use crate::ramp::{ProgressRamp, MAX_RAMP_CAP};
use crate::state::{ExtractionStatus, UiState};
use chrono::NaiveDate;
use pdfx_domain::{
    default_templates, result_filename, ExtractionJob, JobStatus, Template, TemplateId,
    UploadedFile,
};
use pdfx_sdk::{ExtractionClient, HttpTransport, Transport};
use tokio::sync::watch;
use tokio::time::{interval_at, Instant};
use tracing::{debug, info, warn};

/// Shown when extraction is attempted without files
pub const NO_FILES_MESSAGE: &str = "Please select at least one PDF file";

/// Shown when extraction is attempted without a template
pub const NO_TEMPLATE_MESSAGE: &str = "Please select a template";

/// Shown when a result download fails
pub const DOWNLOAD_FAILED_MESSAGE: &str = "Failed to download file. Please try again.";

/// Error message left behind when an in-flight extraction is abandoned
pub const CANCELLED_MESSAGE: &str = "Extraction cancelled";

/// Outcome of a file selection
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileSelection {
    /// Number of PDFs now selected
    pub accepted: usize,
    /// Names of files dropped for not being PDFs
    pub rejected: Vec<String>,
}

/// Where the loaded template list came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSource {
    /// Fetched from the service
    Service,
    /// Static default list, with the reason the fetch was not used
    Fallback {
        /// Why the service list was not used
        reason: String,
    },
}

impl TemplateSource {
    /// Whether the default template list is in use
    pub fn is_fallback(&self) -> bool {
        matches!(self, TemplateSource::Fallback { .. })
    }
}

/// A downloaded result spreadsheet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadedResult {
    /// Job the spreadsheet belongs to
    pub job_id: String,
    /// Generated filename, see [`pdfx_domain::result_filename`]
    pub filename: String,
    /// Spreadsheet bytes
    pub content: Vec<u8>,
}

/// Moves the state to error if an extraction future is dropped mid-flight
struct InFlightGuard<'a> {
    state: &'a watch::Sender<UiState>,
    armed: bool,
}

impl<'a> InFlightGuard<'a> {
    fn new(state: &'a watch::Sender<UiState>) -> Self {
        Self { state, armed: true }
    }

    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        warn!("Extraction abandoned while in flight");
        self.state.send_modify(|s| {
            if s.status.is_in_flight() {
                s.status = ExtractionStatus::Error;
                s.progress = 0;
                s.error = Some(CANCELLED_MESSAGE.to_string());
            }
        });
    }
}

/// Controller for one extraction session
///
/// Owns the [`UiState`] and is the only writer to it. At most one
/// submission can be in flight: [`extract`](Self::extract) borrows the
/// controller mutably and refuses to start outside the idle state.
///
/// # Examples
///
/// ```
/// use pdfx_controller::{ExtractionController, ExtractionStatus};
/// use pdfx_domain::{ExtractionJob, JobStatus, UploadedFile, PDF_MIME};
/// use pdfx_sdk::{ExtractionClient, StubTransport};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let stub = StubTransport::new()
///     .with_job(ExtractionJob::new("abc123", JobStatus::Completed));
/// let mut controller = ExtractionController::new(ExtractionClient::with_transport(stub));
///
/// controller.load_templates().await;
/// controller
///     .select_files(vec![UploadedFile::new("fund.pdf", vec![0; 16], PDF_MIME)])
///     .unwrap();
/// controller.select_template_by_id(1).unwrap();
///
/// let job = controller.extract().await.unwrap();
/// assert_eq!(job.job_id, "abc123");
/// assert_eq!(controller.status(), ExtractionStatus::Completed);
/// assert_eq!(controller.progress(), 100);
/// # }
/// ```
pub struct ExtractionController<T = HttpTransport> {
    client: ExtractionClient<T>,
    state: watch::Sender<UiState>,
    templates: Vec<Template>,
    ramp: ProgressRamp,
}

impl<T: Transport> ExtractionController<T> {
    /// Create a controller in the idle state with the default ramp
    pub fn new(client: ExtractionClient<T>) -> Self {
        let (state, _) = watch::channel(UiState::default());
        Self {
            client,
            state,
            templates: Vec::new(),
            ramp: ProgressRamp::default(),
        }
    }

    /// Replace the progress ramp
    ///
    /// The cap is clamped to [`MAX_RAMP_CAP`]; only a settled call reaches 100.
    pub fn with_ramp(mut self, ramp: ProgressRamp) -> Self {
        self.ramp = ProgressRamp {
            cap: ramp.cap.min(MAX_RAMP_CAP),
            ..ramp
        };
        self
    }

    /// The service client
    pub fn client(&self) -> &ExtractionClient<T> {
        &self.client
    }

    /// Receive every subsequent state change
    pub fn subscribe(&self) -> watch::Receiver<UiState> {
        self.state.subscribe()
    }

    /// Copy of the current state
    pub fn state(&self) -> UiState {
        self.state.borrow().clone()
    }

    /// Current status
    pub fn status(&self) -> ExtractionStatus {
        self.state.borrow().status
    }

    /// Current progress percentage
    pub fn progress(&self) -> u8 {
        self.state.borrow().progress
    }

    /// Whether an extraction could start now
    pub fn can_extract(&self) -> bool {
        self.state.borrow().can_extract()
    }

    /// Templates available for selection
    pub fn templates(&self) -> &[Template] {
        &self.templates
    }

    /// Load templates from the service, falling back to the default list
    ///
    /// Never fails: a fetch error or an empty list installs
    /// [`default_templates`] and reports why.
    pub async fn load_templates(&mut self) -> TemplateSource {
        match self.client.fetch_templates().await {
            Ok(templates) if !templates.is_empty() => {
                info!("Loaded {} template(s) from service", templates.len());
                self.templates = templates;
                TemplateSource::Service
            }
            Ok(_) => {
                warn!("Service returned no templates, using defaults");
                self.templates = default_templates();
                TemplateSource::Fallback {
                    reason: "service returned no templates".to_string(),
                }
            }
            Err(e) => {
                warn!("Failed to fetch templates, using defaults: {}", e);
                self.templates = default_templates();
                TemplateSource::Fallback {
                    reason: e.to_string(),
                }
            }
        }
    }

    /// Replace the file selection
    ///
    /// Files that are not `application/pdf` are dropped and reported. If
    /// nothing is left the previous selection is kept.
    pub fn select_files(
        &mut self,
        files: Vec<UploadedFile>,
    ) -> Result<FileSelection, ControllerError> {
        self.ensure_status(&[ExtractionStatus::Idle], "select files")?;

        let (accepted, rejected): (Vec<_>, Vec<_>) = files.into_iter().partition(|f| f.is_pdf());
        let rejected: Vec<String> = rejected.into_iter().map(|f| f.name).collect();
        if !rejected.is_empty() {
            debug!("Rejected non-PDF files: {:?}", rejected);
        }

        let mut selection = FileSelection {
            accepted: 0,
            rejected,
        };
        self.state.send_modify(|s| {
            if !accepted.is_empty() {
                s.files = accepted;
            }
            s.error = None;
            selection.accepted = s.files.len();
        });

        Ok(selection)
    }

    /// Remove the file at `index` from the selection
    pub fn remove_file(&mut self, index: usize) -> Result<UploadedFile, ControllerError> {
        self.ensure_status(&[ExtractionStatus::Idle], "remove files")?;

        let mut removed = None;
        self.state.send_if_modified(|s| {
            if index < s.files.len() {
                removed = Some(s.files.remove(index));
                true
            } else {
                false
            }
        });

        removed.ok_or(ControllerError::NoSuchFile(index))
    }

    /// Select a template
    pub fn select_template(&mut self, template: Template) -> Result<(), ControllerError> {
        self.ensure_status(&[ExtractionStatus::Idle], "select a template")?;
        debug!("Selected template {}", template);

        self.state.send_modify(|s| {
            s.selected_template = Some(template);
            s.error = None;
        });
        Ok(())
    }

    /// Select one of the loaded templates by id
    pub fn select_template_by_id(&mut self, id: TemplateId) -> Result<(), ControllerError> {
        let template = self
            .templates
            .iter()
            .find(|t| t.id == id)
            .cloned()
            .ok_or(ControllerError::UnknownTemplate(id))?;

        self.select_template(template)
    }

    /// Submit the selection and drive the state to completed or error
    ///
    /// Without files or a template the error message is set, the state stays
    /// idle and the transport is not called.
    ///
    /// While the call is in flight the progress ramp runs; the status moves
    /// from uploading to processing when the ramp reaches its cap. If the
    /// returned future is dropped before it settles, the state moves to
    /// error with [`CANCELLED_MESSAGE`].
    pub async fn extract(&mut self) -> Result<ExtractionJob, ControllerError> {
        self.ensure_status(&[ExtractionStatus::Idle], "extract")?;

        let (files, template) = {
            let state = self.state.borrow();
            (state.files.clone(), state.selected_template.clone())
        };

        if files.is_empty() {
            return Err(self.reject(NO_FILES_MESSAGE));
        }
        let Some(template) = template else {
            return Err(self.reject(NO_TEMPLATE_MESSAGE));
        };

        info!(
            "Starting extraction of {} file(s) with {}",
            files.len(),
            template
        );
        self.state.send_modify(|s| {
            s.status = ExtractionStatus::Uploading;
            s.progress = 0;
            s.error = None;
            s.result = None;
        });

        let guard = InFlightGuard::new(&self.state);
        let outcome = self.submit_with_ramp(&files, template.id).await;
        guard.disarm();

        match outcome {
            Ok(job) if job.status == JobStatus::Failed => {
                let message = job
                    .message
                    .clone()
                    .unwrap_or_else(|| "Extraction failed. Please try again.".to_string());
                warn!("Job {} failed: {}", job.job_id, message);
                self.fail(&message);
                Err(ControllerError::JobFailed {
                    job_id: job.job_id,
                    message,
                })
            }
            Ok(job) => {
                info!("Extraction completed: job {}", job.job_id);
                self.state.send_modify(|s| {
                    s.status = ExtractionStatus::Completed;
                    s.progress = 100;
                    s.result = Some(job.clone());
                });
                Ok(job)
            }
            Err(e) => {
                self.fail(e.message());
                Err(ControllerError::Sdk(e))
            }
        }
    }

    /// Run the submission with the progress ramp racing it
    async fn submit_with_ramp(
        &self,
        files: &[UploadedFile],
        template_id: TemplateId,
    ) -> Result<ExtractionJob, pdfx_sdk::SdkError> {
        let submission = self.client.submit_extraction(files, Some(template_id));
        tokio::pin!(submission);

        let ramp = self.ramp;
        let mut ramping = !ramp.interval.is_zero() && ramp.step > 0;
        if !ramping {
            return submission.await;
        }
        let mut ticker = interval_at(Instant::now() + ramp.interval, ramp.interval);

        loop {
            tokio::select! {
                biased;

                result = &mut submission => break result,
                _ = ticker.tick(), if ramping => {
                    let mut capped = false;
                    self.state.send_modify(|s| {
                        s.progress = ramp.advance(s.progress);
                        if ramp.is_capped(s.progress) {
                            s.status = ExtractionStatus::Processing;
                            capped = true;
                        }
                    });
                    if capped {
                        debug!("Progress ramp reached {}%", ramp.cap);
                        ramping = false;
                    }
                }
            }
        }
    }

    /// Download the result of the completed job
    ///
    /// The file is named after the selected template and today's date.
    pub async fn download(&self) -> Result<DownloadedResult, ControllerError> {
        self.download_dated(chrono::Local::now().date_naive()).await
    }

    /// Download the result, naming the file for `date`
    ///
    /// A failure leaves the state untouched.
    pub async fn download_dated(
        &self,
        date: NaiveDate,
    ) -> Result<DownloadedResult, ControllerError> {
        self.ensure_status(&[ExtractionStatus::Completed], "download")?;

        let (job, template) = {
            let state = self.state.borrow();
            (state.result.clone(), state.selected_template.clone())
        };
        let job = job.ok_or(ControllerError::InvalidTransition {
            from: ExtractionStatus::Completed,
            action: "download without a result",
        })?;

        let content = self
            .client
            .download_result(&job.job_id)
            .await
            .map_err(|e| {
                warn!("Download failed for job {}: {}", job.job_id, e);
                ControllerError::DownloadFailed(e)
            })?;

        Ok(DownloadedResult {
            filename: result_filename(template.as_ref(), date),
            job_id: job.job_id,
            content,
        })
    }

    /// Return to the initial idle state
    ///
    /// Only legal from completed or error. Loaded templates are kept.
    pub fn reset(&mut self) -> Result<(), ControllerError> {
        self.ensure_status(
            &[ExtractionStatus::Completed, ExtractionStatus::Error],
            "reset",
        )?;

        debug!("Resetting extraction session");
        self.state.send_replace(UiState::default());
        Ok(())
    }

    fn ensure_status(
        &self,
        allowed: &[ExtractionStatus],
        action: &'static str,
    ) -> Result<(), ControllerError> {
        let current = self.status();
        if allowed.contains(&current) {
            Ok(())
        } else {
            Err(ControllerError::InvalidTransition {
                from: current,
                action,
            })
        }
    }

    fn reject(&self, message: &str) -> ControllerError {
        self.state.send_modify(|s| s.error = Some(message.to_string()));
        ControllerError::Validation(message.to_string())
    }

    fn fail(&self, message: &str) {
        self.state.send_modify(|s| {
            s.status = ExtractionStatus::Error;
            s.progress = 0;
            s.error = Some(message.to_string());
        });
    }
}
