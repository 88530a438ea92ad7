//! Extract command implementation.

use crate::cli::ExtractArgs;
use crate::commands::templates::load_templates;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use pdfx_controller::{ControllerError, DownloadedResult, ExtractionController};
use pdfx_domain::{ExtractionJob, UploadedFile};
use pdfx_sdk::Transport;
use std::cell::Cell;
use std::convert::Infallible;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// What an extract run produced.
#[derive(Debug, Clone)]
pub struct ExtractOutcome {
    /// Job returned by the service
    pub job: ExtractionJob,
    /// Where the spreadsheet was saved, if it was downloaded
    pub saved: Option<PathBuf>,
}

/// Execute the extract command.
pub async fn execute_extract<T: Transport>(
    args: ExtractArgs,
    controller: &mut ExtractionController<T>,
    output_dir: &Path,
    formatter: &Formatter,
) -> Result<ExtractOutcome> {
    let files = read_files(&args.files)?;

    load_templates(controller, formatter).await;
    let selection = controller.select_files(files)?;
    for name in &selection.rejected {
        eprintln!("{}", formatter.warning(&format!("Skipping {}: not a PDF", name)));
    }
    controller.select_template_by_id(args.template)?;

    let job = match extract_with_progress(controller, formatter).await {
        Ok(job) => job,
        Err(e) => {
            if controller.status().is_terminal() {
                eprintln!("{}", formatter.troubleshooting());
            }
            return Err(e.into());
        }
    };

    let state = controller.state();
    let download_url = controller.client().download_url(&job);
    println!(
        "{}",
        formatter.job_summary(
            &job,
            state.selected_template.as_ref(),
            state.files.len(),
            &download_url
        )?
    );

    if args.no_download || !job.is_downloadable() {
        return Ok(ExtractOutcome { job, saved: None });
    }

    let result = controller.download().await?;
    let path = save_result(&result, output_dir)?;
    eprintln!("{}", formatter.saved(&path, result.content.len()));

    Ok(ExtractOutcome {
        job,
        saved: Some(path),
    })
}

/// Run the controller's extraction while drawing its progress on stderr.
pub async fn extract_with_progress<T: Transport>(
    controller: &mut ExtractionController<T>,
    formatter: &Formatter,
) -> std::result::Result<ExtractionJob, ControllerError> {
    let mut rx = controller.subscribe();
    let draw = formatter.shows_progress();
    let drawn = Cell::new(false);

    let render = async {
        while rx.changed().await.is_ok() {
            let (status, progress) = {
                let state = rx.borrow_and_update();
                (state.status, state.progress)
            };
            if draw && status.is_in_flight() {
                eprint!("\r{}", formatter.progress(status, progress));
                std::io::stderr().flush().ok();
                drawn.set(true);
            }
        }
        std::future::pending::<Infallible>().await
    };

    let result = tokio::select! {
        result = controller.extract() => result,
        never = render => match never {},
    };

    if drawn.get() {
        eprintln!();
    }
    result
}

/// Write a downloaded spreadsheet into `dir`, creating it if needed.
pub fn save_result(result: &DownloadedResult, dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(&result.filename);
    fs::write(&path, &result.content)?;
    tracing::info!("Saved result of job {} to {}", result.job_id, path.display());
    Ok(path)
}

fn read_files(paths: &[PathBuf]) -> Result<Vec<UploadedFile>> {
    paths
        .iter()
        .map(|path| {
            UploadedFile::from_path(path).map_err(|e| {
                CliError::InvalidInput(format!("Cannot read {}: {}", path.display(), e))
            })
        })
        .collect()
}
