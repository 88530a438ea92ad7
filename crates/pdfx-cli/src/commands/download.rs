//! Download command implementation.

use crate::cli::DownloadArgs;
use crate::commands::extract::save_result;
use crate::error::Result;
use crate::output::Formatter;
use chrono::NaiveDate;
use pdfx_controller::{ControllerError, DownloadedResult};
use pdfx_domain::{default_templates, result_filename};
use pdfx_sdk::{ExtractionClient, Transport};
use std::path::{Path, PathBuf};

/// Execute the download command.
pub async fn execute_download<T: Transport>(
    args: DownloadArgs,
    client: &ExtractionClient<T>,
    output_dir: &Path,
    formatter: &Formatter,
) -> Result<PathBuf> {
    let result = fetch(&args, client, chrono::Local::now().date_naive()).await?;
    let path = save_result(&result, output_dir)?;
    println!("{}", formatter.saved(&path, result.content.len()));
    Ok(path)
}

async fn fetch<T: Transport>(
    args: &DownloadArgs,
    client: &ExtractionClient<T>,
    date: NaiveDate,
) -> Result<DownloadedResult> {
    // The filename only needs the template id, so a local list is enough.
    let templates = default_templates();
    let template = args
        .template
        .and_then(|id| templates.iter().find(|t| t.id == id));

    let content = client
        .download_result(&args.job_id)
        .await
        .map_err(ControllerError::DownloadFailed)?;

    Ok(DownloadedResult {
        job_id: args.job_id.clone(),
        filename: result_filename(template, date),
        content,
    })
}
