//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use pdfx_controller::ExtractionStatus;
use pdfx_domain::{format_size, ExtractionJob, Template, UploadedFile};
use pdfx_llm::{KeyInfo, ProbeReport};
use pdfx_sdk::HealthStatus;
use std::path::Path;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Shown under a failed extraction.
pub const TROUBLESHOOTING_TIPS: [&str; 4] = [
    "Check if the PDF files contain extractable text",
    "Try with smaller PDF files first",
    "Ensure you have a stable internet connection",
    "Try selecting a different template",
];

const PROGRESS_WIDTH: usize = 30;

/// Output formatter.
#[derive(Debug, Clone)]
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Whether live progress lines should be drawn.
    pub fn shows_progress(&self) -> bool {
        self.format == OutputFormat::Table
    }

    /// Format the template list.
    pub fn templates(&self, templates: &[Template]) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(templates)?),
            OutputFormat::Quiet => Ok(templates
                .iter()
                .map(|t| t.id.to_string())
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Table => {
                if templates.is_empty() {
                    return Ok(self.colorize("No templates available.", "yellow"));
                }

                let mut builder = Builder::default();
                builder.push_record(["ID", "Name", "Description", "Features"]);
                for template in templates {
                    builder.push_record([
                        template.id.to_string(),
                        template.name.clone(),
                        template.description.clone(),
                        template.features.join(", "),
                    ]);
                }
                Ok(self.render(builder))
            }
        }
    }

    /// Format the selected files with their sizes.
    pub fn files(&self, files: &[UploadedFile]) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let json: Vec<serde_json::Value> = files
                    .iter()
                    .map(|f| {
                        serde_json::json!({
                            "name": f.name,
                            "size": f.size,
                            "mime_type": f.mime_type,
                        })
                    })
                    .collect();
                Ok(serde_json::to_string_pretty(&json)?)
            }
            OutputFormat::Quiet => Ok(files
                .iter()
                .map(|f| f.name.as_str())
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Table => {
                if files.is_empty() {
                    return Ok(self.colorize("No files selected.", "yellow"));
                }

                let mut builder = Builder::default();
                builder.push_record(["#", "File", "Size"]);
                for (i, file) in files.iter().enumerate() {
                    builder.push_record([(i + 1).to_string(), file.name.clone(), file.display_size()]);
                }
                let total: u64 = files.iter().map(|f| f.size).sum();
                Ok(format!(
                    "{}\n{} PDF file(s), {} total",
                    self.render(builder),
                    files.len(),
                    format_size(total)
                ))
            }
        }
    }

    /// Format the summary of a finished job.
    pub fn job_summary(
        &self,
        job: &ExtractionJob,
        template: Option<&Template>,
        files_processed: usize,
        download_url: &str,
    ) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&serde_json::json!({
                "job_id": job.job_id,
                "status": job.status,
                "message": job.message,
                "template": template.map(|t| &t.name),
                "files_processed": files_processed,
                "download_url": download_url,
            }))?),
            OutputFormat::Quiet => Ok(job.job_id.clone()),
            OutputFormat::Table => {
                let job_id = if job.job_id.is_empty() {
                    "N/A"
                } else {
                    job.job_id.as_str()
                };
                let mut builder = Builder::default();
                builder.push_record(["Job ID", job_id]);
                builder.push_record(["Status", job.status.as_str()]);
                builder.push_record([
                    "Template",
                    template.map(|t| t.name.as_str()).unwrap_or("Unknown Template"),
                ]);
                builder.push_record(["Files Processed", &format!("{} PDF(s)", files_processed)]);
                if let Some(message) = &job.message {
                    builder.push_record(["Message", message.as_str()]);
                }
                builder.push_record(["Download", download_url]);

                let mut table = builder.build();
                table.with(Style::rounded());
                Ok(format!(
                    "{}\n{}",
                    self.success("Extraction Summary"),
                    table
                ))
            }
        }
    }

    /// One line of the live progress display.
    pub fn progress(&self, status: ExtractionStatus, progress: u8) -> String {
        let filled = usize::from(progress.min(100)) * PROGRESS_WIDTH / 100;
        let bar = format!(
            "[{}{}]",
            "#".repeat(filled),
            "-".repeat(PROGRESS_WIDTH - filled)
        );
        let color = match status {
            ExtractionStatus::Uploading => "yellow",
            ExtractionStatus::Processing => "blue",
            _ => "none",
        };
        format!(
            "{} {:>3}% {}",
            self.colorize(&bar, color),
            progress,
            status_text(status)
        )
    }

    /// Format an extraction failure with troubleshooting tips.
    pub fn extraction_failed(&self, message: &str) -> String {
        if self.format != OutputFormat::Table {
            return self.error(message);
        }

        let mut out = format!(
            "{}\n  {}\n\nTroubleshooting tips:\n",
            self.error("Extraction Failed"),
            message
        );
        for tip in TROUBLESHOOTING_TIPS {
            out.push_str(&format!("  - {}\n", tip));
        }
        out.push_str(&self.info("Run 'reset' to try again"));
        out
    }

    /// Troubleshooting tips on their own, for when the message is shown elsewhere.
    pub fn troubleshooting(&self) -> String {
        let mut out = String::from("Troubleshooting tips:");
        for tip in TROUBLESHOOTING_TIPS {
            out.push_str(&format!("\n  - {}", tip));
        }
        out
    }

    /// Format a health check result.
    pub fn health(&self, url: &str, health: &HealthStatus) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(health)?),
            OutputFormat::Quiet => Ok(health.status.clone()),
            OutputFormat::Table => {
                let msg = format!("{} at {} is {}", health.service, url, health.status);
                if health.is_healthy() {
                    Ok(self.success(&msg))
                } else {
                    Ok(self.warning(&msg))
                }
            }
        }
    }

    /// Format a saved result file.
    pub fn saved(&self, path: &Path, bytes: usize) -> String {
        match self.format {
            OutputFormat::Quiet => path.display().to_string(),
            _ => self.success(&format!(
                "Saved {} ({})",
                path.display(),
                format_size(bytes as u64)
            )),
        }
    }

    /// Format an LLM probe outcome.
    pub fn llm_report(&self, key: KeyInfo, report: &ProbeReport) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&serde_json::json!({
                "api_key_exists": key.present,
                "api_key_length": key.length,
                "model": report.model,
                "reply": report.reply,
                "elapsed_ms": report.elapsed.as_millis() as u64,
            }))?),
            OutputFormat::Quiet => Ok(report.reply.clone()),
            OutputFormat::Table => Ok(format!(
                "API key exists: {}\nAPI key length: {}\n{}",
                key.present,
                key.length,
                self.success(&format!(
                    "{} answered in {} ms: {}",
                    report.model,
                    report.elapsed.as_millis(),
                    report.reply.trim()
                ))
            )),
        }
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    fn render(&self, builder: Builder) -> String {
        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));
        table.to_string()
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}

/// Human-readable description of an in-flight status.
pub fn status_text(status: ExtractionStatus) -> &'static str {
    match status {
        ExtractionStatus::Uploading => "Uploading files...",
        ExtractionStatus::Processing => "Extracting data with AI...",
        _ => "Processing...",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pdfx_domain::{default_templates, JobStatus, PDF_MIME};
    use std::time::Duration;

    fn plain(format: OutputFormat) -> Formatter {
        Formatter::new(format, false)
    }

    #[test]
    fn test_templates_table() {
        let output = plain(OutputFormat::Table)
            .templates(&default_templates())
            .unwrap();
        assert!(output.contains(&default_templates()[0].name));
        assert!(output.contains("Private Equity Fund Detailed Template"));
        assert!(output.contains("Portfolio Summary"));
        assert!(output.contains("Features"));
    }

    #[test]
    fn test_templates_quiet_and_json() {
        let quiet = plain(OutputFormat::Quiet)
            .templates(&default_templates())
            .unwrap();
        assert_eq!(quiet, "1\n2");

        let json = plain(OutputFormat::Json)
            .templates(&default_templates())
            .unwrap();
        let parsed: Vec<Template> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, default_templates());
    }

    #[test]
    fn test_files_table_shows_sizes() {
        let files = vec![
            UploadedFile::new("q1.pdf", vec![0; 2 * 1024 * 1024], PDF_MIME),
            UploadedFile::new("q2.pdf", vec![0; 512], PDF_MIME),
        ];
        let output = plain(OutputFormat::Table).files(&files).unwrap();
        assert!(output.contains("q1.pdf"));
        assert!(output.contains("2.00 MB"));
        assert!(output.contains("512 B"));
        assert!(output.contains("2 PDF file(s)"));
    }

    #[test]
    fn test_job_summary() {
        let job = ExtractionJob::new("abc123", JobStatus::Completed).with_message("Done");
        let templates = default_templates();
        let formatter = plain(OutputFormat::Table);

        let output = formatter
            .job_summary(&job, templates.first(), 1, "http://localhost:8000/api/download/abc123")
            .unwrap();
        assert!(output.contains("abc123"));
        assert!(output.contains("1 PDF(s)"));
        assert!(output.contains(&templates[0].name));
        assert!(output.contains("/api/download/abc123"));

        let quiet = plain(OutputFormat::Quiet)
            .job_summary(&job, None, 1, "")
            .unwrap();
        assert_eq!(quiet, "abc123");
    }

    #[test]
    fn test_job_summary_json() {
        let job = ExtractionJob::new("abc123", JobStatus::Completed);
        let output = plain(OutputFormat::Json)
            .job_summary(&job, None, 3, "http://x/api/download/abc123")
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["status"], "completed");
        assert_eq!(value["files_processed"], 3);
        assert!(value["template"].is_null());
    }

    #[test]
    fn test_progress_line() {
        let formatter = plain(OutputFormat::Table);
        let line = formatter.progress(ExtractionStatus::Uploading, 40);
        assert!(line.starts_with(&format!("[{}{}]", "#".repeat(12), "-".repeat(18))));
        assert!(line.contains(" 40% Uploading files..."));

        let line = formatter.progress(ExtractionStatus::Processing, 80);
        assert!(line.ends_with("Extracting data with AI..."));
    }

    #[test]
    fn test_failure_lists_tips() {
        let output = plain(OutputFormat::Table).extraction_failed("Network error: down");
        assert!(output.contains("Extraction Failed"));
        assert!(output.contains("Network error: down"));
        for tip in TROUBLESHOOTING_TIPS {
            assert!(output.contains(tip));
        }

        let json = plain(OutputFormat::Json).extraction_failed("boom");
        assert_eq!(json, "✗ boom");
    }

    #[test]
    fn test_llm_report() {
        let report = ProbeReport {
            model: "gpt-3.5-turbo".to_string(),
            reply: "Hello!".to_string(),
            elapsed: Duration::from_millis(250),
        };
        let key = KeyInfo::of(Some("sk-0123456789"));
        let output = plain(OutputFormat::Table).llm_report(key, &report).unwrap();
        assert!(output.contains("API key exists: true"));
        assert!(output.contains("API key length: 13"));
        assert!(output.contains("250 ms: Hello!"));
    }

    #[test]
    fn test_colorize_disabled() {
        let formatter = plain(OutputFormat::Table);
        assert_eq!(formatter.success("test"), "✓ test");
        assert_eq!(formatter.warning("test"), "⚠ test");
    }
}
