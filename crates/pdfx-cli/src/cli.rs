//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use pdfx_domain::TemplateId;
use std::path::PathBuf;

/// pdfx - Extract structured data from PDF documents into spreadsheets.
#[derive(Debug, Parser)]
#[command(name = "pdfx")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Profile to use
    #[arg(short, long, global = true)]
    pub profile: Option<String>,

    /// Extraction service URL, overriding the profile
    #[arg(long, env = "PDFX_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (IDs only)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List extraction templates
    Templates,

    /// Extract data from PDF files
    Extract(ExtractArgs),

    /// Download the spreadsheet of a finished job
    Download(DownloadArgs),

    /// Check that the extraction service is up
    Health,

    /// Manage configuration profiles
    Profile(ProfileArgs),

    /// Check connectivity to a chat completions API
    LlmCheck(LlmCheckArgs),

    /// Enter the interactive shell
    Shell,
}

/// Arguments for the extract command.
#[derive(Debug, Parser)]
pub struct ExtractArgs {
    /// PDF files to extract from
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Template id
    #[arg(short, long)]
    pub template: TemplateId,

    /// Directory to save the spreadsheet to
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Print the job without downloading the spreadsheet
    #[arg(long)]
    pub no_download: bool,
}

/// Arguments for the download command.
#[derive(Debug, Parser)]
pub struct DownloadArgs {
    /// Job identifier
    pub job_id: String,

    /// Template the job used, for naming the file
    #[arg(short, long)]
    pub template: Option<TemplateId>,

    /// Directory to save the spreadsheet to
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for the llm-check command.
#[derive(Debug, Parser)]
pub struct LlmCheckArgs {
    /// Model to query
    #[arg(short, long, default_value = pdfx_llm::openai::DEFAULT_MODEL)]
    pub model: String,

    /// OpenAI-compatible API endpoint
    #[arg(short, long)]
    pub endpoint: Option<String>,
}

/// Arguments for profile management.
#[derive(Debug, Parser)]
pub struct ProfileArgs {
    #[command(subcommand)]
    pub action: ProfileAction,
}

/// Profile management actions.
#[derive(Debug, Subcommand)]
pub enum ProfileAction {
    /// List all profiles
    List,

    /// Show active profile
    Show,

    /// Switch to a different profile
    Switch {
        /// Profile name
        name: String,
    },

    /// Create or update a profile
    Set {
        /// Profile name
        name: String,
        /// Extraction service URL
        #[arg(short, long)]
        url: String,
    },

    /// Delete a profile
    Delete {
        /// Profile name
        name: String,
    },
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_command_means_shell() {
        let cli = Cli::parse_from(["pdfx"]);
        assert!(cli.command.is_none());
        assert!(!cli.verbose);
    }

    #[test]
    fn test_extract_command() {
        let cli = Cli::parse_from([
            "pdfx",
            "extract",
            "q1.pdf",
            "q2.pdf",
            "--template",
            "2",
            "-o",
            "out",
            "--format",
            "json",
        ]);
        match cli.command {
            Some(Command::Extract(args)) => {
                assert_eq!(args.files.len(), 2);
                assert_eq!(args.template, 2);
                assert_eq!(args.output, Some(PathBuf::from("out")));
                assert!(!args.no_download);
            }
            _ => panic!("Expected Extract command"),
        }
        assert!(matches!(cli.format, Some(CliFormat::Json)));
    }

    #[test]
    fn test_extract_requires_files_and_template() {
        assert!(Cli::try_parse_from(["pdfx", "extract", "--template", "1"]).is_err());
        assert!(Cli::try_parse_from(["pdfx", "extract", "a.pdf"]).is_err());
    }

    #[test]
    fn test_llm_check_defaults() {
        let cli = Cli::parse_from(["pdfx", "llm-check"]);
        match cli.command {
            Some(Command::LlmCheck(args)) => {
                assert_eq!(args.model, "gpt-3.5-turbo");
                assert!(args.endpoint.is_none());
            }
            _ => panic!("Expected LlmCheck command"),
        }
    }

    #[test]
    fn test_global_api_url() {
        let cli = Cli::parse_from(["pdfx", "health", "--api-url", "http://svc:8000"]);
        assert_eq!(cli.api_url.as_deref(), Some("http://svc:8000"));
        assert!(matches!(cli.command, Some(Command::Health)));
    }
}
