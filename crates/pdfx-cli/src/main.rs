//! pdfx CLI - Command-line client for the PDF extraction service.

use clap::Parser;
use pdfx_cli::commands;
use pdfx_cli::shell;
use pdfx_cli::{Cli, Command, Config, Formatter};
use pdfx_controller::ExtractionController;
use pdfx_sdk::ExtractionClient;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> pdfx_cli::Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Load or create config
    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load().unwrap_or_else(|_| {
            let cfg = Config::default();
            cfg.save().ok();
            cfg
        }),
    };

    // Override profile if specified
    if let Some(profile_name) = cli.profile {
        config.switch_profile(profile_name)?;
    }

    let format = cli
        .format
        .map(Into::into)
        .unwrap_or(config.settings.format);
    let color_enabled = !cli.no_color && config.settings.color;
    let formatter = Formatter::new(format, color_enabled);

    let api_url = config.resolve_api_url(cli.api_url.as_deref());
    tracing::debug!("Using extraction service at {}", api_url);

    match cli.command {
        Some(Command::Profile(args)) => {
            commands::execute_profile(args, &mut config, &formatter).await?;
        }
        Some(Command::LlmCheck(args)) => {
            commands::execute_llm_check(args, &formatter).await?;
        }
        Some(Command::Health) => {
            let client = ExtractionClient::new(&api_url)?;
            commands::execute_health(&client, &formatter).await?;
        }
        Some(Command::Templates) => {
            let mut controller = ExtractionController::new(ExtractionClient::new(&api_url)?);
            commands::execute_templates(&mut controller, &formatter).await?;
        }
        Some(Command::Extract(args)) => {
            let output_dir = config.resolve_output_dir(args.output.as_deref());
            let mut controller = ExtractionController::new(ExtractionClient::new(&api_url)?);
            commands::execute_extract(args, &mut controller, &output_dir, &formatter).await?;
        }
        Some(Command::Download(args)) => {
            let output_dir = config.resolve_output_dir(args.output.as_deref());
            let client = ExtractionClient::new(&api_url)?;
            commands::execute_download(args, &client, &output_dir, &formatter).await?;
        }
        None | Some(Command::Shell) => {
            let controller = ExtractionController::new(ExtractionClient::new(&api_url)?);
            shell::run_shell(controller, &config, &formatter).await?;
        }
    }

    Ok(())
}

/// Log to stderr, filtered by `PDFX_LOG` (default `warn`), or at debug with `--verbose`.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env("PDFX_LOG").unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}
