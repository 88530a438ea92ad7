//! Interactive shell driving one extraction session.

use crate::commands::templates::load_templates;
use crate::commands::{extract_with_progress, save_result};
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use pdfx_controller::{ExtractionController, ExtractionStatus};
use pdfx_domain::{TemplateId, UploadedFile};
use pdfx_sdk::Transport;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::path::PathBuf;

/// Shell command type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    /// Leave the shell
    Quit,
    /// Print the command list
    Help,
    /// List the selection, or replace it with these paths
    Files(Vec<PathBuf>),
    /// Drop a file by its 1-based position
    Remove(usize),
    /// Reload and list templates
    Templates,
    /// Select a template
    Use(TemplateId),
    /// Submit the selection
    Extract,
    /// Show the session state
    Status,
    /// Save the result, optionally into another directory
    Download(Option<PathBuf>),
    /// Start over
    Reset,
}

/// Run the interactive shell.
pub async fn run_shell<T: Transport>(
    mut controller: ExtractionController<T>,
    config: &Config,
    formatter: &Formatter,
) -> Result<()> {
    println!(
        "{}",
        formatter.info("pdfx shell - Type 'help' for commands, 'quit' to exit")
    );
    println!();

    let editor_config = rustyline::Config::builder()
        .max_history_size(config.settings.history_size)
        .map_err(editor_error)?
        .build();
    let mut editor = DefaultEditor::with_config(editor_config).map_err(editor_error)?;

    let history_path = history_path()?;
    let _ = editor.load_history(&history_path);

    load_templates(&mut controller, formatter).await;
    let output_dir = config.resolve_output_dir(None);

    loop {
        let prompt = format!("pdfx [{}]> ", controller.status());

        match editor.readline(&prompt) {
            Ok(line) => {
                let line = line.trim();

                if line.is_empty() {
                    continue;
                }

                editor.add_history_entry(line).ok();

                match parse_shell_command(line) {
                    Ok(ShellCommand::Quit) => {
                        println!("{}", formatter.info("Goodbye!"));
                        break;
                    }
                    Ok(ShellCommand::Help) => print_help(formatter),
                    Ok(cmd) => {
                        if let Err(e) =
                            execute_shell_command(cmd, &mut controller, &output_dir, formatter)
                                .await
                        {
                            eprintln!("{}", formatter.error(&e.to_string()));
                        }
                    }
                    Err(e) => {
                        eprintln!("{}", formatter.error(&e.to_string()));
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", formatter.info("Use 'quit' to exit"));
            }
            Err(ReadlineError::Eof) => {
                break;
            }
            Err(err) => {
                eprintln!("{}", formatter.error(&format!("Error: {}", err)));
                break;
            }
        }
    }

    editor.save_history(&history_path).ok();

    Ok(())
}

/// Parse a shell command line.
pub fn parse_shell_command(line: &str) -> Result<ShellCommand> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    let Some((&head, args)) = parts.split_first() else {
        return Err(CliError::InvalidInput("Empty command".to_string()));
    };

    match head {
        "quit" | "exit" | "q" => Ok(ShellCommand::Quit),
        "help" | "?" => Ok(ShellCommand::Help),
        "files" | "add" => Ok(ShellCommand::Files(
            args.iter().map(PathBuf::from).collect(),
        )),
        "remove" | "rm" => {
            let position = args
                .first()
                .and_then(|s| s.parse::<usize>().ok())
                .filter(|n| *n > 0)
                .ok_or_else(|| CliError::InvalidInput("Usage: remove <number>".to_string()))?;
            Ok(ShellCommand::Remove(position))
        }
        "templates" => Ok(ShellCommand::Templates),
        "use" | "template" => {
            let id = args
                .first()
                .and_then(|s| s.parse::<TemplateId>().ok())
                .ok_or_else(|| CliError::InvalidInput("Usage: use <template id>".to_string()))?;
            Ok(ShellCommand::Use(id))
        }
        "extract" | "run" => Ok(ShellCommand::Extract),
        "status" => Ok(ShellCommand::Status),
        "download" => Ok(ShellCommand::Download(args.first().map(PathBuf::from))),
        "reset" => Ok(ShellCommand::Reset),
        _ => Err(CliError::InvalidInput(format!(
            "Unknown command: {}. Type 'help' for available commands.",
            head
        ))),
    }
}

/// Execute one shell command against the session.
pub async fn execute_shell_command<T: Transport>(
    cmd: ShellCommand,
    controller: &mut ExtractionController<T>,
    output_dir: &std::path::Path,
    formatter: &Formatter,
) -> Result<()> {
    match cmd {
        ShellCommand::Files(paths) if paths.is_empty() => {
            println!("{}", formatter.files(&controller.state().files)?);
        }
        ShellCommand::Files(paths) => {
            let mut files = Vec::with_capacity(paths.len());
            for path in &paths {
                let file = UploadedFile::from_path(path).map_err(|e| {
                    CliError::InvalidInput(format!("Cannot read {}: {}", path.display(), e))
                })?;
                files.push(file);
            }
            let selection = controller.select_files(files)?;
            for name in &selection.rejected {
                eprintln!("{}", formatter.warning(&format!("Skipping {}: not a PDF", name)));
            }
            println!("{}", formatter.files(&controller.state().files)?);
        }
        ShellCommand::Remove(position) => {
            let removed = controller.remove_file(position - 1)?;
            println!("{}", formatter.success(&format!("Removed {}", removed.name)));
        }
        ShellCommand::Templates => {
            load_templates(controller, formatter).await;
            println!("{}", formatter.templates(controller.templates())?);
        }
        ShellCommand::Use(id) => {
            controller.select_template_by_id(id)?;
            if let Some(template) = controller.state().selected_template {
                println!("{}", formatter.success(&format!("Using {}", template)));
            }
        }
        ShellCommand::Extract => match extract_with_progress(controller, formatter).await {
            Ok(job) => {
                let state = controller.state();
                let url = controller.client().download_url(&job);
                println!(
                    "{}",
                    formatter.job_summary(
                        &job,
                        state.selected_template.as_ref(),
                        state.files.len(),
                        &url
                    )?
                );
                println!(
                    "{}",
                    formatter.info("Run 'download' to save the spreadsheet, 'reset' to start over")
                );
            }
            Err(e) if controller.status() == ExtractionStatus::Error => {
                eprintln!("{}", formatter.extraction_failed(&e.to_string()));
            }
            Err(e) => return Err(e.into()),
        },
        ShellCommand::Status => print_status(controller, formatter),
        ShellCommand::Download(dir) => {
            let result = controller.download().await?;
            let dir = dir.unwrap_or_else(|| output_dir.to_path_buf());
            let path = save_result(&result, &dir)?;
            println!("{}", formatter.saved(&path, result.content.len()));
        }
        ShellCommand::Reset => {
            controller.reset()?;
            println!("{}", formatter.success("Ready for a new extraction"));
        }
        ShellCommand::Quit | ShellCommand::Help => {}
    }

    Ok(())
}

fn print_status<T: Transport>(controller: &ExtractionController<T>, formatter: &Formatter) {
    let state = controller.state();
    println!("Status:   {}", state.status);
    if state.status.is_in_flight() {
        println!("Progress: {}", formatter.progress(state.status, state.progress));
    } else {
        println!("Progress: {}%", state.progress);
    }
    println!(
        "Files:    {} selected ({} bytes)",
        state.files.len(),
        state.total_bytes()
    );
    match &state.selected_template {
        Some(template) => println!("Template: {}", template),
        None => println!("Template: none"),
    }
    if let Some(job) = &state.result {
        println!("Job:      {} ({})", job.job_id, job.status);
    }
    if let Some(error) = &state.error {
        println!("{}", formatter.error(error));
    }
}

fn editor_error(e: ReadlineError) -> CliError {
    CliError::Io(std::io::Error::other(format!(
        "Failed to initialize editor: {}",
        e
    )))
}

fn history_path() -> Result<PathBuf> {
    let dir = Config::dir()?;
    std::fs::create_dir_all(&dir)?;
    Ok(dir.join("history.txt"))
}

fn print_help(formatter: &Formatter) {
    println!("{}", formatter.info("Available commands:"));
    println!();
    println!("  files [path...]      - List selected files, or select these PDFs");
    println!("  remove <n>           - Remove the n-th selected file");
    println!("  templates            - Reload and list templates");
    println!("  use <id>             - Select a template");
    println!("  extract              - Submit files and wait for the result");
    println!("  status               - Show the session state");
    println!("  download [dir]       - Save the result spreadsheet");
    println!("  reset                - Start a new extraction");
    println!("  help, ?              - Show this help");
    println!("  quit, exit, q        - Leave the shell");
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;
    use pdfx_controller::ControllerError;
    use pdfx_domain::{ExtractionJob, JobStatus};
    use pdfx_sdk::{ExtractionClient, SdkError, StubTransport};
    use std::path::Path;

    fn quiet() -> Formatter {
        Formatter::new(OutputFormat::Quiet, false)
    }

    fn write_pdf(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, b"%PDF-1.4\nbody").unwrap();
        path
    }

    async fn session(stub: &StubTransport) -> ExtractionController<StubTransport> {
        let mut controller =
            ExtractionController::new(ExtractionClient::with_transport(stub.clone()));
        controller.load_templates().await;
        controller
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse_shell_command("quit").unwrap(), ShellCommand::Quit);
        assert_eq!(parse_shell_command("?").unwrap(), ShellCommand::Help);
        assert_eq!(parse_shell_command("files").unwrap(), ShellCommand::Files(vec![]));
        assert_eq!(
            parse_shell_command("files a.pdf b.pdf").unwrap(),
            ShellCommand::Files(vec![PathBuf::from("a.pdf"), PathBuf::from("b.pdf")])
        );
        assert_eq!(parse_shell_command("use 2").unwrap(), ShellCommand::Use(2));
        assert_eq!(parse_shell_command("remove 1").unwrap(), ShellCommand::Remove(1));
        assert_eq!(
            parse_shell_command("download out").unwrap(),
            ShellCommand::Download(Some(PathBuf::from("out")))
        );
    }

    #[test]
    fn test_parse_rejects_bad_arguments() {
        assert!(parse_shell_command("").is_err());
        assert!(parse_shell_command("remove 0").is_err());
        assert!(parse_shell_command("remove x").is_err());
        assert!(parse_shell_command("use").is_err());
        assert!(parse_shell_command("frobnicate").is_err());
    }

    #[tokio::test]
    async fn test_full_session() {
        let dir = tempfile::tempdir().unwrap();
        let pdf = write_pdf(dir.path(), "q3.pdf");
        let stub = StubTransport::new()
            .with_job(ExtractionJob::new("abc123", JobStatus::Completed))
            .with_download("abc123", b"sheet".to_vec());
        let mut controller = session(&stub).await;
        let f = quiet();

        execute_shell_command(ShellCommand::Files(vec![pdf]), &mut controller, dir.path(), &f)
            .await
            .unwrap();
        execute_shell_command(ShellCommand::Use(1), &mut controller, dir.path(), &f)
            .await
            .unwrap();
        execute_shell_command(ShellCommand::Extract, &mut controller, dir.path(), &f)
            .await
            .unwrap();
        assert_eq!(controller.status(), ExtractionStatus::Completed);

        let out = dir.path().join("out");
        execute_shell_command(
            ShellCommand::Download(Some(out.clone())),
            &mut controller,
            dir.path(),
            &f,
        )
        .await
        .unwrap();
        let saved: Vec<_> = std::fs::read_dir(&out).unwrap().collect();
        assert_eq!(saved.len(), 1);

        execute_shell_command(ShellCommand::Reset, &mut controller, dir.path(), &f)
            .await
            .unwrap();
        assert_eq!(controller.status(), ExtractionStatus::Idle);
        assert!(controller.state().files.is_empty());
    }

    #[tokio::test]
    async fn test_failed_extraction_is_reported_not_returned() {
        let dir = tempfile::tempdir().unwrap();
        let pdf = write_pdf(dir.path(), "q3.pdf");
        let stub = StubTransport::new().with_submit_error(SdkError::Network("down".into()));
        let mut controller = session(&stub).await;
        let f = quiet();

        execute_shell_command(ShellCommand::Files(vec![pdf]), &mut controller, dir.path(), &f)
            .await
            .unwrap();
        execute_shell_command(ShellCommand::Use(2), &mut controller, dir.path(), &f)
            .await
            .unwrap();
        execute_shell_command(ShellCommand::Extract, &mut controller, dir.path(), &f)
            .await
            .unwrap();
        assert_eq!(controller.status(), ExtractionStatus::Error);

        let result =
            execute_shell_command(ShellCommand::Download(None), &mut controller, dir.path(), &f)
                .await;
        assert!(matches!(
            result,
            Err(CliError::Controller(ControllerError::InvalidTransition { .. }))
        ));
    }

    #[tokio::test]
    async fn test_remove_out_of_range() {
        let dir = tempfile::tempdir().unwrap();
        let stub = StubTransport::new();
        let mut controller = session(&stub).await;

        let result =
            execute_shell_command(ShellCommand::Remove(3), &mut controller, dir.path(), &quiet())
                .await;
        assert!(matches!(
            result,
            Err(CliError::Controller(ControllerError::NoSuchFile(2)))
        ));
    }

    #[tokio::test]
    async fn test_extract_without_template_stays_idle() {
        let dir = tempfile::tempdir().unwrap();
        let pdf = write_pdf(dir.path(), "q3.pdf");
        let stub = StubTransport::new();
        let mut controller = session(&stub).await;
        let f = quiet();

        execute_shell_command(ShellCommand::Files(vec![pdf]), &mut controller, dir.path(), &f)
            .await
            .unwrap();
        let result =
            execute_shell_command(ShellCommand::Extract, &mut controller, dir.path(), &f).await;

        assert!(matches!(
            result,
            Err(CliError::Controller(ControllerError::Validation(_)))
        ));
        assert_eq!(controller.status(), ExtractionStatus::Idle);
        assert_eq!(stub.calls().submit, 0);
    }
}
