//! llm-check command implementation.

use crate::cli::LlmCheckArgs;
use crate::error::Result;
use crate::output::Formatter;
use pdfx_llm::openai::API_KEY_ENV;
use pdfx_llm::{probe, KeyInfo, LlmProvider, OpenAiProvider, ProbeReport};

/// Execute the llm-check command.
pub async fn execute_llm_check(args: LlmCheckArgs, formatter: &Formatter) -> Result<ProbeReport> {
    let key = std::env::var(API_KEY_ENV).ok();
    let info = KeyInfo::of(key.as_deref());

    let mut provider = OpenAiProvider::new(key.unwrap_or_default(), args.model)?;
    if let Some(endpoint) = args.endpoint {
        provider = provider.with_endpoint(endpoint);
    }
    tracing::debug!("Probing {} at {}", provider.model(), provider.endpoint());

    run_probe(&provider, info, formatter).await
}

/// Probe `provider` and print the report.
pub async fn run_probe<P: LlmProvider>(
    provider: &P,
    key: KeyInfo,
    formatter: &Formatter,
) -> Result<ProbeReport> {
    let report = probe(provider).await?;
    println!("{}", formatter.llm_report(key, &report)?);
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;
    use crate::error::CliError;
    use pdfx_llm::{LlmError, MockProvider, PROBE_PROMPT};

    #[tokio::test]
    async fn test_probe_with_mock() {
        let mut provider = MockProvider::default();
        provider.add_response(PROBE_PROMPT, "hello");
        let formatter = Formatter::new(OutputFormat::Table, false);

        let report = run_probe(&provider, KeyInfo::of(Some("sk-1")), &formatter)
            .await
            .unwrap();
        assert_eq!(report.reply, "hello");
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn test_probe_failure_is_llm_error() {
        let mut provider = MockProvider::default();
        provider.add_error(PROBE_PROMPT, "connection reset");
        let formatter = Formatter::new(OutputFormat::Table, false);

        let result = run_probe(&provider, KeyInfo::of(None), &formatter).await;
        assert!(matches!(
            result,
            Err(CliError::Llm(LlmError::Communication(_)))
        ));
    }
}
