//! Templates command implementation.

use crate::error::Result;
use crate::output::Formatter;
use pdfx_controller::{ExtractionController, TemplateSource};
use pdfx_sdk::Transport;

/// Load templates into the controller, warning when the defaults are used.
pub async fn load_templates<T: Transport>(
    controller: &mut ExtractionController<T>,
    formatter: &Formatter,
) -> TemplateSource {
    let source = controller.load_templates().await;
    if let TemplateSource::Fallback { reason } = &source {
        eprintln!(
            "{}",
            formatter.warning(&format!("Using default templates ({})", reason))
        );
    }
    source
}

/// Execute the templates command.
pub async fn execute_templates<T: Transport>(
    controller: &mut ExtractionController<T>,
    formatter: &Formatter,
) -> Result<()> {
    load_templates(controller, formatter).await;
    println!("{}", formatter.templates(controller.templates())?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;
    use pdfx_domain::Template;
    use pdfx_sdk::{ExtractionClient, SdkError, StubTransport};

    #[tokio::test]
    async fn test_service_templates_are_listed() {
        let stub = StubTransport::new().with_templates(vec![Template::new(
            7,
            "Capital Calls",
            "Capital call notices",
            &["Call amount"],
        )]);
        let mut controller = ExtractionController::new(ExtractionClient::with_transport(stub));
        let formatter = Formatter::new(OutputFormat::Quiet, false);

        execute_templates(&mut controller, &formatter).await.unwrap();
        assert_eq!(controller.templates().len(), 1);
        assert_eq!(controller.templates()[0].id, 7);
    }

    #[tokio::test]
    async fn test_failure_falls_back() {
        let stub = StubTransport::new().with_templates_error(SdkError::Network("down".into()));
        let mut controller = ExtractionController::new(ExtractionClient::with_transport(stub));
        let formatter = Formatter::new(OutputFormat::Table, false);

        let source = load_templates(&mut controller, &formatter).await;
        assert!(source.is_fallback());
        assert_eq!(controller.templates().len(), 2);
    }
}
