//! Health command implementation.

use crate::error::Result;
use crate::output::Formatter;
use pdfx_sdk::{ExtractionClient, HealthStatus, Transport};

/// Execute the health command.
pub async fn execute_health<T: Transport>(
    client: &ExtractionClient<T>,
    formatter: &Formatter,
) -> Result<HealthStatus> {
    let health = client.health().await?;
    println!("{}", formatter.health(client.base_url(), &health)?);
    Ok(health)
}
