//! Template module - extraction schemas offered by the service

use serde::{Deserialize, Serialize};
use std::fmt;

/// Numeric template identifier, sent as the `template_id` form field
pub type TemplateId = u32;

/// An extraction template
///
/// The service decides which fields each template extracts; the client only
/// shows the name, description and feature labels and sends back the id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    /// Template identifier
    pub id: TemplateId,

    /// Display name
    pub name: String,

    /// One-paragraph description
    #[serde(default)]
    pub description: String,

    /// Ordered feature labels (e.g. "Fund Details")
    #[serde(default)]
    pub features: Vec<String>,
}

impl Template {
    /// Create a template
    pub fn new(
        id: TemplateId,
        name: impl Into<String>,
        description: impl Into<String>,
        features: &[&str],
    ) -> Self {
        Self {
            id,
            name: name.into(),
            description: description.into(),
            features: features.iter().map(|f| f.to_string()).collect(),
        }
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (template {})", self.name, self.id)
    }
}

/// Static template list used when the service cannot be reached
///
/// The order and content are fixed so the fallback is deterministic.
pub fn default_templates() -> Vec<Template> {
    vec![
        Template::new(
            1,
            "Private Equity Fund Detailed Template",
            "Comprehensive fund and investment data extraction including fund details, \
             manager information, financial positions, and portfolio companies",
            &[
                "Fund Details",
                "Manager Info",
                "Financial Positions",
                "Portfolio Companies",
                "Investment History",
            ],
        ),
        Template::new(
            2,
            "Portfolio Summary Template",
            "Executive portfolio summary with investment schedules, financial statements, \
             and company profiles",
            &[
                "Executive Summary",
                "Investment Schedule",
                "Financial Statements",
                "Company Profiles",
                "Footnotes",
            ],
        ),
    ]
}
