//! Result filename module - names for downloaded spreadsheets

use crate::template::Template;
use chrono::NaiveDate;

/// Content type of the result spreadsheet
pub const SPREADSHEET_MIME: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Template id whose results are labelled `Private_Equity`
const PRIVATE_EQUITY_TEMPLATE: u32 = 1;

/// Build the filename a downloaded result is saved under
///
/// Template 1 yields `Private_Equity`; every other template, and an unknown
/// one, yields `Portfolio_Summary`.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use pdfx_domain::{default_templates, result_filename};
///
/// let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
/// let templates = default_templates();
/// assert_eq!(
///     result_filename(Some(&templates[0]), date),
///     "Extracted_Data_Private_Equity_2024-03-09.xlsx"
/// );
/// ```
pub fn result_filename(template: Option<&Template>, date: NaiveDate) -> String {
    let suffix = match template {
        Some(t) if t.id == PRIVATE_EQUITY_TEMPLATE => "Private_Equity",
        _ => "Portfolio_Summary",
    };

    format!("Extracted_Data_{}_{}.xlsx", suffix, date.format("%Y-%m-%d"))
}
