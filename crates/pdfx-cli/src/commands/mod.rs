//! Command implementations.

pub mod download;
pub mod extract;
pub mod health;
pub mod llm_check;
pub mod profile;
pub mod templates;

pub use self::download::execute_download;
pub use self::extract::{execute_extract, extract_with_progress, save_result, ExtractOutcome};
pub use self::health::execute_health;
pub use self::llm_check::execute_llm_check;
pub use self::profile::execute_profile;
pub use self::templates::execute_templates;
