//! Reporting utilities: plain-text summaries (`format`) and JSON output.

use serde::Serialize;

use crate::error::AppError;

pub mod format;

pub use format::*;

/// Pretty JSON for `--json` output.
pub fn to_json<T: Serialize>(value: &T) -> Result<String, AppError> {
    Ok(serde_json::to_string_pretty(value)?)
}
