use std::path::Path;

use anyhow::{Context, Result};

use crate::models::CaseForm;

/// Load a case submission from a JSON file
pub fn load_case_form(path: &Path) -> Result<CaseForm> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {:?}", path))?;
    parse_case_form(&content)
}

/// Parse a case submission; missing fields become empty strings and fail validation later
pub fn parse_case_form(json: &str) -> Result<CaseForm> {
    serde_json::from_str(json).context("Failed to parse case JSON")
}

/// Read raw model output for offline normalization
pub fn load_raw_text(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {:?}", path))
}
