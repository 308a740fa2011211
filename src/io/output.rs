use std::path::Path;

use anyhow::{Context, Result};

use crate::models::NormalizedDocument;
use crate::normalize::render_page;

/// Write the printable HTML page for a document
pub fn write_html(document: &NormalizedDocument, path: &Path) -> Result<()> {
    std::fs::write(path, render_page(document))
        .with_context(|| format!("Failed to write HTML file: {:?}", path))
}

pub fn write_pdf(bytes: &[u8], path: &Path) -> Result<()> {
    std::fs::write(path, bytes).with_context(|| format!("Failed to write PDF file: {:?}", path))
}

/// Write any serializable value as pretty JSON
pub fn write_json<T: serde::Serialize>(value: &T, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create file: {:?}", path))?;
    serde_json::to_writer_pretty(file, value).context("Failed to write JSON")?;
    Ok(())
}
