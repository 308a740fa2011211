use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, info};

use crate::error::LexError;

/// Turns a complete HTML page into PDF bytes
#[async_trait]
pub trait PdfRenderer: Send + Sync {
    async fn render(&self, page_html: &str) -> Result<Vec<u8>, LexError>;
}

/// Renders through the external `wkhtmltopdf` binary over stdin/stdout
#[derive(Debug, Clone)]
pub struct WkhtmltopdfRenderer {
    binary: PathBuf,
}

impl WkhtmltopdfRenderer {
    /// Use the configured binary, or find `wkhtmltopdf` on the PATH
    pub fn locate(configured: Option<&Path>) -> Result<Self, LexError> {
        let binary = match configured {
            Some(path) if path.is_file() => path.to_path_buf(),
            Some(path) => {
                return Err(LexError::RenderFailed(format!(
                    "wkhtmltopdf not found at {}",
                    path.display()
                )));
            }
            None => which::which("wkhtmltopdf")
                .map_err(|e| LexError::RenderFailed(format!("wkhtmltopdf not found: {}", e)))?,
        };
        debug!("Using wkhtmltopdf at {:?}", binary);
        Ok(Self { binary })
    }
}

#[async_trait]
impl PdfRenderer for WkhtmltopdfRenderer {
    async fn render(&self, page_html: &str) -> Result<Vec<u8>, LexError> {
        let mut child = Command::new(&self.binary)
            .args([
                "--quiet",
                "--encoding",
                "utf-8",
                "--page-size",
                "A4",
                "--margin-top",
                "25mm",
                "--margin-bottom",
                "25mm",
                "--margin-left",
                "20mm",
                "--margin-right",
                "20mm",
                "-",
                "-",
            ])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| LexError::RenderFailed(format!("failed to start wkhtmltopdf: {}", e)))?;

        // Feed stdin concurrently so a full stdout pipe cannot stall the child
        let writer = child.stdin.take().map(|mut stdin| {
            let page = page_html.to_string();
            tokio::spawn(async move {
                stdin.write_all(page.as_bytes()).await?;
                stdin.shutdown().await
            })
        });

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| LexError::RenderFailed(format!("wkhtmltopdf did not finish: {}", e)))?;

        if let Some(writer) = writer {
            match writer.await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => debug!("wkhtmltopdf closed stdin early: {}", e),
                Err(e) => debug!("stdin writer task failed: {}", e),
            }
        }

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(LexError::RenderFailed(format!(
                "wkhtmltopdf exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }
        if output.stdout.is_empty() {
            return Err(LexError::RenderFailed(
                "wkhtmltopdf produced no output".to_string(),
            ));
        }

        info!("Rendered PDF ({} bytes)", output.stdout.len());
        Ok(output.stdout)
    }
}
