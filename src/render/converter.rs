//! Conversão de HTML para PDF.
//!
//! O motor de conversão é um colaborador externo: [`PdfConverter`] é a
//! costura, e [`CommandConverter`] envia o HTML pela entrada padrão de um
//! programa (por padrão `weasyprint`) e lê o PDF da saída padrão.

use std::future::Future;
use std::path::Path;
use std::process::Stdio;

use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

use super::RenderError;

/// Renders HTML markup to PDF bytes.
pub trait PdfConverter: Send + Sync + 'static {
    /// `base_dir` is where relative resource references (images) resolve.
    fn convert(
        &self,
        html: &str,
        base_dir: &Path,
    ) -> impl Future<Output = Result<Vec<u8>, RenderError>> + Send;
}

/// Runs `<program> --base-url <dir> - -`, feeding HTML on stdin.
#[derive(Debug, Clone)]
pub struct CommandConverter {
    program: String,
}

impl CommandConverter {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl Default for CommandConverter {
    fn default() -> Self {
        Self::new("weasyprint")
    }
}

impl PdfConverter for CommandConverter {
    async fn convert(&self, html: &str, base_dir: &Path) -> Result<Vec<u8>, RenderError> {
        debug!(program = %self.program, base_dir = %base_dir.display(), "converting html to pdf");

        let mut child = Command::new(&self.program)
            .arg("--base-url")
            .arg(base_dir)
            .arg("-")
            .arg("-")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| RenderError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        let mut stdin = child.stdin.take().ok_or_else(|| RenderError::Spawn {
            program: self.program.clone(),
            source: std::io::Error::other("stdin was not captured"),
        })?;
        let markup = html.to_owned();
        let writer = tokio::spawn(async move {
            stdin.write_all(markup.as_bytes()).await?;
            stdin.shutdown().await
        });

        let output = child.wait_with_output().await?;
        // A converter that exits early closes the pipe; its status explains why.
        let written = writer.await.map_err(std::io::Error::other)?;

        if !output.status.success() {
            return Err(RenderError::Converter {
                program: self.program.clone(),
                status: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        written?;

        Ok(output.stdout)
    }
}
