//! Execution modes other than dry-run.
//!
//! Each mode returns the exit code the wrapper should finish with. Errors
//! are reserved for failures of the wrapper itself (missing tools, I/O).

pub mod coverage;
pub mod plain;
pub mod report;

use std::io::Write;
use std::path::Path;

use testwrap_core::error::{Result, TestwrapError};

/// Write an output artifact, creating parent directories.
pub(crate) async fn write_artifact(path: &Path, data: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await.map_err(|e| {
            TestwrapError::Io(format!("create {} failed: {e}", parent.display()))
        })?;
    }
    tokio::fs::write(path, data)
        .await
        .map_err(|e| TestwrapError::Io(format!("write {} failed: {e}", path.display())))?;
    tracing::debug!(path = %path.display(), bytes = data.len(), "artifact written");
    Ok(())
}

/// Echo tool output to the console.
pub(crate) fn echo<W: Write>(out: &mut W, data: &[u8]) -> Result<()> {
    out.write_all(data)?;
    out.flush()?;
    Ok(())
}
