use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use testwrap_core::error::{Result, TestwrapError};

use super::{Invocation, ToolOutput, ToolRunner};

/// Real subprocesses via `tokio::process`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessRunner;

#[async_trait]
impl ToolRunner for ProcessRunner {
    async fn run(&self, inv: Invocation) -> Result<ToolOutput> {
        tracing::info!(cmd = %inv.display(), cwd = %inv.cwd.display(), "launching");

        let mut cmd = Command::new(&inv.program);
        cmd.args(&inv.args)
            .current_dir(&inv.cwd)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .stdin(if inv.stdin.is_some() { Stdio::piped() } else { Stdio::null() });

        let mut child = cmd.spawn().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                TestwrapError::MissingTool {
                    tool: inv.program.clone(),
                    hint: format!("ensure `{}` is installed and on PATH", inv.program),
                }
            } else {
                TestwrapError::Io(format!("spawn {} failed: {e}", inv.program))
            }
        })?;

        // Feed stdin from a separate task so a chatty child cannot block on a
        // full stdout pipe while we are still writing.
        let feeder = match (child.stdin.take(), inv.stdin.clone()) {
            (Some(mut pipe), Some(input)) => Some(tokio::spawn(async move {
                let res = pipe.write_all(&input).await;
                drop(pipe);
                res
            })),
            _ => None,
        };

        let out = child
            .wait_with_output()
            .await
            .map_err(|e| TestwrapError::Io(format!("wait {} failed: {e}", inv.program)))?;

        if let Some(f) = feeder {
            match f.await {
                Ok(Err(e)) if e.kind() != std::io::ErrorKind::BrokenPipe => {
                    return Err(TestwrapError::Io(format!(
                        "write stdin of {} failed: {e}",
                        inv.program
                    )));
                }
                Err(e) => {
                    return Err(TestwrapError::Io(format!("stdin feeder panicked: {e}")));
                }
                _ => {}
            }
        }

        let code = exit_code(out.status);
        tracing::info!(program = %inv.program, code, "exited");

        Ok(ToolOutput {
            stdout: Bytes::from(out.stdout),
            stderr: Bytes::from(out.stderr),
            code,
        })
    }

    fn is_available(&self, program: &str, cwd: &Path) -> bool {
        find_on_path(program, cwd).is_some()
    }
}

#[cfg(unix)]
fn exit_code(status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;
    status
        .code()
        .or_else(|| status.signal().map(|s| 128 + s))
        .unwrap_or(1)
}

#[cfg(not(unix))]
fn exit_code(status: ExitStatus) -> i32 {
    status.code().unwrap_or(1)
}

/// Resolve `program` like a shell started in `cwd` would: paths are taken
/// relative to `cwd`, bare names are searched in `PATH`.
pub fn find_on_path(program: &str, cwd: &Path) -> Option<PathBuf> {
    let p = Path::new(program);
    if p.components().count() > 1 {
        let full = cwd.join(p);
        return full.is_file().then_some(full);
    }
    let path = std::env::var_os("PATH")?;
    let ext = std::env::consts::EXE_EXTENSION;
    std::env::split_paths(&path)
        .flat_map(|dir| {
            let base = dir.join(program);
            let mut candidates = vec![base.clone()];
            if !ext.is_empty() {
                candidates.push(base.with_extension(ext));
            }
            candidates
        })
        .find(|c| c.is_file())
}
