//! Subprocess seam.
//!
//! Every external tool call goes through [`ToolRunner`]: one invocation in,
//! one completed [`ToolOutput`] out. Calls are awaited one at a time.

pub mod process;

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::{Bytes, BytesMut};

use testwrap_core::error::Result;

use crate::config::ToolCommand;

pub use process::{find_on_path, ProcessRunner};

/// A single external command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: PathBuf,
    /// Bytes written to the child's stdin, which is then closed.
    pub stdin: Option<Bytes>,
}

impl Invocation {
    /// `cmd.program cmd.args.. extra..`
    pub fn new(cmd: &ToolCommand, extra: impl IntoIterator<Item = String>, cwd: PathBuf) -> Self {
        let mut args = cmd.args.clone();
        args.extend(extra);
        Self {
            program: cmd.program.clone(),
            args,
            cwd,
            stdin: None,
        }
    }

    pub fn with_stdin(mut self, input: Bytes) -> Self {
        self.stdin = Some(input);
        self
    }

    pub fn display(&self) -> String {
        let mut s = self.program.clone();
        for a in &self.args {
            s.push(' ');
            s.push_str(a);
        }
        s
    }
}

/// Result of a completed command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolOutput {
    pub stdout: Bytes,
    pub stderr: Bytes,
    pub code: i32,
}

impl ToolOutput {
    pub fn success(&self) -> bool {
        self.code == 0
    }

    /// All of stdout, then all of stderr.
    ///
    /// The streams are captured on separate pipes, so relative ordering
    /// between them is lost. This matches `2>&1` only when one of them is
    /// quiet; `go test` writes test results to stdout, so reports and logs
    /// built from this keep every result line in order.
    pub fn combined(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(self.stdout.len() + self.stderr.len());
        buf.extend_from_slice(&self.stdout);
        buf.extend_from_slice(&self.stderr);
        buf.freeze()
    }
}

#[async_trait]
pub trait ToolRunner: Send + Sync {
    async fn run(&self, inv: Invocation) -> Result<ToolOutput>;

    /// Whether `program` can be launched from `cwd`.
    fn is_available(&self, program: &str, cwd: &Path) -> bool;
}
