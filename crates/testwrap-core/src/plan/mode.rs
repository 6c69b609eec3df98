//! Execution mode selection.

use serde::Serialize;

use crate::error::{Result, TestwrapError};

/// The four mutually exclusive ways a plan is executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecMode {
    /// Print the plan and exit 0.
    DryRun,
    /// Pipe verbose output through a jUnit formatter.
    Report,
    /// One run per package with its own coverage profile, then merge.
    Coverage,
    /// Single run across all packages.
    Plain,
}

impl ExecMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ExecMode::DryRun => "dry-run",
            ExecMode::Report => "report",
            ExecMode::Coverage => "coverage",
            ExecMode::Plain => "plain",
        }
    }

    /// Whether the tool must run verbosely for this mode.
    pub fn needs_verbose(self) -> bool {
        matches!(self, ExecMode::Report)
    }
}

/// Which modes the configuration asked for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModeRequest {
    pub dry_run: bool,
    pub report: bool,
    pub coverage: bool,
}

/// Pick exactly one mode. Report + coverage is rejected even for dry runs.
pub fn select_mode(req: ModeRequest) -> Result<ExecMode> {
    if req.report && req.coverage {
        return Err(TestwrapError::ModeConflict);
    }
    Ok(if req.dry_run {
        ExecMode::DryRun
    } else if req.report {
        ExecMode::Report
    } else if req.coverage {
        ExecMode::Coverage
    } else {
        ExecMode::Plain
    })
}
