//! Structured-report mode.
//!
//! Verbose tool output is captured, logged, then fed to the jUnit formatter.
//! Stderr is appended after stdout (see [`crate::exec::ToolOutput::combined`]).
//! The wrapper exits with the test tool's code; the formatter's status is
//! only logged.

use std::io::Write;

use testwrap_core::error::{Result, TestwrapError};
use testwrap_core::plan::Plan;
use testwrap_core::summary::RunSummary;

use crate::config::RunConfig;
use crate::exec::{Invocation, ToolRunner};

use super::{echo, write_artifact};

pub async fn run<R, W>(cfg: &RunConfig, runner: &R, plan: &Plan, out: &mut W) -> Result<i32>
where
    R: ToolRunner + ?Sized,
    W: Write,
{
    // Checked before the tests run so a missing formatter never costs a full run.
    if !runner.is_available(&cfg.formatter.program, &cfg.root) {
        return Err(TestwrapError::MissingTool {
            tool: cfg.formatter.program.clone(),
            hint: cfg.formatter_hint.clone(),
        });
    }

    let args = plan.packages.iter().chain(plan.flags.iter()).cloned();
    let test = runner
        .run(Invocation::new(&cfg.tool, args, cfg.root.clone()))
        .await?;

    let combined = test.combined();
    echo(out, &combined)?;
    write_artifact(&cfg.log_file(), &combined).await?;

    let fmt = Invocation::new(&cfg.formatter, Vec::new(), cfg.root.clone()).with_stdin(combined.clone());
    match runner.run(fmt).await {
        Ok(report) => {
            if !report.success() {
                tracing::warn!(code = report.code, "formatter exited non-zero; status ignored");
            }
            write_artifact(&cfg.junit_file(), &report.stdout).await?;
            tracing::info!(path = %cfg.junit_file().display(), "junit report written");
        }
        Err(e) => {
            tracing::warn!(error = %e, "formatter failed; no junit report written");
        }
    }

    let summary = RunSummary::scan(&String::from_utf8_lossy(&combined));
    writeln!(out, "{}", summary.render())?;
    tracing::info!(
        passed = summary.passed,
        failed = summary.failed,
        skipped = summary.skipped,
        code = test.code,
        "test run summarized"
    );

    Ok(test.code)
}
