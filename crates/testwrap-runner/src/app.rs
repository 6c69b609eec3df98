//! Run orchestration.
//!
//! `Wrapper` owns the resolved configuration and a tool runner. It computes
//! a plan (mode first, so a conflicting configuration fails before anything
//! touches the filesystem) and hands it to exactly one mode.

use std::io::Write;

use testwrap_core::error::{Result, TestwrapError};
use testwrap_core::plan::{compose_flags, partition_args, select_mode, ExecMode, Plan};

use crate::config::RunConfig;
use crate::discover::{discover_packages, DiscoveryRules};
use crate::exec::ToolRunner;
use crate::modes;

pub struct Wrapper<R> {
    cfg: RunConfig,
    runner: R,
}

impl<R: ToolRunner> Wrapper<R> {
    pub fn new(cfg: RunConfig, runner: R) -> Self {
        Self { cfg, runner }
    }

    pub fn cfg(&self) -> &RunConfig {
        &self.cfg
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    pub fn plan<S: AsRef<str>>(&self, args: &[S]) -> Result<Plan> {
        let req = self.cfg.mode_request();
        let mode = select_mode(req)?;
        let parts = partition_args(args);

        let packages = if parts.packages.is_empty() {
            let rules = DiscoveryRules::from_config(&self.cfg);
            discover_packages(&self.cfg.root, &rules)?
        } else {
            parts.packages
        };

        // A dry run shows the flags the requested mode would run with.
        let verbose = mode.needs_verbose() || req.report;
        let flags = compose_flags(&self.cfg.flag_spec(verbose), &parts.raw_flags);
        Ok(Plan { packages, flags, mode })
    }

    /// Run and return the exit code the process should finish with.
    pub async fn run<S, W>(&self, args: &[S], out: &mut W) -> Result<i32>
    where
        S: AsRef<str>,
        W: Write,
    {
        let plan = self.plan(args)?;
        tracing::info!(
            mode = plan.mode.as_str(),
            packages = plan.packages.len(),
            flags = %plan.flags.join(" "),
            "plan ready"
        );

        if plan.mode == ExecMode::DryRun {
            out.write_all(plan.render_dry_run().as_bytes())?;
            return Ok(0);
        }

        if plan.packages.is_empty() {
            return Err(TestwrapError::BadConfig(format!(
                "no test packages found under {}",
                self.cfg.root.display()
            )));
        }

        match plan.mode {
            ExecMode::Report => modes::report::run(&self.cfg, &self.runner, &plan, out).await,
            ExecMode::Coverage => modes::coverage::run(&self.cfg, &self.runner, &plan, out).await,
            ExecMode::Plain | ExecMode::DryRun => {
                modes::plain::run(&self.cfg, &self.runner, &plan, out).await
            }
        }
    }
}
