//! Plain mode: one invocation across every package.

use std::io::Write;

use testwrap_core::error::Result;
use testwrap_core::plan::Plan;

use crate::config::RunConfig;
use crate::exec::{Invocation, ToolRunner};

use super::{echo, write_artifact};

pub async fn run<R, W>(cfg: &RunConfig, runner: &R, plan: &Plan, out: &mut W) -> Result<i32>
where
    R: ToolRunner + ?Sized,
    W: Write,
{
    let args = plan.packages.iter().chain(plan.flags.iter()).cloned();
    let res = runner
        .run(Invocation::new(&cfg.tool, args, cfg.root.clone()))
        .await?;

    let combined = res.combined();
    echo(out, &combined)?;
    write_artifact(&cfg.log_file(), &combined).await?;

    Ok(res.code)
}
