//! Command-line surface.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};

use testwrap_core::error::{Result, TestwrapError};
use testwrap_core::policy::{self, PolicyDeclaration};

use crate::app::Wrapper;
use crate::config::{self, EnvSnapshot, RunConfig};
use crate::exec::ProcessRunner;

#[derive(Parser, Debug)]
#[command(name = "testwrap", version)]
#[command(about = "Test tool wrapper: package discovery, flag composition, reports and coverage")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Discover packages, compose flags and run the test tool.
    ///
    /// Modes and toggles come from TESTWRAP_* environment variables.
    Run(RunArgs),

    /// Inspect permission policy declarations.
    #[command(subcommand)]
    Policy(PolicyCommand),
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Config file (default: <root>/testwrap.yaml when present)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Source root to discover packages in and run from (default: cwd)
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Print the resolved plan as JSON and exit without running
    #[arg(long)]
    pub plan_json: bool,

    /// Packages, then everything from the first `-` argument on is forwarded verbatim
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}

#[derive(Subcommand, Debug)]
pub enum PolicyCommand {
    /// Validate a manifest (default: the shipped one).
    Check { file: Option<PathBuf> },

    /// Print a manifest's compiled rules.
    Show {
        file: Option<PathBuf>,
        #[arg(long)]
        json: bool,
    },

    /// Show what applying DESIRED over CURRENT would replace.
    Diff {
        current: PathBuf,
        /// Desired manifest (default: the shipped one)
        desired: Option<PathBuf>,
    },
}

pub async fn execute(cli: Cli) -> Result<i32> {
    match cli.command {
        Command::Run(args) => run(args).await,
        Command::Policy(cmd) => policy_cmd(cmd, &mut std::io::stdout()),
    }
}

async fn run(a: RunArgs) -> Result<i32> {
    let root = match a.root {
        Some(r) => r,
        None => std::env::current_dir()?,
    };
    let file = config::load_for_root(&root, a.config.as_deref())?;
    let env = EnvSnapshot::from_process();
    let cfg = RunConfig::resolve(file, &env, root)?;
    let wrapper = Wrapper::new(cfg, ProcessRunner);

    let mut out = std::io::stdout();
    if a.plan_json {
        let plan = wrapper.plan(a.args.as_slice())?;
        let json = serde_json::to_string_pretty(&plan)
            .map_err(|e| TestwrapError::Io(format!("render plan failed: {e}")))?;
        writeln!(out, "{json}")?;
        return Ok(0);
    }
    wrapper.run(a.args.as_slice(), &mut out).await
}

fn load_declaration(path: Option<&Path>) -> Result<PolicyDeclaration> {
    match path {
        Some(p) => {
            let s = fs::read_to_string(p).map_err(|e| {
                TestwrapError::BadPolicy(format!("read {} failed: {e}", p.display()))
            })?;
            policy::load_from_str(&s)
        }
        None => policy::default_declaration(),
    }
}

pub fn policy_cmd<W: Write>(cmd: PolicyCommand, out: &mut W) -> Result<i32> {
    match cmd {
        PolicyCommand::Check { file } => {
            let decl = load_declaration(file.as_deref())?;
            writeln!(
                out,
                "ok: {} {} ({} rules)",
                decl.kind.as_str(),
                decl.principal,
                decl.rules.len()
            )?;
        }
        PolicyCommand::Show { file, json } => {
            let decl = load_declaration(file.as_deref())?;
            if json {
                let s = serde_json::to_string_pretty(&decl)
                    .map_err(|e| TestwrapError::BadPolicy(format!("render failed: {e}")))?;
                writeln!(out, "{s}")?;
            } else {
                write!(out, "{}", policy::render_yaml(&decl)?)?;
            }
        }
        PolicyCommand::Diff { current, desired } => {
            let cur = load_declaration(Some(&current))?;
            let want = load_declaration(desired.as_deref())?;
            let outcome = policy::reconcile(&cur, &want)?;
            if outcome.is_noop() {
                writeln!(out, "no drift: {}", outcome.principal)?;
            }
            for r in &outcome.removed {
                writeln!(out, "- {}", describe(r))?;
            }
            for r in &outcome.added {
                writeln!(out, "+ {}", describe(r))?;
            }
        }
    }
    Ok(0)
}

fn describe(r: &policy::PermissionRule) -> String {
    let groups: Vec<&str> = r
        .api_groups
        .iter()
        .map(|g| if g.is_empty() { "core" } else { g.as_str() })
        .collect();
    let resources: Vec<&str> = r.resources.iter().map(|k| k.as_str()).collect();
    let verbs: Vec<&str> = r.verbs.iter().map(|v| v.as_str()).collect();
    format!(
        "groups=[{}] resources=[{}] verbs=[{}]",
        groups.join(","),
        resources.join(","),
        verbs.join(",")
    )
}
