//! Runner configuration.
//!
//! Two layers, resolved once at startup into a [`RunConfig`]:
//! an optional strict YAML file, then environment toggles on top.

pub mod env;
pub mod schema;

use std::fs;
use std::path::{Path, PathBuf};

use testwrap_core::error::{Result, TestwrapError};
use testwrap_core::plan::{FlagSpec, ModeRequest};

pub use env::EnvSnapshot;
pub use schema::{FileConfig, ToolCommand};

/// Config file picked up from the source root when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "testwrap.yaml";

pub fn load_from_file(path: &Path) -> Result<FileConfig> {
    let s = fs::read_to_string(path).map_err(|e| {
        TestwrapError::BadConfig(format!("read config {} failed: {e}", path.display()))
    })?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<FileConfig> {
    let cfg: FileConfig = serde_yaml::from_str(s)
        .map_err(|e| TestwrapError::BadConfig(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Explicit `--config` must exist; the implicit one is optional.
pub fn load_for_root(root: &Path, explicit: Option<&Path>) -> Result<FileConfig> {
    match explicit {
        Some(p) => load_from_file(p),
        None => {
            let implicit = root.join(DEFAULT_CONFIG_FILE);
            if implicit.is_file() {
                tracing::debug!(path = %implicit.display(), "using config file");
                load_from_file(&implicit)
            } else {
                Ok(FileConfig::default())
            }
        }
    }
}

/// Everything a run needs, resolved from file defaults and environment.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub root: PathBuf,

    pub tool: ToolCommand,
    pub formatter: ToolCommand,
    pub formatter_hint: String,
    pub cover_tool: ToolCommand,

    pub test_suffix: String,
    pub prune: Vec<String>,
    pub optional_dirs: Vec<String>,
    pub log_dir: PathBuf,

    pub timeout: Option<String>,
    pub include_optional: bool,
    /// Coverage spec tokens, `None` when coverage is disabled.
    pub cover_flags: Option<String>,
    pub race: bool,
    pub dry_run: bool,
    pub cover_dir: Option<PathBuf>,
    pub junit: bool,
    pub extra_flags: Vec<String>,
    pub fail_fast: bool,
}

fn non_empty(s: &str) -> Option<String> {
    let t = s.trim();
    (!t.is_empty()).then(|| t.to_string())
}

impl RunConfig {
    pub fn resolve(file: FileConfig, env: &EnvSnapshot, root: PathBuf) -> Result<Self> {
        let d = &file.defaults;

        let timeout = match env.get(&env::TIMEOUT) {
            Some(v) => non_empty(v),
            None => non_empty(&d.timeout),
        };
        let cover_on = env.flag(&env::COVER)?.unwrap_or(d.cover);
        let cover_spec = env
            .get(&env::COVER_FLAGS)
            .map(str::to_string)
            .unwrap_or_else(|| d.cover_flags.clone());
        let cover_dir = match env.get(&env::COVER_DIR) {
            Some(v) => non_empty(v),
            None => d.cover_dir.as_deref().and_then(non_empty),
        };
        let flags = env
            .get(&env::FLAGS)
            .map(str::to_string)
            .unwrap_or_else(|| d.flags.clone());

        let cfg = Self {
            tool: file.tool.clone(),
            formatter: file.formatter.command(),
            formatter_hint: file.formatter.install_hint.clone(),
            cover_tool: file.cover_tool.clone(),
            test_suffix: file.discovery.test_suffix.clone(),
            prune: file.discovery.prune.clone(),
            optional_dirs: file.discovery.optional.clone(),
            log_dir: root.join(&file.output.log_dir),

            timeout,
            include_optional: env.flag(&env::INCLUDE_OPTIONAL)?.unwrap_or(d.include_optional),
            cover_flags: if cover_on { non_empty(&cover_spec) } else { None },
            race: env.flag(&env::RACE)?.unwrap_or(d.race),
            dry_run: env.flag(&env::DRY_RUN)?.unwrap_or(d.dry_run),
            cover_dir: cover_dir.map(|p| root.join(p)),
            junit: env.flag(&env::JUNIT)?.unwrap_or(d.junit),
            extra_flags: flags.split_whitespace().map(str::to_string).collect(),
            fail_fast: env.flag(&env::FAIL_FAST)?.unwrap_or(d.fail_fast),

            root,
        };

        tracing::debug!(
            root = %cfg.root.display(),
            race = cfg.race,
            junit = cfg.junit,
            coverage = cfg.coverage_mode(),
            dry_run = cfg.dry_run,
            "run config resolved"
        );
        Ok(cfg)
    }

    pub fn mode_request(&self) -> ModeRequest {
        ModeRequest {
            dry_run: self.dry_run,
            report: self.junit,
            coverage: self.coverage_mode(),
        }
    }

    /// Per-package coverage needs both a cover dir and coverage switched on.
    pub fn coverage_mode(&self) -> bool {
        self.cover_flags.is_some() && self.cover_dir.is_some()
    }

    pub fn flag_spec(&self, verbose: bool) -> FlagSpec {
        FlagSpec {
            verbose,
            race: self.race,
            cover: self.cover_flags.clone(),
            timeout: self.timeout.clone(),
            extra: self.extra_flags.clone(),
        }
    }

    pub fn log_file(&self) -> PathBuf {
        self.log_dir.join("test.log")
    }

    pub fn junit_file(&self) -> PathBuf {
        self.log_dir.join("junit.xml")
    }
}
