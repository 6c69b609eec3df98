//! Run planning (argument partition, flag composition, mode selection).
//!
//! Everything here is pure: a plan is computed from configuration values
//! and positional arguments, with no filesystem or process access. The
//! runner crate turns a [`Plan`] into subprocess invocations.

pub mod args;
pub mod flags;
pub mod mode;

use serde::Serialize;

pub use args::{partition_args, PartitionedArgs};
pub use flags::{compose_flags, is_verbosity_flag, FlagSpec};
pub use mode::{select_mode, ExecMode, ModeRequest};

/// One package and the flags it will be tested with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageDescriptor {
    pub import_path: String,
    pub flags: Vec<String>,
}

/// Fully resolved run plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Plan {
    pub packages: Vec<String>,
    pub flags: Vec<String>,
    pub mode: ExecMode,
}

impl Plan {
    /// Per-package descriptors, in package order.
    pub fn descriptors(&self) -> Vec<PackageDescriptor> {
        self.packages
            .iter()
            .map(|p| PackageDescriptor {
                import_path: p.clone(),
                flags: self.flags.clone(),
            })
            .collect()
    }

    /// Text printed by dry-run mode.
    pub fn render_dry_run(&self) -> String {
        format!(
            "packages: {}\nflags: {}\n",
            self.packages.join(" "),
            self.flags.join(" ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dry_run_text_is_packages_then_flags() {
        let plan = Plan {
            packages: vec!["./pkg/a".into(), "./pkg/b".into()],
            flags: vec!["-race".into(), "-timeout=60s".into()],
            mode: ExecMode::DryRun,
        };
        assert_eq!(
            plan.render_dry_run(),
            "packages: ./pkg/a ./pkg/b\nflags: -race -timeout=60s\n"
        );
    }

    #[test]
    fn descriptors_share_plan_flags() {
        let plan = Plan {
            packages: vec!["./a".into(), "./b".into()],
            flags: vec!["-race".into()],
            mode: ExecMode::Plain,
        };
        let d = plan.descriptors();
        assert_eq!(d.len(), 2);
        assert_eq!(d[1].import_path, "./b");
        assert_eq!(d[1].flags, vec!["-race".to_string()]);
    }
}
