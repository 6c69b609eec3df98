//! Package discovery.
//!
//! Walks the source root and returns every directory holding at least one
//! test file, as `./`-relative paths. Pruned directory names are skipped at
//! any depth; optional group directories are skipped unless enabled.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use testwrap_core::error::{Result, TestwrapError};

use crate::config::RunConfig;

#[derive(Debug, Clone)]
pub struct DiscoveryRules {
    pub test_suffix: String,
    pub prune: Vec<String>,
    /// Root-relative paths (forward slashes) pruned unless `include_optional`.
    pub optional_dirs: Vec<String>,
    pub include_optional: bool,
}

impl DiscoveryRules {
    pub fn from_config(cfg: &RunConfig) -> Self {
        Self {
            test_suffix: cfg.test_suffix.clone(),
            prune: cfg.prune.clone(),
            optional_dirs: cfg.optional_dirs.clone(),
            include_optional: cfg.include_optional,
        }
    }

    fn is_pruned(&self, rel: &str, name: &str) -> bool {
        if self.prune.iter().any(|p| p == name) {
            return true;
        }
        !self.include_optional
            && self
                .optional_dirs
                .iter()
                .any(|o| o.trim_matches('/') == rel)
    }
}

fn rel_string(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

fn package_path(rel: &str) -> String {
    if rel.is_empty() {
        ".".to_string()
    } else {
        format!("./{rel}")
    }
}

/// Discover test packages under `root`, sorted and deduplicated.
pub fn discover_packages(root: &Path, rules: &DiscoveryRules) -> Result<Vec<String>> {
    if !root.is_dir() {
        return Err(TestwrapError::BadConfig(format!(
            "source root {} is not a directory",
            root.display()
        )));
    }

    let mut found = BTreeSet::new();
    let mut stack: Vec<PathBuf> = vec![root.to_path_buf()];

    while let Some(dir) = stack.pop() {
        let entries = match fs::read_dir(&dir) {
            Ok(e) => e,
            Err(e) => {
                tracing::warn!(dir = %dir.display(), error = %e, "skipping unreadable directory");
                continue;
            }
        };

        for entry in entries.flatten() {
            let Ok(ft) = entry.file_type() else {
                continue;
            };
            let name = entry.file_name().to_string_lossy().into_owned();
            let path = entry.path();

            if ft.is_dir() {
                let rel = rel_string(root, &path);
                if rules.is_pruned(&rel, &name) {
                    tracing::trace!(dir = %rel, "pruned");
                    continue;
                }
                stack.push(path);
            } else if ft.is_file() && name.ends_with(&rules.test_suffix) {
                found.insert(package_path(&rel_string(root, &dir)));
            }
        }
    }

    tracing::debug!(count = found.len(), "packages discovered");
    Ok(found.into_iter().collect())
}
