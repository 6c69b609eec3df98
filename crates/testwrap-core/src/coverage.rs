//! Coverage profile handling.
//!
//! A profile is a `mode: <m>` header followed by one data line per block.
//! Per-package profiles are merged into a single combined profile whose
//! header appears exactly once.

use crate::error::{Result, TestwrapError};

const MODE_PREFIX: &str = "mode:";

/// Directory segment used for a package's profile under the cover dir.
///
/// `./pkg/foo` -> `pkg/foo`, `.` -> `_root`. Parent and empty segments are
/// dropped so the result stays inside the cover dir.
pub fn package_profile_dir(import_path: &str) -> String {
    let segs: Vec<&str> = import_path
        .split('/')
        .filter(|s| !s.is_empty() && *s != "." && *s != "..")
        .collect();
    if segs.is_empty() {
        "_root".to_string()
    } else {
        segs.join("/")
    }
}

/// Flag telling the tool where to write a package's profile.
pub fn profile_flag(path: &str) -> String {
    format!("-coverprofile={path}")
}

fn split_header(profile: &str) -> Option<(&str, Vec<&str>)> {
    let mut lines = profile
        .lines()
        .map(str::trim_end)
        .filter(|l| !l.trim().is_empty());
    let header = lines.next()?;
    let mode = header.strip_prefix(MODE_PREFIX)?.trim();
    Some((mode, lines.collect()))
}

/// Merge profiles in the given order.
///
/// Every profile must start with a `mode:` header and all modes must agree.
pub fn merge_profiles<S: AsRef<str>>(profiles: &[S]) -> Result<String> {
    if profiles.is_empty() {
        return Err(TestwrapError::BadProfile("no profiles to merge".into()));
    }

    let mut mode: Option<String> = None;
    let mut body = String::new();

    for (idx, p) in profiles.iter().enumerate() {
        let (m, lines) = split_header(p.as_ref()).ok_or_else(|| {
            TestwrapError::BadProfile(format!("profile #{idx} has no mode header"))
        })?;
        match &mode {
            None => mode = Some(m.to_string()),
            Some(existing) if existing != m => {
                return Err(TestwrapError::BadProfile(format!(
                    "profile #{idx} mode `{m}` does not match `{existing}`"
                )));
            }
            Some(_) => {}
        }
        for line in lines {
            body.push_str(line);
            body.push('\n');
        }
    }

    let mode = mode.unwrap_or_default();
    tracing::debug!(profiles = profiles.len(), %mode, "coverage profiles merged");
    Ok(format!("{MODE_PREFIX} {mode}\n{body}"))
}
