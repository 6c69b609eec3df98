//! Flag composition for the external test tool.

use serde::Serialize;

/// Inputs to flag composition, already resolved from configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FlagSpec {
    /// The selected mode needs verbose tool output (structured reports).
    pub verbose: bool,
    pub race: bool,
    /// Coverage spec string, e.g. `-cover -covermode=atomic`.
    pub cover: Option<String>,
    /// Timeout duration (`60s`) or a full flag (`-timeout=60s`).
    pub timeout: Option<String>,
    /// Extra flags from configuration, forwarded before the raw suffix.
    pub extra: Vec<String>,
}

/// True for any spelling of the tool's verbosity flag.
pub fn is_verbosity_flag(arg: &str) -> bool {
    let Some(name) = arg.strip_prefix('-') else {
        return false;
    };
    let name = name.strip_prefix('-').unwrap_or(name);
    let name = name.strip_prefix("test.").unwrap_or(name);
    name == "v" || name.starts_with("v=")
}

fn timeout_flag(t: &str) -> Option<String> {
    let t = t.trim();
    if t.is_empty() {
        return None;
    }
    if t.starts_with('-') {
        Some(t.to_string())
    } else {
        Some(format!("-timeout={t}"))
    }
}

/// Compose the final flag list.
///
/// Order: verbosity, race, coverage, timeout, extra flags, raw suffix.
pub fn compose_flags(spec: &FlagSpec, raw_flags: &[String]) -> Vec<String> {
    let mut out = Vec::new();

    let user_verbose = spec
        .extra
        .iter()
        .chain(raw_flags.iter())
        .any(|f| is_verbosity_flag(f));
    if spec.verbose && !user_verbose {
        out.push("-v".to_string());
    }

    if spec.race {
        out.push("-race".to_string());
    }

    if let Some(cover) = &spec.cover {
        out.extend(cover.split_whitespace().map(str::to_string));
    }

    if let Some(t) = spec.timeout.as_deref().and_then(timeout_flag) {
        out.push(t);
    }

    out.extend(spec.extra.iter().cloned());
    out.extend(raw_flags.iter().cloned());
    out
}
