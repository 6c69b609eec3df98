//! Environment toggles and their deprecated aliases.
//!
//! The process environment is read once into an [`EnvSnapshot`]. Alias
//! resolution happens there, as an explicit step: a deprecated name is only
//! honoured when the canonical name is unset, and every alias seen is logged.

use std::collections::HashMap;

use testwrap_core::error::{Result, TestwrapError};

/// One configuration variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnvVar {
    pub canonical: &'static str,
    pub alias: Option<&'static str>,
}

const fn var(canonical: &'static str, alias: Option<&'static str>) -> EnvVar {
    EnvVar { canonical, alias }
}

pub const TIMEOUT: EnvVar = var("TESTWRAP_TIMEOUT", Some("KUBE_TIMEOUT"));
pub const INCLUDE_OPTIONAL: EnvVar = var("TESTWRAP_INCLUDE_OPTIONAL", Some("KUBE_TEST_OPTIONAL"));
pub const COVER: EnvVar = var("TESTWRAP_COVER", Some("KUBE_COVER"));
pub const COVER_FLAGS: EnvVar = var("TESTWRAP_COVER_FLAGS", Some("KUBE_COVER_FLAGS"));
pub const RACE: EnvVar = var("TESTWRAP_RACE", Some("KUBE_RACE"));
pub const DRY_RUN: EnvVar = var("TESTWRAP_DRY_RUN", Some("KUBE_DRY_RUN"));
pub const COVER_DIR: EnvVar = var("TESTWRAP_COVER_DIR", Some("KUBE_COVER_REPORT_DIR"));
pub const JUNIT: EnvVar = var("TESTWRAP_JUNIT", Some("KUBE_JUNIT"));
pub const FLAGS: EnvVar = var("TESTWRAP_FLAGS", Some("KUBE_TEST_ARGS"));
pub const FAIL_FAST: EnvVar = var("TESTWRAP_FAIL_FAST", None);

pub const ALL: [EnvVar; 10] = [
    TIMEOUT,
    INCLUDE_OPTIONAL,
    COVER,
    COVER_FLAGS,
    RACE,
    DRY_RUN,
    COVER_DIR,
    JUNIT,
    FLAGS,
    FAIL_FAST,
];

/// A deprecated name found in the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasUse {
    pub alias: &'static str,
    pub canonical: &'static str,
    /// The canonical name was also set, so the alias value was ignored.
    pub shadowed: bool,
}

/// Canonical-keyed view of the relevant environment.
#[derive(Debug, Clone, Default)]
pub struct EnvSnapshot {
    values: HashMap<&'static str, String>,
    alias_uses: Vec<AliasUse>,
}

impl EnvSnapshot {
    pub fn from_process() -> Self {
        Self::from_vars(std::env::vars())
    }

    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let raw: HashMap<String, String> = vars
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();

        let mut snap = Self::default();
        for v in ALL {
            let canonical = raw.get(v.canonical);
            let alias = v.alias.and_then(|a| raw.get(a).map(|val| (a, val)));

            match (canonical, alias) {
                (Some(val), Some((a, _))) => {
                    tracing::warn!(alias = a, canonical = v.canonical, "deprecated variable ignored; canonical name is set");
                    snap.alias_uses.push(AliasUse { alias: a, canonical: v.canonical, shadowed: true });
                    snap.values.insert(v.canonical, val.clone());
                }
                (Some(val), None) => {
                    snap.values.insert(v.canonical, val.clone());
                }
                (None, Some((a, val))) => {
                    tracing::warn!(alias = a, canonical = v.canonical, "deprecated variable in use; rename it");
                    snap.alias_uses.push(AliasUse { alias: a, canonical: v.canonical, shadowed: false });
                    snap.values.insert(v.canonical, val.clone());
                }
                (None, None) => {}
            }
        }
        snap
    }

    pub fn alias_uses(&self) -> &[AliasUse] {
        &self.alias_uses
    }

    /// Raw value, empty string included.
    pub fn get(&self, v: &EnvVar) -> Option<&str> {
        self.values.get(v.canonical).map(String::as_str)
    }

    /// Boolean toggle. Unset or empty means "use the default".
    pub fn flag(&self, v: &EnvVar) -> Result<Option<bool>> {
        let Some(raw) = self.get(v) else {
            return Ok(None);
        };
        let raw = raw.trim();
        if raw.is_empty() {
            return Ok(None);
        }
        parse_bool(raw).map(Some).ok_or_else(|| {
            TestwrapError::BadConfig(format!("{}: expected a boolean, got `{raw}`", v.canonical))
        })
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.to_ascii_lowercase().as_str() {
        "1" | "true" | "y" | "yes" | "on" => Some(true),
        "0" | "false" | "n" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn bool_spellings() {
        for s in ["1", "TRUE", "y", "Yes", "on"] {
            assert_eq!(parse_bool(s), Some(true), "{s}");
        }
        for s in ["0", "false", "N", "no", "OFF"] {
            assert_eq!(parse_bool(s), Some(false), "{s}");
        }
        assert_eq!(parse_bool("maybe"), None);
    }

    #[test]
    fn empty_flag_means_default() {
        let snap = EnvSnapshot::from_vars([("TESTWRAP_RACE", "")]);
        assert_eq!(snap.flag(&RACE).unwrap(), None);
        assert_eq!(snap.get(&RACE), Some(""));
    }

    #[test]
    fn garbage_flag_is_config_error() {
        let snap = EnvSnapshot::from_vars([("TESTWRAP_JUNIT", "sure")]);
        let err = snap.flag(&JUNIT).unwrap_err();
        assert_eq!(err.code().as_str(), "BAD_CONFIG");
        assert!(err.to_string().contains("TESTWRAP_JUNIT"));
    }

    #[test]
    fn unrelated_vars_ignored() {
        let snap = EnvSnapshot::from_vars([("HOME", "/root"), ("PATH", "/bin")]);
        assert!(snap.alias_uses().is_empty());
        assert_eq!(snap.get(&TIMEOUT), None);
    }
}
