//! Compiled permission rules.
//!
//! Raw manifest rules are compiled into typed rules once at load time, so
//! an unknown verb or resource kind fails the whole declaration.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::error::{Result, TestwrapError};

use super::schema::{Manifest, Metadata, RawRule, ResourceKind, Verb};

const API_VERSION: &str = "rbac.authorization.k8s.io/v1";

/// Role flavour of the declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RoleKind {
    ClusterRole,
    Role,
}

impl RoleKind {
    pub fn as_str(self) -> &'static str {
        match self {
            RoleKind::ClusterRole => "ClusterRole",
            RoleKind::Role => "Role",
        }
    }

    fn parse(s: &str) -> Result<Self> {
        match s {
            "ClusterRole" => Ok(RoleKind::ClusterRole),
            "Role" => Ok(RoleKind::Role),
            other => Err(TestwrapError::BadPolicy(format!(
                "unsupported kind: {other} (expected ClusterRole or Role)"
            ))),
        }
    }
}

fn in_rule(idx: usize, e: TestwrapError) -> TestwrapError {
    match e {
        TestwrapError::BadPolicy(m) => TestwrapError::BadPolicy(format!("rules[{idx}]: {m}")),
        other => other,
    }
}

/// One (api groups, resources, verbs) triple.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PermissionRule {
    /// Empty string is the core group.
    pub api_groups: Vec<String>,
    pub resources: Vec<ResourceKind>,
    pub verbs: BTreeSet<Verb>,
}

impl PermissionRule {
    fn compile(idx: usize, raw: &RawRule) -> Result<Self> {
        if raw.api_groups.is_empty() {
            return Err(TestwrapError::BadPolicy(format!(
                "rules[{idx}].apiGroups must not be empty (use \"\" for the core group)"
            )));
        }
        if raw.resources.is_empty() {
            return Err(TestwrapError::BadPolicy(format!(
                "rules[{idx}].resources must not be empty"
            )));
        }
        if raw.verbs.is_empty() {
            return Err(TestwrapError::BadPolicy(format!(
                "rules[{idx}].verbs must not be empty"
            )));
        }

        let resources = raw
            .resources
            .iter()
            .map(|r| r.parse::<ResourceKind>())
            .collect::<Result<Vec<_>>>()
            .map_err(|e| in_rule(idx, e))?;
        let verbs = raw
            .verbs
            .iter()
            .map(|v| v.parse::<Verb>())
            .collect::<Result<BTreeSet<_>>>()
            .map_err(|e| in_rule(idx, e))?;

        Ok(Self {
            api_groups: raw.api_groups.clone(),
            resources,
            verbs,
        })
    }

    fn to_raw(&self) -> RawRule {
        RawRule {
            api_groups: self.api_groups.clone(),
            resources: self.resources.iter().map(|r| r.as_str().to_string()).collect(),
            verbs: self.verbs.iter().map(|v| v.as_str().to_string()).collect(),
        }
    }
}

/// The complete desired permission set for one principal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PolicyDeclaration {
    pub principal: String,
    pub kind: RoleKind,
    pub rules: Vec<PermissionRule>,
}

impl PolicyDeclaration {
    pub fn compile(manifest: &Manifest) -> Result<Self> {
        if manifest.api_version != API_VERSION {
            return Err(TestwrapError::BadPolicy(format!(
                "unsupported apiVersion: {} (expected {API_VERSION})",
                manifest.api_version
            )));
        }
        let kind = RoleKind::parse(&manifest.kind)?;
        if manifest.metadata.name.trim().is_empty() {
            return Err(TestwrapError::BadPolicy("metadata.name must not be empty".into()));
        }

        let rules = manifest
            .rules
            .iter()
            .enumerate()
            .map(|(i, r)| PermissionRule::compile(i, r))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            principal: manifest.metadata.name.clone(),
            kind,
            rules,
        })
    }

    /// Render back into manifest shape (labels and annotations are not kept).
    pub fn to_manifest(&self) -> Manifest {
        Manifest {
            api_version: API_VERSION.to_string(),
            kind: self.kind.as_str().to_string(),
            metadata: Metadata {
                name: self.principal.clone(),
                namespace: None,
                labels: Default::default(),
                annotations: Default::default(),
            },
            rules: self.rules.iter().map(PermissionRule::to_raw).collect(),
        }
    }
}
