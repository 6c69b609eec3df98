use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TestwrapError};

// --------------------
// Manifest (wire shape)
// --------------------

/// ClusterRole-shaped manifest as written on disk.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Manifest {
    pub api_version: String,
    pub kind: String,
    pub metadata: Metadata,
    #[serde(default)]
    pub rules: Vec<RawRule>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Metadata {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub annotations: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RawRule {
    #[serde(default)]
    pub api_groups: Vec<String>,
    #[serde(default)]
    pub resources: Vec<String>,
    #[serde(default)]
    pub verbs: Vec<String>,
}

// --------------------
// Vocabulary
// --------------------

/// Fixed verb vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Verb {
    Get,
    List,
    Watch,
    Create,
    Update,
    Patch,
    Delete,
}

impl Verb {
    pub const ALL: [Verb; 7] = [
        Verb::Get,
        Verb::List,
        Verb::Watch,
        Verb::Create,
        Verb::Update,
        Verb::Patch,
        Verb::Delete,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Verb::Get => "get",
            Verb::List => "list",
            Verb::Watch => "watch",
            Verb::Create => "create",
            Verb::Update => "update",
            Verb::Patch => "patch",
            Verb::Delete => "delete",
        }
    }
}

impl FromStr for Verb {
    type Err = TestwrapError;

    fn from_str(s: &str) -> Result<Self> {
        Verb::ALL
            .into_iter()
            .find(|v| v.as_str() == s)
            .ok_or_else(|| TestwrapError::BadPolicy(format!("unknown verb: {s}")))
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Recognized cluster resource kinds (plural resource names).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Pods,
    Services,
    Endpoints,
    EndpointSlices,
    Namespaces,
    Nodes,
    NetworkPolicies,
    ConfigMaps,
    Secrets,
    ServiceAccounts,
    Events,
    Deployments,
    DaemonSets,
    ReplicaSets,
    StatefulSets,
    Leases,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 16] = [
        ResourceKind::Pods,
        ResourceKind::Services,
        ResourceKind::Endpoints,
        ResourceKind::EndpointSlices,
        ResourceKind::Namespaces,
        ResourceKind::Nodes,
        ResourceKind::NetworkPolicies,
        ResourceKind::ConfigMaps,
        ResourceKind::Secrets,
        ResourceKind::ServiceAccounts,
        ResourceKind::Events,
        ResourceKind::Deployments,
        ResourceKind::DaemonSets,
        ResourceKind::ReplicaSets,
        ResourceKind::StatefulSets,
        ResourceKind::Leases,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ResourceKind::Pods => "pods",
            ResourceKind::Services => "services",
            ResourceKind::Endpoints => "endpoints",
            ResourceKind::EndpointSlices => "endpointslices",
            ResourceKind::Namespaces => "namespaces",
            ResourceKind::Nodes => "nodes",
            ResourceKind::NetworkPolicies => "networkpolicies",
            ResourceKind::ConfigMaps => "configmaps",
            ResourceKind::Secrets => "secrets",
            ResourceKind::ServiceAccounts => "serviceaccounts",
            ResourceKind::Events => "events",
            ResourceKind::Deployments => "deployments",
            ResourceKind::DaemonSets => "daemonsets",
            ResourceKind::ReplicaSets => "replicasets",
            ResourceKind::StatefulSets => "statefulsets",
            ResourceKind::Leases => "leases",
        }
    }
}

impl FromStr for ResourceKind {
    type Err = TestwrapError;

    fn from_str(s: &str) -> Result<Self> {
        ResourceKind::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| TestwrapError::BadPolicy(format!("unknown resource kind: {s}")))
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
