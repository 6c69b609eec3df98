//! Reconcile semantics: the declared rule set replaces whatever exists.

use serde::Serialize;

use crate::error::{Result, TestwrapError};

use super::declaration::{PermissionRule, PolicyDeclaration};

/// Outcome of applying `desired` over `current`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReconcileOutcome {
    pub principal: String,
    /// Resulting rule set; always exactly the desired rules.
    pub rules: Vec<PermissionRule>,
    /// Desired rules that were missing from the current state.
    pub added: Vec<PermissionRule>,
    /// Current rules that the desired state drops (drift).
    pub removed: Vec<PermissionRule>,
}

impl ReconcileOutcome {
    pub fn is_noop(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Replace `current` with `desired`. Never merges.
pub fn reconcile(current: &PolicyDeclaration, desired: &PolicyDeclaration) -> Result<ReconcileOutcome> {
    if current.principal != desired.principal {
        return Err(TestwrapError::BadPolicy(format!(
            "principal mismatch: current={} desired={}",
            current.principal, desired.principal
        )));
    }

    let added: Vec<PermissionRule> = desired
        .rules
        .iter()
        .filter(|r| !current.rules.contains(r))
        .cloned()
        .collect();
    let removed: Vec<PermissionRule> = current
        .rules
        .iter()
        .filter(|r| !desired.rules.contains(r))
        .cloned()
        .collect();

    tracing::debug!(
        principal = %desired.principal,
        added = added.len(),
        removed = removed.len(),
        "policy reconciled"
    );

    Ok(ReconcileOutcome {
        principal: desired.principal.clone(),
        rules: desired.rules.clone(),
        added,
        removed,
    })
}
