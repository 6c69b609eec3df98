//! Policy declaration (strict parsing, validation, reconcile).
//!
//! A declaration is pure data: the permission rules granted to one
//! principal. Nothing here evaluates access requests; the external
//! control plane does that after replacing its state with the declared one.

pub mod declaration;
pub mod reconcile;
pub mod schema;

pub use declaration::{PermissionRule, PolicyDeclaration, RoleKind};
pub use reconcile::{reconcile, ReconcileOutcome};
pub use schema::{Manifest, ResourceKind, Verb};

use crate::error::{Result, TestwrapError};

/// Manifest shipped for the network-policy controller principal.
pub const DEFAULT_MANIFEST: &str = include_str!("network-policy-controller.yaml");

pub fn load_from_str(s: &str) -> Result<PolicyDeclaration> {
    let manifest: Manifest = serde_yaml::from_str(s)
        .map_err(|e| TestwrapError::BadPolicy(format!("invalid yaml: {e}")))?;
    PolicyDeclaration::compile(&manifest)
}

pub fn default_declaration() -> Result<PolicyDeclaration> {
    load_from_str(DEFAULT_MANIFEST)
}

pub fn render_yaml(decl: &PolicyDeclaration) -> Result<String> {
    serde_yaml::to_string(&decl.to_manifest())
        .map_err(|e| TestwrapError::BadPolicy(format!("render failed: {e}")))
}
