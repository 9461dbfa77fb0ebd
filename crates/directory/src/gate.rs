//! The permission gate: yes/no answers for "may this user do X?".
//!
//! The gate is a thin borrow over a [`Directory`]; it resolves the user's
//! permission set and delegates the decision to the pure `gatehouse-auth`
//! layer. Unknown users resolve to the empty set, so every path fails
//! closed.

use serde::Serialize;

use gatehouse_auth::{Permission, authorize};
use gatehouse_core::UserId;

use crate::store::Directory;

/// Permission checks against a directory.
#[derive(Debug, Clone, Copy)]
pub struct PermissionGate<'a> {
    directory: &'a Directory,
}

impl<'a> PermissionGate<'a> {
    pub fn new(directory: &'a Directory) -> Self {
        Self { directory }
    }

    /// Does the user hold this permission? Unknown user: `false`.
    pub fn check(&self, user_id: UserId, permission: &Permission) -> bool {
        let granted = self.directory.permissions_for(user_id);
        authorize::holds(&granted, permission)
    }

    /// Does the user hold *every* listed permission?
    pub fn check_all(&self, user_id: UserId, permissions: &[Permission]) -> bool {
        let granted = self.directory.permissions_for(user_id);
        authorize::holds_all(&granted, permissions)
    }

    /// Does the user hold *at least one* listed permission?
    pub fn check_any(&self, user_id: UserId, permissions: &[Permission]) -> bool {
        let granted = self.directory.permissions_for(user_id);
        authorize::holds_any(&granted, permissions)
    }

    /// Explain a decision for audit/debugging: what was asked, what the user
    /// holds, and why the answer came out the way it did.
    pub fn explain(&self, user_id: UserId, permission: &Permission) -> CheckExplanation {
        let granted = self.directory.permissions_for(user_id);
        let has_wildcard = granted.iter().any(|p| p.is_wildcard());
        let granted_result = authorize::holds(&granted, permission);

        let roles: Vec<String> = self
            .directory
            .roles_of(user_id)
            .into_iter()
            .map(|r| r.name)
            .collect();

        let mut effective_permissions: Vec<String> =
            granted.iter().map(|p| p.as_str().to_string()).collect();
        effective_permissions.sort();

        let reason = if granted_result && has_wildcard {
            "wildcard permission '*' granted via an assigned role".to_string()
        } else if granted_result {
            format!("permission '{permission}' granted via an assigned role")
        } else if roles.is_empty() {
            "user has no assigned roles (or is unknown); denying".to_string()
        } else {
            format!("no assigned role carries permission '{permission}'")
        };

        CheckExplanation {
            required_permission: permission.as_str().to_string(),
            granted: granted_result,
            reason,
            roles,
            effective_permissions,
            has_wildcard,
        }
    }
}

/// Auditable record of a single permission decision.
#[derive(Debug, Clone, Serialize)]
pub struct CheckExplanation {
    pub required_permission: String,
    pub granted: bool,
    pub reason: String,
    pub roles: Vec<String>,
    pub effective_permissions: Vec<String>,
    pub has_wildcard: bool,
}
