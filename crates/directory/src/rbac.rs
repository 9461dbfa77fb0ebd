//! Roles, role→permission grants and user→role assignments.
//!
//! Grants and assignments are sets: re-granting or re-assigning is
//! idempotent, not an error. Unknown identifiers are `NotFound` — except in
//! read paths feeding the gate, which stay fail-closed and return empty.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use gatehouse_auth::Permission;
use gatehouse_core::{DomainError, DomainResult, RoleId, UserId};

use crate::store::Directory;

/// A named bundle of permissions assignable to users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: RoleId,
    pub name: String,
}

impl Directory {
    /// Create a role. Fails with [`DomainError::DuplicateName`] if a role
    /// with this name already exists.
    pub fn create_role(&self, name: &str) -> DomainResult<RoleId> {
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(DomainError::validation("role name cannot be empty"));
        }

        let mut state = self.write()?;
        if state.role_names.contains_key(&name) {
            return Err(DomainError::duplicate_name(name));
        }

        let id = RoleId::new();
        state.role_names.insert(name.clone(), id);
        state.roles.insert(id, Role { id, name: name.clone() });

        tracing::info!(role_id = %id, name = %name, "role created");
        Ok(id)
    }

    /// Look up a role by id.
    pub fn role(&self, id: RoleId) -> Option<Role> {
        let state = self.inner.read().ok()?;
        state.roles.get(&id).cloned()
    }

    /// Look up a role by its unique name.
    pub fn role_by_name(&self, name: &str) -> Option<Role> {
        let state = self.inner.read().ok()?;
        let id = state.role_names.get(name.trim())?;
        state.roles.get(id).cloned()
    }

    /// Attach a permission to a role (idempotent set add).
    pub fn grant_permission(&self, role_id: RoleId, permission: Permission) -> DomainResult<()> {
        let mut state = self.write()?;
        if !state.roles.contains_key(&role_id) {
            return Err(DomainError::NotFound);
        }

        tracing::debug!(role_id = %role_id, permission = %permission, "permission granted");
        state
            .role_permissions
            .entry(role_id)
            .or_default()
            .insert(permission);
        Ok(())
    }

    /// Detach a permission from a role. Removing a permission that was never
    /// granted is a no-op.
    pub fn revoke_permission(&self, role_id: RoleId, permission: &Permission) -> DomainResult<()> {
        let mut state = self.write()?;
        if !state.roles.contains_key(&role_id) {
            return Err(DomainError::NotFound);
        }

        if let Some(perms) = state.role_permissions.get_mut(&role_id) {
            perms.remove(permission);
        }
        Ok(())
    }

    /// Assign a role to a user (idempotent). Fails with `NotFound` if either
    /// id is unknown.
    pub fn assign_role(&self, user_id: UserId, role_id: RoleId) -> DomainResult<()> {
        let mut state = self.write()?;
        if !state.users.contains_key(&user_id) || !state.roles.contains_key(&role_id) {
            return Err(DomainError::NotFound);
        }

        tracing::info!(user_id = %user_id, role_id = %role_id, "role assigned");
        state.user_roles.entry(user_id).or_default().insert(role_id);
        Ok(())
    }

    /// Remove a role from a user. Revoking an unassigned role is a no-op.
    pub fn revoke_role(&self, user_id: UserId, role_id: RoleId) -> DomainResult<()> {
        let mut state = self.write()?;
        if !state.users.contains_key(&user_id) || !state.roles.contains_key(&role_id) {
            return Err(DomainError::NotFound);
        }

        if let Some(roles) = state.user_roles.get_mut(&user_id) {
            roles.remove(&role_id);
        }
        Ok(())
    }

    /// The roles currently assigned to a user. Unknown user: empty.
    pub fn roles_of(&self, user_id: UserId) -> Vec<Role> {
        let Ok(state) = self.inner.read() else {
            return Vec::new();
        };
        let Some(role_ids) = state.user_roles.get(&user_id) else {
            return Vec::new();
        };
        role_ids
            .iter()
            .filter_map(|id| state.roles.get(id).cloned())
            .collect()
    }

    /// Union of permissions across all roles assigned to a user.
    ///
    /// Unknown user resolves to the empty set so the gate above fails
    /// closed without a separate existence check.
    pub fn permissions_for(&self, user_id: UserId) -> HashSet<Permission> {
        let Ok(state) = self.inner.read() else {
            return HashSet::new();
        };
        let Some(role_ids) = state.user_roles.get(&user_id) else {
            return HashSet::new();
        };

        role_ids
            .iter()
            .filter_map(|id| state.role_permissions.get(id))
            .flatten()
            .cloned()
            .collect()
    }
}
