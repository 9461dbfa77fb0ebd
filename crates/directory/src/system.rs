//! Pluggable user-system backends.
//!
//! Callers pick a backend explicitly instead of mutating process-wide
//! configuration. [`SystemSwitch`] exists for harnesses that must briefly
//! run against a different backend: the swap is scoped by a guard that
//! restores the previous backend on drop, and overlapping swaps are a
//! programming error that aborts immediately.

use std::sync::{Arc, Mutex};

use gatehouse_auth::Permission;
use gatehouse_core::{DomainError, DomainResult, UserId};

use crate::gate::PermissionGate;
use crate::store::Directory;
use crate::users::NewUser;

/// A user backend: where accounts live and how permission checks resolve.
pub trait UserSystem: Send + Sync {
    fn name(&self) -> &'static str;

    /// Create a user account in this backend.
    fn create_user(&self, directory: &Directory, new: NewUser) -> DomainResult<UserId>;

    /// Resolve a permission check for a user. Must fail closed.
    fn check_permission(
        &self,
        directory: &Directory,
        user_id: UserId,
        permission: &Permission,
    ) -> bool;
}

/// The directory-backed standalone system: accounts, roles and permissions
/// all live in the [`Directory`].
#[derive(Debug, Clone, Copy, Default)]
pub struct StandaloneUserSystem;

impl UserSystem for StandaloneUserSystem {
    fn name(&self) -> &'static str {
        "standalone"
    }

    fn create_user(&self, directory: &Directory, new: NewUser) -> DomainResult<UserId> {
        directory.create_user(new)
    }

    fn check_permission(
        &self,
        directory: &Directory,
        user_id: UserId,
        permission: &Permission,
    ) -> bool {
        PermissionGate::new(directory).check(user_id, permission)
    }
}

/// The no-backend placeholder: refuses account creation and denies every
/// permission check.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultUserSystem;

impl UserSystem for DefaultUserSystem {
    fn name(&self) -> &'static str {
        "default"
    }

    fn create_user(&self, _directory: &Directory, _new: NewUser) -> DomainResult<UserId> {
        Err(DomainError::unsupported(
            "no user backend selected; engage one explicitly",
        ))
    }

    fn check_permission(
        &self,
        _directory: &Directory,
        _user_id: UserId,
        _permission: &Permission,
    ) -> bool {
        false
    }
}

struct SwitchState {
    active: Arc<dyn UserSystem>,
    saved: Option<Arc<dyn UserSystem>>,
}

/// Holder for the currently selected [`UserSystem`], with scoped overrides.
pub struct SystemSwitch {
    inner: Mutex<SwitchState>,
}

impl SystemSwitch {
    pub fn new(initial: Arc<dyn UserSystem>) -> Self {
        Self {
            inner: Mutex::new(SwitchState {
                active: initial,
                saved: None,
            }),
        }
    }

    /// The currently active backend.
    pub fn active(&self) -> Arc<dyn UserSystem> {
        let state = self
            .inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        Arc::clone(&state.active)
    }

    /// Swap in a backend for the lifetime of the returned guard. The
    /// previous backend is restored when the guard drops.
    ///
    /// # Panics
    ///
    /// Panics if an override is already engaged. Overlapping swaps mean the
    /// harness has lost track of which backend is real; that is fatal, not
    /// recoverable.
    pub fn engage(&self, system: Arc<dyn UserSystem>) -> SwitchGuard<'_> {
        let mut state = self
            .inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if state.saved.is_some() {
            panic!("user system override already engaged; engage() called twice?");
        }
        state.saved = Some(Arc::clone(&state.active));
        tracing::debug!(from = state.active.name(), to = system.name(), "user system engaged");
        state.active = system;
        SwitchGuard { switch: self }
    }
}

impl Default for SystemSwitch {
    /// Starts with [`DefaultUserSystem`]: everything fails closed until a
    /// real backend is engaged.
    fn default() -> Self {
        Self::new(Arc::new(DefaultUserSystem))
    }
}

/// Restores the previously active backend on drop.
#[must_use = "dropping the guard immediately undoes the override"]
pub struct SwitchGuard<'a> {
    switch: &'a SystemSwitch,
}

impl Drop for SwitchGuard<'_> {
    fn drop(&mut self) {
        let mut state = self
            .switch
            .inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(saved) = state.saved.take() {
            tracing::debug!(to = saved.name(), "user system restored");
            state.active = saved;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use gatehouse_auth::HashParams;

    fn test_directory() -> Directory {
        Directory::with_hash_params(HashParams {
            memory_kib: 8,
            iterations: 1,
            parallelism: 1,
        })
    }

    fn user_one() -> NewUser {
        NewUser {
            username: "user_one".to_string(),
            email: "user_one@example.org".to_string(),
            password: "secret1".to_string(),
        }
    }

    #[test]
    fn default_system_fails_closed() {
        let dir = test_directory();
        let system = DefaultUserSystem;

        assert!(matches!(
            system.create_user(&dir, user_one()),
            Err(DomainError::Unsupported(_))
        ));
        assert!(!system.check_permission(&dir, UserId::new(), &Permission::new("*")));
    }

    #[test]
    fn standalone_system_is_directory_backed() {
        let dir = test_directory();
        let system = StandaloneUserSystem;

        let user = system.create_user(&dir, user_one()).unwrap();
        let role = dir.create_role("staff").unwrap();
        dir.grant_permission(role, Permission::new("add records")).unwrap();
        dir.assign_role(user, role).unwrap();

        assert!(system.check_permission(&dir, user, &Permission::new("add records")));
        assert!(!system.check_permission(&dir, user, &Permission::new("administer backend")));
    }

    #[test]
    fn engage_restores_previous_backend_on_drop() {
        let switch = SystemSwitch::default();
        assert_eq!(switch.active().name(), "default");

        {
            let _guard = switch.engage(Arc::new(StandaloneUserSystem));
            assert_eq!(switch.active().name(), "standalone");
        }

        assert_eq!(switch.active().name(), "default");
    }

    #[test]
    #[should_panic(expected = "already engaged")]
    fn double_engage_is_fatal() {
        let switch = SystemSwitch::default();
        let _first = switch.engage(Arc::new(StandaloneUserSystem));
        let _second = switch.engage(Arc::new(StandaloneUserSystem));
    }
}
