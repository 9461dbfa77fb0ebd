//! The in-memory directory store.
//!
//! A [`Directory`] is a read-mostly structure: permission checks take the
//! read lock, administrative writes (user/role creation, grants) take the
//! write lock. State is snapshot-cloneable to support scoped transactions.

use std::collections::{HashMap, HashSet};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use gatehouse_auth::{HashParams, Permission};
use gatehouse_core::{DomainError, DomainResult, RoleId, UserId};

use crate::rbac::Role;
use crate::users::User;

/// Every record in the directory. Cloned wholesale by transactions.
#[derive(Debug, Clone, Default)]
pub(crate) struct DirectoryState {
    pub(crate) users: HashMap<UserId, User>,
    pub(crate) usernames: HashMap<String, UserId>,
    pub(crate) roles: HashMap<RoleId, Role>,
    pub(crate) role_names: HashMap<String, RoleId>,
    pub(crate) role_permissions: HashMap<RoleId, HashSet<Permission>>,
    pub(crate) user_roles: HashMap<UserId, HashSet<RoleId>>,
}

/// In-memory user directory: credential store plus role-permission records.
#[derive(Debug)]
pub struct Directory {
    pub(crate) inner: RwLock<DirectoryState>,
    pub(crate) hash_params: HashParams,
}

impl Directory {
    /// An empty directory with production argon2 parameters.
    pub fn new() -> Self {
        Self::with_hash_params(HashParams::default())
    }

    /// An empty directory with explicit argon2 parameters (tests use cheap
    /// ones; the stored hashes stay self-describing either way).
    pub fn with_hash_params(hash_params: HashParams) -> Self {
        Self {
            inner: RwLock::new(DirectoryState::default()),
            hash_params,
        }
    }

    pub(crate) fn read(&self) -> DomainResult<RwLockReadGuard<'_, DirectoryState>> {
        self.inner
            .read()
            .map_err(|_| DomainError::invariant("directory lock poisoned"))
    }

    pub(crate) fn write(&self) -> DomainResult<RwLockWriteGuard<'_, DirectoryState>> {
        self.inner
            .write()
            .map_err(|_| DomainError::invariant("directory lock poisoned"))
    }
}

impl Default for Directory {
    fn default() -> Self {
        Self::new()
    }
}
