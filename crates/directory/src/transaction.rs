//! Scoped transactions over the directory.
//!
//! A [`Transaction`] snapshots the whole directory state on entry. Dropping
//! the guard without calling [`Transaction::commit`] restores the snapshot,
//! so a scope that ends early (return, panic, test teardown) rolls back all
//! writes made inside it.
//!
//! This is a single-writer discipline for a small in-memory store, not an
//! isolation protocol: concurrent writers during an open transaction are
//! rolled back with it.

use crate::store::{Directory, DirectoryState};

/// Rollback-on-drop scope over a [`Directory`].
#[must_use = "dropping the transaction immediately rolls it back"]
pub struct Transaction<'a> {
    directory: &'a Directory,
    snapshot: Option<DirectoryState>,
}

impl Directory {
    /// Open a transaction scope. All writes until `commit()` are undone if
    /// the guard drops uncommitted.
    pub fn begin(&self) -> Transaction<'_> {
        let snapshot = self
            .inner
            .read()
            .map(|state| state.clone())
            .unwrap_or_default();
        Transaction {
            directory: self,
            snapshot: Some(snapshot),
        }
    }
}

impl Transaction<'_> {
    /// Keep the writes made during this scope.
    pub fn commit(mut self) {
        self.snapshot = None;
    }
}

impl Drop for Transaction<'_> {
    fn drop(&mut self) {
        if let Some(snapshot) = self.snapshot.take() {
            tracing::debug!("rolling back directory transaction");
            if let Ok(mut state) = self.directory.inner.write() {
                *state = snapshot;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use gatehouse_auth::HashParams;

    use crate::users::NewUser;

    fn test_directory() -> Directory {
        Directory::with_hash_params(HashParams {
            memory_kib: 8,
            iterations: 1,
            parallelism: 1,
        })
    }

    #[test]
    fn uncommitted_writes_roll_back() {
        let dir = test_directory();

        {
            let _tx = dir.begin();
            dir.create_user(NewUser {
                username: "user_one".to_string(),
                email: "user_one@example.org".to_string(),
                password: "secret1".to_string(),
            })
            .unwrap();
            dir.create_role("staff").unwrap();
            assert!(dir.user_by_username("user_one").is_some());
        }

        assert!(dir.user_by_username("user_one").is_none());
        assert!(dir.role_by_name("staff").is_none());
    }

    #[test]
    fn committed_writes_survive() {
        let dir = test_directory();

        let tx = dir.begin();
        dir.create_role("staff").unwrap();
        tx.commit();

        assert!(dir.role_by_name("staff").is_some());
    }

    #[test]
    fn rollback_restores_pre_existing_state() {
        let dir = test_directory();
        let staff = dir.create_role("staff").unwrap();

        {
            let _tx = dir.begin();
            dir.create_role("auditor").unwrap();
        }

        assert_eq!(dir.role(staff).unwrap().name, "staff");
        assert!(dir.role_by_name("auditor").is_none());
    }
}
