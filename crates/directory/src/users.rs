//! User accounts and credentials.
//!
//! # Invariants
//! - Usernames are unique within the directory.
//! - The stored password hash is a self-describing PHC string; it changes
//!   only through [`Directory::rotate_password`].
//! - Password checks fail closed: unknown user or malformed stored hash is a
//!   non-match, never an error.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use gatehouse_auth::password::{hash_password_with_params, verify_password};
use gatehouse_core::{DomainError, DomainResult, UserId};

use crate::store::Directory;

/// A user account record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    /// PHC-format argon2 hash. Never the plaintext.
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Input for [`Directory::create_user`]. The plaintext password is consumed
/// here and only its hash is stored.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl Directory {
    /// Create a user account, hashing the password.
    ///
    /// Fails with [`DomainError::DuplicateName`] if the username is taken.
    pub fn create_user(&self, new: NewUser) -> DomainResult<UserId> {
        let username = new.username.trim().to_string();
        if username.is_empty() {
            return Err(DomainError::validation("username cannot be empty"));
        }

        let email = new.email.trim().to_lowercase();
        if email.is_empty() || !email.contains('@') {
            return Err(DomainError::validation("invalid email format"));
        }

        let password_hash = hash_password_with_params(&new.password, self.hash_params)?;

        let mut state = self.write()?;
        if state.usernames.contains_key(&username) {
            return Err(DomainError::duplicate_name(username));
        }

        let id = UserId::new();
        state.usernames.insert(username.clone(), id);
        state.users.insert(
            id,
            User {
                id,
                username: username.clone(),
                email,
                password_hash,
                created_at: Utc::now(),
            },
        );

        tracing::info!(user_id = %id, username = %username, "user created");
        Ok(id)
    }

    /// Look up a user by id.
    pub fn user(&self, id: UserId) -> Option<User> {
        let state = self.inner.read().ok()?;
        state.users.get(&id).cloned()
    }

    /// Look up a user by its unique username.
    pub fn user_by_username(&self, username: &str) -> Option<User> {
        let state = self.inner.read().ok()?;
        let id = state.usernames.get(username.trim())?;
        state.users.get(id).cloned()
    }

    /// Check a candidate password for a user. Fails closed: unknown user,
    /// poisoned lock or malformed stored hash all count as a non-match.
    pub fn check_password(&self, id: UserId, candidate: &str) -> bool {
        let Ok(state) = self.inner.read() else {
            return false;
        };
        match state.users.get(&id) {
            Some(user) => verify_password(candidate, &user.password_hash),
            None => false,
        }
    }

    /// Replace a user's password hash with the hash of a new plaintext.
    pub fn rotate_password(&self, id: UserId, new_password: &str) -> DomainResult<()> {
        let password_hash = hash_password_with_params(new_password, self.hash_params)?;

        let mut state = self.write()?;
        let user = state.users.get_mut(&id).ok_or(DomainError::NotFound)?;
        user.password_hash = password_hash;

        tracing::info!(user_id = %id, "password rotated");
        Ok(())
    }
}
