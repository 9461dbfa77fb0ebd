//! `gatehouse-auth` — pure authentication/authorization primitives.
//!
//! This crate is intentionally decoupled from storage and transport: it owns
//! the password hashing contract and the authorization decision functions,
//! but never looks anything up. Resolving a user to its granted permission
//! set is the directory's job.

pub mod authorize;
pub mod password;
pub mod permissions;

pub use authorize::{AuthzError, authorize, holds, holds_all, holds_any};
pub use password::{HashParams, PasswordError, hash_password, verify_password};
pub use permissions::Permission;
