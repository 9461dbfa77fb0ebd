//! `gatehouse-directory` — stateful user directory and permission gate.
//!
//! This crate owns the records the pure `gatehouse-auth` layer decides over:
//! user accounts with salted password hashes, roles, role→permission grants
//! and user→role assignments. All state lives in a [`Directory`] behind an
//! `RwLock`; reads dominate, writes are administrative.
//!
//! Nothing is granted by default: a user holds a permission iff one of its
//! assigned roles carries that permission string.

pub mod gate;
pub mod rbac;
pub mod store;
pub mod system;
pub mod transaction;
pub mod users;

pub use gate::{CheckExplanation, PermissionGate};
pub use rbac::Role;
pub use store::Directory;
pub use system::{DefaultUserSystem, StandaloneUserSystem, SystemSwitch, UserSystem};
pub use transaction::Transaction;
pub use users::{NewUser, User};
