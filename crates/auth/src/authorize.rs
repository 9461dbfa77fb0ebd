//! Pure authorization decisions over a resolved permission set.
//!
//! - No IO
//! - No panics
//! - No business logic (pure policy check)
//!
//! The caller (normally the directory's permission gate) resolves a user to
//! the union of permissions granted by its roles and hands that set in.

use std::collections::HashSet;

use thiserror::Error;

use crate::Permission;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("forbidden: missing permission '{0}'")]
    Forbidden(String),
}

/// Does the granted set cover the required permission?
///
/// The wildcard `"*"` covers everything; an empty granted set covers nothing.
pub fn holds(granted: &HashSet<Permission>, required: &Permission) -> bool {
    granted.iter().any(|p| p.is_wildcard()) || granted.contains(required)
}

/// Like [`holds`], but as a `Result` for call sites that propagate denial.
pub fn authorize(granted: &HashSet<Permission>, required: &Permission) -> Result<(), AuthzError> {
    if holds(granted, required) {
        Ok(())
    } else {
        Err(AuthzError::Forbidden(required.as_str().to_string()))
    }
}

/// Conjunctive batch check: every listed permission must be held.
///
/// Batch semantics are exposed as two distinct named operations (`holds_all`
/// / `holds_any`) so callers state which one they mean.
pub fn holds_all(granted: &HashSet<Permission>, required: &[Permission]) -> bool {
    required.iter().all(|p| holds(granted, p))
}

/// Disjunctive batch check: at least one listed permission must be held.
pub fn holds_any(granted: &HashSet<Permission>, required: &[Permission]) -> bool {
    required.iter().any(|p| holds(granted, p))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn granted(perms: &[&'static str]) -> HashSet<Permission> {
        perms.iter().map(|p| Permission::new(*p)).collect()
    }

    #[test]
    fn empty_set_denies_everything() {
        let set = HashSet::new();
        assert!(!holds(&set, &Permission::new("view all records")));
        assert!(!holds_any(&set, &[Permission::new("a"), Permission::new("b")]));
    }

    #[test]
    fn explicit_grant_allows() {
        let set = granted(&["view all records"]);
        assert!(holds(&set, &Permission::new("view all records")));
        assert!(!holds(&set, &Permission::new("edit all records")));
    }

    #[test]
    fn wildcard_allows_everything() {
        let set = granted(&["*"]);
        assert!(holds(&set, &Permission::new("anything at all")));
    }

    #[test]
    fn authorize_reports_missing_permission() {
        let set = granted(&["add records"]);
        let err = authorize(&set, &Permission::new("administer backend")).unwrap_err();
        assert_eq!(
            err,
            AuthzError::Forbidden("administer backend".to_string())
        );
    }

    #[test]
    fn all_and_any_semantics_differ() {
        let set = granted(&["add records", "view all records"]);
        let both = [
            Permission::new("add records"),
            Permission::new("edit all records"),
        ];

        assert!(!holds_all(&set, &both));
        assert!(holds_any(&set, &both));
        assert!(holds_all(&set, &[]));
        assert!(!holds_any(&set, &[]));
    }
}
