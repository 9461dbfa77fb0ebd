//! Password hashing and verification (argon2id).
//!
//! Hashes are self-describing PHC strings: the algorithm, version, salt and
//! cost parameters travel inside the hash, so verification never needs
//! out-of-band configuration.

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use thiserror::Error;

use gatehouse_core::DomainError;

/// Error producing a password hash.
///
/// Verification deliberately has no error type: a candidate either matches a
/// stored hash or it does not, and malformed stored material counts as a
/// non-match.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PasswordError {
    #[error("argon2 parameters rejected: {0}")]
    Params(String),

    #[error("hashing failed: {0}")]
    Hash(String),
}

impl From<PasswordError> for DomainError {
    fn from(value: PasswordError) -> Self {
        DomainError::Credential(value.to_string())
    }
}

/// Argon2 cost parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashParams {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl HashParams {
    fn to_argon2(self) -> Result<Argon2<'static>, PasswordError> {
        let params = Params::new(self.memory_kib, self.iterations, self.parallelism, None)
            .map_err(|e| PasswordError::Params(e.to_string()))?;
        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }
}

impl Default for HashParams {
    /// Argon2id RFC 9106 low-memory recommendation.
    fn default() -> Self {
        Self {
            memory_kib: 19_456,
            iterations: 2,
            parallelism: 1,
        }
    }
}

/// Hash a plaintext password with a fresh random salt.
pub fn hash_password(plaintext: &str) -> Result<String, PasswordError> {
    hash_password_with_params(plaintext, HashParams::default())
}

/// Hash a plaintext password with explicit cost parameters.
///
/// Cheap parameters are useful in tests; production callers should stick to
/// [`HashParams::default`].
pub fn hash_password_with_params(
    plaintext: &str,
    params: HashParams,
) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = params.to_argon2()?;

    let hash = argon2
        .hash_password(plaintext.as_bytes(), &salt)
        .map_err(|e| PasswordError::Hash(e.to_string()))?;

    Ok(hash.to_string())
}

/// Verify a candidate password against a stored PHC hash string.
///
/// Cost parameters come from the stored hash itself. Returns `false` for a
/// mismatch *and* for a malformed stored hash — this function fails closed
/// and never errors.
pub fn verify_password(candidate: &str, stored: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored) else {
        return false;
    };

    Argon2::default()
        .verify_password(candidate.as_bytes(), &parsed)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// Weak parameters so tests don't burn CPU; production defaults are
    /// exercised once below.
    fn cheap() -> HashParams {
        HashParams {
            memory_kib: 8,
            iterations: 1,
            parallelism: 1,
        }
    }

    #[test]
    fn hash_and_verify_round_trip() {
        let hash = hash_password_with_params("secret1", cheap()).unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("secret1", &hash));
        assert!(!verify_password("some other password", &hash));
    }

    #[test]
    fn default_params_produce_verifiable_hash() {
        let hash = hash_password("secret1").unwrap();
        assert!(verify_password("secret1", &hash));
    }

    #[test]
    fn same_input_salts_differently() {
        let h1 = hash_password_with_params("secret1", cheap()).unwrap();
        let h2 = hash_password_with_params("secret1", cheap()).unwrap();

        assert_ne!(h1, h2);
        assert!(verify_password("secret1", &h1));
        assert!(verify_password("secret1", &h2));
    }

    #[test]
    fn malformed_hash_fails_closed() {
        assert!(!verify_password("secret1", ""));
        assert!(!verify_password("secret1", "not-a-phc-string"));
        assert!(!verify_password("secret1", "$argon2id$garbage"));
    }

    #[test]
    fn invalid_params_rejected() {
        let result = hash_password_with_params(
            "secret1",
            HashParams {
                memory_kib: 0,
                iterations: 0,
                parallelism: 0,
            },
        );
        assert!(matches!(result, Err(PasswordError::Params(_))));
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 16,
            ..ProptestConfig::default()
        })]

        /// Property: any password verifies against its own hash, and a
        /// different password does not.
        #[test]
        fn verify_matches_only_original(
            p1 in "[a-zA-Z0-9 ]{1,24}",
            p2 in "[a-zA-Z0-9 ]{1,24}",
        ) {
            let hash = hash_password_with_params(&p1, cheap()).unwrap();
            prop_assert!(verify_password(&p1, &hash));
            if p1 != p2 {
                prop_assert!(!verify_password(&p2, &hash));
            }
        }
    }
}
