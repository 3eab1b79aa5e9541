//! Argon2id password hashing and verification.

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{
        PasswordHash, PasswordHasher as ArgonHasher, PasswordVerifier, SaltString, rand_core::OsRng,
    },
};
use tracing::warn;

use neoterik_core::config::AuthConfig;
use neoterik_core::error::AppError;

/// Handles password hashing and verification using Argon2id.
///
/// Digests are PHC strings, so algorithm, cost and salt travel with each
/// stored hash and verification needs no outside state.
#[derive(Clone)]
pub struct PasswordHasher {
    /// Argon2id instance with the process-wide work factor.
    argon2: Argon2<'static>,
    /// Digest of a random secret, verified against on unknown-user logins.
    dummy_hash: String,
}

impl std::fmt::Debug for PasswordHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordHasher").finish_non_exhaustive()
    }
}

impl PasswordHasher {
    /// Creates a hasher with the work factor from auth configuration.
    pub fn new(config: &AuthConfig) -> Result<Self, AppError> {
        let params = Params::new(
            config.argon2_memory_kib,
            config.argon2_iterations,
            config.argon2_parallelism,
            None,
        )
        .map_err(|e| AppError::configuration(format!("Invalid Argon2 parameters: {e}")))?;

        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

        let mut hasher = Self {
            argon2,
            dummy_hash: String::new(),
        };
        let decoy = SaltString::generate(&mut OsRng);
        hasher.dummy_hash = hasher.hash_password(decoy.as_str())?;

        Ok(hasher)
    }

    /// Hashes a plaintext password using Argon2id with a random salt.
    pub fn hash_password(&self, password: &str) -> Result<String, AppError> {
        let salt = SaltString::generate(&mut OsRng);

        let hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::internal(format!("Password hashing failed: {e}")))?;

        Ok(hash.to_string())
    }

    /// Verifies a plaintext password against a stored hash.
    ///
    /// A malformed or unsupported digest never errors; it simply does not verify.
    pub fn verify_password(&self, password: &str, hash: &str) -> bool {
        let parsed_hash = match PasswordHash::new(hash) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!(error = %e, "Stored password hash is malformed");
                return false;
            }
        };

        match self.argon2.verify_password(password.as_bytes(), &parsed_hash) {
            Ok(()) => true,
            Err(argon2::password_hash::Error::Password) => false,
            Err(e) => {
                warn!(error = %e, "Password verification failed");
                false
            }
        }
    }

    /// Spends the same work as [`verify_password`](Self::verify_password)
    /// against a digest no caller knows the plaintext of. Always `false`.
    pub fn verify_dummy(&self, password: &str) -> bool {
        self.verify_password(password, &self.dummy_hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_hasher() -> PasswordHasher {
        let config = AuthConfig {
            argon2_memory_kib: 1024,
            argon2_iterations: 1,
            ..AuthConfig::default()
        };
        PasswordHasher::new(&config).unwrap()
    }

    #[test]
    fn test_hash_then_verify() {
        let hasher = fast_hasher();
        let hash = hasher.hash_password("secret123").unwrap();

        assert_ne!(hash, "secret123");
        assert!(hash.starts_with("$argon2id$"));
        assert!(hasher.verify_password("secret123", &hash));
    }

    #[test]
    fn test_wrong_password_does_not_verify() {
        let hasher = fast_hasher();
        let hash = hasher.hash_password("secret123").unwrap();

        assert!(!hasher.verify_password("secret124", &hash));
        assert!(!hasher.verify_password("", &hash));
    }

    #[test]
    fn test_salts_differ_between_calls() {
        let hasher = fast_hasher();
        let first = hasher.hash_password("same-password").unwrap();
        let second = hasher.hash_password("same-password").unwrap();

        assert_ne!(first, second);
        assert!(hasher.verify_password("same-password", &first));
        assert!(hasher.verify_password("same-password", &second));
    }

    #[test]
    fn test_malformed_digest_denies_without_error() {
        let hasher = fast_hasher();

        assert!(!hasher.verify_password("secret123", ""));
        assert!(!hasher.verify_password("secret123", "not-a-phc-string"));
        assert!(!hasher.verify_password("secret123", "$argon2id$v=19$m=1024$broken"));
        assert!(!hasher.verify_password("secret123", "secret123"));
    }

    #[test]
    fn test_digest_carries_its_own_parameters() {
        let strong = PasswordHasher::new(&AuthConfig {
            argon2_memory_kib: 2048,
            argon2_iterations: 2,
            ..AuthConfig::default()
        })
        .unwrap();
        let hash = strong.hash_password("portable").unwrap();

        assert!(fast_hasher().verify_password("portable", &hash));
    }

    #[test]
    fn test_dummy_never_verifies() {
        let hasher = fast_hasher();
        assert!(!hasher.verify_dummy("secret123"));
        assert!(!hasher.verify_dummy(""));
    }

    #[test]
    fn test_invalid_parameters_are_rejected() {
        let config = AuthConfig {
            argon2_memory_kib: 1,
            ..AuthConfig::default()
        };
        assert!(PasswordHasher::new(&config).is_err());
    }
}
