//! The process-wide session signing secret.

use argon2::password_hash::rand_core::{OsRng, RngCore};
use tracing::warn;

use neoterik_core::config::{AuthConfig, Environment};
use neoterik_core::error::AppError;

/// Minimum accepted secret length in bytes.
pub const MIN_SECRET_BYTES: usize = 32;

/// Length of the generated development secret.
const EPHEMERAL_SECRET_BYTES: usize = 64;

/// HMAC key used to sign and verify session tokens.
///
/// Built once at startup and never changed for the life of the process.
#[derive(Clone)]
pub struct SigningSecret {
    bytes: Vec<u8>,
    ephemeral: bool,
}

impl std::fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningSecret")
            .field("len", &self.bytes.len())
            .field("ephemeral", &self.ephemeral)
            .finish()
    }
}

impl SigningSecret {
    /// Wraps explicit key material.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
            ephemeral: false,
        }
    }

    /// Generates a random key that only lives as long as this process.
    pub fn ephemeral() -> Self {
        let mut bytes = vec![0u8; EPHEMERAL_SECRET_BYTES];
        OsRng.fill_bytes(&mut bytes);
        Self {
            bytes,
            ephemeral: true,
        }
    }

    /// Resolves the signing secret from configuration.
    ///
    /// Production refuses to start without a secret of at least
    /// [`MIN_SECRET_BYTES`]. Development falls back to an ephemeral random
    /// key and says so loudly.
    pub fn resolve(config: &AuthConfig, environment: Environment) -> Result<Self, AppError> {
        let configured = config
            .session_secret
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty());

        match (configured, environment) {
            (Some(secret), _) if secret.len() >= MIN_SECRET_BYTES => {
                Ok(Self::from_bytes(secret.as_bytes()))
            }
            (Some(_), Environment::Production) => Err(AppError::configuration(format!(
                "auth.session_secret must be at least {MIN_SECRET_BYTES} bytes in production"
            ))),
            (Some(secret), Environment::Development) => {
                warn!(
                    min_bytes = MIN_SECRET_BYTES,
                    "auth.session_secret is shorter than recommended; accepted in development only"
                );
                Ok(Self::from_bytes(secret.as_bytes()))
            }
            (None, Environment::Production) => Err(AppError::configuration(
                "auth.session_secret is required in production \
                 (set NEOTERIK__AUTH__SESSION_SECRET)",
            )),
            (None, Environment::Development) => {
                warn!(
                    "NON-PRODUCTION: no auth.session_secret configured, using an ephemeral \
                     random signing key; sessions will not survive a restart"
                );
                Ok(Self::ephemeral())
            }
        }
    }

    /// Raw key material.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Whether this key was generated for a development process.
    pub fn is_ephemeral(&self) -> bool {
        self.ephemeral
    }
}
