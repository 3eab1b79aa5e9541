//! Session token creation.

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};

use neoterik_core::error::AppError;

use super::claims::{Claims, ClaimsInput};
use super::secret::SigningSecret;

/// Creates signed session tokens.
#[derive(Clone)]
pub struct JwtEncoder {
    /// HMAC secret key for signing.
    encoding_key: EncodingKey,
}

impl std::fmt::Debug for JwtEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtEncoder").finish_non_exhaustive()
    }
}

/// A freshly signed token and the claims inside it.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    /// Compact JWS string handed to the client.
    pub token: String,
    /// The claims that were signed.
    pub claims: Claims,
}

impl JwtEncoder {
    /// Creates a new encoder for the given signing secret.
    pub fn new(secret: &SigningSecret) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Issues a token valid for seven days from now.
    pub fn issue(&self, input: ClaimsInput) -> Result<IssuedToken, AppError> {
        self.issue_at(input, Utc::now())
    }

    /// Issues a token as if the current time were `now`.
    pub fn issue_at(&self, input: ClaimsInput, now: DateTime<Utc>) -> Result<IssuedToken, AppError> {
        let claims = Claims::new(input, now);

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to encode session token: {e}")))?;

        Ok(IssuedToken { token, claims })
    }
}
