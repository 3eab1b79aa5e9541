//! Session claims carried inside every signed token.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use neoterik_entity::user::User;

/// Lifetime of a session token and of the cookie that carries it, in seconds.
pub const SESSION_TTL_SECONDS: i64 = 7 * 24 * 60 * 60;

/// Claims payload embedded in a session token.
///
/// These five fields are the whole payload; nothing else is signed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (the user ID).
    pub sub: Uuid,
    /// Email at the time of issuance.
    pub email: String,
    /// Display name at the time of issuance.
    pub name: Option<String>,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
}

/// Identity facts a token is issued for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimsInput {
    /// User ID.
    pub user_id: Uuid,
    /// Email address.
    pub email: String,
    /// Display name.
    pub name: Option<String>,
}

impl From<&User> for ClaimsInput {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id,
            email: user.email.clone(),
            name: user.display_name.clone(),
        }
    }
}

impl Claims {
    /// Builds claims for `input` issued at `now`.
    pub fn new(input: ClaimsInput, now: DateTime<Utc>) -> Self {
        Self {
            sub: input.user_id,
            email: input.email,
            name: input.name,
            iat: now.timestamp(),
            exp: now.timestamp() + SESSION_TTL_SECONDS,
        }
    }

    /// Returns the user ID from the subject claim.
    pub fn user_id(&self) -> Uuid {
        self.sub
    }

    /// Returns the expiration as a `DateTime<Utc>`.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }

    /// Checks whether this token has expired at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.exp
    }
}
