//! Auth use cases: register, login, resolve the current session, logout.

use std::sync::Arc;

use axum_extra::extract::cookie::CookieJar;
use tracing::{debug, error, info};

use neoterik_core::error::{AppError, ErrorKind};
use neoterik_database::repositories::user::UserRepository;
use neoterik_entity::user::{CreateUser, User, normalize_email};

use crate::jwt::{Claims, ClaimsInput, JwtDecoder, JwtEncoder};
use crate::password::PasswordHasher;

use super::cookie::SessionCookie;

/// Message for every failed login, whatever the cause.
const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Registration form.
#[derive(Debug, Clone, Default)]
pub struct RegisterInput {
    /// Email address.
    pub email: Option<String>,
    /// Plaintext password.
    pub password: Option<String>,
    /// Optional display name.
    pub name: Option<String>,
}

/// Login form.
#[derive(Debug, Clone, Default)]
pub struct LoginInput {
    /// Email address.
    pub email: Option<String>,
    /// Plaintext password.
    pub password: Option<String>,
}

/// A verified session and the user it belongs to.
#[derive(Debug, Clone)]
pub struct ResolvedSession {
    /// Claims from the verified token.
    pub claims: Claims,
    /// Freshly loaded user record.
    pub user: User,
}

/// Composes hashing, token signing, cookie transport and the user store.
///
/// Holds no per-session state. Every field is immutable after construction,
/// so one instance is shared by all requests.
#[derive(Clone)]
pub struct SessionManager {
    /// User store.
    user_repo: Arc<dyn UserRepository>,
    /// Password hasher.
    password_hasher: Arc<PasswordHasher>,
    /// Token encoder.
    jwt_encoder: Arc<JwtEncoder>,
    /// Token decoder.
    jwt_decoder: Arc<JwtDecoder>,
    /// Cookie transport.
    cookie: SessionCookie,
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("cookie", &self.cookie)
            .finish_non_exhaustive()
    }
}

impl SessionManager {
    /// Creates a new session manager with all required dependencies.
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        password_hasher: Arc<PasswordHasher>,
        jwt_encoder: Arc<JwtEncoder>,
        jwt_decoder: Arc<JwtDecoder>,
        cookie: SessionCookie,
    ) -> Self {
        Self {
            user_repo,
            password_hasher,
            jwt_encoder,
            jwt_decoder,
            cookie,
        }
    }

    /// Registers a new user. Does not start a session.
    pub async fn register(&self, input: RegisterInput) -> Result<User, AppError> {
        let (Some(email), Some(password)) = (
            non_blank(input.email.as_deref()),
            non_empty(input.password),
        ) else {
            return Err(AppError::missing_field("Email and password required"));
        };
        let email = normalize_email(email);

        let existing = self
            .user_repo
            .find_by_email(&email)
            .await
            .map_err(|e| internal("Registration lookup failed", e))?;
        if existing.is_some() {
            return Err(AppError::conflict("User already exists"));
        }

        let hasher = Arc::clone(&self.password_hasher);
        let password_hash = tokio::task::spawn_blocking(move || hasher.hash_password(&password))
            .await
            .map_err(|e| internal("Hashing task failed", e))?
            .map_err(|e| internal("Password hashing failed", e))?;

        let display_name = non_blank(input.name.as_deref()).map(String::from);

        let user = self
            .user_repo
            .create(&CreateUser {
                email,
                password_hash,
                display_name,
            })
            .await
            .map_err(|e| match e.kind {
                ErrorKind::Conflict => AppError::conflict("User already exists"),
                _ => internal("Failed to create user", e),
            })?;

        info!(user_id = %user.id, "User registered");
        Ok(user)
    }

    /// Checks credentials, issues a session token and attaches it to `jar`.
    ///
    /// Unknown emails, wrong passwords and absent fields all produce the same
    /// `Unauthorized` error. Unknown emails still pay for a full password
    /// verification so response times do not reveal which accounts exist.
    pub async fn login(&self, jar: CookieJar, input: LoginInput) -> Result<(CookieJar, User), AppError> {
        let (Some(email), Some(password)) = (
            non_blank(input.email.as_deref()),
            non_empty(input.password),
        ) else {
            return Err(AppError::unauthorized(INVALID_CREDENTIALS));
        };
        let email = normalize_email(email);

        let user = self
            .user_repo
            .find_by_email(&email)
            .await
            .map_err(|e| internal("Login lookup failed", e))?;

        let hasher = Arc::clone(&self.password_hasher);
        let stored_hash = user.as_ref().map(|u| u.password_hash.clone());
        let password_valid = tokio::task::spawn_blocking(move || match stored_hash {
            Some(hash) => hasher.verify_password(&password, &hash),
            None => hasher.verify_dummy(&password),
        })
        .await
        .map_err(|e| internal("Verification task failed", e))?;

        let user = match user {
            Some(user) if password_valid => user,
            _ => {
                debug!("Login rejected");
                return Err(AppError::unauthorized(INVALID_CREDENTIALS));
            }
        };

        let issued = self
            .jwt_encoder
            .issue(ClaimsInput::from(&user))
            .map_err(|e| internal("Failed to issue session token", e))?;

        info!(user_id = %user.id, "Login successful");
        Ok((self.cookie.attach(jar, issued.token), user))
    }

    /// Resolves the session carried by `jar`, if any.
    ///
    /// A missing cookie, an invalid or expired token, and a user that no
    /// longer exists all mean "no session" rather than an error.
    pub async fn resolve(&self, jar: &CookieJar) -> Result<Option<ResolvedSession>, AppError> {
        let Some(token) = self.cookie.read(jar) else {
            return Ok(None);
        };
        let Some(claims) = self.jwt_decoder.verify(&token) else {
            return Ok(None);
        };

        let user = self
            .user_repo
            .find_by_id(claims.user_id())
            .await
            .map_err(|e| internal("Session user lookup failed", e))?;

        match user {
            Some(user) => Ok(Some(ResolvedSession { claims, user })),
            None => {
                debug!(user_id = %claims.sub, "Session refers to a missing user");
                Ok(None)
            }
        }
    }

    /// Clears the session cookie. Always succeeds.
    pub fn logout(&self, jar: CookieJar) -> CookieJar {
        self.cookie.clear(jar)
    }
}

/// Logs `source` in full and returns a detail-free internal error.
fn internal(context: &str, source: impl std::fmt::Display) -> AppError {
    error!(error = %source, "{context}");
    AppError::internal(context.to_string())
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
