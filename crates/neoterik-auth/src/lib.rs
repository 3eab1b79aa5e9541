//! # neoterik-auth
//!
//! Credential and session management for Neoterik.
//!
//! ## Modules
//!
//! - `password`: Argon2id password hashing and verification
//! - `jwt`: signed, time-bounded session tokens (HS256) and the signing secret
//! - `session`: the session cookie transport and the register/login/resolve/logout use cases
//!
//! Sessions are stateless: the signed token in the client's cookie is the
//! only record of a session, so logout cannot revoke a copied token.

pub mod jwt;
pub mod password;
pub mod session;

pub use jwt::{Claims, JwtDecoder, JwtEncoder, SigningSecret};
pub use password::PasswordHasher;
pub use session::{SessionCookie, SessionManager};
