//! Session transport and the auth use cases built on it.

pub mod cookie;
pub mod manager;

pub use cookie::{SESSION_COOKIE_NAME, SessionCookie};
pub use manager::{LoginInput, RegisterInput, ResolvedSession, SessionManager};
