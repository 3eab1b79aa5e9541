//! # neoterik-api
//!
//! HTTP API layer for Neoterik built on Axum.
//!
//! Exposes the register, login, session and logout endpoints plus a health
//! check, with request logging, CORS, extractors, DTOs and error mapping.

pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use error::ApiErrorResponse;
pub use router::build_router;
pub use state::AppState;
