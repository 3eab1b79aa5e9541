//! # neoterik-core
//!
//! Core crate for Neoterik. Contains configuration schemas, the unified
//! error system, and the result alias shared by every other crate.
//!
//! This crate has **no** internal dependencies on other Neoterik crates.

pub mod config;
pub mod error;
pub mod result;

pub use error::AppError;
pub use result::AppResult;
