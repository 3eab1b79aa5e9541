//! Repository contracts and their PostgreSQL implementations.

pub mod user;
