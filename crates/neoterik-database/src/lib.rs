//! # neoterik-database
//!
//! The user repository contract consumed by the session core, plus its
//! PostgreSQL implementation (connection pool, migrations) and an
//! in-memory implementation for development and tests.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod repositories;

pub use connection::DatabasePool;
pub use memory::MemoryUserRepository;
pub use repositories::user::{PgUserRepository, UserRepository};
