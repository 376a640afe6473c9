//! Storage Layer - SQLite-backed persistence
//!
//! System of record is a single SQLite table:
//! - users(id, name, email)

pub mod schema;
pub mod sqlite;

pub use sqlite::UserStore;
