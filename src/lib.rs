//! # Userbase - Minimal User Directory Service
//!
//! Userbase provides:
//! - A typed `User` record and validated `NewUser` input
//! - SQLite-backed storage for a single `users` table
//! - An axum HTTP surface for creating, listing and fetching users
//! - A CLI for serving and inspecting the store

pub mod user;
pub mod storage;
pub mod server;
pub mod config;
pub mod output;
pub mod ui;

// Re-exports for convenient access
pub use user::{NewUser, User};
pub use storage::UserStore;

/// Result type alias for Userbase operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for Userbase operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Email already registered: {0}")]
    ConstraintViolation(String),

    #[error("User not found: {0}")]
    NotFound(i64),

    #[error("Malformed input: {0}")]
    MalformedInput(String),

    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage connection poisoned")]
    Poisoned,

    #[error("Background task failed: {0}")]
    Task(String),
}
