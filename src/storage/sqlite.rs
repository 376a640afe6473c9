//! SQLite storage implementation

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use rusqlite::{Connection, ErrorCode, OptionalExtension, params};
use crate::{Error, Result};
use crate::user::{NewUser, User};
use super::schema;

/// SQLite-backed storage for users.
///
/// Cloning is cheap: every clone shares the same connection, and access to it
/// is serialized through a mutex.
#[derive(Clone)]
pub struct UserStore {
    conn: Arc<Mutex<Connection>>,
}

impl UserStore {
    /// Open a database file (creates if doesn't exist)
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        tracing::debug!("Opened SQLite database at {}", path.display());
        Self::from_connection(conn)
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        let store = Self { conn: Arc::new(Mutex::new(conn)) };
        store.ensure_schema()?;
        Ok(store)
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| Error::Poisoned)
    }

    /// Create the users table if it is absent
    pub fn ensure_schema(&self) -> Result<()> {
        let conn = self.conn()?;
        for stmt in schema::all_schema_statements() {
            conn.execute(stmt, [])?;
        }
        Ok(())
    }

    /// Insert a user and return its assigned id
    pub fn insert_user(&self, user: &NewUser) -> Result<i64> {
        let conn = self.conn()?;
        let result = conn.execute(
            "INSERT INTO users (name, email) VALUES (?1, ?2)",
            params![user.name(), user.email()],
        );

        match result {
            Ok(_) => Ok(conn.last_insert_rowid()),
            Err(rusqlite::Error::SqliteFailure(err, _))
                if err.code == ErrorCode::ConstraintViolation
                    && err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
            {
                Err(Error::ConstraintViolation(user.email().to_string()))
            }
            Err(err) => Err(err.into()),
        }
    }

    /// All users, ordered by id
    pub fn list_users(&self) -> Result<Vec<User>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT id, name, email FROM users ORDER BY id")?;

        let users = stmt
            .query_map([], row_to_user)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(users)
    }

    /// Get a user by id
    pub fn get_user(&self, id: i64) -> Result<Option<User>> {
        self.conn()?
            .query_row(
                "SELECT id, name, email FROM users WHERE id = ?1",
                [id],
                row_to_user,
            )
            .optional()
            .map_err(Into::into)
    }

    /// Count all users
    pub fn count_users(&self) -> Result<usize> {
        let count: i64 = self.conn()?.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Release the connection.
    ///
    /// If other handles still share it, the connection is released when the
    /// last of them is dropped.
    pub fn close(self) -> Result<()> {
        match Arc::try_unwrap(self.conn) {
            Ok(mutex) => {
                let conn = mutex.into_inner().map_err(|_| Error::Poisoned)?;
                conn.close().map_err(|(_, err)| Error::Storage(err))
            }
            Err(_) => {
                tracing::debug!("Store still shared; connection closes with the last handle");
                Ok(())
            }
        }
    }
}

fn row_to_user(row: &rusqlite::Row) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
    })
}
