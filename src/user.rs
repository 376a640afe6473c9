//! User record and insert input

use serde::{Deserialize, Serialize};
use crate::{Error, Result};

/// A persisted user row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
}

/// Validated input for inserting a user.
///
/// Both fields are guaranteed present and non-blank; uniqueness of `email`
/// is left to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    name: String,
    email: String,
}

impl NewUser {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Result<Self> {
        Self::from_parts(Some(name.into()), Some(email.into()))
    }

    /// Build from possibly-absent fields, as they arrive in a request body
    pub fn from_parts(name: Option<String>, email: Option<String>) -> Result<Self> {
        let name = require("name", name)?;
        let email = require("email", email)?;
        Ok(Self { name, email })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }
}

fn require(field: &str, value: Option<String>) -> Result<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        Some(_) => Err(Error::MalformedInput(format!("{} must not be empty", field))),
        None => Err(Error::MalformedInput(format!("{} is required", field))),
    }
}
