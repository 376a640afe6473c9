use axum::{
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use crate::server::AppState;
use crate::server::error::{ApiError, StoreResultExt};
use crate::user::{NewUser, User};
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreatedUser {
    pub id: i64,
}

/// Run a store call on the blocking pool
async fn blocking<T, F>(f: F) -> crate::Result<T>
where
    F: FnOnce() -> crate::Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| crate::Error::Task(e.to_string()))?
}

/// Integer prefix of `raw`: leading whitespace, an optional sign, then digits.
/// Anything after the digits is ignored, so `"1.5"` and `"1abc"` both give 1.
pub fn parse_leading_int(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let end = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
    if end == 0 {
        return None;
    }

    let magnitude: i64 = rest[..end].parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

pub async fn hello() -> &'static str {
    "Hello, world!"
}

pub async fn list_users(State(state): State<Arc<AppState>>) -> Result<Json<Vec<User>>, ApiError> {
    let store = state.store.clone();
    let users = blocking(move || store.list_users())
        .await
        .or_respond("Error fetching users")?;

    Ok(Json(users))
}

pub async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<User>, ApiError> {
    // Ids without a leading integer cannot match any row.
    let Some(id) = parse_leading_int(&id) else {
        return Err(ApiError::not_found());
    };

    let store = state.store.clone();
    let user = blocking(move || store.get_user(id)?.ok_or(crate::Error::NotFound(id)))
        .await
        .or_respond("Error fetching user")?;

    Ok(Json(user))
}

pub async fn create_user(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateUserRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreatedUser>), ApiError> {
    let Json(req) = payload.map_err(|rejection| {
        tracing::debug!("Rejected request body: {}", rejection);
        ApiError::malformed()
    })?;
    let new_user = NewUser::from_parts(req.name, req.email).or_respond("Error creating user")?;

    let store = state.store.clone();
    let id = blocking(move || store.insert_user(&new_user))
        .await
        .or_respond("Error creating user")?;

    tracing::info!("Created user {}", id);
    Ok((StatusCode::CREATED, Json(CreatedUser { id })))
}
