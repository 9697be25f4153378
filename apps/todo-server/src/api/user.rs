//! User API endpoints.

use std::sync::Arc;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use entities::{CreateUserDto, User};
use serde::{Deserialize, Serialize};
use task_store::TaskStore;

use super::json_body;
use crate::error::ServerResult;
use crate::state::AppState;

/// Public view of a user. The password hash is never part of a response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: i64,
    pub name: String,
    pub email: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
        }
    }
}

/// Registers a new user.
pub async fn create_user<S: TaskStore>(
    State(state): State<Arc<AppState<S>>>,
    payload: Result<Json<CreateUserDto>, JsonRejection>,
) -> ServerResult<(StatusCode, Json<UserResponse>)> {
    let dto = json_body(payload)?;
    let user = state.store.create_user(dto).await?;

    tracing::info!(user_id = user.id, "User created");

    Ok((StatusCode::CREATED, Json(user.into())))
}

/// Lists all users.
pub async fn get_users<S: TaskStore>(
    State(state): State<Arc<AppState<S>>>,
) -> ServerResult<Json<Vec<UserResponse>>> {
    let users = state.store.get_users().await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}
