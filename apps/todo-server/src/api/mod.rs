//! API endpoints.

pub mod auth;
pub mod task;
pub mod user;

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::rejection::JsonRejection,
    http::{StatusCode, Uri},
    routing::{get, post},
};
use task_store::TaskStore;

use crate::error::{ServerError, ServerResult};
use crate::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router<S: TaskStore + 'static>() -> Router<Arc<AppState<S>>> {
    Router::new()
        .route("/", get(root))
        // Task endpoints
        .route("/tasks", get(task::get_tasks).post(task::create_task))
        .route(
            "/tasks/{id}",
            get(task::get_task)
                .patch(task::update_task)
                .delete(task::delete_task),
        )
        // User endpoints
        .route("/users", get(user::get_users).post(user::create_user))
        // Auth endpoints
        .route("/login", post(auth::login))
        .fallback(not_found)
}

/// Root endpoint.
async fn root() -> StatusCode {
    StatusCode::OK
}

async fn not_found(uri: Uri) -> ServerError {
    ServerError::NotFound(format!("No route for {}", uri.path()))
}

/// Parses a task ID from a path segment.
pub(crate) fn parse_id(raw: &str) -> ServerResult<i64> {
    raw.parse()
        .map_err(|_| ServerError::InvalidRequest(format!("ID: {raw:?} is invalid")))
}

/// Unwraps a JSON body, turning every rejection into a 400.
pub(crate) fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> ServerResult<T> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| ServerError::InvalidRequest(rejection.body_text()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("42").unwrap(), 42);
        assert!(matches!(
            parse_id("not-an-integer"),
            Err(ServerError::InvalidRequest(_))
        ));
        assert!(parse_id("").is_err());
    }
}
