//! Authentication API endpoints.

use std::sync::Arc;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::{HeaderValue, header::SET_COOKIE},
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use task_store::TaskStore;

use super::json_body;
use crate::error::{ServerError, ServerResult};
use crate::state::AppState;

/// Name of the cookie carrying the access token.
pub const TOKEN_COOKIE: &str = "token";

/// Login request body.
#[derive(Clone, Deserialize, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login response body.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoginResponse {
    #[serde(rename = "accessToken")]
    pub access_token: String,
}

fn token_cookie(token: &str, expires_at: DateTime<Utc>) -> ServerResult<HeaderValue> {
    let cookie = format!(
        "{TOKEN_COOKIE}={token}; Expires={}; Path=/; HttpOnly; SameSite=Lax",
        expires_at.format("%a, %d %b %Y %H:%M:%S GMT")
    );

    HeaderValue::from_str(&cookie)
        .map_err(|e| ServerError::Internal(format!("Invalid cookie header: {e}")))
}

/// Checks credentials and issues an access token.
///
/// The token is returned in the body and set as the `token` cookie.
pub async fn login<S: TaskStore>(
    State(state): State<Arc<AppState<S>>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ServerResult<Response> {
    let credentials = json_body(payload)?;

    if !state
        .store
        .validate_user_credentials(&credentials.email, &credentials.password)
        .await
    {
        tracing::info!("Login rejected");
        return Err(ServerError::InvalidCredentials);
    }

    let issued = state.tokens.issue(&credentials.email)?;
    let cookie = token_cookie(&issued.token, issued.expires_at)?;

    tracing::info!(expires_at = %issued.expires_at, "Access token issued");

    Ok((
        [(SET_COOKIE, cookie)],
        Json(LoginResponse {
            access_token: issued.token,
        }),
    )
        .into_response())
}
