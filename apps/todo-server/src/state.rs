//! Application state shared by all handlers.

use auth::TokenIssuer;
use task_store::TaskStore;

use crate::config::Config;

/// Everything a request handler can reach: the store picked at startup and
/// the token issuer used by `/login`.
pub struct AppState<S: TaskStore> {
    pub store: S,
    pub tokens: TokenIssuer,
}

impl<S: TaskStore> AppState<S> {
    /// Builds state from loaded configuration. Fails on an unusable token secret.
    pub fn from_config(config: &Config, store: S) -> Result<Self, auth::AuthError> {
        let tokens = TokenIssuer::new(&config.jwt_secret, config.jwt_expiration_hours)?;

        Ok(Self { store, tokens })
    }
}
