//! Authentication error types.

use thiserror::Error;

/// Failures while hashing passwords or handling access tokens.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Password hashing failed: {0}")]
    PasswordHash(String),

    #[error("Token encoding failed: {0}")]
    JwtEncoding(String),

    #[error("Token validation failed: {0}")]
    JwtValidation(String),

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token")]
    InvalidToken,

    /// Bad secret or lifetime.
    #[error("Auth configuration error: {0}")]
    Configuration(String),
}

impl From<jsonwebtoken::errors::Error> for AuthError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        match e.kind() {
            ErrorKind::ExpiredSignature => Self::TokenExpired,
            ErrorKind::InvalidToken | ErrorKind::InvalidSignature => Self::InvalidToken,
            _ => Self::JwtValidation(e.to_string()),
        }
    }
}

impl From<argon2::password_hash::Error> for AuthError {
    fn from(e: argon2::password_hash::Error) -> Self {
        Self::PasswordHash(e.to_string())
    }
}

pub type AuthResult<T> = Result<T, AuthError>;
