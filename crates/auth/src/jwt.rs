//! Access tokens handed out on login.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{AuthError, AuthResult, DEFAULT_JWT_ISSUER};

/// Claims carried by an access token. The subject is the user's email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessClaims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
    pub iss: String,
    pub jti: String,
}

impl AccessClaims {
    /// When the token stops being accepted.
    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.exp, 0).unwrap_or(DateTime::UNIX_EPOCH)
    }
}

/// A signed token together with its expiry.
#[derive(Debug, Clone)]
pub struct AccessToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Signs and verifies HS256 access tokens with a shared secret.
#[derive(Clone)]
pub struct TokenIssuer {
    lifetime: Duration,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("lifetime", &self.lifetime)
            .finish_non_exhaustive()
    }
}

impl TokenIssuer {
    /// Creates an issuer whose tokens live for `lifetime_hours`.
    ///
    /// An empty secret is a configuration error.
    pub fn new(secret: &str, lifetime_hours: u64) -> AuthResult<Self> {
        if secret.is_empty() {
            return Err(AuthError::Configuration(
                "token secret must not be empty".to_string(),
            ));
        }

        let hours = i64::try_from(lifetime_hours).map_err(|_| {
            AuthError::Configuration(format!("token lifetime too large: {lifetime_hours}h"))
        })?;

        Ok(Self {
            lifetime: Duration::hours(hours),
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
        })
    }

    /// Issues a token for the given email.
    pub fn issue(&self, email: &str) -> AuthResult<AccessToken> {
        let issued_at = Utc::now();
        let claims = AccessClaims {
            sub: email.to_string(),
            iat: issued_at.timestamp(),
            exp: (issued_at + self.lifetime).timestamp(),
            iss: DEFAULT_JWT_ISSUER.to_string(),
            jti: Uuid::new_v4().to_string(),
        };

        let token = encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AuthError::JwtEncoding(e.to_string()))?;

        Ok(AccessToken {
            token,
            expires_at: claims.expires_at(),
        })
    }

    /// Checks the signature, issuer and expiry of a token and returns its claims.
    ///
    /// The server itself only issues tokens; this is the counterpart for
    /// callers and tests that need to read one back.
    pub fn verify(&self, token: &str) -> AuthResult<AccessClaims> {
        let mut validation = Validation::default();
        validation.set_issuer(&[DEFAULT_JWT_ISSUER]);

        Ok(decode::<AccessClaims>(token, &self.decoding_key, &validation)?.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_and_verify() {
        let issuer = TokenIssuer::new("s3cret", 24).unwrap();

        let issued = issuer.issue("dumbledore@hogwarts.edu").unwrap();
        let claims = issuer.verify(&issued.token).unwrap();

        assert_eq!(claims.sub, "dumbledore@hogwarts.edu");
        assert_eq!(claims.iss, DEFAULT_JWT_ISSUER);
        assert_eq!(claims.exp - claims.iat, 24 * 3600);
        assert_eq!(claims.expires_at(), issued.expires_at);
    }

    #[test]
    fn test_each_token_is_unique() {
        let issuer = TokenIssuer::new("s3cret", 1).unwrap();

        let first = issuer.verify(&issuer.issue("a@b.com").unwrap().token).unwrap();
        let second = issuer.verify(&issuer.issue("a@b.com").unwrap().token).unwrap();

        assert_ne!(first.jti, second.jti);
    }

    #[test]
    fn test_garbage_is_rejected() {
        let issuer = TokenIssuer::new("s3cret", 1).unwrap();
        assert!(matches!(
            issuer.verify("not.a.token"),
            Err(AuthError::InvalidToken) | Err(AuthError::JwtValidation(_))
        ));
    }

    #[test]
    fn test_other_secret_is_rejected() {
        let ours = TokenIssuer::new("first-secret", 1).unwrap();
        let theirs = TokenIssuer::new("second-secret", 1).unwrap();

        let issued = theirs.issue("a@b.com").unwrap();
        assert!(ours.verify(&issued.token).is_err());
    }

    #[test]
    fn test_empty_secret_rejected() {
        assert!(matches!(
            TokenIssuer::new("", 24),
            Err(AuthError::Configuration(_))
        ));
    }
}
