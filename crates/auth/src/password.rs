//! Salted password hashing.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::{AuthError, AuthResult};

/// Hashes a plaintext password with Argon2id and a random salt.
///
/// The result is a PHC string (`$argon2id$v=19$...`) that embeds the salt and
/// parameters, so it can be stored as-is and later passed to
/// [`verify_password`].
pub fn hash_password(password: &str) -> AuthResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Checks a plaintext password against a stored PHC hash.
///
/// Returns false for a mismatch and for a stored value that is not a valid
/// hash.
pub fn verify_password(password: &str, password_hash: &str) -> bool {
    let parsed = match PasswordHash::new(password_hash) {
        Ok(parsed) => parsed,
        Err(e) => {
            tracing::warn!(error = %e, "Stored password hash is malformed");
            return false;
        }
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// Runs [`hash_password`] on the blocking thread pool.
///
/// Hashing takes tens of milliseconds of CPU and must stay off runtime
/// worker threads.
pub async fn hash_password_async(password: String) -> AuthResult<String> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| AuthError::PasswordHash(e.to_string()))?
}

/// Runs [`verify_password`] on the blocking thread pool.
pub async fn verify_password_async(password: String, password_hash: String) -> bool {
    match tokio::task::spawn_blocking(move || verify_password(&password, &password_hash)).await {
        Ok(valid) => valid,
        Err(e) => {
            tracing::error!(error = %e, "Password check task failed");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("Caput Draconis").unwrap();

        assert_ne!(hash, "Caput Draconis");
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("Caput Draconis", &hash));
        assert!(!verify_password("caput draconis", &hash));
    }

    #[test]
    fn test_hashes_are_salted() {
        let first = hash_password("pw").unwrap();
        let second = hash_password("pw").unwrap();

        assert_ne!(first, second);
        assert!(verify_password("pw", &first));
        assert!(verify_password("pw", &second));
    }

    #[test]
    fn test_verify_rejects_plaintext_hash() {
        assert!(!verify_password("pw", "pw"));
    }

    #[tokio::test]
    async fn test_async_wrappers_match_sync() {
        let hash = hash_password_async("pw".to_string()).await.unwrap();

        assert!(verify_password("pw", &hash));
        assert!(verify_password_async("pw".to_string(), hash.clone()).await);
        assert!(!verify_password_async("nope".to_string(), hash).await);
    }
}
