//! User-related entity definitions.

use serde::{Deserialize, Serialize};

/// A registered user as persisted by a store.
///
/// `password` always holds a PHC-formatted hash. This type is never sent
/// over HTTP directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Store-assigned identifier, starting at 1.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Email address, unique per store.
    pub email: String,
    /// Password hash.
    pub password: String,
}

impl User {
    /// Creates a user from already hashed credentials.
    pub fn new(
        id: i64,
        name: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
            password: password_hash.into(),
        }
    }
}

/// Payload for registering a user. The password is plaintext here and is
/// hashed by the store before it is persisted.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateUserDto {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl CreateUserDto {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            password: password.into(),
        }
    }

    /// Builds the stored user for the given ID and password hash.
    pub fn into_user(self, id: i64, password_hash: String) -> User {
        User::new(id, self.name, self.email, password_hash)
    }
}

impl std::fmt::Debug for CreateUserDto {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CreateUserDto")
            .field("name", &self.name)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_user_dto_into_user() {
        let dto = CreateUserDto::new("Sherlock", "sherlock@email.com", "sherlocked");
        let user = dto.into_user(3, "$argon2id$hash".to_string());

        assert_eq!(user.id, 3);
        assert_eq!(user.name, "Sherlock");
        assert_eq!(user.email, "sherlock@email.com");
        assert_eq!(user.password, "$argon2id$hash");
    }

    #[test]
    fn test_create_user_dto_debug_hides_password() {
        let dto = CreateUserDto::new("A", "a@b.com", "pw");
        let debug = format!("{dto:?}");

        assert!(debug.contains("a@b.com"));
        assert!(!debug.contains("pw\""));
    }
}
