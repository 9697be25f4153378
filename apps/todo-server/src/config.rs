//! Server configuration.

use std::{env, path::PathBuf, str::FromStr};

use task_store::SeedUser;

/// Which storage backend the server runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    /// Volatile in-process store.
    Memory,
    /// Two JSON files on disk.
    File,
    /// SQLite database.
    Sqlite,
}

impl StorageBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Memory => "memory",
            Self::File => "file",
            Self::Sqlite => "sqlite",
        }
    }
}

impl FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "file" => Ok(Self::File),
            "sqlite" => Ok(Self::Sqlite),
            other => anyhow::bail!("unknown storage backend: {other}"),
        }
    }
}

/// Server configuration loaded from environment variables.
#[derive(Clone)]
pub struct Config {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Selected storage backend.
    pub storage: StorageBackend,
    /// SQLite database URL.
    pub database_url: String,
    /// Task file for the file backend.
    pub tasks_file: PathBuf,
    /// User file for the file backend.
    pub users_file: PathBuf,
    /// Whether to seed empty SQLite tables at startup.
    pub seed_database: bool,
    /// Admin account to seed, if configured.
    pub seed_admin: Option<SeedUser>,
    /// JWT signing secret.
    pub jwt_secret: String,
    /// JWT expiration in hours.
    pub jwt_expiration_hours: u64,
    /// Log level.
    pub log_level: String,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("storage", &self.storage)
            .field("database_url", &self.database_url)
            .field("tasks_file", &self.tasks_file)
            .field("users_file", &self.users_file)
            .field("seed_database", &self.seed_database)
            .field("seed_admin", &self.seed_admin)
            .field("jwt_expiration_hours", &self.jwt_expiration_hours)
            .field("log_level", &self.log_level)
            .finish_non_exhaustive()
    }
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Builds configuration from a variable lookup function.
    pub fn from_vars<F>(var: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let jwt_secret = var("TODO_JWT_SECRET")
            .filter(|secret| !secret.is_empty())
            .ok_or_else(|| anyhow::anyhow!("TODO_JWT_SECRET is required"))?;

        let storage = match var("TODO_STORAGE") {
            Some(value) => value.parse()?,
            None => StorageBackend::Sqlite,
        };

        let port = match var("TODO_SERVER_PORT") {
            Some(value) => value
                .parse()
                .map_err(|_| anyhow::anyhow!("TODO_SERVER_PORT is not a valid port: {value}"))?,
            None => 8080,
        };

        let seed_admin = match (var("TODO_ADMIN_EMAIL"), var("TODO_ADMIN_PASSWORD")) {
            (Some(email), Some(password)) => Some(SeedUser {
                name: var("TODO_ADMIN_NAME").unwrap_or_else(|| "Admin".to_string()),
                email,
                password,
            }),
            _ => None,
        };

        Ok(Self {
            host: var("TODO_SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            storage,
            database_url: var("DATABASE_URL")
                .unwrap_or_else(|| "sqlite:./data/data.db?mode=rwc".to_string()),
            tasks_file: var("TODO_TASKS_FILE")
                .unwrap_or_else(|| "./data/tasks.json".to_string())
                .into(),
            users_file: var("TODO_USERS_FILE")
                .unwrap_or_else(|| "./data/users.json".to_string())
                .into(),
            seed_database: var("TODO_SEED_DATABASE")
                .map(|v| v.to_lowercase() == "true" || v == "1")
                .unwrap_or(true),
            seed_admin,
            jwt_secret,
            jwt_expiration_hours: var("TODO_JWT_EXPIRATION_HOURS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(auth::DEFAULT_JWT_EXPIRATION_HOURS),
            log_level: var("TODO_LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
        })
    }

    /// Returns the server address.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> anyhow::Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_vars(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[("TODO_JWT_SECRET", "secret")]).unwrap();

        assert_eq!(config.server_addr(), "0.0.0.0:8080");
        assert_eq!(config.storage, StorageBackend::Sqlite);
        assert_eq!(config.jwt_expiration_hours, 24);
        assert!(config.seed_database);
        assert!(config.seed_admin.is_none());
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_jwt_secret_is_required() {
        assert!(config_from(&[]).is_err());
        assert!(config_from(&[("TODO_JWT_SECRET", "")]).is_err());
    }

    #[test]
    fn test_storage_selection() {
        let config = config_from(&[("TODO_JWT_SECRET", "s"), ("TODO_STORAGE", "File")]).unwrap();
        assert_eq!(config.storage, StorageBackend::File);

        assert!(config_from(&[("TODO_JWT_SECRET", "s"), ("TODO_STORAGE", "postgres")]).is_err());
    }

    #[test]
    fn test_seed_admin_needs_email_and_password() {
        let config =
            config_from(&[("TODO_JWT_SECRET", "s"), ("TODO_ADMIN_EMAIL", "admin@example.com")])
                .unwrap();
        assert!(config.seed_admin.is_none());

        let config = config_from(&[
            ("TODO_JWT_SECRET", "s"),
            ("TODO_ADMIN_EMAIL", "admin@example.com"),
            ("TODO_ADMIN_PASSWORD", "Caput Draconis"),
        ])
        .unwrap();
        let admin = config.seed_admin.unwrap();
        assert_eq!(admin.name, "Admin");
        assert_eq!(admin.email, "admin@example.com");
    }

    #[test]
    fn test_debug_hides_secrets() {
        let config = config_from(&[("TODO_JWT_SECRET", "super-secret-value")]).unwrap();
        assert!(!format!("{config:?}").contains("super-secret-value"));
    }
}
