//! Todo list server binary.

use std::net::SocketAddr;

use task_store::{
    FileTaskStore, MemoryTaskStore, SqliteTaskStore, TaskStore, init_database, seed_database,
};
use todo_server::{
    config::{Config, StorageBackend},
    create_app, create_state, init_tracing,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env if present
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;

    init_tracing(&config.log_level);

    tracing::info!(storage = config.storage.as_str(), "Starting todo server");

    match config.storage {
        StorageBackend::Memory => serve(config, MemoryTaskStore::new()).await,
        StorageBackend::File => {
            let store = FileTaskStore::open(&config.tasks_file, &config.users_file)?;
            serve(config, store).await
        }
        StorageBackend::Sqlite => {
            if let Some(parent) = sqlite_parent_dir(&config.database_url) {
                std::fs::create_dir_all(parent)?;
            }

            let store = SqliteTaskStore::connect(&config.database_url).await?;
            init_database(store.pool()).await?;
            if config.seed_database {
                seed_database(store.pool(), config.seed_admin.as_ref()).await?;
            }
            serve(config, store).await
        }
    }
}

async fn serve<S: TaskStore + 'static>(config: Config, store: S) -> anyhow::Result<()> {
    let addr: SocketAddr = config.server_addr().parse()?;

    let state = create_state(&config, store)?;
    let app = create_app(state);

    tracing::info!(addr = %addr, "Server listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Returns the directory of a file-based SQLite URL, if it has one.
fn sqlite_parent_dir(database_url: &str) -> Option<&std::path::Path> {
    let path = database_url.strip_prefix("sqlite:")?;
    let path = path.split('?').next()?.trim_start_matches("//");
    if path.is_empty() || path == ":memory:" {
        return None;
    }

    std::path::Path::new(path)
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;

    #[test]
    fn test_sqlite_parent_dir() {
        assert_eq!(
            sqlite_parent_dir("sqlite:./data/data.db?mode=rwc"),
            Some(Path::new("./data"))
        );
        assert_eq!(
            sqlite_parent_dir("sqlite://./data/x.db?mode=rwc"),
            Some(Path::new("./data"))
        );
        assert_eq!(
            sqlite_parent_dir("sqlite:///var/lib/todo/x.db"),
            Some(Path::new("/var/lib/todo"))
        );
    }

    #[test]
    fn test_sqlite_parent_dir_without_directory() {
        assert_eq!(sqlite_parent_dir("sqlite::memory:"), None);
        assert_eq!(sqlite_parent_dir("sqlite:data.db"), None);
        assert_eq!(sqlite_parent_dir("sqlite:"), None);
        assert_eq!(sqlite_parent_dir("postgres://localhost/todo"), None);
    }
}
