use sqlx::{FromRow, SqlitePool};

use entities::{Task, User};

use crate::TaskStoreResult;

/// Table definitions. Safe to run against an existing database.
pub const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    email TEXT NOT NULL UNIQUE,
    password TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS tasks (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL
);
"#;

/// Title of the task inserted into an empty database.
pub const DEFAULT_TASK_TITLE: &str = "This is the first task";

/// Database row for Task
#[derive(Debug, FromRow)]
pub struct TaskRow {
    pub id: i64,
    pub title: String,
}

impl From<TaskRow> for Task {
    fn from(row: TaskRow) -> Self {
        Task::new(row.id, row.title)
    }
}

/// Database row for User
#[derive(Debug, FromRow)]
pub struct UserRow {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub password: String,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User::new(row.id, row.name, row.email, row.password)
    }
}

/// Administrator account created when the users table is empty.
#[derive(Clone)]
pub struct SeedUser {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for SeedUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeedUser")
            .field("name", &self.name)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// Creates the tables if they do not exist yet.
pub async fn init_database(pool: &SqlitePool) -> TaskStoreResult<()> {
    sqlx::raw_sql(SCHEMA_SQL).execute(pool).await?;
    Ok(())
}

/// Inserts default rows into empty tables.
///
/// The default task is only inserted when `tasks` has no rows, and the admin
/// user (if given) only when `users` has no rows, so running this against a
/// populated database is a no-op.
pub async fn seed_database(pool: &SqlitePool, admin: Option<&SeedUser>) -> TaskStoreResult<()> {
    if let Some(admin) = admin {
        let password_hash = auth::hash_password_async(admin.password.clone()).await?;
        let result = sqlx::query(
            "INSERT INTO users (name, email, password) SELECT ?, ?, ? WHERE NOT EXISTS \
             (SELECT 1 FROM users)",
        )
        .bind(&admin.name)
        .bind(&admin.email)
        .bind(&password_hash)
        .execute(pool)
        .await?;

        if result.rows_affected() > 0 {
            tracing::info!(email = %admin.email, "Seeded admin user");
        }
    }

    let result = sqlx::query(
        "INSERT INTO tasks (title) SELECT ? WHERE NOT EXISTS (SELECT 1 FROM tasks)",
    )
    .bind(DEFAULT_TASK_TITLE)
    .execute(pool)
    .await?;

    if result.rows_affected() > 0 {
        tracing::info!("Seeded default task");
    }

    Ok(())
}
