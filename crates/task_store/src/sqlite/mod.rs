//! SQLite-backed task store.

mod schema;

use async_trait::async_trait;
use entities::{CreateTaskDto, CreateUserDto, Task, UpdateTaskDto, User};
pub use schema::*;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};

use crate::{TaskStore, TaskStoreError, TaskStoreResult};

/// Task store backed by the `tasks` and `users` tables of a SQLite database.
///
/// The tables are the only source of truth; nothing is cached. The store
/// does not create tables itself, see [`init_database`].
#[derive(Debug, Clone)]
pub struct SqliteTaskStore {
    pool: SqlitePool,
}

impl SqliteTaskStore {
    /// Creates a store on top of an existing connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connects to the database at `database_url`.
    pub async fn connect(database_url: &str) -> TaskStoreResult<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;

        Ok(Self::new(pool))
    }

    /// Returns a reference to the connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn fetch_task(&self, id: i64) -> TaskStoreResult<Task> {
        sqlx::query_as::<_, TaskRow>("SELECT id, title FROM tasks WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(Task::from)
            .ok_or_else(|| TaskStoreError::not_found("Task", id))
    }
}

fn map_unique_violation(err: sqlx::Error, email: &str) -> TaskStoreError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            TaskStoreError::already_exists("User", email)
        }
        _ => TaskStoreError::Database(err),
    }
}

#[async_trait]
impl TaskStore for SqliteTaskStore {
    async fn create_task(&self, dto: CreateTaskDto) -> TaskStoreResult<Task> {
        let result = sqlx::query("INSERT INTO tasks (title) VALUES (?)")
            .bind(&dto.title)
            .execute(&self.pool)
            .await?;

        let task = dto.into_task(result.last_insert_rowid());
        tracing::debug!(task_id = task.id, "Task inserted");
        Ok(task)
    }

    async fn get_tasks(&self) -> TaskStoreResult<Vec<Task>> {
        let rows = sqlx::query_as::<_, TaskRow>("SELECT id, title FROM tasks ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Task::from).collect())
    }

    async fn get_task_by_id(&self, id: i64) -> TaskStoreResult<Task> {
        self.fetch_task(id).await
    }

    async fn update_task(&self, id: i64, dto: UpdateTaskDto) -> TaskStoreResult<Task> {
        let result = sqlx::query("UPDATE tasks SET title = COALESCE(?, title) WHERE id = ?")
            .bind(dto.title_patch())
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(TaskStoreError::not_found("Task", id));
        }

        // Read back so the caller gets the stored row, not an echo of the input.
        self.fetch_task(id).await
    }

    async fn delete_task_by_id(&self, id: i64) -> TaskStoreResult<()> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(TaskStoreError::not_found("Task", id));
        }

        Ok(())
    }

    async fn create_user(&self, dto: CreateUserDto) -> TaskStoreResult<User> {
        let password_hash = auth::hash_password_async(dto.password.clone()).await?;

        let result = sqlx::query("INSERT INTO users (name, email, password) VALUES (?, ?, ?)")
            .bind(&dto.name)
            .bind(&dto.email)
            .bind(&password_hash)
            .execute(&self.pool)
            .await
            .map_err(|e| map_unique_violation(e, &dto.email))?;

        let user = dto.into_user(result.last_insert_rowid(), password_hash);
        tracing::debug!(user_id = user.id, "User inserted");
        Ok(user)
    }

    async fn get_user_by_email(&self, email: &str) -> TaskStoreResult<User> {
        sqlx::query_as::<_, UserRow>(
            "SELECT id, name, email, password FROM users WHERE email = ?",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?
        .map(User::from)
        .ok_or_else(|| TaskStoreError::not_found("User", email))
    }

    async fn get_users(&self) -> TaskStoreResult<Vec<User>> {
        let rows =
            sqlx::query_as::<_, UserRow>("SELECT id, name, email, password FROM users ORDER BY id")
                .fetch_all(&self.pool)
                .await?;

        Ok(rows.into_iter().map(User::from).collect())
    }

    async fn validate_user_credentials(&self, email: &str, password: &str) -> bool {
        match self.get_user_by_email(email).await {
            Ok(user) => auth::verify_password_async(password.to_string(), user.password).await,
            Err(e) => {
                tracing::debug!(error = %e, "Credential lookup failed");
                false
            }
        }
    }
}
