//! Task store trait definitions.

use async_trait::async_trait;
use entities::{CreateTaskDto, CreateUserDto, Task, UpdateTaskDto, User};

use crate::TaskStoreResult;

/// Trait for task and user storage operations.
///
/// Every backend honors the same contract: IDs are assigned by the store,
/// lookups that match nothing fail with [`TaskStoreError::NotFound`], and
/// passwords are hashed before they are persisted.
///
/// [`TaskStoreError::NotFound`]: crate::TaskStoreError::NotFound
#[async_trait]
pub trait TaskStore: Send + Sync {
    // =========================================================================
    // Task operations
    // =========================================================================

    /// Creates a new task with the next free ID.
    async fn create_task(&self, dto: CreateTaskDto) -> TaskStoreResult<Task>;

    /// Lists all tasks.
    async fn get_tasks(&self) -> TaskStoreResult<Vec<Task>>;

    /// Gets a task by ID.
    async fn get_task_by_id(&self, id: i64) -> TaskStoreResult<Task>;

    /// Applies a partial update to a task and returns the stored result.
    async fn update_task(&self, id: i64, dto: UpdateTaskDto) -> TaskStoreResult<Task>;

    /// Deletes a task.
    async fn delete_task_by_id(&self, id: i64) -> TaskStoreResult<()>;

    // =========================================================================
    // User operations
    // =========================================================================

    /// Creates a new user, hashing the supplied password.
    async fn create_user(&self, dto: CreateUserDto) -> TaskStoreResult<User>;

    /// Gets a user by email.
    async fn get_user_by_email(&self, email: &str) -> TaskStoreResult<User>;

    /// Lists all users.
    async fn get_users(&self) -> TaskStoreResult<Vec<User>>;

    /// Returns true if the email belongs to a user whose password matches.
    ///
    /// Unknown emails, wrong passwords and storage failures all yield false.
    async fn validate_user_credentials(&self, email: &str, password: &str) -> bool;
}
