//! In-memory task store implementation for testing.

use async_trait::async_trait;
use entities::{CreateTaskDto, CreateUserDto, Task, UpdateTaskDto, User};
use tokio::sync::Mutex;

use crate::{TaskStore, TaskStoreError, TaskStoreResult};

/// Number of times each store operation has been invoked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallCounts {
    pub create_task: usize,
    pub get_tasks: usize,
    pub get_task_by_id: usize,
    pub update_task: usize,
    pub delete_task_by_id: usize,
    pub create_user: usize,
    pub get_user_by_email: usize,
    pub get_users: usize,
    pub validate_user_credentials: usize,
}

impl CallCounts {
    /// Total number of calls across all operations.
    pub fn total(&self) -> usize {
        self.create_task
            + self.get_tasks
            + self.get_task_by_id
            + self.update_task
            + self.delete_task_by_id
            + self.create_user
            + self.get_user_by_email
            + self.get_users
            + self.validate_user_credentials
    }
}

#[derive(Debug, Default)]
struct MemoryState {
    tasks: Vec<Task>,
    users: Vec<User>,
    last_task_id: i64,
    last_user_id: i64,
    calls: CallCounts,
}

impl MemoryState {
    fn next_task_id(&mut self) -> i64 {
        self.last_task_id += 1;
        self.last_task_id
    }

    fn next_user_id(&mut self) -> i64 {
        self.last_user_id += 1;
        self.last_user_id
    }
}

/// In-memory task store for testing purposes.
///
/// All state sits behind a single lock. Besides the regular contract it can
/// be seeded with existing records, forced to fail every operation, and
/// queried for how often each operation ran.
#[derive(Debug, Default)]
pub struct MemoryTaskStore {
    state: Mutex<MemoryState>,
    force_error: bool,
}

impl MemoryTaskStore {
    /// Creates a new, empty in-memory task store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store whose operations all fail with a forced error.
    pub fn failing() -> Self {
        Self {
            force_error: true,
            ..Self::default()
        }
    }

    /// Seeds the store with tasks. New IDs continue after the highest seed ID.
    pub fn with_tasks(self, tasks: Vec<Task>) -> Self {
        let mut state = self.state.into_inner();
        state.last_task_id = tasks.iter().map(|t| t.id).max().unwrap_or(0);
        state.tasks = tasks;
        Self {
            state: Mutex::new(state),
            force_error: self.force_error,
        }
    }

    /// Seeds the store with users. Passwords must already be hashed.
    pub fn with_users(self, users: Vec<User>) -> Self {
        let mut state = self.state.into_inner();
        state.last_user_id = users.iter().map(|u| u.id).max().unwrap_or(0);
        state.users = users;
        Self {
            state: Mutex::new(state),
            force_error: self.force_error,
        }
    }

    /// Returns how often each operation has been called so far.
    pub async fn calls(&self) -> CallCounts {
        self.state.lock().await.calls
    }

    fn check_forced_error(&self) -> TaskStoreResult<()> {
        if self.force_error {
            return Err(TaskStoreError::Other("forced error".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl TaskStore for MemoryTaskStore {
    // =========================================================================
    // Task operations
    // =========================================================================

    async fn create_task(&self, dto: CreateTaskDto) -> TaskStoreResult<Task> {
        let mut state = self.state.lock().await;
        state.calls.create_task += 1;
        self.check_forced_error()?;

        let task = dto.into_task(state.next_task_id());
        state.tasks.push(task.clone());
        Ok(task)
    }

    async fn get_tasks(&self) -> TaskStoreResult<Vec<Task>> {
        let mut state = self.state.lock().await;
        state.calls.get_tasks += 1;
        self.check_forced_error()?;

        Ok(state.tasks.clone())
    }

    async fn get_task_by_id(&self, id: i64) -> TaskStoreResult<Task> {
        let mut state = self.state.lock().await;
        state.calls.get_task_by_id += 1;
        self.check_forced_error()?;

        state
            .tasks
            .iter()
            .find(|t| t.id == id)
            .cloned()
            .ok_or_else(|| TaskStoreError::not_found("Task", id))
    }

    async fn update_task(&self, id: i64, dto: UpdateTaskDto) -> TaskStoreResult<Task> {
        let mut state = self.state.lock().await;
        state.calls.update_task += 1;
        self.check_forced_error()?;

        let task = state
            .tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| TaskStoreError::not_found("Task", id))?;
        dto.apply_to(task);
        Ok(task.clone())
    }

    async fn delete_task_by_id(&self, id: i64) -> TaskStoreResult<()> {
        let mut state = self.state.lock().await;
        state.calls.delete_task_by_id += 1;
        self.check_forced_error()?;

        let index = state
            .tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| TaskStoreError::not_found("Task", id))?;
        state.tasks.remove(index);
        Ok(())
    }

    // =========================================================================
    // User operations
    // =========================================================================

    async fn create_user(&self, dto: CreateUserDto) -> TaskStoreResult<User> {
        {
            let mut state = self.state.lock().await;
            state.calls.create_user += 1;
            self.check_forced_error()?;
        }

        let password_hash = auth::hash_password_async(dto.password.clone()).await?;

        let mut state = self.state.lock().await;
        if state.users.iter().any(|u| u.email == dto.email) {
            return Err(TaskStoreError::already_exists("User", &dto.email));
        }
        let user = dto.into_user(state.next_user_id(), password_hash);
        state.users.push(user.clone());
        Ok(user)
    }

    async fn get_user_by_email(&self, email: &str) -> TaskStoreResult<User> {
        let mut state = self.state.lock().await;
        state.calls.get_user_by_email += 1;
        self.check_forced_error()?;

        state
            .users
            .iter()
            .find(|u| u.email == email)
            .cloned()
            .ok_or_else(|| TaskStoreError::not_found("User", email))
    }

    async fn get_users(&self) -> TaskStoreResult<Vec<User>> {
        let mut state = self.state.lock().await;
        state.calls.get_users += 1;
        self.check_forced_error()?;

        Ok(state.users.clone())
    }

    async fn validate_user_credentials(&self, email: &str, password: &str) -> bool {
        let stored_hash = {
            let mut state = self.state.lock().await;
            state.calls.validate_user_credentials += 1;
            if self.force_error {
                return false;
            }
            match state.users.iter().find(|u| u.email == email) {
                Some(user) => user.password.clone(),
                None => {
                    tracing::debug!(email = %email, "Credential check for unknown email");
                    return false;
                }
            }
        };

        auth::verify_password_async(password.to_string(), stored_hash).await
    }
}
