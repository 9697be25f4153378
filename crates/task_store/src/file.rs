//! JSON file-backed task store.
//!
//! Tasks and users each live in their own file as a single JSON array:
//!
//! ```json
//! [{"id":1,"title":"Pack clothes"},{"id":2,"title":"Exercise"}]
//! ```
//!
//! Every read decodes the whole file and every write re-encodes the whole
//! collection over the previous contents.

use std::{
    fs::{File, OpenOptions},
    io::{BufReader, Seek, SeekFrom, Write},
    path::Path,
    sync::Arc,
};

use async_trait::async_trait;
use entities::{CreateTaskDto, CreateUserDto, Task, UpdateTaskDto, User};
use serde::{de::DeserializeOwned, Serialize};
use tokio::sync::Mutex;

use crate::{TaskStore, TaskStoreError, TaskStoreResult};

/// A file handle that always reads from the start and always overwrites.
///
/// Reads and writes run on the blocking thread pool.
#[derive(Debug)]
struct Tape {
    file: Arc<File>,
}

impl Tape {
    /// Wraps a file, writing an empty array into it if it has no content.
    fn new(mut file: File) -> TaskStoreResult<Self> {
        file.seek(SeekFrom::Start(0))?;
        if file.metadata()?.len() == 0 {
            file.write_all(b"[]")?;
            file.flush()?;
        }
        Ok(Self {
            file: Arc::new(file),
        })
    }

    async fn read<T>(&self) -> TaskStoreResult<Vec<T>>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let file = Arc::clone(&self.file);
        tokio::task::spawn_blocking(move || decode_from_start(&file)).await?
    }

    /// Replaces the file contents with `items`.
    ///
    /// The collection is encoded before the file is touched, so only an I/O
    /// failure can leave partial contents behind.
    async fn write<T: Serialize>(&self, items: &[T]) -> TaskStoreResult<()> {
        let bytes = serde_json::to_vec(items)?;
        let file = Arc::clone(&self.file);

        let result = tokio::task::spawn_blocking(move || overwrite(&file, &bytes)).await?;
        if let Err(e) = &result {
            tracing::error!(error = %e, "Rewriting store file failed, contents may be truncated");
        }
        Ok(result?)
    }
}

fn decode_from_start<T: DeserializeOwned>(mut file: &File) -> TaskStoreResult<Vec<T>> {
    file.seek(SeekFrom::Start(0))?;
    Ok(serde_json::from_reader(BufReader::new(file))?)
}

fn overwrite(mut file: &File, bytes: &[u8]) -> std::io::Result<()> {
    file.set_len(0)?;
    file.seek(SeekFrom::Start(0))?;
    file.write_all(bytes)?;
    file.flush()
}

#[derive(Debug)]
struct FileState {
    tasks: Tape,
    users: Tape,
    last_task_id: i64,
    last_user_id: i64,
}

impl FileState {
    fn next_task_id(&mut self) -> i64 {
        self.last_task_id += 1;
        self.last_task_id
    }

    fn next_user_id(&mut self) -> i64 {
        self.last_user_id += 1;
        self.last_user_id
    }
}

/// Task store persisting tasks and users to two JSON files.
///
/// ID counters resume from the highest ID found in each file when the store
/// is opened. One lock guards both files.
#[derive(Debug)]
pub struct FileTaskStore {
    state: Mutex<FileState>,
}

impl FileTaskStore {
    /// Opens (creating if needed) the task and user files at the given paths.
    pub fn open(
        tasks_path: impl AsRef<Path>,
        users_path: impl AsRef<Path>,
    ) -> TaskStoreResult<Self> {
        let tasks_path = tasks_path.as_ref();
        let users_path = users_path.as_ref();

        for path in [tasks_path, users_path] {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }
        }

        let store = Self::from_files(open_rw(tasks_path)?, open_rw(users_path)?)?;
        tracing::info!(
            tasks_path = %tasks_path.display(),
            users_path = %users_path.display(),
            "Opened file task store"
        );
        Ok(store)
    }

    /// Builds a store from already opened read/write file handles.
    pub fn from_files(tasks_file: File, users_file: File) -> TaskStoreResult<Self> {
        let tasks = Tape::new(tasks_file)?;
        let users = Tape::new(users_file)?;

        let last_task_id = decode_from_start::<Task>(&tasks.file)?
            .iter()
            .map(|t| t.id)
            .max()
            .unwrap_or(0);
        let last_user_id = decode_from_start::<User>(&users.file)?
            .iter()
            .map(|u| u.id)
            .max()
            .unwrap_or(0);

        Ok(Self {
            state: Mutex::new(FileState {
                tasks,
                users,
                last_task_id,
                last_user_id,
            }),
        })
    }
}

fn open_rw(path: &Path) -> TaskStoreResult<File> {
    let file = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(path)?;
    Ok(file)
}

#[async_trait]
impl TaskStore for FileTaskStore {
    async fn create_task(&self, dto: CreateTaskDto) -> TaskStoreResult<Task> {
        let mut state = self.state.lock().await;
        let mut tasks: Vec<Task> = state.tasks.read().await?;

        let task = dto.into_task(state.next_task_id());
        tasks.push(task.clone());
        state.tasks.write(&tasks).await?;

        tracing::debug!(task_id = task.id, "Task written to file");
        Ok(task)
    }

    async fn get_tasks(&self) -> TaskStoreResult<Vec<Task>> {
        let state = self.state.lock().await;
        state.tasks.read().await
    }

    async fn get_task_by_id(&self, id: i64) -> TaskStoreResult<Task> {
        let state = self.state.lock().await;
        let tasks: Vec<Task> = state.tasks.read().await?;

        tasks
            .into_iter()
            .find(|t| t.id == id)
            .ok_or_else(|| TaskStoreError::not_found("Task", id))
    }

    async fn update_task(&self, id: i64, dto: UpdateTaskDto) -> TaskStoreResult<Task> {
        let state = self.state.lock().await;
        let mut tasks: Vec<Task> = state.tasks.read().await?;

        let task = tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| TaskStoreError::not_found("Task", id))?;
        dto.apply_to(task);
        let updated = task.clone();

        state.tasks.write(&tasks).await?;
        Ok(updated)
    }

    async fn delete_task_by_id(&self, id: i64) -> TaskStoreResult<()> {
        let state = self.state.lock().await;
        let mut tasks: Vec<Task> = state.tasks.read().await?;

        let index = tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| TaskStoreError::not_found("Task", id))?;
        tasks.remove(index);

        state.tasks.write(&tasks).await
    }

    async fn create_user(&self, dto: CreateUserDto) -> TaskStoreResult<User> {
        let password_hash = auth::hash_password_async(dto.password.clone()).await?;

        let mut state = self.state.lock().await;
        let mut users: Vec<User> = state.users.read().await?;
        if users.iter().any(|u| u.email == dto.email) {
            return Err(TaskStoreError::already_exists("User", &dto.email));
        }

        let user = dto.into_user(state.next_user_id(), password_hash);
        users.push(user.clone());
        state.users.write(&users).await?;

        tracing::debug!(user_id = user.id, "User written to file");
        Ok(user)
    }

    async fn get_user_by_email(&self, email: &str) -> TaskStoreResult<User> {
        let state = self.state.lock().await;
        let users: Vec<User> = state.users.read().await?;

        users
            .into_iter()
            .find(|u| u.email == email)
            .ok_or_else(|| TaskStoreError::not_found("User", email))
    }

    async fn get_users(&self) -> TaskStoreResult<Vec<User>> {
        let state = self.state.lock().await;
        state.users.read().await
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
