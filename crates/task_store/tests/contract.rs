//! Behavior every `TaskStore` backend must share.

use entities::{CreateTaskDto, CreateUserDto, Task, UpdateTaskDto};
use sqlx::sqlite::SqlitePoolOptions;
use task_store::{
    init_database, FileTaskStore, MemoryTaskStore, SqliteTaskStore, TaskStore, TaskStoreError,
};
use tempfile::TempDir;

async fn sqlite_store() -> SqliteTaskStore {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    init_database(&pool).await.unwrap();
    SqliteTaskStore::new(pool)
}

fn file_store(dir: &TempDir) -> FileTaskStore {
    FileTaskStore::open(dir.path().join("tasks.json"), dir.path().join("users.json")).unwrap()
}

async fn create_then_get_returns_same_task(store: &impl TaskStore) {
    let created = store
        .create_task(CreateTaskDto::new("Write integration tests"))
        .await
        .unwrap();
    assert_eq!(created.title, "Write integration tests");

    let fetched = store.get_task_by_id(created.id).await.unwrap();
    assert_eq!(fetched, created);

    let tasks = store.get_tasks().await.unwrap();
    assert!(tasks.contains(&created));
}

async fn ids_are_unique_and_increasing(store: &impl TaskStore) {
    let first = store.create_task(CreateTaskDto::new("First")).await.unwrap();
    let second = store.create_task(CreateTaskDto::new("Second")).await.unwrap();

    assert!(first.id >= 1);
    assert!(second.id > first.id);
}

async fn delete_missing_leaves_collection_unchanged(store: &impl TaskStore) {
    store.create_task(CreateTaskDto::new("Keep me")).await.unwrap();
    let before = store.get_tasks().await.unwrap();

    let err = store.delete_task_by_id(9_999).await.unwrap_err();
    assert!(err.is_not_found());

    let after = store.get_tasks().await.unwrap();
    assert_eq!(before, after);
}

async fn update_missing_is_not_found(store: &impl TaskStore) {
    let err = store
        .update_task(9_999, UpdateTaskDto::default().with_title("Nope"))
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

async fn get_missing_is_not_found(store: &impl TaskStore) {
    let err = store.get_task_by_id(9_999).await.unwrap_err();
    assert!(err.is_not_found());

    let err = store.get_user_by_email("nobody@example.com").await.unwrap_err();
    assert!(err.is_not_found());
}

async fn delete_twice(store: &impl TaskStore) {
    let task = store.create_task(CreateTaskDto::new("Once")).await.unwrap();

    store.delete_task_by_id(task.id).await.unwrap();
    let err = store.delete_task_by_id(task.id).await.unwrap_err();
    assert!(err.is_not_found());
}

async fn update_is_a_patch(store: &impl TaskStore) {
    let task = store.create_task(CreateTaskDto::new("Original")).await.unwrap();

    let unchanged = store
        .update_task(task.id, UpdateTaskDto::default())
        .await
        .unwrap();
    assert_eq!(unchanged, task);

    let blank = store
        .update_task(task.id, UpdateTaskDto::default().with_title(""))
        .await
        .unwrap();
    assert_eq!(blank, task);

    let renamed = store
        .update_task(task.id, UpdateTaskDto::default().with_title("Renamed"))
        .await
        .unwrap();
    assert_eq!(renamed, Task::new(task.id, "Renamed"));
    assert_eq!(store.get_task_by_id(task.id).await.unwrap(), renamed);
}

async fn users_hash_passwords_and_validate(store: &impl TaskStore) {
    let user = store
        .create_user(CreateUserDto::new("Sherlock", "sherlock@email.com", "sherlocked"))
        .await
        .unwrap();
    assert_eq!(user.name, "Sherlock");
    assert_eq!(user.email, "sherlock@email.com");
    assert_ne!(user.password, "sherlocked");

    let fetched = store.get_user_by_email("sherlock@email.com").await.unwrap();
    assert_eq!(fetched, user);
    assert!(store.get_users().await.unwrap().contains(&user));

    assert!(
        store
            .validate_user_credentials("sherlock@email.com", "sherlocked")
            .await
    );
    assert!(
        !store
            .validate_user_credentials("sherlock@email.com", "moriarty")
            .await
    );
    assert!(
        !store
            .validate_user_credentials("watson@email.com", "sherlocked")
            .await
    );
}

async fn duplicate_email_is_rejected(store: &impl TaskStore) {
    store
        .create_user(CreateUserDto::new("A", "dup@example.com", "pw"))
        .await
        .unwrap();

    let err = store
        .create_user(CreateUserDto::new("B", "dup@example.com", "pw2"))
        .await
        .unwrap_err();
    assert!(matches!(err, TaskStoreError::AlreadyExists { .. }));
    assert_eq!(store.get_users().await.unwrap().len(), 1);
}

async fn run_contract(store: &impl TaskStore) {
    create_then_get_returns_same_task(store).await;
    ids_are_unique_and_increasing(store).await;
    delete_missing_leaves_collection_unchanged(store).await;
    update_missing_is_not_found(store).await;
    get_missing_is_not_found(store).await;
    delete_twice(store).await;
    update_is_a_patch(store).await;
    users_hash_passwords_and_validate(store).await;
}

#[tokio::test]
async fn test_memory_store_contract() {
    run_contract(&MemoryTaskStore::new()).await;
    duplicate_email_is_rejected(&MemoryTaskStore::new()).await;
}

#[tokio::test]
async fn test_file_store_contract() {
    let dir = TempDir::new().unwrap();
    run_contract(&file_store(&dir)).await;

    let dir = TempDir::new().unwrap();
    duplicate_email_is_rejected(&file_store(&dir)).await;
}

#[tokio::test]
async fn test_sqlite_store_contract() {
    run_contract(&sqlite_store().await).await;
    duplicate_email_is_rejected(&sqlite_store().await).await;
}

#[tokio::test]
async fn test_file_store_round_trip() {
    let dir = TempDir::new().unwrap();
    let titles = ["Buy groceries", "Pack clothes", "Exercise", "Read"];

    let written = {
        let store = file_store(&dir);
        let mut written = Vec::new();
        for title in titles {
            written.push(store.create_task(CreateTaskDto::new(title)).await.unwrap());
        }
        written
    };

    let reopened = file_store(&dir);
    assert_eq!(reopened.get_tasks().await.unwrap(), written);

    let next = reopened.create_task(CreateTaskDto::new("Next")).await.unwrap();
    assert_eq!(next.id, written.len() as i64 + 1);
}
