//! Task-related entity definitions.

use serde::{Deserialize, Serialize};

/// A single item on the todo list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Store-assigned identifier, starting at 1.
    pub id: i64,
    /// Task title.
    pub title: String,
}

impl Task {
    /// Creates a task with an already assigned ID.
    pub fn new(id: i64, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
        }
    }
}

/// Payload for creating a task. The ID is assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateTaskDto {
    pub title: String,
}

impl CreateTaskDto {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }

    /// Builds the stored task for the given ID.
    pub fn into_task(self, id: i64) -> Task {
        Task::new(id, self.title)
    }
}

/// Partial update for a task.
///
/// Fields left out of the payload keep their stored value. A title that is
/// empty or only whitespace is treated the same as a missing one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateTaskDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl UpdateTaskDto {
    /// Sets the new title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Returns the title that should replace the stored one, if any.
    pub fn title_patch(&self) -> Option<&str> {
        self.title.as_deref().filter(|title| !title.trim().is_empty())
    }

    /// Applies the update to a task in place.
    pub fn apply_to(&self, task: &mut Task) {
        if let Some(title) = self.title_patch() {
            task.title = title.to_string();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_replaces_title() {
        let mut task = Task::new(1, "Pack clothes");
        UpdateTaskDto::default()
            .with_title("Exercise")
            .apply_to(&mut task);

        assert_eq!(task, Task::new(1, "Exercise"));
    }

    #[test]
    fn test_update_keeps_title_when_absent_or_blank() {
        let mut task = Task::new(1, "Pack clothes");

        UpdateTaskDto::default().apply_to(&mut task);
        assert_eq!(task.title, "Pack clothes");

        UpdateTaskDto::default().with_title("   ").apply_to(&mut task);
        assert_eq!(task.title, "Pack clothes");
    }

    #[test]
    fn test_update_dto_deserializes_empty_object() {
        let dto: UpdateTaskDto = serde_json::from_str("{}").unwrap();
        assert_eq!(dto.title, None);

        let dto: UpdateTaskDto = serde_json::from_str(r#"{"title":"Profit"}"#).unwrap();
        assert_eq!(dto.title_patch(), Some("Profit"));
    }

    #[test]
    fn test_task_json_shape() {
        let json = serde_json::to_value(Task::new(2, "Exercise")).unwrap();
        assert_eq!(json, serde_json::json!({ "id": 2, "title": "Exercise" }));
    }
}
