//! Task domain model.
//!
//! # Responsibility
//! - Define the canonical to-do record held by the task slice.
//! - Normalize and validate titles at the construction boundary.
//!
//! # Invariants
//! - `id` is a v4 UUID, never nil, never reused within one list.
//! - `title` is trimmed and non-empty.
//! - `created_at` is captured once and never changes.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for one task.
pub type TaskId = Uuid;

/// Validation errors for task construction and decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskValidationError {
    /// Title was empty after trimming whitespace.
    EmptyTitle,
    /// Nil UUID is reserved and never identifies a task.
    NilId,
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "task title cannot be empty"),
            Self::NilId => write!(f, "task id cannot be nil"),
        }
    }
}

impl Error for TaskValidationError {}

/// One to-do item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TaskWire")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub done: bool,
    /// Creation time in epoch milliseconds.
    pub created_at: i64,
}

impl Task {
    /// Creates a pending task with a fresh v4 id.
    ///
    /// The title is trimmed first; a blank title is rejected.
    pub fn new(title: &str, created_at: i64) -> Result<Self, TaskValidationError> {
        Self::with_id(Uuid::new_v4(), title, created_at)
    }

    /// Creates a pending task with a caller-provided id.
    pub fn with_id(id: TaskId, title: &str, created_at: i64) -> Result<Self, TaskValidationError> {
        let task = Self {
            id,
            title: normalize_title(title).ok_or(TaskValidationError::EmptyTitle)?,
            done: false,
            created_at,
        };
        task.validate()?;
        Ok(task)
    }

    /// Checks record invariants.
    pub fn validate(&self) -> Result<(), TaskValidationError> {
        if self.id.is_nil() {
            return Err(TaskValidationError::NilId);
        }
        if self.title.trim().is_empty() {
            return Err(TaskValidationError::EmptyTitle);
        }
        Ok(())
    }

    /// Flips the completion flag.
    pub fn toggle(&mut self) {
        self.done = !self.done;
    }
}

/// Trims a raw title, returning `None` when nothing is left.
pub fn normalize_title(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[derive(Deserialize)]
struct TaskWire {
    id: TaskId,
    title: String,
    done: bool,
    created_at: i64,
}

impl TryFrom<TaskWire> for Task {
    type Error = TaskValidationError;

    fn try_from(wire: TaskWire) -> Result<Self, Self::Error> {
        let task = Self {
            id: wire.id,
            title: wire.title,
            done: wire.done,
            created_at: wire.created_at,
        };
        task.validate()?;
        Ok(task)
    }
}

#[cfg(test)]
mod tests {
    use super::{normalize_title, Task, TaskValidationError};
    use uuid::Uuid;

    #[test]
    fn normalize_title_trims_and_rejects_blank() {
        assert_eq!(normalize_title("  milk \n").as_deref(), Some("milk"));
        assert_eq!(normalize_title(" \t "), None);
        assert_eq!(normalize_title(""), None);
    }

    #[test]
    fn with_id_rejects_nil_id() {
        let err = Task::with_id(Uuid::nil(), "x", 0).unwrap_err();
        assert_eq!(err, TaskValidationError::NilId);
    }
}
