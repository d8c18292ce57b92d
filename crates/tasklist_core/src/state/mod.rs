//! Application state container shape.
//!
//! # Responsibility
//! - Hold the two independent slices read by the view layer.
//! - Offer read helpers over the ordered task collection.
//!
//! # Invariants
//! - `TaskList::items` keeps creation order.
//! - Task ids are unique within `TaskList::items`.

use crate::model::task::{Task, TaskId};
use crate::model::ui::UiFlags;
use serde::{Deserialize, Serialize};

/// Ordered task collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskList {
    pub items: Vec<Task>,
}

impl TaskList {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.items.iter().find(|task| task.id == id)
    }

    pub fn completed_count(&self) -> usize {
        self.items.iter().filter(|task| task.done).count()
    }

    pub fn pending_count(&self) -> usize {
        self.len() - self.completed_count()
    }
}

/// Snapshot of the whole app state.
///
/// Views receive clones of this value; the store owns the authoritative copy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppState {
    pub tasks: TaskList,
    pub ui: UiFlags,
}

impl AppState {
    pub fn new(ui: UiFlags) -> Self {
        Self {
            tasks: TaskList::default(),
            ui,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::TaskList;
    use crate::model::task::Task;

    #[test]
    fn counts_split_by_done_flag() {
        let mut done = Task::new("a", 1).unwrap();
        done.toggle();
        let list = TaskList {
            items: vec![done, Task::new("b", 2).unwrap(), Task::new("c", 3).unwrap()],
        };

        assert_eq!(list.len(), 3);
        assert_eq!(list.completed_count(), 1);
        assert_eq!(list.pending_count(), 2);
    }
}
