use super::{IgnoredReason, Transition};
use crate::action::Action;
use crate::model::task::{Task, TaskValidationError};
use crate::state::TaskList;

/// Applies a task-slice action. UI actions are `Unchanged`.
pub fn reduce_tasks(list: &mut TaskList, action: &Action, now_epoch_ms: i64) -> Transition {
    match action {
        Action::AddTask { title } => match Task::new(title, now_epoch_ms) {
            Ok(task) => {
                let id = task.id;
                list.items.push(task);
                Transition::Created(id)
            }
            Err(err) => rejected(err),
        },
        Action::ToggleTask { id } => match list.items.iter_mut().find(|task| task.id == *id) {
            Some(task) => {
                task.toggle();
                Transition::Applied
            }
            None => Transition::Ignored(IgnoredReason::UnknownTask(*id)),
        },
        Action::RemoveTask { id } => match list.items.iter().position(|task| task.id == *id) {
            Some(index) => {
                // `remove` shifts the tail, keeping creation order.
                list.items.remove(index);
                Transition::Applied
            }
            None => Transition::Ignored(IgnoredReason::UnknownTask(*id)),
        },
        Action::ClearAll => {
            if list.is_empty() {
                return Transition::Ignored(IgnoredReason::Unchanged);
            }
            list.items.clear();
            Transition::Applied
        }
        _ => Transition::Ignored(IgnoredReason::Unchanged),
    }
}

fn rejected(err: TaskValidationError) -> Transition {
    match err {
        TaskValidationError::EmptyTitle => Transition::Ignored(IgnoredReason::EmptyTitle),
        other => Transition::Ignored(IgnoredReason::InvalidTask(other)),
    }
}
