//! Pure state transitions for both slices.
//!
//! # Responsibility
//! - Apply one `Action` to the slice that owns it.
//! - Report whether state changed, and why not when it did not.
//!
//! # Invariants
//! - Reducers never panic and never fail; invalid input is `Ignored`.
//! - An `Ignored` transition leaves state byte-for-byte unchanged.
//! - Reducers have no side effects; banner scheduling lives in `store`.

mod tasks;
mod ui;

pub use tasks::reduce_tasks;
pub use ui::reduce_ui;

use crate::action::{Action, Slice};
use crate::model::task::{TaskId, TaskValidationError};
use crate::state::AppState;
use std::fmt::{Display, Formatter};

/// Why a transition left state untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoredReason {
    /// `tasks/add` with a blank title.
    EmptyTitle,
    /// Toggle/remove for an id that is not in the list.
    UnknownTask(TaskId),
    /// Valid request whose result equals the current state.
    Unchanged,
    /// Banner hide whose timer was overtaken by a newer add.
    Superseded,
    /// `tasks/add` rejected by a task invariant other than the title.
    InvalidTask(TaskValidationError),
}

impl Display for IgnoredReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "empty_title"),
            Self::UnknownTask(id) => write!(f, "unknown_task:{id}"),
            Self::Unchanged => write!(f, "unchanged"),
            Self::Superseded => write!(f, "superseded"),
            Self::InvalidTask(err) => write!(f, "invalid_task:{err}"),
        }
    }
}

/// Outcome of applying one action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// A task was appended.
    Created(TaskId),
    /// State changed in place.
    Applied,
    Ignored(IgnoredReason),
}

impl Transition {
    pub fn is_applied(&self) -> bool {
        !matches!(self, Self::Ignored(_))
    }

    pub fn created_id(&self) -> Option<TaskId> {
        match self {
            Self::Created(id) => Some(*id),
            _ => None,
        }
    }
}

/// Routes `action` to its slice reducer.
///
/// `now_epoch_ms` is only read by `tasks/add`.
pub fn reduce(state: &mut AppState, action: &Action, now_epoch_ms: i64) -> Transition {
    match action.slice() {
        Slice::Tasks => reduce_tasks(&mut state.tasks, action, now_epoch_ms),
        Slice::Ui => reduce_ui(&mut state.ui, action),
    }
}

#[cfg(test)]
mod tests {
    use super::{reduce, IgnoredReason, Transition};
    use crate::action::Action;
    use crate::state::AppState;

    #[test]
    fn reduce_routes_each_slice_independently() {
        let mut state = AppState::default();

        let created = reduce(&mut state, &Action::add_task("milk"), 10);
        assert!(created.created_id().is_some());
        assert!(!state.ui.show_added_banner);

        assert_eq!(reduce(&mut state, &Action::ToggleDarkMode, 11), Transition::Applied);
        assert_eq!(state.tasks.len(), 1);
        assert!(state.ui.dark_mode);
    }

    #[test]
    fn ignored_reason_renders_log_token() {
        assert_eq!(IgnoredReason::EmptyTitle.to_string(), "empty_title");
        assert_eq!(IgnoredReason::Unchanged.to_string(), "unchanged");
    }
}
