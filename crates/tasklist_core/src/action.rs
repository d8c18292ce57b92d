//! Action vocabulary accepted by the dispatcher.
//!
//! # Responsibility
//! - Name every user-level state transition.
//! - Define the `{ "type": ..., "payload": ... }` wire form used by views.
//!
//! # Invariants
//! - Wire type names are stable; renaming one is a breaking change for views.

use crate::model::task::TaskId;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// State slice that owns an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slice {
    Tasks,
    Ui,
}

/// Named transition request, optionally carrying a payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum Action {
    #[serde(rename = "tasks/add")]
    AddTask { title: String },
    #[serde(rename = "tasks/toggle")]
    ToggleTask { id: TaskId },
    #[serde(rename = "tasks/remove")]
    RemoveTask { id: TaskId },
    #[serde(rename = "tasks/clear")]
    ClearAll,
    #[serde(rename = "ui/toggle_dark_mode")]
    ToggleDarkMode,
    #[serde(rename = "ui/dismiss_info_banner")]
    DismissInfoBanner,
    #[serde(rename = "ui/show_added_banner")]
    ShowAddedBanner,
    #[serde(rename = "ui/hide_added_banner")]
    HideAddedBanner,
}

impl Action {
    pub fn add_task(title: impl Into<String>) -> Self {
        Self::AddTask {
            title: title.into(),
        }
    }

    /// Wire type name, also used as the `action=` field in log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::AddTask { .. } => "tasks/add",
            Self::ToggleTask { .. } => "tasks/toggle",
            Self::RemoveTask { .. } => "tasks/remove",
            Self::ClearAll => "tasks/clear",
            Self::ToggleDarkMode => "ui/toggle_dark_mode",
            Self::DismissInfoBanner => "ui/dismiss_info_banner",
            Self::ShowAddedBanner => "ui/show_added_banner",
            Self::HideAddedBanner => "ui/hide_added_banner",
        }
    }

    pub fn slice(&self) -> Slice {
        match self {
            Self::AddTask { .. } | Self::ToggleTask { .. } | Self::RemoveTask { .. } | Self::ClearAll => {
                Slice::Tasks
            }
            Self::ToggleDarkMode
            | Self::DismissInfoBanner
            | Self::ShowAddedBanner
            | Self::HideAddedBanner => Slice::Ui,
        }
    }

    /// Decodes one action from its JSON wire form.
    ///
    /// # Errors
    /// - Returns `ActionDecodeError::Malformed` for invalid JSON, unknown
    ///   type names, or payloads that do not match the type.
    pub fn from_json(raw: &str) -> Result<Self, ActionDecodeError> {
        serde_json::from_str(raw).map_err(ActionDecodeError::Malformed)
    }

    /// Encodes this action into its JSON wire form.
    pub fn to_json(&self) -> Result<String, ActionDecodeError> {
        serde_json::to_string(self).map_err(ActionDecodeError::Malformed)
    }
}

/// Error for action wire encoding/decoding.
#[derive(Debug)]
pub enum ActionDecodeError {
    Malformed(serde_json::Error),
}

impl Display for ActionDecodeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Malformed(err) => write!(f, "malformed action: {err}"),
        }
    }
}

impl Error for ActionDecodeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Malformed(err) => Some(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Action, Slice};

    #[test]
    fn kind_matches_wire_type() {
        let actions = [
            Action::add_task("x"),
            Action::ClearAll,
            Action::ToggleDarkMode,
            Action::HideAddedBanner,
        ];
        for action in actions {
            let json = serde_json::to_value(&action).unwrap();
            assert_eq!(json["type"], action.kind());
        }
    }

    #[test]
    fn slice_routes_by_prefix() {
        assert_eq!(Action::ClearAll.slice(), Slice::Tasks);
        assert_eq!(Action::DismissInfoBanner.slice(), Slice::Ui);
    }
}
