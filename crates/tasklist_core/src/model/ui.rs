//! UI flag slice.
//!
//! # Invariants
//! - `show_info_banner` only ever moves from `true` to `false`.

use serde::{Deserialize, Serialize};

/// Theme and banner visibility flags rendered by the view layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiFlags {
    pub dark_mode: bool,
    pub show_info_banner: bool,
    pub show_added_banner: bool,
}

impl UiFlags {
    /// Initial flags with the given theme.
    pub fn with_dark_mode(dark_mode: bool) -> Self {
        Self {
            dark_mode,
            ..Self::default()
        }
    }
}

impl Default for UiFlags {
    fn default() -> Self {
        Self {
            dark_mode: false,
            show_info_banner: true,
            show_added_banner: false,
        }
    }
}
