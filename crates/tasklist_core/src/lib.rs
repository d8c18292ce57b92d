//! Core state container for the task list app.
//! This crate is the single source of truth for task and UI-flag invariants.

pub mod action;
pub mod banner;
pub mod clock;
pub mod config;
pub mod logging;
pub mod model;
pub mod reducer;
pub mod state;
pub mod store;

pub use action::{Action, ActionDecodeError, Slice};
pub use banner::{BannerTimer, ManualScheduler, Scheduler, ThreadScheduler};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{BannerPolicy, ConfigError, StoreConfig, DEFAULT_BANNER_DELAY};
pub use logging::{default_log_level, init_logging, logging_status, LogLevel};
pub use model::task::{Task, TaskId, TaskValidationError};
pub use model::ui::UiFlags;
pub use reducer::{IgnoredReason, Transition};
pub use state::{AppState, TaskList};
pub use store::{Store, StoreEnvironment, Subscription};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
