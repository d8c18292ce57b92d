//! Domain model for the task list and UI flag slices.
//!
//! # Responsibility
//! - Define the records owned by the store.
//! - Keep record-level invariants next to the records themselves.
//!
//! # Invariants
//! - Every task is identified by a stable, non-nil `TaskId`.
//! - Only `Task::done` changes after creation.

pub mod task;
pub mod ui;
