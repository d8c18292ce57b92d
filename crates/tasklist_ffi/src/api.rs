//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose the process store's actions and snapshots to Dart via FRB.
//! - Flatten core types into plain string/bool/int envelopes.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - One store per process; every call observes the same state.
//! - Ignored actions are reported with `ok = true, applied = false`;
//!   `ok = false` is reserved for malformed input from the caller.

use log::{debug, warn};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, OnceLock, PoisonError};
use tasklist_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    Action, AppState, Store, StoreConfig, Subscription, Task, TaskId, Transition,
};

static APP_STORE: OnceLock<Store> = OnceLock::new();
#[cfg_attr(not(feature = "codegen"), allow(dead_code))]
static WATCHERS: OnceLock<Mutex<BTreeMap<u64, Subscription>>> = OnceLock::new();
#[cfg_attr(not(feature = "codegen"), allow(dead_code))]
static NEXT_WATCHER_ID: AtomicU64 = AtomicU64::new(0);

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir`.
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// One task row as rendered by the list view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskView {
    /// Stable task ID in string form.
    pub id: String,
    pub title: String,
    pub done: bool,
    /// Creation time in epoch milliseconds.
    pub created_at: i64,
}

/// Full state snapshot for one render pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppSnapshotView {
    /// Tasks in creation order.
    pub tasks: Vec<TaskView>,
    pub dark_mode: bool,
    pub show_info_banner: bool,
    pub show_added_banner: bool,
    /// Changes whenever any field above changes; views may skip re-render
    /// when it matches the last rendered value.
    pub revision: u64,
}

/// Result envelope for one dispatched action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResponse {
    /// False only when the request itself was malformed.
    pub ok: bool,
    /// Whether state changed.
    pub applied: bool,
    /// Created task ID for a successful add.
    pub task_id: Option<String>,
    /// Short machine-readable outcome (`applied`, `created`, `ignored:<reason>`)
    /// or an error message when `ok` is false.
    pub message: String,
}

impl ActionResponse {
    fn from_transition(transition: Transition) -> Self {
        match transition {
            Transition::Created(id) => Self {
                ok: true,
                applied: true,
                task_id: Some(id.to_string()),
                message: "created".to_string(),
            },
            Transition::Applied => Self {
                ok: true,
                applied: true,
                task_id: None,
                message: "applied".to_string(),
            },
            Transition::Ignored(reason) => Self {
                ok: true,
                applied: false,
                task_id: None,
                message: format!("ignored:{reason}"),
            },
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            applied: false,
            task_id: None,
            message: message.into(),
        }
    }
}

/// Returns the current state for rendering.
///
/// # FFI contract
/// - Sync call, in-memory only.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn app_snapshot() -> AppSnapshotView {
    let (state, revision) = app_store().snapshot_with_revision();
    to_snapshot_view(state, revision)
}

/// Adds a task; blank titles are ignored.
///
/// # FFI contract
/// - Sync call. Shows the "added" banner and schedules its hide on success.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn add_task(title: String) -> ActionResponse {
    dispatch(Action::AddTask { title })
}

/// Flips the done flag of one task; unknown IDs are ignored.
///
/// # FFI contract
/// - Returns `ok = false` when `task_id` is not a UUID.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn toggle_task(task_id: String) -> ActionResponse {
    match parse_task_id(&task_id) {
        Ok(id) => dispatch(Action::ToggleTask { id }),
        Err(response) => response,
    }
}

/// Removes one task; unknown IDs are ignored.
///
/// # FFI contract
/// - Returns `ok = false` when `task_id` is not a UUID.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn remove_task(task_id: String) -> ActionResponse {
    match parse_task_id(&task_id) {
        Ok(id) => dispatch(Action::RemoveTask { id }),
        Err(response) => response,
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn clear_tasks() -> ActionResponse {
    dispatch(Action::ClearAll)
}

#[flutter_rust_bridge::frb(sync)]
pub fn toggle_dark_mode() -> ActionResponse {
    dispatch(Action::ToggleDarkMode)
}

#[flutter_rust_bridge::frb(sync)]
pub fn dismiss_info_banner() -> ActionResponse {
    dispatch(Action::DismissInfoBanner)
}

/// Dispatches one action given in `{ "type": ..., "payload": ... }` form.
///
/// # FFI contract
/// - Returns `ok = false` with the decode error for malformed input.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn dispatch_json(action_json: String) -> ActionResponse {
    match Action::from_json(action_json.as_str()) {
        Ok(action) => dispatch(action),
        Err(err) => ActionResponse::failure(format!("dispatch_json failed: {err}")),
    }
}

/// Destination for pushed snapshots.
///
/// `push` returns `false` once the receiving side is gone.
#[cfg_attr(not(feature = "codegen"), allow(dead_code))]
pub(crate) trait SnapshotSink: Send + Sync + 'static {
    fn push(&self, view: AppSnapshotView) -> bool;
}

#[cfg(feature = "codegen")]
impl SnapshotSink for crate::frb_generated::StreamSink<AppSnapshotView> {
    fn push(&self, view: AppSnapshotView) -> bool {
        self.add(view).is_ok()
    }
}

/// Streams a snapshot now and after every state change, including
/// timer-driven banner hides.
///
/// # FFI contract
/// - The stream stays registered until Dart closes it; the first failed
///   push unregisters the underlying store subscription.
/// - Never panics.
#[cfg(feature = "codegen")]
pub fn watch_app_state(sink: crate::frb_generated::StreamSink<AppSnapshotView>) {
    watch_store(app_store(), sink);
}

/// Registers `sink` on `store` and keeps its subscription in the process
/// watcher registry. Returns the watcher ID.
#[cfg_attr(not(feature = "codegen"), allow(dead_code))]
pub(crate) fn watch_store(store: &Store, sink: impl SnapshotSink) -> u64 {
    let watcher_id = NEXT_WATCHER_ID.fetch_add(1, Ordering::SeqCst);
    let (state, revision) = store.snapshot_with_revision();
    if !sink.push(to_snapshot_view(state, revision)) {
        debug!("event=watch module=ffi status=ignored reason=sink_closed watcher_id={watcher_id}");
        return watcher_id;
    }

    let subscription = store.subscribe_with_revision(move |state, revision| {
        if !sink.push(to_snapshot_view(state.clone(), revision)) {
            // Listeners run outside the store lock, so the subscription may
            // be dropped from here.
            if watchers().remove(&watcher_id).is_some() {
                debug!("event=unwatch module=ffi status=ok watcher_id={watcher_id}");
            }
        }
    });
    watchers().insert(watcher_id, subscription);
    debug!("event=watch module=ffi status=ok watcher_id={watcher_id}");
    watcher_id
}

#[cfg_attr(not(feature = "codegen"), allow(dead_code))]
fn watchers() -> MutexGuard<'static, BTreeMap<u64, Subscription>> {
    WATCHERS
        .get_or_init(|| Mutex::new(BTreeMap::new()))
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
}

fn dispatch(action: Action) -> ActionResponse {
    ActionResponse::from_transition(app_store().dispatch(action))
}

fn app_store() -> &'static Store {
    APP_STORE.get_or_init(|| {
        let config = StoreConfig::from_env().unwrap_or_else(|err| {
            warn!("event=store_config module=ffi status=error error={err} fallback=defaults");
            StoreConfig::default()
        });
        Store::new(config)
    })
}

fn parse_task_id(raw: &str) -> Result<TaskId, ActionResponse> {
    TaskId::parse_str(raw.trim())
        .map_err(|err| ActionResponse::failure(format!("invalid task id `{raw}`: {err}")))
}

fn to_snapshot_view(state: AppState, revision: u64) -> AppSnapshotView {
    AppSnapshotView {
        tasks: state.tasks.items.into_iter().map(to_task_view).collect(),
        dark_mode: state.ui.dark_mode,
        show_info_banner: state.ui.show_info_banner,
        show_added_banner: state.ui.show_added_banner,
        revision,
    }
}

fn to_task_view(task: Task) -> TaskView {
    TaskView {
        id: task.id.to_string(),
        title: task.title,
        done: task.done,
        created_at: task.created_at,
    }
}
