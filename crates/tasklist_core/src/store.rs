//! Application store and action dispatcher.
//!
//! # Responsibility
//! - Own the authoritative `AppState` and apply actions through reducers.
//! - Notify subscribers with a fresh snapshot after every applied change.
//! - Orchestrate the "task added" banner: show now, hide after a delay.
//!
//! # Invariants
//! - Actions from one caller apply in dispatch order.
//! - Subscribers run after the state lock is released.
//! - Ignored transitions bump nothing and notify no one.
//! - Banner tokens are armed and checked under the state lock.
//! - Timer jobs hold a `Weak` handle; late firings after the last `Store`
//!   clone is dropped are discarded.

use crate::action::Action;
use crate::banner::{BannerTimer, Scheduler, ThreadScheduler};
use crate::clock::{Clock, SystemClock};
use crate::config::StoreConfig;
use crate::model::task::TaskId;
use crate::model::ui::UiFlags;
use crate::reducer::{reduce, IgnoredReason, Transition};
use crate::state::AppState;
use log::{debug, info};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

type Listener = Arc<dyn Fn(&AppState, u64) + Send + Sync>;

/// Time and scheduling collaborators injected into a store.
#[derive(Clone)]
pub struct StoreEnvironment {
    pub clock: Arc<dyn Clock>,
    pub scheduler: Arc<dyn Scheduler>,
}

impl StoreEnvironment {
    /// Wall clock plus thread-backed timers.
    pub fn system() -> Self {
        Self {
            clock: Arc::new(SystemClock),
            scheduler: Arc::new(ThreadScheduler::new()),
        }
    }
}

struct StoreInner {
    state: AppState,
    revision: u64,
    listeners: BTreeMap<u64, Listener>,
    next_listener_id: u64,
}

struct StoreShared {
    inner: Mutex<StoreInner>,
    env: StoreEnvironment,
    banner: BannerTimer,
}

impl StoreShared {
    fn lock(&self) -> MutexGuard<'_, StoreInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Cloneable handle to one application store.
#[derive(Clone)]
pub struct Store {
    shared: Arc<StoreShared>,
}

impl Store {
    /// Builds a store with wall-clock time and thread-backed timers.
    pub fn new(config: StoreConfig) -> Self {
        Self::with_environment(config, StoreEnvironment::system())
    }

    pub fn with_environment(config: StoreConfig, env: StoreEnvironment) -> Self {
        info!(
            "event=store_init module=store status=ok banner_policy={} banner_delay_ms={} dark_mode={}",
            config.banner_policy.as_str(),
            config.banner_delay.as_millis(),
            config.initial_dark_mode
        );
        Self {
            shared: Arc::new(StoreShared {
                inner: Mutex::new(StoreInner {
                    state: AppState::new(UiFlags::with_dark_mode(config.initial_dark_mode)),
                    revision: 0,
                    listeners: BTreeMap::new(),
                    next_listener_id: 0,
                }),
                env,
                banner: BannerTimer::new(config.banner_policy, config.banner_delay),
            }),
        }
    }

    /// Read-only copy of the current state.
    pub fn snapshot(&self) -> AppState {
        self.shared.lock().state.clone()
    }

    /// Count of applied transitions since creation.
    pub fn revision(&self) -> u64 {
        self.shared.lock().revision
    }

    /// Snapshot and revision read under one lock.
    pub fn snapshot_with_revision(&self) -> (AppState, u64) {
        let inner = self.shared.lock();
        (inner.state.clone(), inner.revision)
    }

    /// Registers `listener` to receive a snapshot after every applied change.
    ///
    /// The listener stays registered until the returned `Subscription` is
    /// dropped or unsubscribed.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&AppState) + Send + Sync + 'static,
    {
        self.subscribe_with_revision(move |state, _| listener(state))
    }

    /// Like `subscribe`, also passing the revision the snapshot belongs to.
    pub fn subscribe_with_revision<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&AppState, u64) + Send + Sync + 'static,
    {
        let mut inner = self.shared.lock();
        let id = inner.next_listener_id;
        inner.next_listener_id += 1;
        inner.listeners.insert(id, Arc::new(listener));
        debug!(
            "event=subscribe module=store status=ok listener_id={id} listeners={}",
            inner.listeners.len()
        );
        Subscription {
            store: Arc::downgrade(&self.shared),
            id: Some(id),
        }
    }

    /// Applies one action and returns what happened.
    ///
    /// A successful `tasks/add` also shows the "added" banner in the same
    /// transition and schedules its hide.
    pub fn dispatch(&self, action: Action) -> Transition {
        let (transition, banner_token) = self.apply(&action, None);
        log_transition(&action, transition);
        if let (Transition::Created(id), Some(token)) = (transition, banner_token) {
            self.schedule_banner_hide(id, token);
        }
        transition
    }

    pub fn add_task(&self, title: impl Into<String>) -> Transition {
        self.dispatch(Action::add_task(title))
    }

    pub fn toggle_task(&self, id: TaskId) -> Transition {
        self.dispatch(Action::ToggleTask { id })
    }

    pub fn remove_task(&self, id: TaskId) -> Transition {
        self.dispatch(Action::RemoveTask { id })
    }

    pub fn clear_all(&self) -> Transition {
        self.dispatch(Action::ClearAll)
    }

    pub fn toggle_dark_mode(&self) -> Transition {
        self.dispatch(Action::ToggleDarkMode)
    }

    pub fn dismiss_info_banner(&self) -> Transition {
        self.dispatch(Action::DismissInfoBanner)
    }

    /// Reduces `action` and notifies listeners.
    ///
    /// `hide_token` is checked against the banner generation under the state
    /// lock, and a created task arms a new generation under that same lock,
    /// so a hide can never land between an add and its arming. Returns the
    /// armed token for a created task.
    fn apply(&self, action: &Action, hide_token: Option<u64>) -> (Transition, Option<u64>) {
        let now_epoch_ms = self.shared.env.clock.now_epoch_ms();
        let (transition, armed, snapshot, revision, listeners) = {
            let mut inner = self.shared.lock();
            if let Some(token) = hide_token {
                if !self.shared.banner.should_hide(token) {
                    return (Transition::Ignored(IgnoredReason::Superseded), None);
                }
            }
            let transition = reduce(&mut inner.state, action, now_epoch_ms);
            if !transition.is_applied() {
                return (transition, None);
            }
            let mut armed = None;
            if transition.created_id().is_some() {
                reduce(&mut inner.state, &Action::ShowAddedBanner, now_epoch_ms);
                armed = Some(self.shared.banner.arm());
            }
            inner.revision += 1;
            let listeners: Vec<Listener> = inner.listeners.values().cloned().collect();
            (transition, armed, inner.state.clone(), inner.revision, listeners)
        };
        for listener in listeners {
            listener(&snapshot, revision);
        }
        (transition, armed)
    }

    fn schedule_banner_hide(&self, created: TaskId, token: u64) {
        let store = Arc::downgrade(&self.shared);
        debug!(
            "event=banner_schedule module=store status=ok task_id={created} token={token} delay_ms={}",
            self.shared.banner.delay().as_millis()
        );
        self.shared.env.scheduler.schedule(
            self.shared.banner.delay(),
            Box::new(move || match store.upgrade() {
                Some(shared) => Store { shared }.fire_banner_hide(token),
                None => debug!(
                    "event=banner_hide module=store status=ignored reason=store_dropped token={token}"
                ),
            }),
        );
    }

    fn fire_banner_hide(&self, token: u64) {
        let action = Action::HideAddedBanner;
        let (transition, _) = self.apply(&action, Some(token));
        log_transition(&action, transition);
    }
}

fn log_transition(action: &Action, transition: Transition) {
    match transition {
        Transition::Ignored(reason) => debug!(
            "event=dispatch module=store status=ignored action={} reason={reason}",
            action.kind()
        ),
        _ => debug!(
            "event=dispatch module=store status=ok action={}",
            action.kind()
        ),
    }
}

/// Registration handle returned by `Store::subscribe`.
///
/// Dropping it unsubscribes.
pub struct Subscription {
    store: Weak<StoreShared>,
    id: Option<u64>,
}

impl Subscription {
    pub fn unsubscribe(mut self) {
        self.release();
    }

    fn release(&mut self) {
        let Some(id) = self.id.take() else {
            return;
        };
        if let Some(shared) = self.store.upgrade() {
            shared.lock().listeners.remove(&id);
            debug!("event=unsubscribe module=store status=ok listener_id={id}");
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::{Store, StoreEnvironment};
    use crate::banner::ManualScheduler;
    use crate::clock::ManualClock;
    use crate::config::StoreConfig;
    use std::sync::Arc;
    use std::time::Duration;

    #[test]
    fn add_shows_banner_in_the_same_revision() {
        let scheduler = Arc::new(ManualScheduler::new());
        let store = Store::with_environment(
            StoreConfig::default(),
            StoreEnvironment {
                clock: Arc::new(ManualClock::new(7)),
                scheduler: scheduler.clone(),
            },
        );

        store.add_task("milk");
        let state = store.snapshot();
        assert_eq!(store.revision(), 1);
        assert!(state.ui.show_added_banner);
        assert_eq!(state.tasks.items[0].created_at, 7);
        assert_eq!(scheduler.pending_count(), 1);

        scheduler.advance(Duration::from_millis(2000));
        assert_eq!(store.revision(), 2);
        assert!(!store.snapshot().ui.show_added_banner);
    }
}
