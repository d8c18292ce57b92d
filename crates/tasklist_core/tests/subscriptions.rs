use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tasklist_core::{ManualClock, ManualScheduler, Store, StoreConfig, StoreEnvironment};

fn manual_store() -> (Store, Arc<ManualScheduler>) {
    let scheduler = Arc::new(ManualScheduler::new());
    let store = Store::with_environment(
        StoreConfig::default(),
        StoreEnvironment {
            clock: Arc::new(ManualClock::new(0)),
            scheduler: scheduler.clone(),
        },
    );
    (store, scheduler)
}

#[test]
fn subscriber_sees_every_applied_change_in_order() {
    let (store, scheduler) = manual_store();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let _subscription = store.subscribe(move |state| {
        sink.lock()
            .unwrap()
            .push((state.tasks.len(), state.ui.show_added_banner, state.ui.dark_mode));
    });

    store.add_task("a");
    store.toggle_dark_mode();
    scheduler.advance(Duration::from_millis(2000));

    assert_eq!(
        *seen.lock().unwrap(),
        [(1, true, false), (1, true, true), (1, false, true)]
    );
    assert_eq!(store.revision(), 3);
}

#[test]
fn ignored_actions_do_not_notify() {
    let (store, _scheduler) = manual_store();
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let _subscription = store.subscribe(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    store.add_task(" ");
    store.clear_all();
    store.remove_task(uuid::Uuid::new_v4());

    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert_eq!(store.revision(), 0);
}

#[test]
fn unsubscribe_and_drop_both_stop_notifications() {
    let (store, _scheduler) = manual_store();
    let calls = Arc::new(AtomicUsize::new(0));

    let first_counter = Arc::clone(&calls);
    let first = store.subscribe(move |_| {
        first_counter.fetch_add(1, Ordering::SeqCst);
    });
    let second_counter = Arc::clone(&calls);
    let second = store.subscribe(move |_| {
        second_counter.fetch_add(1, Ordering::SeqCst);
    });

    store.toggle_dark_mode();
    assert_eq!(calls.load(Ordering::SeqCst), 2);

    first.unsubscribe();
    store.toggle_dark_mode();
    assert_eq!(calls.load(Ordering::SeqCst), 3);

    drop(second);
    store.toggle_dark_mode();
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[test]
fn subscriber_may_read_and_dispatch_reentrantly() {
    let (store, _scheduler) = manual_store();
    let handle = store.clone();
    let _subscription = store.subscribe(move |state| {
        // Auto-clear once three tasks exist.
        if state.tasks.len() == 3 {
            assert_eq!(handle.snapshot().tasks.len(), 3);
            handle.clear_all();
        }
    });

    for title in ["a", "b", "c"] {
        store.add_task(title);
    }
    assert!(store.snapshot().tasks.is_empty());
}

#[test]
fn subscription_outliving_store_drops_cleanly() {
    let (store, _scheduler) = manual_store();
    let subscription = store.subscribe(|_| {});
    drop(store);
    subscription.unsubscribe();
}

#[test]
fn revision_listener_gets_the_revision_of_its_snapshot() {
    let (store, scheduler) = manual_store();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let _subscription = store.subscribe_with_revision(move |state, revision| {
        sink.lock()
            .unwrap()
            .push((revision, state.ui.show_added_banner));
    });

    store.add_task("a");
    scheduler.advance(Duration::from_millis(2000));

    assert_eq!(*seen.lock().unwrap(), [(1, true), (2, false)]);
}
