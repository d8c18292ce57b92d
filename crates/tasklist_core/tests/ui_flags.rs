use std::sync::Arc;
use tasklist_core::{
    Action, ManualClock, ManualScheduler, Store, StoreConfig, StoreEnvironment, UiFlags,
};

fn manual_store(config: StoreConfig) -> Store {
    Store::with_environment(
        config,
        StoreEnvironment {
            clock: Arc::new(ManualClock::new(0)),
            scheduler: Arc::new(ManualScheduler::new()),
        },
    )
}

#[test]
fn initial_flags_match_defaults() {
    let store = manual_store(StoreConfig::default());
    assert_eq!(store.snapshot().ui, UiFlags::default());
    assert!(store.snapshot().ui.show_info_banner);
    assert!(!store.snapshot().ui.show_added_banner);
}

#[test]
fn initial_dark_mode_is_configurable() {
    let store = manual_store(StoreConfig {
        initial_dark_mode: true,
        ..StoreConfig::default()
    });
    assert!(store.snapshot().ui.dark_mode);
}

#[test]
fn toggling_dark_mode_twice_restores_it() {
    let store = manual_store(StoreConfig::default());
    let original = store.snapshot().ui.dark_mode;

    store.toggle_dark_mode();
    assert_ne!(store.snapshot().ui.dark_mode, original);
    store.toggle_dark_mode();
    assert_eq!(store.snapshot().ui.dark_mode, original);
}

#[test]
fn dismissed_info_banner_stays_dismissed() {
    let store = manual_store(StoreConfig::default());
    store.dismiss_info_banner();
    assert!(!store.snapshot().ui.show_info_banner);

    let id = store.add_task("X").created_id().unwrap();
    store.toggle_task(id);
    store.toggle_dark_mode();
    store.dispatch(Action::ShowAddedBanner);
    store.clear_all();
    store.dismiss_info_banner();

    assert!(!store.snapshot().ui.show_info_banner);
}

#[test]
fn explicit_show_and_hide_of_added_banner() {
    let store = manual_store(StoreConfig::default());
    store.dispatch(Action::ShowAddedBanner);
    assert!(store.snapshot().ui.show_added_banner);
    store.dispatch(Action::HideAddedBanner);
    assert!(!store.snapshot().ui.show_added_banner);
}
