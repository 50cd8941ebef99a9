/// Integration tests for the per-session page state machine
///
/// Run with: cargo test --test session_tests -- --nocapture
use delivery_time_service::session::{Action, Page, SessionState, SessionStore};
use std::time::Duration;

#[test]
fn test_initial_state() {
    let state = SessionState::default();
    assert_eq!(state.page, Page::Home);
    assert!(!state.show_map);
}

#[test]
fn test_navigation_is_unconditional() {
    let mut state = SessionState::default();
    for page in [Page::Dashboard, Page::PredictionModel, Page::Home, Page::Home] {
        state.apply(Action::Navigate { page });
        assert_eq!(state.page, page);
    }
}

#[test]
fn test_show_map_survives_navigation() {
    let mut state = SessionState::default();
    state.apply(Action::Navigate { page: Page::PredictionModel });
    state.apply(Action::ShowMap);
    state.apply(Action::Navigate { page: Page::Dashboard });
    assert!(state.show_map);
    state.apply(Action::Navigate { page: Page::PredictionModel });
    assert_eq!(
        state,
        SessionState {
            page: Page::PredictionModel,
            show_map: true
        }
    );
}

#[test]
fn test_sessions_are_independent() {
    let store = SessionStore::new();
    let (a, _) = store.create();
    let (b, state_b) = store.create();
    assert_ne!(a, b);

    store.apply(&a, Action::Navigate { page: Page::Dashboard });
    store.apply(&a, Action::ShowMap);

    assert_eq!(store.get(&b), Some(state_b));
    assert_eq!(
        store.get(&a),
        Some(SessionState {
            page: Page::Dashboard,
            show_map: true
        })
    );
    assert_eq!(store.len(), 2);
}

#[test]
fn test_unknown_and_removed_sessions() {
    let store = SessionStore::new();
    assert_eq!(store.apply("nope", Action::ShowMap), None);
    let (id, _) = store.create();
    assert!(store.remove(&id).is_some());
    assert_eq!(store.get(&id), None);
    assert!(store.is_empty());
}

#[test]
fn test_action_wire_format() {
    let nav: Action = serde_json::from_str(r#"{"action":"navigate","page":"prediction_model"}"#).unwrap();
    assert_eq!(nav, Action::Navigate { page: Page::PredictionModel });
    let show: Action = serde_json::from_str(r#"{"action":"show_map"}"#).unwrap();
    assert_eq!(show, Action::ShowMap);
}

#[test]
fn test_idle_sessions_expire() {
    println!("\n=== Test: Idle Session Expiry ===");
    let store = SessionStore::with_ttl(Duration::from_millis(5));
    let (stale, _) = store.create();
    std::thread::sleep(Duration::from_millis(30));

    assert_eq!(store.get(&stale), None);
    assert_eq!(store.apply(&stale, Action::ShowMap), None);

    let (other, _) = store.create();
    std::thread::sleep(Duration::from_millis(30));
    let (fresh, _) = store.create();
    assert_eq!(store.len(), 1);
    assert_eq!(store.get(&other), None);
    assert!(store.get(&fresh).is_some());
    println!("✓ idle sessions are dropped, {} left", store.len());
}

#[test]
fn test_active_sessions_survive_ttl() {
    let store = SessionStore::with_ttl(Duration::from_secs(3600));
    let (id, _) = store.create();
    store.apply(&id, Action::Navigate { page: Page::Dashboard });
    store.create();
    assert_eq!(store.purge_idle(), 0);
    assert_eq!(store.len(), 2);
    assert_eq!(store.get(&id).unwrap().page, Page::Dashboard);

    let unbounded = SessionStore::new();
    unbounded.create();
    assert_eq!(unbounded.purge_idle(), 0);
    assert_eq!(unbounded.len(), 1);
}
