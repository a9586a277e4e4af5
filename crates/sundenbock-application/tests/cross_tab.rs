mod common;

use std::sync::Arc;
use std::time::Duration;

use sundenbock_application::{SessionPhase, StorageSync};
use sundenbock_core::auth::AuthenticationRequest;
use sundenbock_core::clock::ManualClock;
use sundenbock_core::storage::{KeyValueStorage, StorageEvent, StorageScope};
use sundenbock_core::user::UserProfile;
use sundenbock_infrastructure::BrowserOrigin;

use common::{MockProfileClient, NOW, harness, token_for};

fn profile(username: &str) -> MockProfileClient {
    MockProfileClient::new(UserProfile::new(username, ["USER"], Vec::<String>::new()))
}

#[tokio::test]
async fn storage_events_drive_the_other_tab() {
    let origin = BrowserOrigin::new();
    let clock = Arc::new(ManualClock::new(NOW));
    let tab_a = harness(origin.open_tab(), clock.clone(), profile("alice"));
    let tab_b = harness(origin.open_tab(), clock, profile("alice"));
    let mut b_events = tab_b.tab.subscribe();

    tab_a
        .session
        .set_token(&token_for("alice", &[], 3_600), true)
        .await
        .unwrap();

    let stored = b_events.try_recv().unwrap();
    assert_eq!(
        tab_b.session.handle_storage_event(&stored).unwrap(),
        StorageSync::TokenChanged
    );
    assert_eq!(tab_b.session.phase(), SessionPhase::PendingProfile);
    assert_eq!(
        tab_b.session.handle_storage_event(&stored).unwrap(),
        StorageSync::Unchanged
    );

    tab_a.session.logout(false).unwrap();

    let removed = b_events.try_recv().unwrap();
    assert_eq!(removed.new_value, None);
    assert_eq!(
        tab_b.session.handle_storage_event(&removed).unwrap(),
        StorageSync::LoggedOut
    );
    assert_eq!(tab_b.session.phase(), SessionPhase::Anonymous);
    assert_eq!(tab_b.navigator.redirects(), 1);
    assert_eq!(tab_a.navigator.redirects(), 0);
}

#[tokio::test]
async fn unrelated_keys_are_ignored() {
    let origin = BrowserOrigin::new();
    let h = harness(
        origin.open_tab(),
        Arc::new(ManualClock::new(NOW)),
        profile("alice"),
    );
    let event = StorageEvent {
        key: Some("theme".to_string()),
        scope: StorageScope::Durable,
        old_value: None,
        new_value: Some("dark".to_string()),
        source: origin.open_tab().tab_id(),
    };

    assert_eq!(
        h.session.handle_storage_event(&event).unwrap(),
        StorageSync::Ignored
    );
}

#[tokio::test]
async fn listener_follows_login_and_logout_in_another_tab() {
    let origin = BrowserOrigin::new();
    let clock = Arc::new(ManualClock::new(NOW));
    let tab_a = harness(origin.open_tab(), clock.clone(), profile("alice"));
    let tab_b = harness(origin.open_tab(), clock, profile("alice"));
    let listener = tab_b.session.spawn_storage_listener();
    let mut b_updates = tab_b.session.subscribe();

    tab_a
        .session
        .login(&AuthenticationRequest::new("alice", "secret"), true)
        .await
        .unwrap();

    tokio::time::timeout(
        Duration::from_secs(1),
        b_updates.wait_for(|s| s.phase == SessionPhase::Authenticated),
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(tab_b.profiles.calls(), 1);

    tab_a.session.logout(true).unwrap();

    tokio::time::timeout(
        Duration::from_secs(1),
        b_updates.wait_for(|s| s.phase == SessionPhase::Anonymous),
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(tab_a.navigator.redirects(), 1);
    assert_eq!(tab_b.navigator.redirects(), 1);

    listener.abort();
}

#[tokio::test]
async fn session_only_login_stays_in_its_tab() {
    let origin = BrowserOrigin::new();
    let clock = Arc::new(ManualClock::new(NOW));
    let tab_a = harness(origin.open_tab(), clock.clone(), profile("alice"));
    let tab_b = harness(origin.open_tab(), clock, profile("alice"));
    let mut b_events = tab_b.tab.subscribe();

    tab_a
        .session
        .login(&AuthenticationRequest::new("alice", "secret"), false)
        .await
        .unwrap();

    assert!(b_events.try_recv().is_none());
    assert!(tab_a.session.is_logged_in());
    assert!(!tab_b.session.is_logged_in());
    assert_eq!(tab_b.session.token().unwrap(), None);
}
