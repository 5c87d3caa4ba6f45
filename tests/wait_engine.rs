//! Wait engine tests against the simulated app.

mod common;

// ============================================================================
// Imports
// ============================================================================

use std::time::{Duration, Instant};

use common::{Behaviour, FakeApp};
use swaglabs_pages::{Error, ExecutionId, Locator, Session, WaitCondition};

async fn session(app: &std::sync::Arc<FakeApp>, wait: Duration) -> Session {
    common::manager(app)
        .acquire(&ExecutionId::new("wait"), &common::config_with_wait(wait))
        .await
        .expect("acquire")
}

// ============================================================================
// Timing
// ============================================================================

#[tokio::test]
async fn never_appearing_locator_times_out_after_full_timeout() {
    let app = FakeApp::new();
    let session = session(&app, Duration::from_millis(300)).await;
    let missing = Locator::accessibility_id("test-Nowhere");
    let timeout = Duration::from_millis(250);

    let started = Instant::now();
    let err = session
        .waiter()
        .wait_for(&missing, WaitCondition::Present, timeout)
        .await
        .unwrap_err();
    let elapsed = started.elapsed();

    assert!(elapsed >= timeout, "gave up early after {elapsed:?}");
    assert!(elapsed < Duration::from_secs(2), "overran: {elapsed:?}");
    match err {
        Error::ElementTimeout {
            locator,
            condition,
            elapsed_ms,
        } => {
            assert_eq!(locator, missing);
            assert_eq!(condition, WaitCondition::Present);
            assert!(elapsed_ms >= 250);
        }
        other => panic!("expected ElementTimeout, got {other:?}"),
    }
}

#[tokio::test]
async fn polling_picks_up_late_render() {
    let app = FakeApp::with(Behaviour {
        render_delay: 5,
        ..Behaviour::default()
    });
    let session = session(&app, Duration::from_secs(2)).await;
    let products = session
        .login_screen()
        .login(common::USERNAME, common::PASSWORD)
        .await
        .expect("login");

    let finds_before = app.finds();
    assert!(products.is_displayed().await.expect("displayed"));
    assert!(app.finds() - finds_before >= 6, "each poll must re-query");
    assert_eq!(products.item_count().await.expect("count"), common::PRODUCTS.len());
}

#[tokio::test]
async fn zero_timeout_makes_exactly_one_attempt() {
    let app = FakeApp::new();
    let session = session(&app, Duration::from_millis(300)).await;
    let waiter = session.waiter();

    let before = app.finds();
    let visible = waiter
        .is_visible_within(&Locator::accessibility_id("test-Nowhere"), Duration::ZERO)
        .await
        .expect("check");
    assert!(!visible);
    assert_eq!(app.finds() - before, 1);
}

// ============================================================================
// Conditions
// ============================================================================

#[tokio::test]
async fn satisfied_conditions_return_first_match() {
    let app = FakeApp::new();
    let session = session(&app, Duration::from_millis(300)).await;
    let waiter = session.waiter();
    let button = Locator::accessibility_id("test-LOGIN");

    for condition in [WaitCondition::Present, WaitCondition::Visible, WaitCondition::Clickable] {
        let handle = waiter
            .wait_for(&button, condition, Duration::from_millis(100))
            .await
            .expect("present");
        assert_eq!(handle.locator(), &button);
        assert_eq!(handle.text().await.expect("text"), "LOGIN");
    }
}

#[tokio::test]
async fn is_visible_maps_only_timeouts_to_false() {
    let app = FakeApp::new();
    let manager = common::manager(&app);
    let execution = ExecutionId::new("visible");
    let session = manager
        .acquire(&execution, &common::config_with_wait(Duration::from_millis(100)))
        .await
        .expect("acquire");
    let waiter = session.waiter();

    assert!(waiter.is_visible(&Locator::accessibility_id("test-Username")).await.expect("ok"));
    assert!(!waiter.is_visible(&Locator::accessibility_id("test-Error message")).await.expect("ok"));

    manager.release(&execution).await;
    let err = waiter
        .is_visible(&Locator::accessibility_id("test-Username"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NoActiveSession { .. }));
}

#[tokio::test]
async fn count_below_times_out_with_count_error() {
    let app = FakeApp::new();
    let session = session(&app, Duration::from_millis(300)).await;
    let products = session
        .login_screen()
        .login(common::USERNAME, common::PASSWORD)
        .await
        .expect("login");
    assert!(products.is_displayed().await.expect("displayed"));

    let rows = Locator::accessibility_id("test-Item");
    let waiter = session.waiter();

    let count = waiter
        .count_below(&rows, 7, Duration::from_millis(50))
        .await
        .expect("six rows are fewer than seven");
    assert_eq!(count, 6);

    let err = waiter
        .count_below(&rows, 6, Duration::from_millis(50))
        .await
        .unwrap_err();
    assert!(err.is_timeout());
    assert!(matches!(err, Error::CountTimeout { bound: 6, .. }));
}

// ============================================================================
// Staleness
// ============================================================================

#[tokio::test]
async fn handles_go_stale_after_rebuild_and_waits_recover() {
    let app = FakeApp::new();
    let session = session(&app, Duration::from_millis(300)).await;
    let waiter = session.waiter();
    let username = Locator::accessibility_id("test-Username");

    let field = waiter.visible(&username).await.expect("field");
    field.type_text("nobody").await.expect("type");

    // A rejected login rebuilds the view tree
    waiter
        .clickable(&Locator::accessibility_id("test-LOGIN"))
        .await
        .expect("button")
        .click()
        .await
        .expect("click");

    let err = field.text().await.unwrap_err();
    assert!(matches!(err, Error::StaleElement { .. }));
    assert!(err.is_element_error());

    let fresh = waiter.visible(&username).await.expect("fresh lookup");
    assert_eq!(fresh.text().await.expect("text"), "nobody");
    assert_ne!(fresh.id(), field.id());
}

#[tokio::test]
async fn find_all_does_not_wait() {
    let app = FakeApp::new();
    let session = session(&app, Duration::from_secs(5)).await;

    let started = Instant::now();
    let found = session
        .waiter()
        .find_all(&Locator::accessibility_id("test-Nowhere"))
        .await
        .expect("find");
    assert!(found.is_empty());
    assert!(started.elapsed() < Duration::from_secs(1));
}
