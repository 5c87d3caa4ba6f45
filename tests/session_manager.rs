//! Session lifecycle tests against the simulated app.

mod common;

// ============================================================================
// Imports
// ============================================================================

use std::sync::Arc;
use std::time::Duration;

use common::{Behaviour, FakeApp};
use swaglabs_pages::{Error, ExecutionId, SessionConfig, SessionManager};

// ============================================================================
// Acquire
// ============================================================================

#[tokio::test]
async fn acquire_creates_session_and_applies_implicit_wait() {
    common::init_tracing();
    let app = FakeApp::new();
    let manager = common::manager(&app);
    let execution = ExecutionId::new("acquire");

    let session = manager.acquire(&execution, &common::config()).await.expect("acquire");

    assert!(session.is_alive());
    assert_eq!(session.execution(), &execution);
    assert_eq!(app.created(), 1);
    assert_eq!(app.implicit_wait(session.id()), Some(Duration::from_secs(10)));
    assert_eq!(session.capabilities().app_package.as_deref(), Some("com.swaglabsmobileapp"));
    assert_eq!(manager.session_count(), 1);
}

#[tokio::test]
async fn acquire_is_idempotent_per_execution() {
    let app = FakeApp::new();
    let manager = common::manager(&app);
    let execution = ExecutionId::new("twice");

    let first = manager.acquire(&execution, &common::config()).await.expect("first");
    let second = manager.acquire(&execution, &common::config()).await.expect("second");

    assert!(first.same_as(&second));
    assert_eq!(first.id(), second.id());
    assert_eq!(app.created(), 1);
}

#[tokio::test]
async fn current_returns_acquired_session() {
    let app = FakeApp::new();
    let manager = common::manager(&app);
    let execution = ExecutionId::new("current");

    assert!(matches!(
        manager.current(&execution),
        Err(Error::NoActiveSession { .. })
    ));
    assert!(manager.get(&execution).is_none());
    let session = manager.acquire(&execution, &common::config()).await.expect("acquire");
    let current = manager.current(&execution).expect("current");
    assert!(current.same_as(&session));
}

// ============================================================================
// Release
// ============================================================================

#[tokio::test]
async fn release_twice_is_noop_and_current_fails_both_times() {
    let app = FakeApp::new();
    let manager = common::manager(&app);
    let execution = ExecutionId::new("release");

    manager.acquire(&execution, &common::config()).await.expect("acquire");

    manager.release(&execution).await;
    assert!(matches!(
        manager.current(&execution),
        Err(Error::NoActiveSession { .. })
    ));

    manager.release(&execution).await;
    assert!(matches!(
        manager.current(&execution),
        Err(Error::NoActiveSession { .. })
    ));

    assert_eq!(app.deleted(), 1);
    assert_eq!(app.open_sessions(), 0);
}

#[tokio::test]
async fn failed_teardown_still_clears_state() {
    let app = FakeApp::with(Behaviour {
        fail_delete: true,
        ..Behaviour::default()
    });
    let manager = common::manager(&app);
    let execution = ExecutionId::new("teardown");

    let first = manager.acquire(&execution, &common::config()).await.expect("acquire");
    manager.release(&execution).await;

    assert_eq!(manager.session_count(), 0);
    assert!(!first.is_alive());

    let second = manager.acquire(&execution, &common::config()).await.expect("re-acquire");
    assert_ne!(first.id(), second.id());
}

#[tokio::test]
async fn released_session_rejects_screen_use() {
    let app = FakeApp::new();
    let manager = common::manager(&app);
    let execution = ExecutionId::new("stale-screen");

    let session = manager.acquire(&execution, &common::config()).await.expect("acquire");
    let login = session.login_screen();
    manager.release(&execution).await;

    let err = login
        .login(common::USERNAME, common::PASSWORD)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NoActiveSession { ref execution } if execution.as_str() == "stale-screen"));
}

#[tokio::test]
async fn release_all_ends_every_session() {
    let app = FakeApp::new();
    let manager = common::manager(&app);

    for name in ["a", "b", "c"] {
        manager
            .acquire(&ExecutionId::new(name), &common::config())
            .await
            .expect("acquire");
    }
    assert_eq!(app.open_sessions(), 3);

    manager.release_all().await;
    assert_eq!(manager.session_count(), 0);
    assert_eq!(app.open_sessions(), 0);
}

// ============================================================================
// Isolation
// ============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn parallel_executions_get_independent_sessions() {
    let app = FakeApp::new();
    let manager = Arc::new(common::manager(&app));

    let mut workers = Vec::new();
    for worker in 0..4 {
        let manager = Arc::clone(&manager);
        workers.push(tokio::spawn(async move {
            let execution = ExecutionId::new(format!("worker-{worker}"));
            let session = manager.acquire(&execution, &common::config()).await?;
            let details = session
                .login_screen()
                .login(common::USERNAME, common::PASSWORD)
                .await?
                .select_item(worker)
                .await?
                .add_to_cart()
                .await?;
            let cart = details.open_cart().await?;
            let name = cart.item_name(0).await?;
            let count = cart.item_count().await?;
            manager.release(&execution).await;
            swaglabs_pages::Result::Ok((worker, name, count))
        }));
    }

    for handle in workers {
        let (worker, name, count) = handle.await.expect("join").expect("worker flow");
        assert_eq!(count, 1, "worker {worker} sees only its own cart");
        assert_eq!(name.as_deref(), Some(common::PRODUCTS[worker].0));
    }

    assert_eq!(app.created(), 4);
    assert_eq!(manager.session_count(), 0);
}

#[tokio::test]
async fn one_execution_release_leaves_others_alive() {
    let app = FakeApp::new();
    let manager = common::manager(&app);
    let a = ExecutionId::new("a");
    let b = ExecutionId::new("b");

    let session_a = manager.acquire(&a, &common::config()).await.expect("a");
    let session_b = manager.acquire(&b, &common::config()).await.expect("b");
    assert_ne!(session_a.id(), session_b.id());

    manager.release(&a).await;
    assert!(!session_a.is_alive());
    assert!(session_b.is_alive());
    assert!(manager.get(&b).is_some());
}

// ============================================================================
// Initialization Failures
// ============================================================================

#[tokio::test]
async fn rejected_capabilities_are_session_init() {
    let app = FakeApp::with(Behaviour {
        fail_create: true,
        ..Behaviour::default()
    });
    let manager = common::manager(&app);
    let execution = ExecutionId::new("rejected");

    let err = manager
        .acquire(&execution, &common::config())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::SessionInit { .. }));
    assert!(err.is_fatal());
    assert!(err.to_string().contains("offline"));
    assert_eq!(manager.session_count(), 0);
}

#[tokio::test]
async fn missing_artifact_fails_before_contacting_endpoint() {
    let app = FakeApp::new();
    let manager = common::manager(&app);
    let config = SessionConfig::builder()
        .app_artifact("/definitely/not/here/swaglabs.apk")
        .build()
        .expect("config");

    let err = manager
        .acquire(&ExecutionId::new("artifact"), &config)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::SessionInit { .. }));
    assert!(err.to_string().contains("swaglabs.apk"));
    assert_eq!(app.created(), 0);
}

#[tokio::test]
async fn existing_artifact_is_installed() {
    let apk = tempfile::Builder::new()
        .suffix(".apk")
        .tempfile()
        .expect("temp apk");
    let app = FakeApp::new();
    let manager = common::manager(&app);
    let config = SessionConfig::builder()
        .app_artifact(apk.path())
        .build()
        .expect("config");

    let session = manager
        .acquire(&ExecutionId::new("artifact-ok"), &config)
        .await
        .expect("acquire");

    assert_eq!(
        session.capabilities().app.as_deref(),
        Some(apk.path().display().to_string().as_str())
    );
}

#[tokio::test]
async fn unreachable_endpoint_is_session_init() {
    let manager = SessionManager::new();
    let config = SessionConfig::builder()
        .server_url("http://127.0.0.1:1")
        .installed_app("com.swaglabsmobileapp", "com.swaglabsmobileapp.MainActivity")
        .request_timeout(Duration::from_secs(2))
        .build()
        .expect("config");

    let err = manager
        .acquire(&ExecutionId::new("offline"), &config)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::SessionInit { .. }));
    assert!(err.to_string().contains("127.0.0.1:1"));
    assert_eq!(manager.session_count(), 0);
}

#[tokio::test]
async fn bundled_config_starts_installed_app() {
    let app = FakeApp::new();
    let manager = common::manager(&app);
    let config = SessionConfig::load("config/swaglabs.toml").expect("bundled config");

    assert_eq!(config.explicit_wait(), Duration::from_secs(15));
    assert_eq!(config.poll_interval(), Duration::from_millis(250));
    assert_eq!(config.username(), "standard_user");

    let session = manager
        .acquire(&ExecutionId::new("bundled"), &config)
        .await
        .expect("acquire");
    assert_eq!(
        session.capabilities().app_activity.as_deref(),
        Some("com.swaglabsmobileapp.MainActivity")
    );
}

// ============================================================================
// Setup Failures and Races
// ============================================================================

#[tokio::test]
async fn rejected_implicit_wait_deletes_half_open_session() {
    let app = FakeApp::with(Behaviour {
        fail_implicit_wait: true,
        ..Behaviour::default()
    });
    let manager = common::manager(&app);
    let execution = ExecutionId::new("timeouts");

    let err = manager.acquire(&execution, &common::config()).await.unwrap_err();

    assert!(matches!(err, Error::SessionInit { .. }));
    assert!(err.to_string().contains("timeouts"));
    assert_eq!(app.created(), 1);
    assert_eq!(app.deleted(), 1);
    assert_eq!(app.open_sessions(), 0);
    assert_eq!(manager.session_count(), 0);
    assert!(manager.get(&execution).is_none());
}

#[tokio::test]
async fn concurrent_acquire_keeps_one_session_and_deletes_the_other() {
    let app = FakeApp::with(Behaviour {
        create_delay: Duration::from_millis(50),
        ..Behaviour::default()
    });
    let manager = common::manager(&app);
    let execution = ExecutionId::new("raced");
    let config = common::config();

    let (first, second) = tokio::join!(
        manager.acquire(&execution, &config),
        manager.acquire(&execution, &config)
    );
    let first = first.expect("first acquire");
    let second = second.expect("second acquire");

    assert!(first.same_as(&second));
    assert!(first.is_alive());
    assert_eq!(app.created(), 2);
    assert_eq!(app.deleted(), 1);
    assert_eq!(app.open_sessions(), 1);
    assert_eq!(manager.session_count(), 1);

    let kept = manager.current(&execution).expect("current");
    assert!(kept.same_as(&first));
    assert_eq!(app.implicit_wait(kept.id()), Some(Duration::from_secs(10)));
}
