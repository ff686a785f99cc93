//! Session lifecycle controller tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;

use finboard_core::AppResult;
use finboard_core::config::AppConfig;
use finboard_entity::api::Snapshot;
use finboard_entity::{Notification, NotificationEvent};
use finboard_sync::pull::PullTransport;
use finboard_sync::session::SessionController;
use finboard_sync::token::SessionToken;

struct CountingPull {
    snapshot_calls: AtomicUsize,
}

impl CountingPull {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            snapshot_calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl PullTransport for CountingPull {
    async fn fetch_snapshot(&self) -> AppResult<Snapshot> {
        self.snapshot_calls.fetch_add(1, Ordering::SeqCst);
        Ok(Snapshot {
            items: vec![Notification {
                id: "seed".to_string(),
                event: NotificationEvent::StatementAvailable,
                title: "Statement".to_string(),
                message: "Your statement is available.".to_string(),
                is_read: false,
                is_critical: false,
                created_at: Utc::now(),
                action_url: None,
                metadata: serde_json::Map::new(),
            }],
            unread_count: 1,
        })
    }

    async fn fetch_unread_count(&self) -> AppResult<u64> {
        Ok(1)
    }

    async fn mark_read(&self, _id: &str) -> AppResult<()> {
        Ok(())
    }

    async fn mark_all_read(&self) -> AppResult<u64> {
        Ok(0)
    }

    async fn delete(&self, _id: &str) -> AppResult<()> {
        Ok(())
    }
}

async fn wait_until(mut check: impl FnMut() -> bool) {
    for _ in 0..200 {
        if check() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("condition not reached within 2s");
}

#[tokio::test]
async fn sign_in_fetches_initial_snapshot() {
    let mut controller = SessionController::new(AppConfig::default());
    let pull = CountingPull::new();

    controller
        .sign_in_with(SessionToken::new("tok_1"), pull.clone())
        .await
        .unwrap();
    assert!(controller.is_authenticated());

    wait_until(|| pull.snapshot_calls.load(Ordering::SeqCst) >= 1).await;

    let store = controller.store().unwrap();
    // The engine applied the snapshot before anything else.
    wait_until(|| {
        store
            .try_read()
            .map(|s| s.unread_count() == 1 && s.contains("seed"))
            .unwrap_or(false)
    })
    .await;

    controller.sign_out().await;
}

#[tokio::test]
async fn double_sign_in_is_rejected() {
    let mut controller = SessionController::new(AppConfig::default());
    let pull = CountingPull::new();

    controller
        .sign_in_with(SessionToken::new("tok_1"), pull.clone())
        .await
        .unwrap();
    assert!(
        controller
            .sign_in_with(SessionToken::new("tok_2"), pull)
            .await
            .is_err()
    );

    controller.sign_out().await;
}

#[tokio::test]
async fn sign_out_clears_state_and_stops_engine() {
    let mut controller = SessionController::new(AppConfig::default());
    let pull = CountingPull::new();

    controller
        .sign_in_with(SessionToken::new("tok_1"), pull.clone())
        .await
        .unwrap();
    let store = controller.store().unwrap();
    wait_until(|| pull.snapshot_calls.load(Ordering::SeqCst) >= 1).await;

    controller.sign_out().await;
    assert!(!controller.is_authenticated());
    assert!(controller.store().is_none());
    assert!(controller.engine().is_none());
    // The engine cleared the aggregate on its way out.
    assert!(store.read().await.is_empty());
    assert_eq!(store.read().await.unread_count(), 0);
}

#[tokio::test]
async fn token_rotation_is_not_a_sign_out() {
    let mut controller = SessionController::new(AppConfig::default());
    let token = SessionToken::new("tok_1");
    let pull = CountingPull::new();

    controller
        .sign_in_with(token.clone(), pull.clone())
        .await
        .unwrap();
    wait_until(|| pull.snapshot_calls.load(Ordering::SeqCst) >= 1).await;
    let calls_after_sign_in = pull.snapshot_calls.load(Ordering::SeqCst);

    controller.rotate_token("tok_2").await.unwrap();
    assert!(controller.is_authenticated());
    assert_eq!(token.get(), "tok_2");
    assert_eq!(
        pull.snapshot_calls.load(Ordering::SeqCst),
        calls_after_sign_in,
        "rotation must not trigger a new session bootstrap"
    );

    controller.sign_out().await;
    assert!(controller.rotate_token("tok_3").await.is_err());
}
