use crate::env;
use crate::lifecycle::*;
use crate::registry::{SessionClient, SessionRegistry};
use async_trait::async_trait;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tempfile::TempDir;

struct FakeClient {
    active: bool,
    fail_close: bool,
    hang_close: bool,
    close_calls: Arc<AtomicUsize>,
}

impl FakeClient {
    fn active() -> Self {
        Self {
            active: true,
            fail_close: false,
            hang_close: false,
            close_calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn inactive() -> Self {
        Self {
            active: false,
            ..Self::active()
        }
    }

    fn failing() -> Self {
        Self {
            fail_close: true,
            ..Self::active()
        }
    }

    fn hanging() -> Self {
        Self {
            hang_close: true,
            ..Self::active()
        }
    }
}

#[async_trait]
impl SessionClient for FakeClient {
    fn is_active(&self) -> bool {
        self.active
    }

    async fn close(&self) -> anyhow::Result<()> {
        self.close_calls.fetch_add(1, Ordering::SeqCst);
        if self.hang_close {
            tokio::time::sleep(Duration::from_secs(3600)).await;
        }
        if self.fail_close {
            anyhow::bail!("browser process refused to die");
        }
        Ok(())
    }
}

fn write_token(base: &Path, id: &str) {
    let path = env::token_file_path(base, id);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, "{}").unwrap();
}

fn registry_with(base: &Path, clients: Vec<(&str, FakeClient)>) -> Arc<SessionRegistry> {
    let registry = Arc::new(SessionRegistry::new(env::token_store_path(base)));
    for (id, client) in clients {
        write_token(base, id);
        registry.insert(id.to_string(), Arc::new(client));
    }
    registry
}

#[tokio::test]
async fn test_drain_all_empties_registry() {
    let temp = TempDir::new().unwrap();
    let registry = registry_with(
        temp.path(),
        vec![("a", FakeClient::active()), ("b", FakeClient::active())],
    );
    let coordinator = TeardownCoordinator::new(registry.clone(), Duration::from_millis(500));

    let report = coordinator.drain_all().await;

    assert!(registry.is_empty());
    assert_eq!(report.drained, 2);
    assert_eq!(report.close_requested, 2);
    assert_eq!(report.closed, 2);
    assert!(!report.timed_out);
}

#[tokio::test]
async fn test_drain_all_empties_registry_even_when_closes_fail() {
    let temp = TempDir::new().unwrap();
    let registry = registry_with(
        temp.path(),
        vec![
            ("a", FakeClient::failing()),
            ("b", FakeClient::failing()),
            ("c", FakeClient::active()),
        ],
    );
    let coordinator = TeardownCoordinator::new(registry.clone(), Duration::from_millis(500));

    let report = coordinator.drain_all().await;

    assert!(registry.is_empty());
    assert_eq!(report.drained, 3);
    assert_eq!(report.close_requested, 3);
    assert_eq!(report.closed, 1);
}

#[tokio::test]
async fn test_drain_all_skips_inactive_handles() {
    let temp = TempDir::new().unwrap();
    let inactive = FakeClient::inactive();
    let calls = inactive.close_calls.clone();
    let registry = registry_with(temp.path(), vec![("idle", inactive)]);
    let coordinator = TeardownCoordinator::new(registry.clone(), Duration::from_millis(500));

    let report = coordinator.drain_all().await;

    assert!(registry.is_empty());
    assert_eq!(report.close_requested, 0);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_drain_all_ignores_persisted_sessions_without_handles() {
    let temp = TempDir::new().unwrap();
    write_token(temp.path(), "cold");
    let registry = Arc::new(SessionRegistry::new(env::token_store_path(temp.path())));
    let coordinator = TeardownCoordinator::new(registry.clone(), Duration::from_millis(500));

    let report = coordinator.drain_all().await;

    assert_eq!(report.drained, 1);
    assert_eq!(report.close_requested, 0);
    assert_eq!(report.closed, 0);
}

#[tokio::test]
async fn test_drain_all_is_bounded_by_grace_period() {
    let temp = TempDir::new().unwrap();
    let registry = registry_with(temp.path(), vec![("stuck", FakeClient::hanging())]);
    let coordinator = TeardownCoordinator::new(registry.clone(), Duration::from_millis(50));

    let report = coordinator.drain_all().await;

    // The hanging close never completes, but teardown still returns with the
    // registry drained.
    assert!(registry.is_empty());
    assert_eq!(report.close_requested, 1);
    assert_eq!(report.closed, 0);
    assert!(report.timed_out);
}

#[tokio::test]
async fn test_detached_bootstrap_is_a_noop() {
    let temp = TempDir::new().unwrap();
    let registry = SessionRegistry::new(env::token_store_path(temp.path()));
    let config = crate::config::WardenConfig {
        base_dir: temp.path().to_path_buf(),
        ..Default::default()
    };

    let result = DetachedBootstrap.start_all_sessions(&config, &registry).await;

    assert!(result.is_ok());
    assert!(registry.is_empty());
}
