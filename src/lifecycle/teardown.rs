use crate::registry::SessionRegistry;
use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// Outcome of draining the session pool.
#[derive(Debug, Clone, Copy, Default)]
pub struct TeardownReport {
    /// Identifiers removed from the registry
    pub drained: usize,
    /// Close requests dispatched for handles that reported active
    pub close_requested: usize,
    /// Closures confirmed complete within the grace window
    pub closed: usize,
    /// Whether the grace window elapsed with closures still in flight
    pub timed_out: bool,
}

/// Best-effort, time-bounded drain of every known session.
///
/// For each persisted identifier the registry entry is removed synchronously
/// before its close request is issued, so later operations never observe the
/// session as live even while closing is in flight. Close requests run as
/// detached tasks joined under the grace window; when the window elapses the
/// coordinator returns without cancelling them. Callers must treat a
/// returned report as "registry drained", not "processes terminated".
pub struct TeardownCoordinator {
    registry: Arc<SessionRegistry>,
    grace: Duration,
}

impl TeardownCoordinator {
    pub fn new(registry: Arc<SessionRegistry>, grace: Duration) -> Self {
        Self { registry, grace }
    }

    /// Drain all sessions. Never fails; per-session close errors are logged
    /// and swallowed.
    pub async fn drain_all(&self) -> TeardownReport {
        let ids = self.registry.list_session_ids();
        let mut report = TeardownReport::default();
        let mut closures = Vec::new();

        for id in ids {
            // Remove before closing so the identifier is never observed as
            // live once teardown has visited it.
            let client = self.registry.remove(&id);
            report.drained += 1;

            let Some(client) = client else {
                debug!("Session {} has no loaded handle, nothing to close", id);
                continue;
            };
            if !client.is_active() {
                debug!("Session {} already inactive, skipping close", id);
                continue;
            }

            report.close_requested += 1;
            closures.push(tokio::spawn(async move {
                match client.close().await {
                    Ok(()) => {
                        debug!("Closed session {}", id);
                        true
                    }
                    Err(e) => {
                        warn!("Failed to close session {}: {}", id, e);
                        false
                    }
                }
            }));
        }

        if !closures.is_empty() {
            match timeout(self.grace, join_all(closures)).await {
                Ok(results) => {
                    report.closed = results
                        .into_iter()
                        .filter(|r| matches!(r, Ok(true)))
                        .count();
                }
                Err(_) => {
                    // Dropping the join handles detaches the tasks; in-flight
                    // closes keep running past the grace window.
                    report.timed_out = true;
                    warn!(
                        "Grace period of {:?} elapsed with session closures still in flight",
                        self.grace
                    );
                }
            }
        }

        info!(
            "Drained {} sessions ({} close requests, {} confirmed closed)",
            report.drained, report.close_requested, report.closed
        );
        report
    }
}
