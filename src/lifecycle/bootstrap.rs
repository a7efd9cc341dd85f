use crate::config::WardenConfig;
use crate::registry::SessionRegistry;
use async_trait::async_trait;
use tracing::info;

/// External routine that repopulates the session registry from persisted
/// tokens after an export or import.
///
/// Implementations must be idempotent and safe to call with an empty or
/// partially populated registry; the warden invokes this only once the
/// relevant filesystem work has fully completed.
#[async_trait]
pub trait SessionBootstrap: Send + Sync {
    async fn start_all_sessions(
        &self,
        config: &WardenConfig,
        registry: &SessionRegistry,
    ) -> anyhow::Result<()>;
}

/// Bootstrap used when the warden runs detached from a session host, e.g.
/// from the CLI: starting browser processes belongs to the embedding
/// application, so restart is logged and deferred to it.
pub struct DetachedBootstrap;

#[async_trait]
impl SessionBootstrap for DetachedBootstrap {
    async fn start_all_sessions(
        &self,
        _config: &WardenConfig,
        registry: &SessionRegistry,
    ) -> anyhow::Result<()> {
        info!(
            "Session restart deferred to host application ({} persisted sessions)",
            registry.list_session_ids().len()
        );
        Ok(())
    }
}
