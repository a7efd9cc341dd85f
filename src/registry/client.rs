use async_trait::async_trait;

/// Live handle to one automation-browser session.
///
/// Handles are created and owned by the embedding application (whatever
/// drives the browser processes); the warden only reads the status flag and
/// requests closure of the underlying process.
#[async_trait]
pub trait SessionClient: Send + Sync {
    /// Whether the underlying browser process is currently active.
    fn is_active(&self) -> bool;

    /// Request closure of the underlying browser process.
    ///
    /// Implementations should make this safe to call on an already-closed
    /// session. Errors are reported per-session by the caller and never
    /// abort the teardown of other sessions.
    async fn close(&self) -> anyhow::Result<()>;
}
