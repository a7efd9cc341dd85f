use crate::registry::client::SessionClient;
use dashmap::DashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

/// Shared mapping from session identifier to live client handle.
///
/// Backed by a concurrent map so lookups and removals interleave safely with
/// teardown; removing an absent key is a no-op. The persisted identifier
/// list comes from the token store directory, one `<id>.json` file per
/// session.
pub struct SessionRegistry {
    clients: DashMap<String, Arc<dyn SessionClient>>,
    token_store: PathBuf,
}

impl SessionRegistry {
    /// Create a registry whose persisted view is derived from `token_store`.
    pub fn new(token_store: PathBuf) -> Self {
        Self {
            clients: DashMap::new(),
            token_store,
        }
    }

    /// Token store directory this registry enumerates identifiers from.
    pub fn token_store(&self) -> &Path {
        &self.token_store
    }

    /// Persisted session identifiers, sorted for deterministic iteration.
    ///
    /// Derived from the token store contents rather than the live map, so it
    /// includes sessions that are persisted but not currently loaded. A
    /// missing token store yields an empty list.
    pub fn list_session_ids(&self) -> Vec<String> {
        let entries = match std::fs::read_dir(&self.token_store) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(
                    "Token store {} does not exist, no persisted sessions",
                    self.token_store.display()
                );
                return Vec::new();
            }
            Err(e) => {
                warn!(
                    "Failed to enumerate token store {}: {}",
                    self.token_store.display(),
                    e
                );
                return Vec::new();
            }
        };

        let mut ids = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                ids.push(stem.to_string());
            }
        }
        ids.sort();
        ids
    }

    /// Look up the live handle for `id`, if one is loaded.
    pub fn get(&self, id: &str) -> Option<Arc<dyn SessionClient>> {
        self.clients.get(id).map(|entry| entry.value().clone())
    }

    /// Register a live handle under `id`, replacing any previous one.
    pub fn insert(&self, id: String, client: Arc<dyn SessionClient>) {
        debug!("Registering session {}", id);
        self.clients.insert(id, client);
    }

    /// Remove and return the live handle for `id`. Idempotent.
    pub fn remove(&self, id: &str) -> Option<Arc<dyn SessionClient>> {
        self.clients.remove(id).map(|(_, client)| client)
    }

    /// Identifiers with a currently loaded handle, sorted.
    pub fn live_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.clients.iter().map(|e| e.key().clone()).collect();
        ids.sort();
        ids
    }

    /// Number of currently loaded handles.
    pub fn len(&self) -> usize {
        self.clients.len()
    }

    /// Whether no handle is currently loaded.
    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }
}
