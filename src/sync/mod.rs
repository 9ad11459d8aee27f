use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;

use crate::cache::LocalCache;
use crate::domain::AppData;
use crate::remote::{RemoteError, RemoteStore};

mod debounce;
mod health;
mod pusher;

pub use health::{Connectivity, HealthMonitor};
use pusher::RemotePusher;

/// Where the in-memory document came from at startup.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LoadOrigin {
    Remote,
    Initialized,
    LocalCache,
    Empty,
}

impl LoadOrigin {
    pub fn as_str(self) -> &'static str {
        match self {
            LoadOrigin::Remote => "remote",
            LoadOrigin::Initialized => "initialized",
            LoadOrigin::LocalCache => "local_cache",
            LoadOrigin::Empty => "empty",
        }
    }
}

/// Owns the authoritative in-memory document. Every save lands in the local
/// cache at once and reaches the remote through the debounced pusher.
pub struct SyncEngine {
    doc: AppData,
    local: LocalCache,
    remote: Arc<dyn RemoteStore>,
    pusher: RemotePusher,
    origin: LoadOrigin,
}

impl SyncEngine {
    /// Remote first, then local cache, then an empty document. Never fails.
    pub fn load(local: LocalCache, remote: Arc<dyn RemoteStore>, quiet: Duration) -> Self {
        let (doc, origin) = match remote.read() {
            Ok(Some(payload)) => {
                let doc = AppData::from_value(payload);
                local.write(&doc);
                (doc, LoadOrigin::Remote)
            }
            Ok(None) => {
                let doc = AppData::default();
                if let Err(err) = remote.write(&doc.to_value()) {
                    log::warn!("failed to initialize remote document: {err}");
                }
                (doc, LoadOrigin::Initialized)
            }
            Err(err) => {
                match err {
                    RemoteError::NotConfigured => log::debug!("no remote configured"),
                    err => log::warn!("remote unreachable, falling back to local cache: {err}"),
                }
                match local.read() {
                    Some(doc) => (doc, LoadOrigin::LocalCache),
                    None => (AppData::default(), LoadOrigin::Empty),
                }
            }
        };
        log::info!(
            "loaded document '{}' from {}",
            doc.current_week_name,
            origin.as_str()
        );

        let pusher = RemotePusher::spawn(Arc::clone(&remote), quiet);
        Self {
            doc,
            local,
            remote,
            pusher,
            origin,
        }
    }

    pub fn document(&self) -> &AppData {
        &self.doc
    }

    pub fn origin(&self) -> LoadOrigin {
        self.origin
    }

    pub fn remote(&self) -> &Arc<dyn RemoteStore> {
        &self.remote
    }

    pub fn local(&self) -> &LocalCache {
        &self.local
    }

    pub fn has_pending_push(&self) -> bool {
        self.pusher.has_pending()
    }

    pub fn save(&mut self, doc: AppData) {
        self.local.write(&doc);
        self.pusher.schedule(doc.to_value());
        self.doc = doc;
    }

    /// Applies `mutate` to a copy and saves it only when it succeeds, so a
    /// rejected operation leaves both the document and the stores untouched.
    pub fn update<T, E>(
        &mut self,
        mutate: impl FnOnce(&mut AppData) -> Result<T, E>,
    ) -> Result<T, E> {
        let mut working = self.doc.clone();
        let value = mutate(&mut working)?;
        self.save(working);
        Ok(value)
    }

    /// Wipes the local slot and the in-memory document. The remote row is
    /// left as it is and any pending push is dropped.
    pub fn factory_reset(&mut self) {
        if self.pusher.cancel() {
            log::debug!("discarded pending remote write on reset");
        }
        self.local.clear();
        self.doc = AppData::default();
    }

    /// Sends a still-pending push immediately and stops the worker.
    pub fn close(mut self) {
        if self.has_pending_push() {
            log::debug!("flushing pending remote write before exit");
        }
        self.pusher.close();
    }
}

#[cfg(test)]
mod tests;
