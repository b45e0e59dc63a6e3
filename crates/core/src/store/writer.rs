//! Single-writer persistence queue for one store key.
//!
//! Mutations publish the full serialized state; a background task writes the
//! newest published blob, one write at a time. Blobs published while a write
//! is in flight replace each other, so only the latest reaches the store once
//! the in-flight write finishes. Writes therefore land in mutation order and
//! the last write always reflects the latest in-memory state.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, warn};

use super::KeyValueStore;
use crate::error::{Error, Result};

#[derive(Debug, Clone, Default)]
struct Pending {
    version: u64,
    blob: Option<String>,
}

/// Outcome of the most recent write attempt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteStatus {
    /// Version of the last blob the writer attempted.
    pub applied: u64,
    /// Error of that attempt, if it failed.
    pub error: Option<String>,
}

pub struct PersistWriter {
    key: String,
    version: u64,
    pending: watch::Sender<Pending>,
    status: watch::Receiver<WriteStatus>,
}

impl PersistWriter {
    /// Start the writer task for `key`. Must be called within a tokio runtime.
    pub fn spawn<S: KeyValueStore>(store: Arc<S>, key: impl Into<String>) -> Self {
        let key = key.into();
        let (pending_tx, pending_rx) = watch::channel(Pending::default());
        let (status_tx, status_rx) = watch::channel(WriteStatus::default());
        tokio::spawn(run_writer(store, key.clone(), pending_rx, status_tx));
        Self {
            key,
            version: 0,
            pending: pending_tx,
            status: status_rx,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Queue `blob` as the newest state for this key. Never blocks.
    pub fn submit(&mut self, blob: String) {
        self.version += 1;
        self.pending.send_replace(Pending {
            version: self.version,
            blob: Some(blob),
        });
    }

    /// Whether a submitted blob has not been attempted yet.
    pub fn is_pending(&self) -> bool {
        self.status.borrow().applied < self.version
    }

    /// Error of the most recent write attempt.
    pub fn last_error(&self) -> Option<String> {
        self.status.borrow().error.clone()
    }

    /// Wait until the latest submitted blob has been attempted.
    ///
    /// Returns `StoreUnavailable` if that attempt failed; earlier failures that
    /// a later write reconciled are not reported.
    pub async fn flush(&mut self) -> Result<()> {
        let target = self.version;
        let key = self.key.clone();
        let status = self
            .status
            .wait_for(|s| s.applied >= target)
            .await
            .map_err(|_| Error::StoreUnavailable(format!("writer for `{key}` stopped")))?;
        match &status.error {
            Some(message) => Err(Error::StoreUnavailable(message.clone())),
            None => Ok(()),
        }
    }
}

impl std::fmt::Debug for PersistWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersistWriter")
            .field("key", &self.key)
            .field("version", &self.version)
            .field("status", &*self.status.borrow())
            .finish()
    }
}

async fn run_writer<S: KeyValueStore>(
    store: Arc<S>,
    key: String,
    mut pending: watch::Receiver<Pending>,
    status: watch::Sender<WriteStatus>,
) {
    while pending.changed().await.is_ok() {
        let (version, blob) = {
            let current = pending.borrow_and_update();
            (current.version, current.blob.clone())
        };
        let Some(blob) = blob else {
            continue;
        };

        let bytes = blob.len();
        let error = match store.set(&key, blob).await {
            Ok(()) => {
                debug!(key = %key, version, bytes, "persisted");
                None
            }
            Err(e) => {
                warn!(key = %key, version, error = %e, "persist failed, keeping in-memory state");
                Some(e.to_string())
            }
        };
        status.send_replace(WriteStatus {
            applied: version,
            error,
        });
    }
    debug!(key = %key, "writer stopped");
}
