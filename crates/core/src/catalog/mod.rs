pub mod id;

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::codec;
use crate::domain::{ImageEntry, LoadOutcome};
use crate::error::{Error, Result};
use crate::store::{KeyValueStore, PersistWriter};

use id::IdGenerator;

/// Ordered, de-duplicated list of image entries persisted under one store key.
///
/// Mutations apply to memory immediately and queue a write of the full list;
/// store failures are logged and reconciled by the next successful write.
pub struct Catalog<S: KeyValueStore> {
    store: Arc<S>,
    writer: PersistWriter,
    entries: Vec<ImageEntry>,
    ids: IdGenerator,
}

impl<S: KeyValueStore> Catalog<S> {
    /// Create an empty catalog bound to `key`. Must be called within a tokio runtime.
    pub fn new(store: Arc<S>, key: impl Into<String>) -> Self {
        let writer = PersistWriter::spawn(Arc::clone(&store), key);
        Self {
            store,
            writer,
            entries: Vec::new(),
            ids: IdGenerator::new(),
        }
    }

    pub fn key(&self) -> &str {
        self.writer.key()
    }

    /// Replace the in-memory list with the persisted one.
    ///
    /// Pending writes are flushed first so the read observes every earlier
    /// mutation. Never fails: a missing or corrupt blob yields an empty
    /// catalog, an unreadable store leaves the current list untouched.
    pub async fn load(&mut self) -> LoadOutcome {
        if let Err(e) = self.writer.flush().await {
            warn!(key = %self.key(), error = %e, "pending catalog write failed before reload");
        }

        let key = self.key().to_string();
        match self.store.get(&key).await {
            Ok(None) => {
                self.entries.clear();
                debug!(key = %key, "no catalog stored yet");
                LoadOutcome::Missing
            }
            Ok(Some(blob)) => match codec::decode_entries(&key, &blob) {
                Ok(entries) => {
                    let (entries, dropped) = dedupe(entries);
                    self.entries = entries;
                    if dropped > 0 {
                        warn!(key = %key, dropped, "dropped duplicate catalog records");
                        self.persist();
                    }
                    debug!(key = %key, count = self.entries.len(), "catalog loaded");
                    LoadOutcome::Loaded(self.entries.len())
                }
                Err(e) => {
                    warn!(key = %key, error = %e, "catalog blob unreadable, starting empty");
                    self.entries.clear();
                    LoadOutcome::Corrupt
                }
            },
            Err(e) => {
                warn!(key = %key, error = %e, "catalog store unavailable, keeping current entries");
                LoadOutcome::Unavailable
            }
        }
    }

    /// Append a new entry for `uri`.
    ///
    /// Fails with `DuplicateEntry` (catalog unchanged) when an entry with the
    /// same URI exists.
    pub fn add(&mut self, uri: &str) -> Result<ImageEntry> {
        if uri.trim().is_empty() {
            return Err(Error::InvalidUri);
        }
        if self.find_by_uri(uri).is_some() {
            return Err(Error::DuplicateEntry {
                uri: uri.to_string(),
            });
        }

        let id = loop {
            let candidate = self.ids.next_for(uri);
            if self.get(&candidate).is_none() {
                break candidate;
            }
        };

        let entry = ImageEntry::new(id, uri);
        self.entries.push(entry.clone());
        self.persist();
        Ok(entry)
    }

    /// Remove the entry with `id`. Absent ids are ignored and trigger no write.
    ///
    /// Favorites referencing the id are left alone; they are filtered at read time.
    pub fn remove(&mut self, id: &str) -> Option<ImageEntry> {
        let pos = self.entries.iter().position(|e| e.id == id)?;
        let removed = self.entries.remove(pos);
        self.persist();
        Some(removed)
    }

    pub fn list(&self) -> &[ImageEntry] {
        &self.entries
    }

    pub fn get(&self, id: &str) -> Option<&ImageEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn find_by_uri(&self, uri: &str) -> Option<&ImageEntry> {
        self.entries.iter().find(|e| e.uri == uri)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Wait for the latest queued write. Errors if that write failed.
    pub async fn flush(&mut self) -> Result<()> {
        self.writer.flush().await
    }

    pub fn is_dirty(&self) -> bool {
        self.writer.is_pending()
    }

    pub fn last_write_error(&self) -> Option<String> {
        self.writer.last_error()
    }

    fn persist(&mut self) {
        match codec::encode_entries(&self.entries) {
            Ok(blob) => self.writer.submit(blob),
            Err(e) => warn!(key = %self.key(), error = %e, "failed to encode catalog"),
        }
    }
}

/// Keep the first record for every id and every URI.
fn dedupe(entries: Vec<ImageEntry>) -> (Vec<ImageEntry>, usize) {
    let total = entries.len();
    let mut ids = HashSet::new();
    let mut uris = HashSet::new();
    let kept: Vec<ImageEntry> = entries
        .into_iter()
        .filter(|e| {
            let fresh_id = !ids.contains(&e.id);
            let fresh_uri = !uris.contains(&e.uri);
            if fresh_id && fresh_uri {
                ids.insert(e.id.clone());
                uris.insert(e.uri.clone());
                true
            } else {
                false
            }
        })
        .collect();
    let dropped = total - kept.len();
    (kept, dropped)
}

impl<S: KeyValueStore> std::fmt::Debug for Catalog<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Catalog")
            .field("key", &self.key())
            .field("entries", &self.entries.len())
            .finish()
    }
}
