use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::codec;
use crate::domain::{ImageEntry, LoadOutcome};
use crate::error::Result;
use crate::store::{KeyValueStore, PersistWriter};

/// Set of favorited entry ids, persisted under its own store key.
///
/// Ids are weak references: a favorite whose entry was removed from the
/// catalog is kept but never returned by [`Favorites::list_favorite_entries`].
pub struct Favorites<S: KeyValueStore> {
    store: Arc<S>,
    writer: PersistWriter,
    ids: BTreeSet<String>,
}

impl<S: KeyValueStore> Favorites<S> {
    /// Create an empty set bound to `key`. Must be called within a tokio runtime.
    pub fn new(store: Arc<S>, key: impl Into<String>) -> Self {
        let writer = PersistWriter::spawn(Arc::clone(&store), key);
        Self {
            store,
            writer,
            ids: BTreeSet::new(),
        }
    }

    pub fn key(&self) -> &str {
        self.writer.key()
    }

    /// Replace the in-memory set with the persisted one. Same fallbacks as the catalog.
    pub async fn load(&mut self) -> LoadOutcome {
        if let Err(e) = self.writer.flush().await {
            warn!(key = %self.key(), error = %e, "pending favorites write failed before reload");
        }

        let key = self.key().to_string();
        match self.store.get(&key).await {
            Ok(None) => {
                self.ids.clear();
                LoadOutcome::Missing
            }
            Ok(Some(blob)) => match codec::decode_favorites(&key, &blob) {
                Ok(ids) => {
                    self.ids = ids;
                    debug!(key = %key, count = self.ids.len(), "favorites loaded");
                    LoadOutcome::Loaded(self.ids.len())
                }
                Err(e) => {
                    warn!(key = %key, error = %e, "favorites blob unreadable, starting empty");
                    self.ids.clear();
                    LoadOutcome::Corrupt
                }
            },
            Err(e) => {
                warn!(key = %key, error = %e, "favorites store unavailable, keeping current set");
                LoadOutcome::Unavailable
            }
        }
    }

    pub fn is_favorite(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Flip membership of `id`. Returns whether it is now a favorite.
    pub fn toggle(&mut self, id: &str) -> bool {
        let now_favorite = if self.ids.remove(id) {
            false
        } else {
            self.ids.insert(id.to_string());
            true
        };
        self.persist();
        now_favorite
    }

    /// Catalog entries that are favorited, in catalog order.
    pub fn list_favorite_entries<'a>(&self, entries: &'a [ImageEntry]) -> Vec<&'a ImageEntry> {
        entries.iter().filter(|e| self.is_favorite(&e.id)).collect()
    }

    /// Number of favorited ids, dangling ones included.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub async fn flush(&mut self) -> Result<()> {
        self.writer.flush().await
    }

    pub fn last_write_error(&self) -> Option<String> {
        self.writer.last_error()
    }

    fn persist(&mut self) {
        match codec::encode_favorites(&self.ids) {
            Ok(blob) => self.writer.submit(blob),
            Err(e) => warn!(key = %self.key(), error = %e, "failed to encode favorites"),
        }
    }
}

impl<S: KeyValueStore> std::fmt::Debug for Favorites<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Favorites")
            .field("key", &self.key())
            .field("ids", &self.ids.len())
            .finish()
    }
}
