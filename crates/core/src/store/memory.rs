use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

use super::KeyValueStore;
use crate::error::{Error, Result};

/// In-process store. Every write is recorded so callers can inspect the order
/// in which blobs reached the store, and the store can be switched offline to
/// simulate an unavailable backend.
#[derive(Debug)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
    available: AtomicBool,
}

#[derive(Debug, Default)]
struct Inner {
    values: HashMap<String, String>,
    writes: Vec<(String, String)>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
            available: AtomicBool::new(true),
        }
    }

    /// Toggle simulated availability. While offline every read and write fails.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    pub fn is_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }

    /// Place a raw blob under `key` without recording a write.
    pub fn seed(&self, key: &str, value: &str) {
        if let Ok(mut inner) = self.lock() {
            inner.values.insert(key.to_string(), value.to_string());
        }
    }

    /// Current blob under `key`, bypassing availability.
    pub fn value(&self, key: &str) -> Option<String> {
        self.lock().ok()?.values.get(key).cloned()
    }

    /// Blobs written under `key`, oldest first.
    pub fn writes_for(&self, key: &str) -> Vec<String> {
        match self.lock() {
            Ok(inner) => inner
                .writes
                .iter()
                .filter(|(k, _)| k == key)
                .map(|(_, v)| v.clone())
                .collect(),
            Err(_) => Vec::new(),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>> {
        self.inner
            .lock()
            .map_err(|_| Error::StoreUnavailable("memory store lock poisoned".into()))
    }

    fn check_available(&self) -> Result<()> {
        if self.is_available() {
            Ok(())
        } else {
            Err(Error::StoreUnavailable("memory store is offline".into()))
        }
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<String>>> + Send {
        async move {
            tokio::task::yield_now().await;
            self.check_available()?;
            Ok(self.lock()?.values.get(key).cloned())
        }
    }

    fn set(&self, key: &str, value: String) -> impl Future<Output = Result<()>> + Send {
        async move {
            // Suspend like a real backend so later mutations can overtake this write.
            tokio::task::yield_now().await;
            self.check_available()?;
            let mut inner = self.lock()?;
            inner.writes.push((key.to_string(), value.clone()));
            inner.values.insert(key.to_string(), value);
            Ok(())
        }
    }
}
