pub mod memory;
pub mod schema;
pub mod sqlite;
pub mod writer;

use std::future::Future;

use crate::error::Result;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use writer::PersistWriter;

/// Asynchronous string-blob key-value store.
///
/// Reads and writes may fail; there are no transactions. Each key is owned by
/// exactly one component, which serializes its own writes.
pub trait KeyValueStore: Send + Sync + 'static {
    /// Read the blob stored under `key`, or `None` if nothing was ever written.
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<String>>> + Send;

    /// Replace the blob stored under `key`.
    fn set(&self, key: &str, value: String) -> impl Future<Output = Result<()>> + Send;
}
