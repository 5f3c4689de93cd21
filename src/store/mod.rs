//! Durable key/value storage consumed by catalog persistence.
//!
//! The router only needs `get` and an overwriting `put` of opaque byte
//! blobs. Two implementations ship with the crate: [`MemoryStore`] for tests
//! and embedders that do not need durability, and [`FileStore`] for a simple
//! one-file-per-key directory layout.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use thiserror::Error;

/// Errors from a store backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Backend-specific failure
    #[error("{0}")]
    Backend(String),
}

/// Durable key/value persistence of opaque byte blobs.
pub trait Store: Send + Sync {
    /// Reads the value stored under `key`, or `None` when absent.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// Writes `value` under `key`, overwriting any previous value.
    fn put(&self, key: &str, value: &[u8]) -> Result<(), StoreError>;
}
