#![forbid(unsafe_code)]
//! tessera-buffer: in-memory storage collaborators.
//!
//! Concrete implementations of the *interfaces* defined in
//! `tessera-core::buffer`: a slotted in-memory heap file, a catalog, and a
//! buffer pool that stages inserts per transaction and enforces a hard cap on
//! dirty pages.
//!
//! No disk IO lives here; pages never leave memory.

pub mod catalog;
pub mod file;
pub mod pool;
pub mod tracking;

pub use catalog::MemoryCatalog;
pub use file::MemoryFile;
pub use pool::MemoryBufferPool;
pub use tracking::{PoolStats, PoolStatsSnapshot};

use std::sync::PoisonError;

use tessera_core::error::Error;

pub(crate) fn poisoned<T>(_: PoisonError<T>) -> Error {
    Error::Storage("lock poisoned".into())
}
