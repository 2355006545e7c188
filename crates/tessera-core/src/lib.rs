#![forbid(unsafe_code)]
//! tessera-core: schema descriptors, tuples, table metadata, IDs, config, and
//! the storage collaborator traits the execution layer calls into.
//!
//! No I/O and no operator logic live here. `tessera-buffer` implements the
//! storage traits in memory; `tessera-operators` builds iterator trees on top.

pub mod buffer;
pub mod config;
pub mod error;
pub mod hash;
pub mod id;
pub mod prelude;
pub mod schema;
pub mod table;
pub mod tuple;
pub mod types;

pub use error::{Error, Result};
