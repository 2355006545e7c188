//! Convenient re-exports for downstream crates.

pub use crate::buffer::{BufferManager, Catalog, DbFile};
pub use crate::config::EngineConfig;
pub use crate::error::{Error, Result};
pub use crate::id::{PageId, RecordId, TableId, TransactionId};
pub use crate::schema::{TdItem, TupleDesc};
pub use crate::table::Table;
pub use crate::tuple::Tuple;
pub use crate::types::{Field, Op, Type};
