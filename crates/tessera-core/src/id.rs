//! Strongly-typed identifiers used across the engine.
//!
//! Downstream crates (operators, buffer, etc.) should *not* use raw integers for IDs.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

macro_rules! new_id {
    ($name:ident) => {
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Ord, PartialOrd,
        )]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            pub const fn new(v: u64) -> Self {
                Self(v)
            }
            pub const fn get(self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }
    };
}

new_id!(TableId);
new_id!(TransactionId);

static NEXT_TRANSACTION: AtomicU64 = AtomicU64::new(0);

impl TransactionId {
    /// Allocate a process-unique transaction id.
    pub fn fresh() -> Self {
        Self(NEXT_TRANSACTION.fetch_add(1, Ordering::Relaxed))
    }
}

/// A page of a specific table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageId {
    pub table: TableId,
    pub page_no: u32,
}

impl PageId {
    pub const fn new(table: TableId, page_no: u32) -> Self {
        Self { table, page_no }
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.table.get(), self.page_no)
    }
}

/// Physical location of a stored tuple: a page and a slot on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordId {
    pub page: PageId,
    pub slot: u32,
}

impl RecordId {
    pub const fn new(page: PageId, slot: u32) -> Self {
        Self { page, slot }
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.page, self.slot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_transaction_ids_are_distinct() {
        let a = TransactionId::fresh();
        let b = TransactionId::fresh();
        assert_ne!(a, b);
    }

    #[test]
    fn record_id_display() {
        let rid = RecordId::new(PageId::new(TableId::new(7), 2), 13);
        assert_eq!(rid.to_string(), "7:2#13");
        assert_eq!(TableId::new(7).to_string(), "TableId(7)");
    }
}
