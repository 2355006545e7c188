//! Abstract storage collaborator interfaces.
//!
//! The concrete in-memory implementations live in `tessera-buffer`. We keep
//! only traits here so any crate can depend on the API without pulling the
//! page bookkeeping in.

use std::sync::Arc;

use crate::error::Result;
use crate::id::{PageId, RecordId, TableId, TransactionId};
use crate::schema::TupleDesc;
use crate::table::Table;
use crate::tuple::Tuple;

/// Physical storage handle for one table.
pub trait DbFile: Send + Sync {
    fn id(&self) -> TableId;

    fn tuple_desc(&self) -> &Arc<TupleDesc>;

    /// Store `tuple` and stamp it with its new location.
    fn insert_tuple(&self, tuple: &mut Tuple) -> Result<RecordId>;

    /// Snapshot of every stored tuple in page/slot order.
    fn scan(&self) -> Result<Vec<Tuple>>;

    fn num_pages(&self) -> usize;

    /// Page the next `insert_tuple` would write to, when the file can tell
    /// ahead of time. Buffer managers use it for admission checks.
    fn next_insert_page(&self) -> Option<PageId> {
        None
    }
}

/// Resolves table ids to their metadata.
pub trait Catalog: Send + Sync {
    fn table(&self, id: TableId) -> Result<Arc<Table>>;

    fn table_id(&self, name: &str) -> Result<TableId>;

    fn tuple_desc(&self, id: TableId) -> Result<Arc<TupleDesc>> {
        Ok(Arc::clone(self.table(id)?.tuple_desc()))
    }
}

/// Shared mediator for transactional writes.
///
/// May be shared by several transactions on different threads. Callers must
/// treat `insert_tuple` as potentially blocking; isolation between
/// transactions is entirely the implementor's concern.
pub trait BufferManager: Send + Sync {
    /// Stage `tuple` into `table` on behalf of `tid`, stamping its record id.
    ///
    /// Fails with `Error::Storage` or `Error::TransactionAborted`.
    fn insert_tuple(
        &self,
        tid: TransactionId,
        table: TableId,
        tuple: &mut Tuple,
    ) -> Result<RecordId>;
}

// NOTE: no blanket impls here; a missing collaborator must be a compile error,
// not a silent no-op.
