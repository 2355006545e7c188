//! Transactional insert.
//!
//! Drains its child into a table through the buffer manager and emits a single
//! one-field row holding the number of rows inserted. Nothing is emitted when
//! the child produced no rows. A row that would push the count past
//! `i32::MAX` is refused before it reaches the buffer manager.

use std::sync::Arc;

use tessera_core::buffer::{BufferManager, Catalog};
use tessera_core::id::{TableId, TransactionId};
use tessera_core::schema::TupleDesc;
use tessera_core::tuple::Tuple;
use tessera_core::types::{Field, Type};

use crate::traits::{take_children, BoxedOp, OpError, OpIterator, Producer, Result};

pub struct Insert {
    tid: TransactionId,
    child: BoxedOp,
    table: TableId,
    buffer_pool: Arc<dyn BufferManager>,
    /// Descriptor of the target table; child output must match its types.
    target: Arc<TupleDesc>,
    desc: Arc<TupleDesc>,
    done: bool,
}

impl Insert {
    /// Fails with `SchemaMismatch` when the child's field types differ from
    /// the table's. Field names are not compared.
    pub fn try_new(
        tid: TransactionId,
        child: BoxedOp,
        table: TableId,
        catalog: &dyn Catalog,
        buffer_pool: Arc<dyn BufferManager>,
    ) -> Result<Self> {
        let target = catalog.tuple_desc(table)?;
        check_schema(table, &target, child.tuple_desc())?;
        Ok(Self {
            tid,
            child,
            table,
            buffer_pool,
            target,
            desc: Arc::new(TupleDesc::from_types(vec![Type::Int])?),
            done: false,
        })
    }

    pub fn table_id(&self) -> TableId {
        self.table
    }

    pub fn transaction_id(&self) -> TransactionId {
        self.tid
    }
}

fn check_schema(table: TableId, target: &TupleDesc, found: &TupleDesc) -> Result<()> {
    if target.types_match(found) {
        return Ok(());
    }
    Err(OpError::SchemaMismatch {
        table,
        expected: target.clone(),
        found: found.clone(),
    })
}

fn bump_count(count: i32) -> Result<i32> {
    count.checked_add(1).ok_or_else(|| {
        OpError::IllegalState(format!("insert count {count} overflows an INT field"))
    })
}

impl Producer for Insert {
    fn name(&self) -> &'static str {
        "insert"
    }

    fn tuple_desc(&self) -> &Arc<TupleDesc> {
        &self.desc
    }

    fn open(&mut self) -> Result<()> {
        self.done = false;
        self.child.open()
    }

    fn close(&mut self) {
        self.child.close();
    }

    fn produce_next(&mut self) -> Result<Option<Tuple>> {
        if self.done {
            return Ok(None);
        }
        self.done = true;

        if !self.child.has_next()? {
            return Ok(None);
        }

        // No local rollback: a failure leaves earlier rows staged under `tid`.
        let (tid, table) = (self.tid, self.table);
        let mut count: i32 = 0;
        while self.child.has_next()? {
            let mut row = self.child.next()?;
            let next = bump_count(count)?;
            self.buffer_pool.insert_tuple(tid, table, &mut row)?;
            count = next;
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(%table, %tid, count, "insert complete");

        let summary = Tuple::from_fields(Arc::clone(&self.desc), vec![Field::Int(count)])?;
        Ok(Some(summary))
    }

    fn children(&self) -> Vec<&dyn OpIterator> {
        vec![self.child.as_ref()]
    }

    fn set_children(&mut self, children: Vec<BoxedOp>) -> Result<()> {
        let [child] = take_children::<1>(self.name(), children)?;
        check_schema(self.table, &self.target, child.tuple_desc())?;
        self.child = child;
        Ok(())
    }
}
