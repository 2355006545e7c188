//! Operator traits + common interfaces.
//!
//! `OpIterator` is the pull protocol every node of an execution tree exposes.
//! Concrete operators do not implement it directly: they implement
//! `Producer` (one `produce_next` primitive plus optional open/close hooks) and
//! are wrapped in [`Operator`](crate::operator::Operator), which supplies the
//! prefetch slot, the state machine and `rewind`.

use std::sync::Arc;

use tessera_core::id::TableId;
use tessera_core::schema::TupleDesc;
use tessera_core::tuple::Tuple;

use thiserror::Error;

use crate::operator::Operator;

pub type Result<T> = std::result::Result<T, OpError>;

/// Owned, type-erased node of an execution tree.
pub type BoxedOp = Box<dyn OpIterator>;

#[derive(Debug, Error)]
pub enum OpError {
    /// Protocol misuse, e.g. `next()` before `open()` or a double `open()`.
    #[error("illegal state: {0}")]
    IllegalState(String),

    /// `next()` with nothing left to produce.
    #[error("no such element")]
    NoSuchElement,

    #[error("schema mismatch for {table}: table is [{expected}], child produces [{found}]")]
    SchemaMismatch {
        table: TableId,
        expected: TupleDesc,
        found: TupleDesc,
    },

    #[error(transparent)]
    Core(#[from] tessera_core::Error),
}

impl OpError {
    pub fn is_transaction_aborted(&self) -> bool {
        matches!(self, OpError::Core(e) if e.is_transaction_aborted())
    }
}

/// Pull-based iterator protocol.
///
/// Lifecycle: `open` → (`has_next`/`next`)* → `close`. `rewind` restarts the
/// sequence from the beginning and may be called at any point while open.
pub trait OpIterator: Send {
    /// Human-readable operator name (stable).
    fn name(&self) -> &'static str;

    fn open(&mut self) -> Result<()>;

    /// Whether another tuple is available. Repeated calls without `next()`
    /// do not advance the underlying source.
    fn has_next(&mut self) -> Result<bool>;

    fn next(&mut self) -> Result<Tuple>;

    fn rewind(&mut self) -> Result<()>;

    fn close(&mut self);

    fn tuple_desc(&self) -> &Arc<TupleDesc>;

    /// Direct children, left to right.
    fn children(&self) -> Vec<&dyn OpIterator>;

    /// Replace the direct children. The count must match the operator's arity.
    fn set_children(&mut self, children: Vec<BoxedOp>) -> Result<()>;
}

/// The single primitive a concrete operator supplies.
///
/// Invariants:
/// - `produce_next` is only called between `open` and `close`.
/// - `open` must reset the producer to the start of its sequence; `close`
///   must tolerate being called repeatedly.
pub trait Producer: Send {
    fn name(&self) -> &'static str;

    fn tuple_desc(&self) -> &Arc<TupleDesc>;

    fn open(&mut self) -> Result<()> {
        Ok(())
    }

    fn close(&mut self) {}

    /// Next tuple, or `None` once the sequence is exhausted.
    fn produce_next(&mut self) -> Result<Option<Tuple>>;

    fn children(&self) -> Vec<&dyn OpIterator> {
        Vec::new()
    }

    fn set_children(&mut self, children: Vec<BoxedOp>) -> Result<()> {
        let [] = take_children::<0>(self.name(), children)?;
        Ok(())
    }

    /// Wrap in the full iterator protocol.
    fn into_operator(self) -> Operator<Self>
    where
        Self: Sized,
    {
        Operator::new(self)
    }

    fn boxed(self) -> BoxedOp
    where
        Self: Sized + 'static,
    {
        Box::new(Operator::new(self))
    }
}

/// Check a replacement child list against an operator's arity.
pub fn take_children<const N: usize>(name: &str, children: Vec<BoxedOp>) -> Result<[BoxedOp; N]> {
    let got = children.len();
    children.try_into().map_err(|_| {
        OpError::IllegalState(format!("{name} expects {N} children, got {got}"))
    })
}
