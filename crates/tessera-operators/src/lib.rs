#![forbid(unsafe_code)]
//! tessera-operators: the pull-based iterator protocol and the operators
//! built on it (scans, filter, nested-loop join, transactional insert).
//!
//! Design intent:
//! - Synchronous and single-threaded per tree; collaborators (`Catalog`,
//!   `BufferManager`) are injected trait objects from `tessera-core`.
//! - Operators implement `Producer` only; `Operator<P>` owns the prefetch slot
//!   and lifecycle checks so every node behaves identically.

pub mod operator;
pub mod plan;
pub mod predicate;
pub mod traits;

pub mod filter;
pub mod insert;
pub mod join;
pub mod scan;

pub use filter::Filter;
pub use insert::Insert;
pub use join::Join;
pub use operator::{Operator, State};
pub use plan::explain;
pub use predicate::{JoinPredicate, Predicate};
pub use scan::{SeqScan, TupleScan};
pub use traits::{BoxedOp, OpError, OpIterator, Producer, Result};
