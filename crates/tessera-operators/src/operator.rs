//! The iterator state machine shared by every operator.
//!
//! `Operator<P>` turns any `Producer` into a full `OpIterator`:
//!
//! ```text
//!   Closed --open--> Open --produce_next() == None--> Exhausted
//!     ^                |                                  |
//!     +-----close------+---------------close--------------+
//! ```
//!
//! `has_next` pulls at most one tuple ahead into a one-slot buffer, so peeking
//! twice never advances the producer. `rewind` is `close` then `open`.

use std::sync::Arc;

use tessera_core::schema::TupleDesc;
use tessera_core::tuple::Tuple;

use crate::traits::{BoxedOp, OpError, OpIterator, Producer, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Closed,
    Open,
    Exhausted,
}

pub struct Operator<P> {
    producer: P,
    state: State,
    next: Option<Tuple>,
}

impl<P: Producer> Operator<P> {
    pub fn new(producer: P) -> Self {
        Self {
            producer,
            state: State::Closed,
            next: None,
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn producer(&self) -> &P {
        &self.producer
    }

    pub fn into_inner(self) -> P {
        self.producer
    }
}

impl<P: Producer> OpIterator for Operator<P> {
    fn name(&self) -> &'static str {
        self.producer.name()
    }

    fn open(&mut self) -> Result<()> {
        if self.state != State::Closed {
            return Err(OpError::IllegalState(format!(
                "{} is already open",
                self.producer.name()
            )));
        }
        self.next = None;
        self.producer.open()?;
        self.state = State::Open;
        #[cfg(feature = "tracing")]
        tracing::trace!(op = self.producer.name(), "open");
        Ok(())
    }

    fn has_next(&mut self) -> Result<bool> {
        match self.state {
            State::Closed => Err(OpError::IllegalState(format!(
                "has_next on closed {}",
                self.producer.name()
            ))),
            State::Exhausted => Ok(false),
            State::Open => {
                if self.next.is_none() {
                    match self.producer.produce_next()? {
                        Some(t) => self.next = Some(t),
                        None => self.state = State::Exhausted,
                    }
                }
                Ok(self.next.is_some())
            }
        }
    }

    fn next(&mut self) -> Result<Tuple> {
        if !self.has_next()? {
            return Err(OpError::NoSuchElement);
        }
        self.next.take().ok_or(OpError::NoSuchElement)
    }

    fn rewind(&mut self) -> Result<()> {
        self.close();
        self.open()
    }

    fn close(&mut self) {
        // Always forwarded: a failed open may have left children open.
        self.producer.close();
        self.next = None;
        if self.state != State::Closed {
            #[cfg(feature = "tracing")]
            tracing::trace!(op = self.producer.name(), "close");
        }
        self.state = State::Closed;
    }

    fn tuple_desc(&self) -> &Arc<TupleDesc> {
        self.producer.tuple_desc()
    }

    fn children(&self) -> Vec<&dyn OpIterator> {
        self.producer.children()
    }

    fn set_children(&mut self, children: Vec<BoxedOp>) -> Result<()> {
        self.producer.set_children(children)
    }
}
