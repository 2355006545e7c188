//! Row predicates for `Filter` and `Join`.

use std::fmt;

use serde::{Deserialize, Serialize};

use tessera_core::tuple::Tuple;
use tessera_core::types::{Field, Op};

use crate::traits::Result;

/// `tuple[field] op operand`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Predicate {
    pub field: usize,
    pub op: Op,
    pub operand: Field,
}

impl Predicate {
    pub fn new(field: usize, op: Op, operand: impl Into<Field>) -> Self {
        Self {
            field,
            op,
            operand: operand.into(),
        }
    }

    /// Unset fields never satisfy a predicate.
    pub fn filter(&self, tuple: &Tuple) -> Result<bool> {
        Ok(tuple
            .get_field(self.field)?
            .is_some_and(|v| v.compare(self.op, &self.operand)))
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${} {} {}", self.field, self.op, self.operand)
    }
}

/// `left[left_field] op right[right_field]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinPredicate {
    pub left_field: usize,
    pub op: Op,
    pub right_field: usize,
}

impl JoinPredicate {
    pub fn new(left_field: usize, op: Op, right_field: usize) -> Self {
        Self {
            left_field,
            op,
            right_field,
        }
    }

    pub fn filter(&self, left: &Tuple, right: &Tuple) -> Result<bool> {
        let l = left.get_field(self.left_field)?;
        let r = right.get_field(self.right_field)?;
        Ok(match (l, r) {
            (Some(l), Some(r)) => l.compare(self.op, r),
            _ => false,
        })
    }
}

impl fmt::Display for JoinPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (left, right) = (self.left_field, self.right_field);
        write!(f, "left.${left} {} right.${right}", self.op)
    }
}
