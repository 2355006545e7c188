//! Field types and values.
//!
//! Every type has a fixed on-page width so tuples of a given `TupleDesc` are
//! all the same size. Values are a closed enum narrowed by the declared type.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Maximum payload bytes of a `String` field.
pub const STRING_LEN: usize = 128;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Type {
    Int,
    String,
}

impl Type {
    /// Fixed number of bytes a value of this type occupies on a page.
    pub const fn len(self) -> usize {
        match self {
            Type::Int => 4,
            // length prefix + padded payload
            Type::String => STRING_LEN + 4,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Int => write!(f, "INT_TYPE"),
            Type::String => write!(f, "STRING_TYPE"),
        }
    }
}

/// Comparison operators usable against field values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Op {
    Equals,
    NotEquals,
    GreaterThan,
    GreaterThanOrEq,
    LessThan,
    LessThanOrEq,
}

impl Op {
    fn holds(self, ord: Ordering) -> bool {
        match self {
            Op::Equals => ord == Ordering::Equal,
            Op::NotEquals => ord != Ordering::Equal,
            Op::GreaterThan => ord == Ordering::Greater,
            Op::GreaterThanOrEq => ord != Ordering::Less,
            Op::LessThan => ord == Ordering::Less,
            Op::LessThanOrEq => ord != Ordering::Greater,
        }
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Op::Equals => "=",
            Op::NotEquals => "<>",
            Op::GreaterThan => ">",
            Op::GreaterThanOrEq => ">=",
            Op::LessThan => "<",
            Op::LessThanOrEq => "<=",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Field {
    Int(i32),
    String(String),
}

impl Field {
    pub fn get_type(&self) -> Type {
        match self {
            Field::Int(_) => Type::Int,
            Field::String(_) => Type::String,
        }
    }

    /// Evaluate `self op other`. Values of different types never compare true.
    pub fn compare(&self, op: Op, other: &Field) -> bool {
        match (self, other) {
            (Field::Int(a), Field::Int(b)) => op.holds(a.cmp(b)),
            (Field::String(a), Field::String(b)) => op.holds(a.cmp(b)),
            _ => false,
        }
    }

    pub fn as_int(&self) -> Option<i32> {
        match self {
            Field::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Field::String(s) => Some(s),
            _ => None,
        }
    }
}

impl From<i32> for Field {
    fn from(v: i32) -> Self {
        Field::Int(v)
    }
}

impl From<&str> for Field {
    fn from(v: &str) -> Self {
        Field::String(v.to_string())
    }
}

impl From<String> for Field {
    fn from(v: String) -> Self {
        Field::String(v)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Int(v) => write!(f, "{v}"),
            Field::String(s) => write!(f, "{s}"),
        }
    }
}
