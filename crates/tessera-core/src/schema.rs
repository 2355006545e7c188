//! Tuple schema descriptors.
//!
//! A `TupleDesc` is built once per row shape and shared (behind an `Arc`) by
//! every tuple and operator that produces that shape. It is never mutated;
//! `merge` builds a new descriptor.

use std::fmt;
use std::slice;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::hash::Fingerprint;
use crate::types::Type;

/// Name given to every field by [`TupleDesc::from_types`].
pub const UNNAMED_FIELD: &str = "unnamed";

/// One field of a descriptor: its type and an optional name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TdItem {
    pub field_type: Type,
    pub field_name: Option<String>,
}

impl TdItem {
    pub fn new(field_type: Type, field_name: Option<String>) -> Self {
        Self {
            field_type,
            field_name,
        }
    }
}

impl fmt::Display for TdItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}({})",
            self.field_type,
            self.field_name.as_deref().unwrap_or("null")
        )
    }
}

/// Ordered list of typed, optionally named fields.
///
/// Equality is structural: same length, and per position the same type and
/// the same name (two unset names are equal). `Hash` is derived from the same
/// items, so descriptors are usable as map keys. Use [`TupleDesc::types_match`]
/// for a name-insensitive comparison.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TupleDesc {
    items: Vec<TdItem>,
}

impl TupleDesc {
    /// Build a descriptor from parallel type and name lists.
    ///
    /// Both lists must be non-empty and of equal length. Individual names may
    /// be `None`.
    pub fn new<S: Into<String>>(types: Vec<Type>, names: Vec<Option<S>>) -> Result<Self> {
        if types.is_empty() {
            return Err(Error::InvalidSchema("at least one field type is required".into()));
        }
        if names.is_empty() {
            return Err(Error::InvalidSchema("at least one field name slot is required".into()));
        }
        if types.len() != names.len() {
            return Err(Error::InvalidSchema(format!(
                "{} types but {} names",
                types.len(),
                names.len()
            )));
        }

        let items = types
            .into_iter()
            .zip(names)
            .map(|(t, n)| TdItem::new(t, n.map(Into::into)))
            .collect();
        Ok(Self { items })
    }

    /// Build a descriptor where every field is named [`UNNAMED_FIELD`].
    ///
    /// The placeholder is a real name: such a descriptor is not equal to one
    /// whose names are unset.
    pub fn from_types(types: Vec<Type>) -> Result<Self> {
        if types.is_empty() {
            return Err(Error::InvalidSchema("at least one field type is required".into()));
        }
        let items = types
            .into_iter()
            .map(|t| TdItem::new(t, Some(UNNAMED_FIELD.to_string())))
            .collect();
        Ok(Self { items })
    }

    pub fn from_items(items: Vec<TdItem>) -> Result<Self> {
        if items.is_empty() {
            return Err(Error::InvalidSchema("at least one field is required".into()));
        }
        Ok(Self { items })
    }

    pub fn num_fields(&self) -> usize {
        self.items.len()
    }

    /// Name of the `i`th field (`None` when the field is anonymous).
    pub fn field_name(&self, i: usize) -> Result<Option<&str>> {
        self.item(i).map(|item| item.field_name.as_deref())
    }

    pub fn field_type(&self, i: usize) -> Result<Type> {
        self.item(i).map(|item| item.field_type)
    }

    fn item(&self, i: usize) -> Result<&TdItem> {
        self.items.get(i).ok_or_else(|| {
            Error::NoSuchField(format!("index {i} (descriptor has {} fields)", self.items.len()))
        })
    }

    /// Index of the first field named `name`.
    ///
    /// A `None` query matches the first anonymous field.
    pub fn field_name_to_index(&self, name: Option<&str>) -> Result<usize> {
        self.items
            .iter()
            .position(|item| item.field_name.as_deref() == name)
            .ok_or_else(|| Error::NoSuchField(name.unwrap_or("null").to_string()))
    }

    /// Bytes occupied by one tuple of this shape.
    pub fn size(&self) -> usize {
        self.items.iter().map(|item| item.field_type.len()).sum()
    }

    /// Concatenate `a`'s fields followed by `b`'s into a new descriptor.
    pub fn merge(a: &TupleDesc, b: &TupleDesc) -> TupleDesc {
        let mut items = Vec::with_capacity(a.items.len() + b.items.len());
        items.extend(a.items.iter().cloned());
        items.extend(b.items.iter().cloned());
        TupleDesc { items }
    }

    /// True when both descriptors have the same field types in the same order,
    /// ignoring names.
    pub fn types_match(&self, other: &TupleDesc) -> bool {
        self.items.len() == other.items.len()
            && self
                .items
                .iter()
                .zip(&other.items)
                .all(|(a, b)| a.field_type == b.field_type)
    }

    pub fn iter(&self) -> slice::Iter<'_, TdItem> {
        self.items.iter()
    }

    pub fn types(&self) -> impl Iterator<Item = Type> + '_ {
        self.items.iter().map(|item| item.field_type)
    }

    /// Stable content hash of the field list.
    pub fn fingerprint(&self) -> Result<Fingerprint> {
        Fingerprint::of_serde("tuple_desc", &self.items)
    }
}

impl<'a> IntoIterator for &'a TupleDesc {
    type Item = &'a TdItem;
    type IntoIter = slice::Iter<'a, TdItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl fmt::Display for TupleDesc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, item) in self.items.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{item}")?;
        }
        Ok(())
    }
}
