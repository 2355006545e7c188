//! In-memory rows.

use std::fmt;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::id::RecordId;
use crate::schema::TupleDesc;
use crate::types::{Field, STRING_LEN};

/// A row conforming to a shared `TupleDesc`.
///
/// The number of slots always equals `tuple_desc().num_fields()`, and a
/// stored value always has the type declared at its position.
#[derive(Debug, Clone, PartialEq)]
pub struct Tuple {
    desc: Arc<TupleDesc>,
    fields: Vec<Option<Field>>,
    record_id: Option<RecordId>,
}

impl Tuple {
    /// Create an empty tuple: every field unset, no record id.
    pub fn new(desc: Arc<TupleDesc>) -> Self {
        let fields = vec![None; desc.num_fields()];
        Self {
            desc,
            fields,
            record_id: None,
        }
    }

    /// Build a fully populated tuple, checking every value against `desc`.
    pub fn from_fields(desc: Arc<TupleDesc>, values: Vec<Field>) -> Result<Self> {
        if values.len() != desc.num_fields() {
            return Err(Error::IndexOutOfRange {
                index: values.len(),
                len: desc.num_fields(),
            });
        }
        let mut tuple = Tuple::new(desc);
        for (i, value) in values.into_iter().enumerate() {
            tuple.set_field(i, value)?;
        }
        Ok(tuple)
    }

    pub fn tuple_desc(&self) -> &Arc<TupleDesc> {
        &self.desc
    }

    /// Store `value` at `i`. The value must have the declared type and, for
    /// strings, fit in `STRING_LEN` bytes.
    pub fn set_field(&mut self, i: usize, value: Field) -> Result<()> {
        let len = self.fields.len();
        let slot = self
            .fields
            .get_mut(i)
            .ok_or(Error::IndexOutOfRange { index: i, len })?;
        let expected = self.desc.field_type(i)?;
        let found = value.get_type();
        if expected != found {
            return Err(Error::TypeMismatch {
                index: i,
                expected,
                found,
            });
        }
        if let Field::String(s) = &value {
            if s.len() > STRING_LEN {
                return Err(Error::ValueTooLong {
                    index: i,
                    len: s.len(),
                    max: STRING_LEN,
                });
            }
        }
        *slot = Some(value);
        Ok(())
    }

    /// Value at `i`, or `None` if it was never set.
    pub fn get_field(&self, i: usize) -> Result<Option<&Field>> {
        self.fields
            .get(i)
            .map(Option::as_ref)
            .ok_or(Error::IndexOutOfRange {
                index: i,
                len: self.fields.len(),
            })
    }

    pub fn fields(&self) -> impl Iterator<Item = Option<&Field>> + '_ {
        self.fields.iter().map(Option::as_ref)
    }

    pub fn record_id(&self) -> Option<RecordId> {
        self.record_id
    }

    pub fn set_record_id(&mut self, rid: RecordId) {
        self.record_id = Some(rid);
    }
}

impl fmt::Display for Tuple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, field) in self.fields.iter().enumerate() {
            if i > 0 {
                write!(f, "\t")?;
            }
            match field {
                Some(v) => write!(f, "{v}")?,
                None => write!(f, "null")?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::{PageId, TableId};
    use crate::types::Type;

    fn desc() -> Arc<TupleDesc> {
        let types = vec![Type::Int, Type::String];
        Arc::new(TupleDesc::new(types, vec![Some("id"), Some("name")]).unwrap())
    }

    #[test]
    fn new_tuple_is_unset() {
        let t = Tuple::new(desc());
        assert_eq!(t.get_field(0).unwrap(), None);
        assert_eq!(t.get_field(1).unwrap(), None);
        assert_eq!(t.record_id(), None);
        assert_eq!(t.fields().count(), 2);
    }

    #[test]
    fn set_and_get() {
        let mut t = Tuple::new(desc());
        t.set_field(0, Field::Int(7)).unwrap();
        t.set_field(1, Field::from("ada")).unwrap();
        assert_eq!(t.get_field(0).unwrap(), Some(&Field::Int(7)));
        assert_eq!(t.get_field(1).unwrap(), Some(&Field::from("ada")));
        assert_eq!(t.to_string(), "7\tada");
    }

    #[test]
    fn out_of_range_access_fails() {
        let mut t = Tuple::new(desc());
        assert!(matches!(
            t.set_field(2, Field::Int(1)),
            Err(Error::IndexOutOfRange { index: 2, len: 2 })
        ));
        assert!(matches!(t.get_field(9), Err(Error::IndexOutOfRange { .. })));
    }

    #[test]
    fn type_is_checked_on_store() {
        let mut t = Tuple::new(desc());
        let err = t.set_field(0, Field::from("nope")).unwrap_err();
        assert!(matches!(
            err,
            Error::TypeMismatch {
                index: 0,
                expected: Type::Int,
                found: Type::String
            }
        ));
        assert_eq!(t.get_field(0).unwrap(), None);
    }

    #[test]
    fn from_fields_checks_arity() {
        assert!(Tuple::from_fields(desc(), vec![Field::Int(1)]).is_err());
        let t = Tuple::from_fields(desc(), vec![Field::Int(1), Field::from("x")]).unwrap();
        assert_eq!(t.get_field(0).unwrap().and_then(Field::as_int), Some(1));
    }

    #[test]
    fn descriptor_is_shared() {
        let d = desc();
        let a = Tuple::new(Arc::clone(&d));
        let b = Tuple::new(Arc::clone(&d));
        assert!(Arc::ptr_eq(a.tuple_desc(), b.tuple_desc()));
    }

    #[test]
    fn record_id_round_trip() {
        let mut t = Tuple::new(desc());
        let rid = RecordId::new(PageId::new(TableId::new(1), 0), 3);
        t.set_record_id(rid);
        assert_eq!(t.record_id(), Some(rid));
    }

    #[test]
    fn strings_longer_than_a_slot_are_rejected() {
        let mut t = Tuple::new(desc());
        let fits = "x".repeat(STRING_LEN);
        t.set_field(1, Field::from(fits.as_str())).unwrap();

        let long = Field::from("x".repeat(STRING_LEN + 1));
        let err = t.set_field(1, long).unwrap_err();
        assert!(matches!(
            err,
            Error::ValueTooLong {
                index: 1,
                len: 129,
                max: STRING_LEN
            }
        ));
        // the previous value is kept
        assert_eq!(t.get_field(1).unwrap(), Some(&Field::from(fits)));
        let long = vec![Field::Int(1), Field::from("y".repeat(200))];
        assert!(Tuple::from_fields(desc(), long).is_err());
    }
}
