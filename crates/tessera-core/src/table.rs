//! Catalog entry binding a table id to its name, primary key and storage.

use std::fmt;
use std::sync::Arc;

use crate::buffer::DbFile;
use crate::id::TableId;
use crate::schema::TupleDesc;

/// Immutable table metadata. Created when a table is registered with a
/// catalog and kept for as long as it stays registered.
#[derive(Clone)]
pub struct Table {
    id: TableId,
    name: String,
    primary_key_name: String,
    file: Arc<dyn DbFile>,
}

impl Table {
    pub fn new(
        id: TableId,
        name: impl Into<String>,
        primary_key_name: impl Into<String>,
        file: Arc<dyn DbFile>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            primary_key_name: primary_key_name.into(),
            file,
        }
    }

    pub fn id(&self) -> TableId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Empty when the table has no primary key.
    pub fn primary_key_name(&self) -> &str {
        &self.primary_key_name
    }

    pub fn file(&self) -> &Arc<dyn DbFile> {
        &self.file
    }

    pub fn tuple_desc(&self) -> &Arc<TupleDesc> {
        self.file.tuple_desc()
    }
}

impl fmt::Debug for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Table")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("primary_key_name", &self.primary_key_name)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use crate::id::RecordId;
    use crate::tuple::Tuple;
    use crate::types::Type;

    struct NullFile {
        desc: Arc<TupleDesc>,
    }

    impl DbFile for NullFile {
        fn id(&self) -> TableId {
            TableId::new(3)
        }
        fn tuple_desc(&self) -> &Arc<TupleDesc> {
            &self.desc
        }
        fn insert_tuple(&self, _tuple: &mut Tuple) -> Result<RecordId> {
            unimplemented!()
        }
        fn scan(&self) -> Result<Vec<Tuple>> {
            Ok(vec![])
        }
        fn num_pages(&self) -> usize {
            0
        }
    }

    #[test]
    fn accessors_return_constructor_values() {
        let desc = Arc::new(TupleDesc::from_types(vec![Type::Int]).unwrap());
        let file: Arc<dyn DbFile> = Arc::new(NullFile {
            desc: Arc::clone(&desc),
        });
        let table = Table::new(TableId::new(3), "users", "", Arc::clone(&file));

        assert_eq!(table.id(), TableId::new(3));
        assert_eq!(table.name(), "users");
        assert_eq!(table.primary_key_name(), "");
        assert!(Arc::ptr_eq(table.file(), &file));
        assert_eq!(table.tuple_desc(), &desc);
    }
}
