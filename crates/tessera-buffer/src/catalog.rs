//! In-memory catalog: table id and name lookups over registered tables.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use tessera_core::buffer::{Catalog, DbFile};
use tessera_core::config::EngineConfig;
use tessera_core::error::{Error, Result};
use tessera_core::id::TableId;
use tessera_core::schema::TupleDesc;
use tessera_core::table::Table;

use crate::file::MemoryFile;
use crate::poisoned;

#[derive(Default)]
struct CatalogInner {
    by_id: HashMap<TableId, Arc<Table>>,
    by_name: HashMap<String, TableId>,
    next_id: u64,
}

impl CatalogInner {
    fn register(&mut self, table: Arc<Table>) {
        if let Some(old_id) = self.by_name.remove(table.name()) {
            self.by_id.remove(&old_id);
        }
        if let Some(old) = self.by_id.remove(&table.id()) {
            self.by_name.remove(old.name());
        }

        self.next_id = self.next_id.max(table.id().get() + 1);
        self.by_name.insert(table.name().to_string(), table.id());
        self.by_id.insert(table.id(), table);
    }
}

/// Thread-safe catalog of registered tables.
#[derive(Default)]
pub struct MemoryCatalog {
    inner: RwLock<CatalogInner>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `file` as `name`.
    ///
    /// A table already registered under the same name or the same id is
    /// replaced.
    pub fn add_table(
        &self,
        file: Arc<dyn DbFile>,
        name: &str,
        primary_key_name: &str,
    ) -> Result<Arc<Table>> {
        let table = Arc::new(Table::new(file.id(), name, primary_key_name, file));
        let mut inner = self.inner.write().map_err(poisoned)?;
        inner.register(Arc::clone(&table));
        Ok(table)
    }

    /// Allocate a fresh id, back it with a `MemoryFile` and register it.
    ///
    /// Allocation and registration happen under one write lock, so concurrent
    /// callers always receive distinct ids.
    pub fn create_table(
        &self,
        name: &str,
        primary_key_name: &str,
        desc: TupleDesc,
        cfg: &EngineConfig,
    ) -> Result<TableId> {
        let desc = Arc::new(desc);
        let mut inner = self.inner.write().map_err(poisoned)?;
        let id = TableId::new(inner.next_id);
        let file = MemoryFile::new(id, desc, cfg)?;
        let table = Table::new(id, name, primary_key_name, Arc::new(file));
        inner.register(Arc::new(table));
        Ok(id)
    }

    /// Registered ids in ascending order.
    pub fn table_ids(&self) -> Result<Vec<TableId>> {
        let inner = self.inner.read().map_err(poisoned)?;
        let mut ids: Vec<_> = inner.by_id.keys().copied().collect();
        ids.sort();
        Ok(ids)
    }

    pub fn clear(&self) -> Result<()> {
        let mut inner = self.inner.write().map_err(poisoned)?;
        inner.by_id.clear();
        inner.by_name.clear();
        Ok(())
    }
}

impl Catalog for MemoryCatalog {
    fn table(&self, id: TableId) -> Result<Arc<Table>> {
        let inner = self.inner.read().map_err(poisoned)?;
        inner
            .by_id
            .get(&id)
            .cloned()
            .ok_or_else(|| Error::no_such_table(id))
    }

    fn table_id(&self, name: &str) -> Result<TableId> {
        let inner = self.inner.read().map_err(poisoned)?;
        inner
            .by_name
            .get(name)
            .copied()
            .ok_or_else(|| Error::NoSuchTable(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Barrier;
    use std::thread;
    use tessera_core::types::Type;

    fn desc() -> TupleDesc {
        TupleDesc::new(
            vec![Type::Int, Type::String],
            vec![Some("id"), Some("name")],
        )
        .unwrap()
    }

    #[test]
    fn create_and_resolve() {
        let catalog = MemoryCatalog::new();
        let cfg = EngineConfig::default();
        let a = catalog.create_table("a", "id", desc(), &cfg).unwrap();
        let b = catalog.create_table("b", "", desc(), &cfg).unwrap();
        assert_ne!(a, b);

        assert_eq!(catalog.table_id("a").unwrap(), a);
        let table = catalog.table(b).unwrap();
        assert_eq!(table.name(), "b");
        assert_eq!(table.primary_key_name(), "");
        assert_eq!(*catalog.tuple_desc(a).unwrap(), desc());
        assert_eq!(catalog.table_ids().unwrap(), vec![a, b]);
    }

    #[test]
    fn unknown_lookups_fail() {
        let catalog = MemoryCatalog::new();
        assert!(matches!(catalog.table(TableId::new(9)), Err(Error::NoSuchTable(_))));
        assert!(matches!(catalog.table_id("nope"), Err(Error::NoSuchTable(_))));
    }

    #[test]
    fn same_name_replaces_previous_table() {
        let catalog = MemoryCatalog::new();
        let cfg = EngineConfig::default();
        let first = catalog.create_table("t", "", desc(), &cfg).unwrap();
        let second = catalog.create_table("t", "", desc(), &cfg).unwrap();

        assert_eq!(catalog.table_id("t").unwrap(), second);
        assert!(catalog.table(first).is_err());
        assert_eq!(catalog.table_ids().unwrap(), vec![second]);
    }

    #[test]
    fn concurrent_creates_get_distinct_ids() {
        let catalog = Arc::new(MemoryCatalog::new());
        let barrier = Arc::new(Barrier::new(16));
        let handles: Vec<_> = (0..16)
            .map(|i| {
                let catalog = Arc::clone(&catalog);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    let name = format!("t{i}");
                    let id = catalog
                        .create_table(&name, "id", desc(), &EngineConfig::default())
                        .unwrap();
                    (name, id)
                })
            })
            .collect();

        let created: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(catalog.table_ids().unwrap().len(), 16);
        for (name, id) in created {
            assert_eq!(catalog.table(id).unwrap().name(), name);
            assert_eq!(catalog.table_id(&name).unwrap(), id);
        }
    }

    #[test]
    fn clear_drops_everything() {
        let catalog = MemoryCatalog::new();
        catalog
            .create_table("t", "", desc(), &EngineConfig::default())
            .unwrap();
        catalog.clear().unwrap();
        assert!(catalog.table_ids().unwrap().is_empty());
    }
}
