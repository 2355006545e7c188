//! Slotted heap file kept entirely in memory.
//!
//! Pages fill in order; a new page is allocated once the last one has no free
//! slot. Slot capacity follows the on-disk heap page layout: one header bit
//! plus `TupleDesc::size()` bytes per slot.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard};

use tessera_core::buffer::DbFile;
use tessera_core::config::EngineConfig;
use tessera_core::error::{Error, Result};
use tessera_core::id::{PageId, RecordId, TableId};
use tessera_core::schema::TupleDesc;
use tessera_core::tuple::Tuple;

use crate::poisoned;

pub struct MemoryFile {
    id: TableId,
    desc: Arc<TupleDesc>,
    slots_per_page: usize,
    pages: RwLock<Vec<Vec<Tuple>>>,
}

impl MemoryFile {
    pub fn new(id: TableId, desc: Arc<TupleDesc>, cfg: &EngineConfig) -> Result<Self> {
        cfg.validate()?;
        let slots_per_page = cfg.slots_per_page(desc.size());
        if slots_per_page == 0 {
            return Err(Error::Config(format!(
                "page_size {} cannot hold a {}-byte tuple",
                cfg.page_size,
                desc.size()
            )));
        }
        Ok(Self {
            id,
            desc,
            slots_per_page,
            pages: RwLock::new(Vec::new()),
        })
    }

    pub fn slots_per_page(&self) -> usize {
        self.slots_per_page
    }

    /// Number of stored tuples across all pages.
    pub fn len(&self) -> usize {
        self.read_pages().iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // Counters stay readable after a writer panicked: a page is only ever
    // extended by a completed `push`, so the vector is never half-written.
    fn read_pages(&self) -> RwLockReadGuard<'_, Vec<Vec<Tuple>>> {
        self.pages.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn target_page(&self, pages: &[Vec<Tuple>]) -> u32 {
        match pages.last() {
            Some(last) if last.len() < self.slots_per_page => (pages.len() - 1) as u32,
            _ => pages.len() as u32,
        }
    }
}

impl DbFile for MemoryFile {
    fn id(&self) -> TableId {
        self.id
    }

    fn tuple_desc(&self) -> &Arc<TupleDesc> {
        &self.desc
    }

    fn insert_tuple(&self, tuple: &mut Tuple) -> Result<RecordId> {
        if !self.desc.types_match(tuple.tuple_desc()) {
            return Err(Error::Storage(format!(
                "tuple shape [{}] does not fit table {} [{}]",
                tuple.tuple_desc(),
                self.id,
                self.desc
            )));
        }

        let mut pages = self.pages.write().map_err(poisoned)?;
        let page_no = self.target_page(&pages);
        if page_no as usize == pages.len() {
            pages.push(Vec::with_capacity(self.slots_per_page));
        }
        let page = &mut pages[page_no as usize];
        let rid = RecordId::new(PageId::new(self.id, page_no), page.len() as u32);
        tuple.set_record_id(rid);
        page.push(tuple.clone());
        Ok(rid)
    }

    fn scan(&self) -> Result<Vec<Tuple>> {
        let pages = self.pages.read().map_err(poisoned)?;
        Ok(pages.iter().flatten().cloned().collect())
    }

    fn num_pages(&self) -> usize {
        self.read_pages().len()
    }

    fn next_insert_page(&self) -> Option<PageId> {
        let pages = self.read_pages();
        Some(PageId::new(self.id, self.target_page(&pages)))
    }
}
