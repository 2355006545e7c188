//! Transactional buffer pool over a catalog.
//!
//! Inserts are resolved through the catalog to the table's `DbFile` and staged
//! there immediately. The pool tracks which pages every transaction dirtied
//! and refuses to dirty a new page once `buffer_pool_pages` distinct pages are
//! dirty (dirty pages are never evicted before their transactions complete).

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use tessera_core::buffer::{BufferManager, Catalog};
use tessera_core::config::EngineConfig;
use tessera_core::error::{Error, Result};
use tessera_core::id::{PageId, RecordId, TableId, TransactionId};
use tessera_core::tuple::Tuple;

use crate::poisoned;
use crate::tracking::{PoolStats, PoolStatsSnapshot};

#[derive(Default)]
struct PoolState {
    /// Dirty page -> transactions that wrote to it.
    dirty: HashMap<PageId, HashSet<TransactionId>>,
    aborted: HashSet<TransactionId>,
}

impl PoolState {
    fn mark_dirty(&mut self, page: PageId, tid: TransactionId) {
        self.dirty.entry(page).or_default().insert(tid);
    }
}

pub struct MemoryBufferPool {
    catalog: Arc<dyn Catalog>,
    capacity: usize,
    state: Mutex<PoolState>,
    stats: PoolStats,
}

impl MemoryBufferPool {
    pub fn new(catalog: Arc<dyn Catalog>, cfg: &EngineConfig) -> Result<Self> {
        cfg.validate()?;
        Ok(Self {
            catalog,
            capacity: cfg.buffer_pool_pages,
            state: Mutex::new(PoolState::default()),
            stats: PoolStats::new(),
        })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn catalog(&self) -> &Arc<dyn Catalog> {
        &self.catalog
    }

    /// Mark `tid` aborted. Its later inserts fail with `TransactionAborted`;
    /// rows it already staged are left for the transaction manager.
    pub fn abort(&self, tid: TransactionId) -> Result<()> {
        let mut state = self.state.lock().map_err(poisoned)?;
        state.aborted.insert(tid);
        #[cfg(feature = "tracing")]
        tracing::debug!(%tid, "transaction marked aborted");
        Ok(())
    }

    pub fn is_aborted(&self, tid: TransactionId) -> Result<bool> {
        let state = self.state.lock().map_err(poisoned)?;
        Ok(state.aborted.contains(&tid))
    }

    /// Release every page dirtied by `tid` and forget its abort flag.
    pub fn transaction_complete(&self, tid: TransactionId) -> Result<()> {
        let mut state = self.state.lock().map_err(poisoned)?;
        state.aborted.remove(&tid);
        state.dirty.retain(|_, writers| {
            writers.remove(&tid);
            !writers.is_empty()
        });
        #[cfg(feature = "tracing")]
        tracing::debug!(%tid, dirty_pages = state.dirty.len(), "transaction complete");
        Ok(())
    }

    /// Pages currently dirtied by `tid`, sorted by table then page number.
    pub fn dirty_pages(&self, tid: TransactionId) -> Result<Vec<PageId>> {
        let state = self.state.lock().map_err(poisoned)?;
        let mut pages: Vec<_> = state
            .dirty
            .iter()
            .filter(|(_, writers)| writers.contains(&tid))
            .map(|(page, _)| *page)
            .collect();
        pages.sort_by_key(|p| (p.table, p.page_no));
        Ok(pages)
    }

    /// Aborted transactions not yet completed.
    pub fn num_aborted(&self) -> Result<usize> {
        Ok(self.state.lock().map_err(poisoned)?.aborted.len())
    }

    pub fn num_dirty_pages(&self) -> Result<usize> {
        Ok(self.state.lock().map_err(poisoned)?.dirty.len())
    }

    pub fn peak_dirty_pages(&self) -> usize {
        self.stats.peak_dirty_pages()
    }

    pub fn stats(&self) -> PoolStatsSnapshot {
        self.stats.snapshot()
    }
}

impl BufferManager for MemoryBufferPool {
    fn insert_tuple(
        &self,
        tid: TransactionId,
        table: TableId,
        tuple: &mut Tuple,
    ) -> Result<RecordId> {
        // Held across the file write so admission and staging are atomic.
        let mut state = self.state.lock().map_err(poisoned)?;
        if state.aborted.contains(&tid) {
            return Err(Error::TransactionAborted(tid));
        }

        let file = Arc::clone(self.catalog.table(table)?.file());
        if let Some(page) = file.next_insert_page() {
            if !state.dirty.contains_key(&page) && state.dirty.len() >= self.capacity {
                self.stats.record_refusal();
                return Err(Error::Storage(format!(
                    "buffer pool full: {} dirty pages, cannot dirty page {page}",
                    self.capacity
                )));
            }
        }

        let rid = file.insert_tuple(tuple)?;
        if !state.dirty.contains_key(&rid.page) {
            #[cfg(feature = "tracing")]
            tracing::trace!(page = %rid.page, %tid, "page dirtied");
        }
        state.mark_dirty(rid.page, tid);
        self.stats.record_insert(state.dirty.len());
        Ok(rid)
    }
}
