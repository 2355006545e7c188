//! Engine configuration that downstream crates can serialize/deserialize.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub const DEFAULT_PAGE_SIZE: usize = 4096;
pub const DEFAULT_BUFFER_POOL_PAGES: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Bytes per page. Determines how many tuple slots a page holds.
    pub page_size: usize,

    /// Maximum number of distinct pages the buffer pool keeps dirty at once.
    pub buffer_pool_pages: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            buffer_pool_pages: DEFAULT_BUFFER_POOL_PAGES,
        }
    }
}

impl EngineConfig {
    /// Create a config from environment variables, falling back to defaults.
    ///
    /// Environment variables:
    /// - `TESSERA_PAGE_SIZE`: page size in bytes
    /// - `TESSERA_BUFFER_POOL_PAGES`: buffer pool capacity in pages
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(s) = std::env::var("TESSERA_PAGE_SIZE") {
            if let Ok(v) = s.parse::<usize>() {
                cfg.page_size = v;
            }
        }

        if let Ok(s) = std::env::var("TESSERA_BUFFER_POOL_PAGES") {
            if let Ok(v) = s.parse::<usize>() {
                cfg.buffer_pool_pages = v;
            }
        }

        cfg
    }

    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(Error::Config("page_size must be positive".into()));
        }
        if self.buffer_pool_pages == 0 {
            return Err(Error::Config("buffer_pool_pages must be positive".into()));
        }
        Ok(())
    }

    /// Tuple slots per page for tuples of `tuple_size` bytes. Each slot costs
    /// its bytes plus one header bit.
    pub fn slots_per_page(&self, tuple_size: usize) -> usize {
        (self.page_size * 8) / (tuple_size * 8 + 1)
    }
}
