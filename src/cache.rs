//! Bounded page preview cache with least-recently-used eviction.
//!
//! Both lookups and inserts refresh recency. Failed renders are never stored,
//! so the next request for the same page retries the renderer.

use std::num::NonZeroUsize;

use lru::LruCache;
use tracing::debug;

use crate::error::Result;
use crate::models::{DEFAULT_CACHE_SIZE, PageImage};

pub struct PageImageCache {
    entries: LruCache<usize, PageImage>,
}

impl Default for PageImageCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_SIZE)
    }
}

impl PageImageCache {
    /// A capacity of zero is raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: LruCache::new(capacity),
        }
    }

    /// Returns the cached preview for `page`, or renders, stores and returns
    /// it on a miss.
    pub fn get_or_render<F>(&mut self, page: usize, render: F) -> Result<PageImage>
    where
        F: FnOnce(usize) -> Result<PageImage>,
    {
        if let Some(image) = self.get(page) {
            debug!(page, "page cache hit");
            return Ok(image);
        }

        debug!(page, "page cache miss");
        let image = render(page)?;
        self.insert(page, image.clone());
        Ok(image)
    }

    /// Lookup that marks the entry most recently used.
    pub fn get(&mut self, page: usize) -> Option<PageImage> {
        self.entries.get(&page).cloned()
    }

    /// Stores `image` as most recently used and returns the page index that
    /// was evicted to make room, if any.
    pub fn insert(&mut self, page: usize, image: PageImage) -> Option<usize> {
        match self.entries.push(page, image) {
            Some((evicted, _)) if evicted != page => {
                debug!(page, evicted, "page cache eviction");
                Some(evicted)
            }
            _ => None,
        }
    }

    pub fn contains(&self, page: usize) -> bool {
        self.entries.contains(&page)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.entries.cap().get()
    }

    /// Resident page indices, most recently used first.
    pub fn resident_pages(&self) -> Vec<usize> {
        self.entries.iter().map(|(page, _)| *page).collect()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
