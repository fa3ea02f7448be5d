//! Identity-keyed cache of per-item pages.
//!
//! Revisiting an item must not rebuild its page, so entries live in a
//! bounded LRU keyed by item identity. Every lookup rebinds the stored page
//! to the incoming item: an image that finished decoding after the page was
//! first built is applied without reconstruction. Eviction hands the
//! discarded page back to the caller, which owns its cleanup.

use std::num::NonZeroUsize;
use std::rc::Rc;

use lru::LruCache;
use tracing::trace;

use crate::models::ViewerItem;

/// Binding a (possibly updated) item into an existing page.
pub trait BindPage {
    fn bind(&self, item: &Rc<dyn ViewerItem>);
}

pub struct PageCache<P> {
    entries: LruCache<String, P>,
}

impl<P: BindPage + Clone> PageCache<P> {
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            entries: LruCache::new(capacity),
        }
    }

    /// Returns the page for `item`, building it with `build` on first visit.
    ///
    /// The returned page is always bound to `item`. The second element is
    /// the page evicted to make room, if any.
    pub fn get_or_create<F>(&mut self, item: &Rc<dyn ViewerItem>, build: F) -> (P, Option<P>)
    where
        F: FnOnce() -> P,
    {
        if let Some(page) = self.entries.get(item.id()) {
            page.bind(item);
            return (page.clone(), None);
        }

        trace!(id = item.id(), "building page");
        let page = build();
        page.bind(item);
        let evicted = self
            .entries
            .push(item.id().to_owned(), page.clone())
            .map(|(_, old)| old);
        (page, evicted)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains(id)
    }
}
