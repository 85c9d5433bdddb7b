//! Saved-transform cache.
//!
//! Static page placements are expensive for a backend to re-apply, so the
//! engine remembers the last style it emitted for each page and replays it
//! until someone invalidates the entry. Invalidation lives here, keyed by
//! page identity, so the "no stale transform" invariant is auditable in
//! isolation from drawing.

use std::collections::HashMap;

use crate::types::{PageId, PageStyle};

#[derive(Debug, Default)]
pub struct TransformCache {
    saved: HashMap<PageId, PageStyle>,
}

impl TransformCache {
    pub fn new() -> Self {
        TransformCache::default()
    }

    pub fn save(&mut self, id: PageId, style: PageStyle) {
        self.saved.insert(id, style);
    }

    pub fn get(&self, id: PageId) -> Option<&PageStyle> {
        self.saved.get(&id)
    }

    /// Drop the saved style for `id`. Returns whether an entry existed, so
    /// callers (and tests) can observe that a reassignment invalidated the
    /// outgoing page exactly once.
    pub fn invalidate(&mut self, id: PageId) -> bool {
        self.saved.remove(&id).is_some()
    }

    pub fn clear(&mut self) {
        self.saved.clear();
    }
}
