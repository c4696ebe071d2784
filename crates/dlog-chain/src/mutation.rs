//! Point edits anywhere in the chain.
//!
//! Removing or replacing an item rewrites the segment that holds it and every
//! segment between it and the head, since each of those names its successor
//! by content. Everything older than the edited segment is shared unchanged.

use dlog_store::{ObjectStore, ObjectStoreExt};
use dlog_types::ContentRef;
use tracing::debug;

use crate::error::ChainResult;
use crate::segment::Segment;

/// Copy-on-write remove and replace.
pub struct MutationEngine<'a, S: ObjectStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: ObjectStore + ?Sized> MutationEngine<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Remove the first occurrence of `target`, searching from `head`.
    ///
    /// Returns the new head reference, or `None` if `target` is not in the
    /// chain, in which case nothing is written.
    pub fn remove(&self, target: &ContentRef, head: Segment) -> ChainResult<Option<ContentRef>> {
        self.rewrite(target, head, |segment, index| {
            segment.remove_at(index).map(|_| ())
        })
    }

    /// Replace the first occurrence of `target` with `replacement` in place.
    ///
    /// Same contract as [`MutationEngine::remove`].
    pub fn replace(
        &self,
        target: &ContentRef,
        replacement: ContentRef,
        head: Segment,
    ) -> ChainResult<Option<ContentRef>> {
        self.rewrite(target, head, |segment, index| {
            segment.replace_at(index, replacement).map(|_| ())
        })
    }

    fn rewrite<F>(&self, target: &ContentRef, head: Segment, edit: F) -> ChainResult<Option<ContentRef>>
    where
        F: FnOnce(&mut Segment, usize) -> ChainResult<()>,
    {
        // Ancestors of the segment holding `target`, head first.
        let mut path = Vec::new();
        let mut current = head;
        let index = loop {
            if let Some(index) = current.find(target) {
                break index;
            }
            let Some(prev) = current.previous() else {
                debug!(item = %target.short_hex(), searched = path.len() + 1, "item not in chain");
                return Ok(None);
            };
            let next: Segment = self.store.get(&prev)?;
            path.push(current);
            current = next;
        };

        edit(&mut current, index)?;
        let depth = path.len() + 1;
        let mut id = self.store.put(&current)?;
        while let Some(mut ancestor) = path.pop() {
            ancestor.set_previous(Some(id));
            id = self.store.put(&ancestor)?;
        }

        debug!(item = %target.short_hex(), depth, index, head = %id.short_hex(), "chain rewritten");
        Ok(Some(id))
    }
}
