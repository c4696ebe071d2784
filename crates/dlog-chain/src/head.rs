use dlog_store::{ObjectKind, ObjectStore, ObjectStoreExt, Storable};
use dlog_types::ContentRef;
use serde::{Deserialize, Serialize};

use crate::error::ChainResult;
use crate::segment::Segment;

/// The published root of an author's index.
///
/// A head pointer names the owner's author record and the current rank-1
/// segment. It is stored as its own object and the registry points at the
/// stored pointer, so one registry update moves both.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadPointer {
    /// Reference to the author record.
    pub owner: ContentRef,
    /// Current rank-1 segment, `None` until the first append.
    pub chain_head: Option<ContentRef>,
}

impl HeadPointer {
    /// A pointer for an owner with an empty chain.
    pub fn new(owner: ContentRef) -> Self {
        Self {
            owner,
            chain_head: None,
        }
    }

    /// The same owner with a new chain head.
    pub fn advance(&self, chain_head: ContentRef) -> Self {
        Self {
            owner: self.owner,
            chain_head: Some(chain_head),
        }
    }

    /// The same chain under a new owner record.
    pub fn with_owner(&self, owner: ContentRef) -> Self {
        Self {
            owner,
            chain_head: self.chain_head,
        }
    }

    /// Returns `true` if nothing has been appended yet.
    pub fn is_empty(&self) -> bool {
        self.chain_head.is_none()
    }

    /// Load the rank-1 segment, or start a fresh one for an empty chain.
    pub fn head_segment<S: ObjectStore + ?Sized>(&self, store: &S) -> ChainResult<Segment> {
        match &self.chain_head {
            Some(id) => Ok(store.get(id)?),
            None => Ok(Segment::head()),
        }
    }
}

impl Storable for HeadPointer {
    const KIND: ObjectKind = ObjectKind::Head;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ChainError;
    use crate::segment::Rank;
    use dlog_store::{InMemoryObjectStore, StoreError};

    #[test]
    fn new_pointer_has_empty_chain() {
        let owner = ContentRef::from_bytes(b"author");
        let ptr = HeadPointer::new(owner);
        assert!(ptr.is_empty());

        let store = InMemoryObjectStore::new();
        let seg = ptr.head_segment(&store).unwrap();
        assert_eq!(seg.rank(), Rank::HEAD);
        assert!(seg.is_empty());
        assert!(store.is_empty());
    }

    #[test]
    fn advance_keeps_owner() {
        let owner = ContentRef::from_bytes(b"author");
        let head = ContentRef::from_bytes(b"segment");
        let ptr = HeadPointer::new(owner).advance(head);
        assert_eq!(ptr.owner, owner);
        assert_eq!(ptr.chain_head, Some(head));

        let other = ContentRef::from_bytes(b"new author");
        let moved = ptr.with_owner(other);
        assert_eq!(moved.owner, other);
        assert_eq!(moved.chain_head, Some(head));
    }

    #[test]
    fn head_segment_loads_stored_segment() {
        let store = InMemoryObjectStore::new();
        let mut seg = Segment::head();
        seg.prepend(ContentRef::from_bytes(b"article"));
        let id = store.put(&seg).unwrap();

        let ptr = HeadPointer::new(ContentRef::from_bytes(b"author")).advance(id);
        assert_eq!(ptr.head_segment(&store).unwrap(), seg);
    }

    #[test]
    fn head_segment_missing_is_not_found() {
        let store = InMemoryObjectStore::new();
        let missing = ContentRef::from_bytes(b"gone");
        let ptr = HeadPointer::new(ContentRef::from_bytes(b"author")).advance(missing);
        assert!(matches!(
            ptr.head_segment(&store),
            Err(ChainError::Store(StoreError::NotFound(id))) if id == missing
        ));
    }

    #[test]
    fn pointer_serializes_as_head_object() {
        let ptr = HeadPointer::new(ContentRef::from_bytes(b"author"));
        let stored = ptr.to_stored_object().unwrap();
        assert_eq!(stored.kind, ObjectKind::Head);
        assert_eq!(HeadPointer::from_stored_object(&stored).unwrap(), ptr);
    }
}
