use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

use dlog_types::ContentRef;

use crate::error::{StoreError, StoreResult};
use crate::object::StoredObject;
use crate::traits::ObjectStore;

/// Object store held entirely in process memory.
///
/// Used by tests and by embedders that do not need persistence. Besides the
/// objects themselves it counts every `write` call, so a caller can assert
/// how many segments an index mutation actually persisted.
pub struct InMemoryObjectStore {
    objects: RwLock<HashMap<ContentRef, StoredObject>>,
    writes: AtomicU64,
}

impl InMemoryObjectStore {
    pub fn new() -> Self {
        Self {
            objects: RwLock::new(HashMap::new()),
            writes: AtomicU64::new(0),
        }
    }

    /// Number of distinct objects currently stored.
    pub fn len(&self) -> usize {
        self.objects.read().map(|map| map.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of successful `write` calls, including deduplicated ones.
    pub fn write_count(&self) -> u64 {
        self.writes.load(Ordering::Relaxed)
    }
}

impl Default for InMemoryObjectStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ObjectStore for InMemoryObjectStore {
    fn read(&self, id: &ContentRef) -> StoreResult<Option<StoredObject>> {
        let map = self
            .objects
            .read()
            .map_err(|e| StoreError::Unavailable(format!("lock poisoned: {e}")))?;
        Ok(map.get(id).cloned())
    }

    fn write(&self, object: &StoredObject) -> StoreResult<ContentRef> {
        let id = object.compute_id();
        if id.is_null() {
            return Err(StoreError::NullContentRef);
        }
        let mut map = self
            .objects
            .write()
            .map_err(|e| StoreError::Unavailable(format!("lock poisoned: {e}")))?;
        map.entry(id).or_insert_with(|| object.clone());
        self.writes.fetch_add(1, Ordering::Relaxed);
        Ok(id)
    }

    fn exists(&self, id: &ContentRef) -> StoreResult<bool> {
        let map = self
            .objects
            .read()
            .map_err(|e| StoreError::Unavailable(format!("lock poisoned: {e}")))?;
        Ok(map.contains_key(id))
    }
}

impl std::fmt::Debug for InMemoryObjectStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryObjectStore")
            .field("object_count", &self.len())
            .field("write_count", &self.write_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use super::*;
    use crate::object::{ObjectKind, Storable};
    use crate::traits::ObjectStoreExt;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Profile {
        name: String,
    }

    impl Storable for Profile {
        const KIND: ObjectKind = ObjectKind::Author;
    }

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Index {
        items: Vec<ContentRef>,
    }

    impl Storable for Index {
        const KIND: ObjectKind = ObjectKind::Segment;
    }

    fn profile(name: &str) -> Profile {
        Profile { name: name.into() }
    }

    #[test]
    fn put_then_get() {
        let store = InMemoryObjectStore::new();
        let id = store.put(&profile("mdt")).unwrap();
        assert_eq!(store.get::<Profile>(&id).unwrap(), profile("mdt"));
        assert!(store.exists(&id).unwrap());
    }

    #[test]
    fn get_missing_is_not_found() {
        let store = InMemoryObjectStore::new();
        let id = ContentRef::from_bytes(b"missing");
        assert!(store.read(&id).unwrap().is_none());
        let err = store.get::<Profile>(&id).unwrap_err();
        assert!(matches!(err, StoreError::NotFound(missing) if missing == id));
    }

    #[test]
    fn get_with_wrong_kind_is_corrupt() {
        let store = InMemoryObjectStore::new();
        let id = store.put(&profile("mdt")).unwrap();
        let err = store.get::<Index>(&id).unwrap_err();
        assert!(matches!(err, StoreError::CorruptObject { .. }));
    }

    #[test]
    fn kinds_separate_identical_payloads() {
        let store = InMemoryObjectStore::new();
        let payload = br#"{"items":[]}"#.to_vec();
        let as_segment = store.write(&StoredObject::new(ObjectKind::Segment, payload.clone())).unwrap();
        let as_head = store.write(&StoredObject::new(ObjectKind::Head, payload)).unwrap();
        assert_ne!(as_segment, as_head);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn rewrites_deduplicate_but_are_counted() {
        let store = InMemoryObjectStore::new();
        let empty = Index { items: Vec::new() };
        let a = store.put(&empty).unwrap();
        let b = store.put(&empty).unwrap();
        assert_eq!(a, b);
        assert_eq!(store.len(), 1);
        assert_eq!(store.write_count(), 2);
    }

    #[test]
    fn shared_between_writer_threads() {
        let store = Arc::new(InMemoryObjectStore::new());
        let handles: Vec<_> = (0..4)
            .map(|n| {
                let store = Arc::clone(&store);
                thread::spawn(move || store.put(&profile(&format!("author-{n}"))).unwrap())
            })
            .collect();
        let ids: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        assert_eq!(store.len(), 4);
        for (n, id) in ids.iter().enumerate() {
            assert_eq!(store.get::<Profile>(id).unwrap().name, format!("author-{n}"));
        }
        assert!(format!("{store:?}").contains("write_count: 4"));
    }
}
