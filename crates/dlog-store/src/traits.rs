use dlog_types::ContentRef;

use crate::error::{StoreError, StoreResult};
use crate::object::{Storable, StoredObject};

/// Content-addressed, append-only object store.
///
/// All implementations must satisfy these invariants:
/// - Objects are immutable once written. The same data always produces the
///   same reference.
/// - Write-then-link: the object is durable before its reference is returned.
/// - Concurrent reads are always safe (objects are immutable).
/// - The store never interprets object contents.
/// - There is no delete. Objects that nothing references any more are simply
///   orphaned.
pub trait ObjectStore: Send + Sync {
    /// Read an object by its content reference.
    ///
    /// Returns `Ok(None)` if the object does not exist.
    /// Returns `Err` on I/O failure or data corruption.
    fn read(&self, id: &ContentRef) -> StoreResult<Option<StoredObject>>;

    /// Write an object and return its content reference.
    ///
    /// If the object already exists, this is a no-op (idempotent).
    fn write(&self, object: &StoredObject) -> StoreResult<ContentRef>;

    /// Check whether an object exists in the store.
    fn exists(&self, id: &ContentRef) -> StoreResult<bool>;
}

/// Typed put/get on top of any [`ObjectStore`].
pub trait ObjectStoreExt: ObjectStore {
    /// Encode and write a record, returning its reference.
    fn put<T: Storable>(&self, value: &T) -> StoreResult<ContentRef> {
        self.write(&value.to_stored_object()?)
    }

    /// Read and decode a record. A missing object is `StoreError::NotFound`.
    fn get<T: Storable>(&self, id: &ContentRef) -> StoreResult<T> {
        let obj = self.read(id)?.ok_or(StoreError::NotFound(*id))?;
        T::from_stored_object(&obj)
    }
}

impl<S: ObjectStore + ?Sized> ObjectStoreExt for S {}
