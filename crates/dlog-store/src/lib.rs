//! Content-addressed object storage for dlog.
//!
//! Every dlog record (article bodies, article headers, author profiles, index
//! segments, head pointers) is stored as an immutable object identified by its
//! BLAKE3 hash, domain-separated by object kind.
//!
//! # Storage Backends
//!
//! All backends implement the [`ObjectStore`] trait:
//!
//! - [`InMemoryObjectStore`] -- `HashMap`-based store for tests and embedding
//! - [`FsObjectStore`] -- loose-object directory on the local filesystem
//!
//! Typed records implement [`Storable`] and move through a store with the
//! [`ObjectStoreExt::put`] / [`ObjectStoreExt::get`] helpers.
//!
//! # Design Rules
//!
//! 1. Objects are immutable once written (content-addressing guarantees this).
//! 2. The store is append-only: there is no delete and no garbage collection.
//! 3. Concurrent reads are always safe (objects are immutable).
//! 4. The store never interprets object contents.
//! 5. All I/O errors are propagated, never silently ignored or retried.

pub mod error;
pub mod fs;
pub mod memory;
pub mod object;
pub mod traits;

// Re-export primary types at crate root for ergonomic imports.
pub use error::{StoreError, StoreResult};
pub use fs::FsObjectStore;
pub use memory::InMemoryObjectStore;
pub use object::{ObjectKind, Storable, StoredObject};
pub use traits::{ObjectStore, ObjectStoreExt};
