use dlog_types::ContentRef;

/// Errors from object store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The requested object was not found.
    #[error("object not found: {0}")]
    NotFound(ContentRef),

    /// The backend cannot serve requests right now.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// Content hash mismatch on read (data corruption).
    #[error("hash mismatch for {id}: computed {computed}")]
    HashMismatch { id: ContentRef, computed: ContentRef },

    /// Serialization or deserialization failure.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// The object data is malformed or has the wrong kind.
    #[error("corrupt object {id}: {reason}")]
    CorruptObject { id: ContentRef, reason: String },

    /// Attempted to write an object hashing to the null reference.
    #[error("cannot store object with null reference")]
    NullContentRef,

    /// I/O error from the underlying storage backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
