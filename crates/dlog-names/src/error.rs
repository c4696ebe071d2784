//! Error types for name registry operations.

use thiserror::Error;

/// Errors that can occur during registry operations.
#[derive(Debug, Error)]
pub enum NameError {
    /// The name does not follow the naming rules.
    #[error("invalid name {name:?}: {reason}")]
    InvalidName { name: String, reason: String },

    /// Registration of a name that already has an owner.
    #[error("name already taken: {name}")]
    AlreadyTaken { name: String },

    /// Publishing or resolving under a name nobody registered.
    #[error("name not registered: {name}")]
    NotRegistered { name: String },

    /// The registry backend cannot be used (e.g. a poisoned lock).
    #[error("registry unavailable: {0}")]
    Unavailable(String),

    /// Serialization or deserialization failure.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// I/O error in the file-backed registry.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for registry operations.
pub type NameResult<T> = std::result::Result<T, NameError>;
