//! Foundation types for dlog.
//!
//! Every object in dlog (articles, headers, authors, index segments, head
//! pointers) is addressed by a [`ContentRef`]: the BLAKE3 hash of its stored
//! bytes. Higher layers only compare and forward references; nothing outside
//! the store looks inside one.

pub mod error;
pub mod reference;

pub use error::TypeError;
pub use reference::ContentRef;
