//! Name registry for dlog.
//!
//! Authors are found by name. A registry maps each registered name to the
//! content reference of the author's latest published head pointer; moving
//! that reference is how new content becomes visible to readers.
//!
//! # Modules
//!
//! - [`error`] -- error types for registry operations
//! - [`names`] -- author name validation
//! - [`traits`] -- the async [`NameRegistry`] interface
//! - [`types`] -- [`NameRecord`]
//! - [`memory`] -- in-memory [`InMemoryRegistry`] for tests
//! - [`file`] -- JSON-file-backed [`FileRegistry`]

pub mod error;
pub mod file;
pub mod memory;
pub mod names;
pub mod traits;
pub mod types;

pub use error::{NameError, NameResult};
pub use file::FileRegistry;
pub use memory::InMemoryRegistry;
pub use names::validate_name;
pub use traits::NameRegistry;
pub use types::NameRecord;
