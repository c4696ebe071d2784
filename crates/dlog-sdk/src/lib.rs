//! High-level SDK for dlog.
//!
//! [`Dlog`] ties an object store, a name registry and the article index chain
//! together: authors register a name, open a [`WriterSession`] to publish,
//! replace or remove articles, and readers resolve a name to list what was
//! published.

pub mod error;
pub mod models;
pub mod publish;
pub mod repository;
pub mod session;

pub use error::{SdkError, SdkResult};
pub use models::{Article, ArticleHeader, ArticleSummary, Author};
pub use publish::{NewArticle, PublishReceipt};
pub use repository::Dlog;
pub use session::WriterSession;

// Re-export key types
pub use dlog_chain::{ChainConfig, ChainReport, HeadPointer};
pub use dlog_types::ContentRef;
