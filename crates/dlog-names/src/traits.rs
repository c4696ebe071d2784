//! The [`NameRegistry`] trait defining the registrar interface.

use async_trait::async_trait;
use dlog_types::ContentRef;

use crate::error::NameResult;
use crate::types::NameRecord;

/// Maps author names to the reference of their published head pointer.
///
/// A name is claimed once with [`register`](NameRegistry::register) and then
/// moved with [`publish`](NameRegistry::publish). Registries do not arbitrate
/// concurrent publishers: the last publish wins.
#[async_trait]
pub trait NameRegistry: Send + Sync {
    /// Claim `name` and point it at `target`. Fails if the name is taken.
    async fn register(&self, name: &str, target: ContentRef) -> NameResult<NameRecord>;

    /// Point an existing registration at `target`.
    async fn publish(&self, name: &str, target: ContentRef) -> NameResult<NameRecord>;

    /// Look up a name. Returns `Ok(None)` if it is not registered.
    async fn resolve(&self, name: &str) -> NameResult<Option<NameRecord>>;

    /// All registered names, sorted.
    async fn names(&self) -> NameResult<Vec<String>>;

    /// Returns `true` if `name` is registered.
    async fn is_taken(&self, name: &str) -> NameResult<bool> {
        Ok(self.resolve(name).await?.is_some())
    }
}
