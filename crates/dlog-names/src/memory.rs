//! In-memory name registry for testing and ephemeral use.

use std::sync::RwLock;

use async_trait::async_trait;
use dlog_types::ContentRef;
use tracing::debug;

use crate::error::{NameError, NameResult};
use crate::names::validate_name;
use crate::traits::NameRegistry;
use crate::types::{claim, repoint, NameRecord, NameTable};

/// An in-memory implementation of [`NameRegistry`].
///
/// All data lives in a sorted map behind a `RwLock`. Data is lost when the
/// registry is dropped.
#[derive(Debug, Default)]
pub struct InMemoryRegistry {
    names: RwLock<NameTable>,
}

impl InMemoryRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> NameResult<std::sync::RwLockReadGuard<'_, NameTable>> {
        self.names
            .read()
            .map_err(|e| NameError::Unavailable(format!("lock poisoned: {e}")))
    }

    fn write(&self) -> NameResult<std::sync::RwLockWriteGuard<'_, NameTable>> {
        self.names
            .write()
            .map_err(|e| NameError::Unavailable(format!("lock poisoned: {e}")))
    }
}

#[async_trait]
impl NameRegistry for InMemoryRegistry {
    async fn register(&self, name: &str, target: ContentRef) -> NameResult<NameRecord> {
        let record = claim(&mut *self.write()?, name, target)?;
        debug!(author = name, target = %target.short_hex(), "name registered");
        Ok(record)
    }

    async fn publish(&self, name: &str, target: ContentRef) -> NameResult<NameRecord> {
        let record = repoint(&mut *self.write()?, name, target)?;
        debug!(author = name, target = %target.short_hex(), "name published");
        Ok(record)
    }

    async fn resolve(&self, name: &str) -> NameResult<Option<NameRecord>> {
        validate_name(name)?;
        Ok(self.read()?.get(name).copied())
    }

    async fn names(&self) -> NameResult<Vec<String>> {
        Ok(self.read()?.keys().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target(n: u8) -> ContentRef {
        ContentRef::from_hash([n; 32])
    }

    #[tokio::test]
    async fn register_then_resolve() {
        let registry = InMemoryRegistry::new();
        let record = registry.register("mdt", target(1)).await.unwrap();
        assert_eq!(record.target, target(1));

        let resolved = registry.resolve("mdt").await.unwrap().unwrap();
        assert_eq!(resolved, record);
        assert!(registry.is_taken("mdt").await.unwrap());
        assert!(!registry.is_taken("other").await.unwrap());
    }

    #[tokio::test]
    async fn names_cannot_be_registered_twice() {
        let registry = InMemoryRegistry::new();
        registry.register("mdt", target(1)).await.unwrap();
        let err = registry.register("mdt", target(2)).await.unwrap_err();
        assert!(matches!(err, NameError::AlreadyTaken { name } if name == "mdt"));
        assert_eq!(
            registry.resolve("mdt").await.unwrap().unwrap().target,
            target(1)
        );
    }

    #[tokio::test]
    async fn publish_moves_the_target() {
        let registry = InMemoryRegistry::new();
        let first = registry.register("mdt", target(1)).await.unwrap();
        let second = registry.publish("mdt", target(2)).await.unwrap();
        assert_eq!(second.target, target(2));
        assert!(second.published_at >= first.published_at);
        assert_eq!(registry.resolve("mdt").await.unwrap(), Some(second));
    }

    #[tokio::test]
    async fn publish_requires_registration() {
        let registry = InMemoryRegistry::new();
        let err = registry.publish("ghost", target(1)).await.unwrap_err();
        assert!(matches!(err, NameError::NotRegistered { .. }));
        assert!(registry.names().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn invalid_names_are_rejected() {
        let registry = InMemoryRegistry::new();
        assert!(matches!(
            registry.register("Not Valid", target(1)).await,
            Err(NameError::InvalidName { .. })
        ));
        assert!(matches!(
            registry.resolve("").await,
            Err(NameError::InvalidName { .. })
        ));
    }

    #[tokio::test]
    async fn names_are_sorted() {
        let registry = InMemoryRegistry::new();
        for name in ["zed", "amy", "mdt"] {
            registry.register(name, target(0)).await.unwrap();
        }
        assert_eq!(registry.names().await.unwrap(), vec!["amy", "mdt", "zed"]);
    }
}
