use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex};

use dlog_chain::{ChainConfig, ChainReader, ChainReport, HeadPointer};
use dlog_names::{validate_name, NameRegistry};
use dlog_store::{ObjectStore, ObjectStoreExt, Storable, StoreError};
use dlog_types::ContentRef;
use tokio::sync::Mutex;
use tracing::info;

use crate::error::{SdkError, SdkResult};
use crate::models::{Article, ArticleHeader, ArticleSummary, Author};
use crate::session::WriterSession;

/// High-level dlog API over an object store and a name registry.
///
/// Reads go straight to the store. Every write happens through a
/// [`WriterSession`], of which at most one exists per name at a time in
/// this process.
pub struct Dlog<S, R> {
    store: S,
    registry: R,
    config: ChainConfig,
    sessions: StdMutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl<S: ObjectStore, R: NameRegistry> Dlog<S, R> {
    /// A client using the default chain configuration.
    pub fn new(store: S, registry: R) -> Self {
        Self {
            store,
            registry,
            config: ChainConfig::default(),
            sessions: StdMutex::new(HashMap::new()),
        }
    }

    /// Use `config` for every chain this client writes.
    pub fn with_config(mut self, config: ChainConfig) -> Self {
        self.config = config;
        self
    }

    // ---- Registration ----

    /// Register `name` for `author`, publishing an empty index.
    ///
    /// Returns the reference of the stored head pointer.
    pub async fn register(&self, name: &str, author: &Author) -> SdkResult<ContentRef> {
        validate_name(name)?;
        let owner = self.store.put(author)?;
        let pointer = self.store.put(&HeadPointer::new(owner))?;
        self.registry.register(name, pointer).await?;
        info!(author = name, owner = %owner.short_hex(), "author registered");
        Ok(pointer)
    }

    /// Returns `true` if `name` is already registered.
    pub async fn is_taken(&self, name: &str) -> SdkResult<bool> {
        Ok(self.registry.is_taken(name).await?)
    }

    // ---- Sessions ----

    /// Open the writer session for `name`, waiting for any other session on
    /// the same name to close.
    pub async fn open_session(&self, name: &str) -> SdkResult<WriterSession<'_, S, R>> {
        self.ensure_registered(name).await?;
        let guard = self.session_lock(name).lock_owned().await;
        Ok(WriterSession::new(self, name, guard))
    }

    /// Open the writer session for `name`, failing with
    /// [`SdkError::SessionBusy`] if one is already open.
    pub async fn try_open_session(&self, name: &str) -> SdkResult<WriterSession<'_, S, R>> {
        self.ensure_registered(name).await?;
        let guard = self
            .session_lock(name)
            .try_lock_owned()
            .map_err(|_| SdkError::SessionBusy(name.to_string()))?;
        Ok(WriterSession::new(self, name, guard))
    }

    fn session_lock(&self, name: &str) -> Arc<Mutex<()>> {
        // The table only holds lock handles, so a poisoned guard is still usable.
        let mut sessions = self.sessions.lock().unwrap_or_else(|e| e.into_inner());
        // Open sessions and waiters hold a clone; a lone handle is idle.
        sessions.retain(|_, lock| Arc::strong_count(lock) > 1);
        sessions.entry(name.to_string()).or_default().clone()
    }

    async fn ensure_registered(&self, name: &str) -> SdkResult<()> {
        if self.registry.is_taken(name).await? {
            Ok(())
        } else {
            Err(SdkError::NotRegistered(name.to_string()))
        }
    }

    // ---- Reads ----

    /// The head pointer currently published under `name`.
    pub async fn head_pointer(&self, name: &str) -> SdkResult<HeadPointer> {
        let record = self
            .registry
            .resolve(name)
            .await?
            .ok_or_else(|| SdkError::NotRegistered(name.to_string()))?;
        self.load(&record.target)
    }

    /// The current author record for `name`.
    pub async fn author(&self, name: &str) -> SdkResult<Author> {
        let pointer = self.head_pointer(name).await?;
        self.load(&pointer.owner)
    }

    /// Articles published under `name`, newest first.
    pub async fn articles(&self, name: &str, limit: Option<usize>) -> SdkResult<Vec<ArticleSummary>> {
        let pointer = self.head_pointer(name).await?;
        ChainReader::new(&self.store)
            .items(pointer.chain_head, limit)?
            .into_iter()
            .map(|header_ref| -> SdkResult<ArticleSummary> {
                Ok(ArticleSummary {
                    header: self.load(&header_ref)?,
                    header_ref,
                })
            })
            .collect()
    }

    pub fn article_header(&self, id: &ContentRef) -> SdkResult<ArticleHeader> {
        self.load(id)
    }

    pub fn article(&self, id: &ContentRef) -> SdkResult<Article> {
        self.load(id)
    }

    /// Check the index published under `name`.
    pub async fn verify(&self, name: &str) -> SdkResult<ChainReport> {
        let pointer = self.head_pointer(name).await?;
        Ok(ChainReader::new(&self.store).verify(pointer.chain_head, &self.config)?)
    }

    // ---- Accessors ----

    pub fn config(&self) -> &ChainConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn registry(&self) -> &R {
        &self.registry
    }

    pub(crate) fn load<T: Storable>(&self, id: &ContentRef) -> SdkResult<T> {
        self.store.get(id).map_err(|e| match e {
            StoreError::NotFound(id) => SdkError::ObjectNotFound(id),
            other => other.into(),
        })
    }
}
