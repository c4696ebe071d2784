//! Exclusive writer sessions.
//!
//! A chain tolerates exactly one writer. Mutations therefore hang off a
//! [`WriterSession`], which holds the per-name lock for as long as it lives:
//! read the published head, write new objects, publish the new head, with no
//! other writer in this process touching the same name in between.

use chrono::Utc;
use dlog_chain::{ChainWriter, HeadPointer, MutationEngine};
use dlog_names::NameRegistry;
use dlog_store::{ObjectStore, ObjectStoreExt, Storable};
use dlog_types::ContentRef;
use tokio::sync::OwnedMutexGuard;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{SdkError, SdkResult};
use crate::models::{ArticleHeader, Author};
use crate::publish::{NewArticle, PublishReceipt};
use crate::repository::Dlog;

/// The exclusive write handle for one registered name.
///
/// Dropping the session releases the name for the next writer.
pub struct WriterSession<'a, S, R> {
    dlog: &'a Dlog<S, R>,
    name: String,
    id: Uuid,
    _guard: OwnedMutexGuard<()>,
}

impl<'a, S: ObjectStore, R: NameRegistry> WriterSession<'a, S, R> {
    pub(crate) fn new(dlog: &'a Dlog<S, R>, name: &str, guard: OwnedMutexGuard<()>) -> Self {
        let id = Uuid::now_v7();
        info!(author = name, session = %id, "writer session opened");
        Self {
            dlog,
            name: name.to_string(),
            id,
            _guard: guard,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The head pointer currently published under this session's name.
    pub async fn head_pointer(&self) -> SdkResult<HeadPointer> {
        self.dlog.head_pointer(&self.name).await
    }

    /// Store `draft` and add it to the front of the index.
    pub async fn publish_article(&mut self, draft: NewArticle) -> SdkResult<PublishReceipt> {
        let pointer = self.head_pointer().await?;
        let store = self.dlog.store();
        let now = Utc::now();

        let article = store.put(&draft.article(now))?;
        let header = store.put(&draft.header(article, Uuid::now_v7(), pointer.owner, now))?;

        let head_segment = pointer.head_segment(store)?;
        let outcome = ChainWriter::new(store, *self.dlog.config()).append(header, head_segment)?;
        let published = self.publish(pointer.advance(outcome.head)).await?;

        info!(
            author = %self.name,
            header = %header.short_hex(),
            rebalanced = outcome.rebalanced,
            "article published"
        );
        Ok(PublishReceipt {
            header,
            head: outcome.head,
            pointer: published,
            rebalanced: outcome.rebalanced,
        })
    }

    /// Remove an article header from the index.
    ///
    /// Returns the new chain head, or `None` if the header was not indexed,
    /// in which case nothing is written or published. The article objects
    /// themselves stay in the store.
    pub async fn remove_article(&mut self, header: &ContentRef) -> SdkResult<Option<ContentRef>> {
        let pointer = self.head_pointer().await?;
        let store = self.dlog.store();

        let head_segment = pointer.head_segment(store)?;
        let Some(head) = MutationEngine::new(store).remove(header, head_segment)? else {
            debug!(author = %self.name, header = %header.short_hex(), "article not indexed");
            return Ok(None);
        };
        self.publish(pointer.advance(head)).await?;

        info!(author = %self.name, header = %header.short_hex(), "article removed");
        Ok(Some(head))
    }

    /// Swap an indexed article for a new version in the same position.
    ///
    /// The new header keeps the old header's `article_id`. Returns `None`
    /// without writing anything if `old` is not indexed.
    pub async fn replace_article(
        &mut self,
        old: &ContentRef,
        draft: NewArticle,
    ) -> SdkResult<Option<PublishReceipt>> {
        let pointer = self.head_pointer().await?;
        let store = self.dlog.store();

        let previous: ArticleHeader = match self.dlog.load(old) {
            Ok(header) => header,
            Err(SdkError::ObjectNotFound(_)) => {
                debug!(author = %self.name, header = %old.short_hex(), "article not stored");
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        // Both references are known before anything is written, so a miss in
        // the index leaves the store untouched.
        let now = Utc::now();
        let article = draft.article(now).to_stored_object()?;
        let header = draft
            .header(article.compute_id(), previous.article_id, pointer.owner, now)
            .to_stored_object()?;
        let header_ref = header.compute_id();

        let head_segment = pointer.head_segment(store)?;
        let Some(head) = MutationEngine::new(store).replace(old, header_ref, head_segment)? else {
            debug!(author = %self.name, header = %old.short_hex(), "article not indexed");
            return Ok(None);
        };
        store.write(&article)?;
        store.write(&header)?;
        let published = self.publish(pointer.advance(head)).await?;

        info!(
            author = %self.name,
            old = %old.short_hex(),
            new = %header_ref.short_hex(),
            "article replaced"
        );
        Ok(Some(PublishReceipt {
            header: header_ref,
            head,
            pointer: published,
            rebalanced: false,
        }))
    }

    /// Store a new author record and publish it. The index is unchanged.
    pub async fn update_author(&mut self, author: &Author) -> SdkResult<ContentRef> {
        let pointer = self.head_pointer().await?;
        let owner = self.dlog.store().put(author)?;
        let published = self.publish(pointer.with_owner(owner)).await?;
        info!(author = %self.name, owner = %owner.short_hex(), "author updated");
        Ok(published)
    }

    async fn publish(&self, pointer: HeadPointer) -> SdkResult<ContentRef> {
        let id = self.dlog.store().put(&pointer)?;
        self.dlog.registry().publish(&self.name, id).await?;
        debug!(author = %self.name, pointer = %id.short_hex(), session = %self.id, "head published");
        Ok(id)
    }
}

impl<S, R> Drop for WriterSession<'_, S, R> {
    fn drop(&mut self) {
        debug!(author = %self.name, session = %self.id, "writer session closed");
    }
}
