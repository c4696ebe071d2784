use chrono::{DateTime, Utc};
use dlog_types::ContentRef;
use uuid::Uuid;

use crate::models::{Article, ArticleHeader};

/// An article ready to be published.
#[derive(Clone, Debug)]
pub struct NewArticle {
    pub title: String,
    pub body: String,
    pub summary: String,
    pub cover_image: Option<String>,
    pub tags: Vec<String>,
}

impl NewArticle {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            summary: String::new(),
            cover_image: None,
            tags: Vec::new(),
        }
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = summary.into();
        self
    }

    pub fn with_cover_image(mut self, image: impl Into<String>) -> Self {
        self.cover_image = Some(image.into());
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// The stored body.
    pub(crate) fn article(&self, now: DateTime<Utc>) -> Article {
        Article {
            body: self.body.clone(),
            published_at: now,
        }
    }

    /// The header for a stored body.
    pub(crate) fn header(
        &self,
        article: ContentRef,
        article_id: Uuid,
        author: ContentRef,
        now: DateTime<Utc>,
    ) -> ArticleHeader {
        ArticleHeader {
            article,
            article_id,
            title: self.title.clone(),
            author,
            cover_image: self.cover_image.clone(),
            summary: self.summary.clone(),
            tags: self.tags.clone(),
            published_at: now,
        }
    }
}

/// Result of publishing or replacing an article.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PublishReceipt {
    /// Reference to the stored article header, as indexed.
    pub header: ContentRef,
    /// New rank-1 segment of the index.
    pub head: ContentRef,
    /// The stored head pointer now published under the author's name.
    pub pointer: ContentRef,
    /// `true` if the append archived a segment.
    pub rebalanced: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_article_builder() {
        let a = NewArticle::new("Title", "Body")
            .with_summary("short")
            .with_cover_image("cover.png")
            .with_tag("rust")
            .with_tag("p2p");
        assert_eq!(a.title, "Title");
        assert_eq!(a.summary, "short");
        assert_eq!(a.cover_image.as_deref(), Some("cover.png"));
        assert_eq!(a.tags, vec!["rust", "p2p"]);
    }

    #[test]
    fn header_copies_metadata() {
        let now = Utc::now();
        let draft = NewArticle::new("Title", "Body").with_tag("rust");
        let article = ContentRef::from_bytes(b"body");
        let author = ContentRef::from_bytes(b"author");
        let id = Uuid::now_v7();

        let header = draft.header(article, id, author, now);
        assert_eq!(header.article, article);
        assert_eq!(header.article_id, id);
        assert_eq!(header.author, author);
        assert_eq!(header.tags, vec!["rust"]);
        assert_eq!(header.published_at, now);
        assert_eq!(draft.article(now).body, "Body");
    }
}
