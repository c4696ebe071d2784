//! Records stored alongside the article index.

use chrono::{DateTime, Utc};
use dlog_store::{ObjectKind, Storable};
use dlog_types::ContentRef;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An author profile. The head pointer's `owner` names the latest one.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub name: String,
    #[serde(default)]
    pub profile_image: String,
    #[serde(default)]
    pub description: String,
}

impl Author {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            profile_image: String::new(),
            description: String::new(),
        }
    }

    pub fn with_profile_image(mut self, image: impl Into<String>) -> Self {
        self.profile_image = image.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

impl Storable for Author {
    const KIND: ObjectKind = ObjectKind::Author;
}

/// Full article body.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub body: String,
    pub published_at: DateTime<Utc>,
}

impl Storable for Article {
    const KIND: ObjectKind = ObjectKind::Article;
}

/// What the index actually holds: a small record describing an article and
/// pointing at its body.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleHeader {
    /// Reference to the [`Article`] body.
    pub article: ContentRef,
    /// Stable identity of the article across edits.
    pub article_id: Uuid,
    pub title: String,
    /// Reference to the [`Author`] record at publication time.
    pub author: ContentRef,
    #[serde(default)]
    pub cover_image: Option<String>,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub published_at: DateTime<Utc>,
}

impl Storable for ArticleHeader {
    const KIND: ObjectKind = ObjectKind::Header;
}

/// One entry of an article listing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArticleSummary {
    /// Reference to the stored header, as held by the index.
    pub header_ref: ContentRef,
    pub header: ArticleHeader,
}
