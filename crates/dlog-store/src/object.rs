use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use dlog_crypto::ContentHasher;
use dlog_types::ContentRef;

use crate::error::{StoreError, StoreResult};

/// What a stored object holds. Each kind hashes under its own domain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectKind {
    /// Full article body.
    Article,
    /// Article header: title, summary and a reference to the body.
    Header,
    /// Author profile.
    Author,
    /// Article index segment.
    Segment,
    /// Head pointer naming the current index head.
    Head,
}

impl ObjectKind {
    /// Every kind, in tag order.
    pub const ALL: [ObjectKind; 5] = [
        Self::Article,
        Self::Header,
        Self::Author,
        Self::Segment,
        Self::Head,
    ];

    /// Short lowercase tag used in on-disk headers and display.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Article => "article",
            Self::Header => "header",
            Self::Author => "author",
            Self::Segment => "segment",
            Self::Head => "head",
        }
    }

    /// Parse from a tag produced by [`ObjectKind::tag`].
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.tag() == tag)
    }

    fn hasher(&self) -> &'static ContentHasher {
        match self {
            Self::Article => &ContentHasher::ARTICLE,
            Self::Header => &ContentHasher::HEADER,
            Self::Author => &ContentHasher::AUTHOR,
            Self::Segment => &ContentHasher::SEGMENT,
            Self::Head => &ContentHasher::HEAD,
        }
    }
}

impl std::fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

/// One content-addressed object as the store sees it.
///
/// Backends only move these around by reference; decoding `data` is the job
/// of [`Storable`] implementations in higher layers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoredObject {
    pub kind: ObjectKind,
    /// Encoded payload.
    pub data: Vec<u8>,
    /// `data.len()`, kept for headers and accounting.
    pub size: u64,
}

impl StoredObject {
    pub fn new(kind: ObjectKind, data: Vec<u8>) -> Self {
        let size = data.len() as u64;
        Self { kind, data, size }
    }

    /// The reference this object is stored under.
    pub fn compute_id(&self) -> ContentRef {
        self.kind.hasher().hash(&self.data)
    }
}

/// A typed record that round-trips through a [`StoredObject`].
///
/// Records are encoded as JSON under a fixed [`ObjectKind`]. Decoding checks
/// the kind tag first so a segment can never be read back as a head pointer.
pub trait Storable: Serialize + DeserializeOwned {
    /// The object kind this record is stored under.
    const KIND: ObjectKind;

    /// Encode under [`Self::KIND`].
    fn to_stored_object(&self) -> StoreResult<StoredObject> {
        let data =
            serde_json::to_vec(self).map_err(|e| StoreError::Serialization(e.to_string()))?;
        Ok(StoredObject::new(Self::KIND, data))
    }

    /// Decode, failing with [`StoreError::CorruptObject`] on a kind mismatch.
    fn from_stored_object(obj: &StoredObject) -> StoreResult<Self> {
        if obj.kind != Self::KIND {
            return Err(StoreError::CorruptObject {
                id: obj.compute_id(),
                reason: format!("expected {}, got {}", Self::KIND, obj.kind),
            });
        }
        serde_json::from_slice(&obj.data).map_err(|e| StoreError::Serialization(e.to_string()))
    }
}
