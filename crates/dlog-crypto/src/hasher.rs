use dlog_types::ContentRef;

/// Domain-separated BLAKE3 content hasher.
///
/// The domain tag (e.g. `"dlog-segment-v1"`) is hashed ahead of the data, so
/// two object kinds never share a reference for the same payload.
pub struct ContentHasher {
    domain: &'static str,
}

impl ContentHasher {
    /// Hasher for article bodies.
    pub const ARTICLE: Self = Self {
        domain: "dlog-article-v1",
    };
    /// Hasher for article headers (the items held by index segments).
    pub const HEADER: Self = Self {
        domain: "dlog-header-v1",
    };
    /// Hasher for author profiles.
    pub const AUTHOR: Self = Self {
        domain: "dlog-author-v1",
    };
    /// Hasher for article index segments.
    pub const SEGMENT: Self = Self {
        domain: "dlog-segment-v1",
    };
    /// Hasher for head pointers.
    pub const HEAD: Self = Self {
        domain: "dlog-head-v1",
    };

    pub fn hash(&self, data: &[u8]) -> ContentRef {
        let mut hasher = blake3::Hasher::new();
        hasher.update(self.domain.as_bytes());
        hasher.update(b":");
        hasher.update(data);
        ContentRef::from_hash(*hasher.finalize().as_bytes())
    }
}
