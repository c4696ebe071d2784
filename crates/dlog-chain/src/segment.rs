//! The segment: a bounded, ordered run of content references.

use std::fmt;

use dlog_store::{ObjectKind, Storable};
use dlog_types::ContentRef;
use serde::{Deserialize, Serialize};

use crate::error::{ChainError, ChainResult};

/// Position of a segment in the chain.
///
/// Live ranks count from `1` (the head) up to `K`. Once the rank-`K` segment
/// overflows it becomes `Archived` and never changes rank again.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rank {
    Live(usize),
    Archived,
}

impl Rank {
    /// The rank of the head segment.
    pub const HEAD: Rank = Rank::Live(1);

    /// Returns `true` for live ranks.
    pub fn is_live(&self) -> bool {
        matches!(self, Rank::Live(_))
    }

    /// Returns `true` for archived segments.
    pub fn is_archived(&self) -> bool {
        matches!(self, Rank::Archived)
    }

    /// The numeric live rank, if any.
    pub fn live(&self) -> Option<usize> {
        match self {
            Rank::Live(rank) => Some(*rank),
            Rank::Archived => None,
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rank::Live(rank) => write!(f, "live#{rank}"),
            Rank::Archived => f.write_str("archived"),
        }
    }
}

/// One node of the article index chain.
///
/// `items` is ordered most-recent first. A segment is a plain value: edits
/// happen on an unpersisted working copy and persisting it yields a new
/// reference, so two persisted references never share a mutable segment.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    items: Vec<ContentRef>,
    previous: Option<ContentRef>,
    rank: Rank,
}

impl Segment {
    /// An empty segment with the given rank and no predecessor.
    pub fn new(rank: Rank) -> Self {
        Self {
            items: Vec::new(),
            previous: None,
            rank,
        }
    }

    /// An empty rank-1 segment, the starting point of every chain.
    pub fn head() -> Self {
        Self::new(Rank::HEAD)
    }

    /// Build a segment from its parts. `items` must already be newest first.
    pub fn from_parts(items: Vec<ContentRef>, previous: Option<ContentRef>, rank: Rank) -> Self {
        Self {
            items,
            previous,
            rank,
        }
    }

    /// Insert `item` as the most recent entry. Capacity is the caller's
    /// concern.
    pub fn prepend(&mut self, item: ContentRef) {
        self.items.insert(0, item);
    }

    /// Remove and return the oldest entry.
    pub fn pop_oldest(&mut self) -> ChainResult<ContentRef> {
        self.items.pop().ok_or(ChainError::EmptySegment)
    }

    /// Index of the first entry equal to `item`.
    pub fn find(&self, item: &ContentRef) -> Option<usize> {
        self.items.iter().position(|candidate| candidate == item)
    }

    /// Remove the entry at `index`, returning it.
    pub fn remove_at(&mut self, index: usize) -> ChainResult<ContentRef> {
        self.check_index(index)?;
        Ok(self.items.remove(index))
    }

    /// Replace the entry at `index`, returning the previous value.
    pub fn replace_at(&mut self, index: usize, item: ContentRef) -> ChainResult<ContentRef> {
        self.check_index(index)?;
        Ok(std::mem::replace(&mut self.items[index], item))
    }

    fn check_index(&self, index: usize) -> ChainResult<()> {
        if index >= self.items.len() {
            return Err(ChainError::IndexOutOfRange {
                index,
                len: self.items.len(),
            });
        }
        Ok(())
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if the segment holds no entries.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Entries, most recent first.
    pub fn items(&self) -> &[ContentRef] {
        &self.items
    }

    /// Entry at `index`, if present.
    pub fn get(&self, index: usize) -> Option<&ContentRef> {
        self.items.get(index)
    }

    /// Reference to the next-older segment.
    pub fn previous(&self) -> Option<ContentRef> {
        self.previous
    }

    /// Relink this segment to a (new version of its) predecessor.
    pub fn set_previous(&mut self, previous: Option<ContentRef>) {
        self.previous = previous;
    }

    pub fn rank(&self) -> Rank {
        self.rank
    }

    /// Freeze this segment into the archive.
    pub fn archive(&mut self) {
        self.rank = Rank::Archived;
    }
}

impl Storable for Segment {
    const KIND: ObjectKind = ObjectKind::Segment;
}
