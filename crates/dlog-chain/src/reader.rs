//! Read-only traversal and integrity checks.

use dlog_store::{ObjectStore, ObjectStoreExt};
use dlog_types::ContentRef;
use tracing::warn;

use crate::config::ChainConfig;
use crate::error::ChainResult;
use crate::segment::{Rank, Segment};

/// Walks a chain from the head toward the oldest segment.
pub struct ChainReader<'a, S: ObjectStore + ?Sized> {
    store: &'a S,
}

/// Iterator over `(reference, segment)` pairs, newest segment first.
///
/// Yields an error and stops if a segment cannot be loaded.
pub struct Segments<'a, S: ObjectStore + ?Sized> {
    store: &'a S,
    next: Option<ContentRef>,
}

impl<'a, S: ObjectStore + ?Sized> Iterator for Segments<'a, S> {
    type Item = ChainResult<(ContentRef, Segment)>;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next.take()?;
        match self.store.get::<Segment>(&id) {
            Ok(segment) => {
                self.next = segment.previous();
                Some(Ok((id, segment)))
            }
            Err(e) => Some(Err(e.into())),
        }
    }
}

/// Where an item sits in the chain.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Location {
    /// 1-based position of the segment, counting from the head.
    pub depth: usize,
    /// Index within the segment.
    pub index: usize,
    /// Reference of the segment holding the item.
    pub segment: ContentRef,
}

/// Summary produced by [`ChainReader::verify`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChainReport {
    pub segments: usize,
    pub items: usize,
    pub live: usize,
    pub archived: usize,
    pub violations: Vec<Violation>,
}

impl ChainReport {
    /// Returns `true` if no invariant was violated.
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }
}

/// A specific invariant violation found during verification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Violation {
    /// 1-based segment position, counting from the head.
    pub depth: usize,
    pub kind: ViolationKind,
    pub description: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViolationKind {
    /// More than `L` items in a segment.
    Oversized,
    /// Ranks do not run `1..=m` followed only by archived segments.
    RankOutOfOrder,
}

impl<'a, S: ObjectStore + ?Sized> ChainReader<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Iterate the chain starting at `head`. An empty chain yields nothing.
    pub fn segments(&self, head: Option<ContentRef>) -> Segments<'a, S> {
        Segments {
            store: self.store,
            next: head,
        }
    }

    /// Items newest first, stopping after `limit` if given.
    pub fn items(&self, head: Option<ContentRef>, limit: Option<usize>) -> ChainResult<Vec<ContentRef>> {
        let limit = limit.unwrap_or(usize::MAX);
        let mut out = Vec::new();
        for entry in self.segments(head) {
            if out.len() >= limit {
                break;
            }
            let (_, segment) = entry?;
            let room = limit - out.len();
            out.extend(segment.items().iter().take(room).copied());
        }
        Ok(out)
    }

    /// Find the first occurrence of `target`.
    pub fn locate(&self, head: Option<ContentRef>, target: &ContentRef) -> ChainResult<Option<Location>> {
        for (depth, entry) in self.segments(head).enumerate() {
            let (id, segment) = entry?;
            if let Some(index) = segment.find(target) {
                return Ok(Some(Location {
                    depth: depth + 1,
                    index,
                    segment: id,
                }));
            }
        }
        Ok(None)
    }

    /// Walk the whole chain and check segment capacity and rank order.
    ///
    /// Violations are collected rather than returned as errors; a segment
    /// that cannot be read is still an error.
    pub fn verify(&self, head: Option<ContentRef>, config: &ChainConfig) -> ChainResult<ChainReport> {
        let mut report = ChainReport::default();
        let mut expected = Some(1usize);

        for (position, entry) in self.segments(head).enumerate() {
            let (id, segment) = entry?;
            let depth = position + 1;
            report.segments += 1;
            report.items += segment.len();

            if segment.len() > config.segment_capacity {
                report.violations.push(Violation {
                    depth,
                    kind: ViolationKind::Oversized,
                    description: format!(
                        "segment {} holds {} items, capacity is {}",
                        id.short_hex(),
                        segment.len(),
                        config.segment_capacity
                    ),
                });
            }

            match segment.rank() {
                Rank::Live(rank) => {
                    report.live += 1;
                    let in_order = expected == Some(rank) && rank <= config.live_segments;
                    if !in_order {
                        report.violations.push(Violation {
                            depth,
                            kind: ViolationKind::RankOutOfOrder,
                            description: match expected {
                                Some(want) => format!("expected live#{want}, found live#{rank}"),
                                None => format!("found live#{rank} after the archive"),
                            },
                        });
                    }
                    expected = expected.map(|_| rank + 1);
                }
                Rank::Archived => {
                    report.archived += 1;
                    if depth == 1 {
                        report.violations.push(Violation {
                            depth,
                            kind: ViolationKind::RankOutOfOrder,
                            description: "head segment is archived".into(),
                        });
                    }
                    expected = None;
                }
            }
        }

        for violation in &report.violations {
            warn!(depth = violation.depth, kind = ?violation.kind, "{}", violation.description);
        }
        Ok(report)
    }
}
