//! Cascading append with archive rebalancing.
//!
//! An append walks down the live segments only as far as it has to. A full
//! live segment keeps the new item and hands its oldest item to the next
//! segment; when the last live segment (rank `K`) is full it is frozen into
//! the archive and replaced by a fresh rank-`K` segment. After a freeze every
//! live segment on the way back up moves a batch of its oldest items into its
//! predecessor, so the live segments refill the gap evenly.

use dlog_store::{ObjectStore, ObjectStoreExt};
use dlog_types::ContentRef;
use tracing::debug;

use crate::config::ChainConfig;
use crate::error::{ChainError, ChainResult};
use crate::segment::{Rank, Segment};

/// Result of a successful append.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AppendOutcome {
    /// Reference to the new rank-1 segment.
    pub head: ContentRef,
    /// `true` if the append froze a segment into the archive and the live
    /// segments were rebalanced.
    pub rebalanced: bool,
}

/// Appends items to a chain held in an [`ObjectStore`].
pub struct ChainWriter<'a, S: ObjectStore + ?Sized> {
    store: &'a S,
    config: ChainConfig,
}

impl<'a, S: ObjectStore + ?Sized> ChainWriter<'a, S> {
    pub fn new(store: &'a S, config: ChainConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &ChainConfig {
        &self.config
    }

    /// Append `item` to the chain whose rank-1 segment is `head`.
    ///
    /// Every segment touched is persisted before this returns. The caller
    /// publishes the returned head; until then the previous head still names
    /// a complete, valid chain.
    pub fn append(&self, item: ContentRef, head: Segment) -> ChainResult<AppendOutcome> {
        self.config.validate()?;
        if head.rank() != Rank::HEAD {
            return Err(ChainError::UnexpectedRank {
                found: head.rank(),
                reason: "appends must start at the rank-1 segment".into(),
            });
        }

        let (head, rebalanced) = self.insert(item, head)?;
        debug!(head = %head.short_hex(), rebalanced, "item appended");
        Ok(AppendOutcome { head, rebalanced })
    }

    fn insert(&self, item: ContentRef, mut segment: Segment) -> ChainResult<(ContentRef, bool)> {
        if segment.len() < self.config.segment_capacity {
            segment.prepend(item);
            return Ok((self.persist(&segment)?, false));
        }

        match segment.rank() {
            Rank::Live(rank) if rank < self.config.live_segments => {
                self.cascade(item, segment, rank)
            }
            Rank::Live(rank) if rank == self.config.live_segments => self.freeze(item, segment),
            found @ Rank::Live(_) => Err(ChainError::UnexpectedRank {
                found,
                reason: format!(
                    "chain has only {} live segments",
                    self.config.live_segments
                ),
            }),
            found @ Rank::Archived => Err(ChainError::UnexpectedRank {
                found,
                reason: "archived segments never take new items".into(),
            }),
        }
    }

    /// Full live segment below rank `K`: keep `item`, push the oldest entry
    /// down to the next segment.
    fn cascade(
        &self,
        item: ContentRef,
        mut segment: Segment,
        rank: usize,
    ) -> ChainResult<(ContentRef, bool)> {
        segment.prepend(item);
        let overflow = segment.pop_oldest()?;

        let rebalanced = match segment.previous() {
            None => {
                let mut next = Segment::new(Rank::Live(rank + 1));
                next.prepend(overflow);
                segment.set_previous(Some(self.persist(&next)?));
                debug!(rank = rank + 1, "live segment created from overflow");
                false
            }
            Some(prev_id) => {
                let prev: Segment = self.store.get(&prev_id)?;
                if prev.rank() != Rank::Live(rank + 1) {
                    return Err(ChainError::UnexpectedRank {
                        found: prev.rank(),
                        reason: format!("segment after live#{rank} must be live#{}", rank + 1),
                    });
                }
                let (prev_id, rebalanced) = self.insert(overflow, prev)?;
                segment.set_previous(Some(prev_id));
                if rebalanced {
                    self.rebalance(&mut segment)?;
                }
                rebalanced
            }
        };

        Ok((self.persist(&segment)?, rebalanced))
    }

    /// Full rank-`K` segment: archive it as is and start a new rank-`K`
    /// segment holding only `item`.
    fn freeze(&self, item: ContentRef, mut segment: Segment) -> ChainResult<(ContentRef, bool)> {
        segment.archive();
        let frozen = self.persist(&segment)?;
        debug!(frozen = %frozen.short_hex(), len = segment.len(), "segment archived");

        let fresh = Segment::from_parts(
            vec![item],
            Some(frozen),
            Rank::Live(self.config.live_segments),
        );
        Ok((self.persist(&fresh)?, true))
    }

    /// Move a batch of `segment`'s oldest items into its predecessor.
    ///
    /// The predecessor is filled toward `L - (L-1)/K` items, plus one if its
    /// live rank is at most `(L-1) mod K`. The batch never pushes the
    /// predecessor past `L`.
    fn rebalance(&self, segment: &mut Segment) -> ChainResult<()> {
        let Some(prev_id) = segment.previous() else {
            return Ok(());
        };
        let mut prev: Segment = self.store.get(&prev_id)?;

        let mut to_move = self.config.archive_divisor().saturating_sub(prev.len());
        if let Rank::Live(rank) = prev.rank() {
            if rank <= self.config.archive_modulo() {
                to_move += 1;
            }
        }
        let to_move = to_move
            .min(self.config.segment_capacity.saturating_sub(prev.len()))
            .min(segment.len());
        if to_move == 0 {
            return Ok(());
        }

        for _ in 0..to_move {
            prev.prepend(segment.pop_oldest()?);
        }
        segment.set_previous(Some(self.persist(&prev)?));
        debug!(moved = to_move, into = %prev.rank(), from = %segment.rank(), "rebalanced");
        Ok(())
    }

    fn persist(&self, segment: &Segment) -> ChainResult<ContentRef> {
        if segment.len() > self.config.segment_capacity {
            return Err(ChainError::CapacityExceeded {
                len: segment.len(),
                capacity: self.config.segment_capacity,
            });
        }
        let id = self.store.put(segment)?;
        debug!(id = %id.short_hex(), rank = %segment.rank(), len = segment.len(), "segment persisted");
        Ok(id)
    }
}
