//! End-to-end behaviour of the chain against an in-memory store.

use dlog_chain::{
    ChainConfig, ChainReader, ChainWriter, HeadPointer, MutationEngine, Rank, Segment,
};
use dlog_store::{InMemoryObjectStore, ObjectStoreExt};
use dlog_types::ContentRef;

fn article(n: u32) -> ContentRef {
    ContentRef::from_bytes(format!("article-{n}").as_bytes())
}

struct Chain {
    store: InMemoryObjectStore,
    config: ChainConfig,
    pointer: HeadPointer,
}

impl Chain {
    fn new(config: ChainConfig) -> Self {
        Self {
            store: InMemoryObjectStore::new(),
            config,
            pointer: HeadPointer::new(ContentRef::from_bytes(b"owner")),
        }
    }

    fn append(&mut self, item: ContentRef) -> bool {
        let head = self.pointer.head_segment(&self.store).unwrap();
        let outcome = ChainWriter::new(&self.store, self.config)
            .append(item, head)
            .unwrap();
        self.pointer = self.pointer.advance(outcome.head);
        outcome.rebalanced
    }

    fn remove(&mut self, item: &ContentRef) -> Option<ContentRef> {
        let head = self.pointer.head_segment(&self.store).unwrap();
        let new_head = MutationEngine::new(&self.store).remove(item, head).unwrap();
        if let Some(id) = new_head {
            self.pointer = self.pointer.advance(id);
        }
        new_head
    }

    fn replace(&mut self, item: &ContentRef, with: ContentRef) -> Option<ContentRef> {
        let head = self.pointer.head_segment(&self.store).unwrap();
        let new_head = MutationEngine::new(&self.store)
            .replace(item, with, head)
            .unwrap();
        if let Some(id) = new_head {
            self.pointer = self.pointer.advance(id);
        }
        new_head
    }

    fn head(&self) -> Segment {
        self.pointer.head_segment(&self.store).unwrap()
    }

    fn reader(&self) -> ChainReader<'_, InMemoryObjectStore> {
        ChainReader::new(&self.store)
    }

    fn segment_refs(&self) -> Vec<ContentRef> {
        self.reader()
            .segments(self.pointer.chain_head)
            .map(|entry| entry.unwrap().0)
            .collect()
    }
}

#[test]
fn thirty_one_appends_rebalance_the_head() {
    let mut chain = Chain::new(ChainConfig::default());
    let mut flags = Vec::new();
    for n in 1..=31 {
        flags.push(chain.append(article(n)));
    }

    assert_eq!(chain.head().len(), 7);
    assert_eq!(flags.last(), Some(&true));
    assert!(flags[..30].iter().all(|f| !f));

    let report = chain
        .reader()
        .verify(chain.pointer.chain_head, &chain.config)
        .unwrap();
    assert!(report.is_valid());
    assert_eq!(report.items, 31);
    assert_eq!(report.archived, 1);
}

#[test]
fn newest_item_is_at_the_front() {
    let mut chain = Chain::new(ChainConfig::default());
    let (a, b) = (article(1), article(2));

    chain.append(a);
    assert_eq!(chain.head().find(&a), Some(0));

    chain.append(b);
    assert_eq!(chain.head().find(&b), Some(0));
    assert_eq!(chain.head().find(&a), Some(1));
}

#[test]
fn removing_an_absent_item_changes_nothing() {
    let mut chain = Chain::new(ChainConfig::default());
    for n in 0..20 {
        chain.append(article(n));
    }
    let before = chain.store.write_count();
    let pointer = chain.pointer;

    assert_eq!(chain.remove(&article(999)), None);
    assert_eq!(chain.store.write_count(), before);
    assert_eq!(chain.pointer, pointer);
}

#[test]
fn replace_takes_the_old_position() {
    let mut chain = Chain::new(ChainConfig::default());
    let (a, b, c) = (article(1), article(2), article(3));
    chain.append(a);
    chain.append(b);
    let index = chain.head().find(&a);

    chain.replace(&a, c).unwrap();
    assert_eq!(chain.head().find(&c), index);
    assert_eq!(
        chain.reader().locate(chain.pointer.chain_head, &a).unwrap(),
        None
    );
    assert_eq!(chain.head().items(), &[b, c]);
}

#[test]
fn edits_rewrite_exactly_the_path_to_the_target() {
    let mut chain = Chain::new(ChainConfig::default());
    for n in 0..55 {
        chain.append(article(n));
    }
    let before_refs = chain.segment_refs();

    for target in [54, 40, 20, 0] {
        let depth = chain
            .reader()
            .locate(chain.pointer.chain_head, &article(target))
            .unwrap()
            .unwrap()
            .depth;
        let before = chain.store.write_count();
        let old_refs = chain.segment_refs();

        chain.remove(&article(target)).unwrap();

        assert_eq!(chain.store.write_count() - before, depth as u64);
        let new_refs = chain.segment_refs();
        assert_eq!(new_refs.len(), old_refs.len());
        assert_eq!(new_refs[depth..], old_refs[depth..]);
        for (new, old) in new_refs[..depth].iter().zip(&old_refs[..depth]) {
            assert_ne!(new, old);
        }
    }

    // Nothing is deleted: the pre-edit oldest segment is still readable.
    let oldest = *before_refs.last().unwrap();
    assert!(chain.store.get::<Segment>(&oldest).is_ok());
    assert_eq!(chain.reader().items(chain.pointer.chain_head, None).unwrap().len(), 51);
}

#[test]
fn archived_segments_are_never_rewritten() {
    let mut chain = Chain::new(ChainConfig::default());
    for n in 0..31 {
        chain.append(article(n));
    }
    let archived: Vec<(ContentRef, Segment)> = chain
        .reader()
        .segments(chain.pointer.chain_head)
        .map(|entry| entry.unwrap())
        .filter(|(_, seg)| seg.rank() == Rank::Archived)
        .collect();
    assert_eq!(archived.len(), 1);

    for n in 31..80 {
        chain.append(article(n));
    }

    let refs = chain.segment_refs();
    for (id, segment) in &archived {
        assert!(refs.contains(id), "archived segment {id:?} was replaced");
        assert_eq!(&chain.store.get::<Segment>(id).unwrap(), segment);
    }
}

#[test]
fn old_heads_stay_readable() {
    let mut chain = Chain::new(ChainConfig::default());
    for n in 0..12 {
        chain.append(article(n));
    }
    let snapshot = chain.pointer;
    let snapshot_items = chain.reader().items(snapshot.chain_head, None).unwrap();

    for n in 12..40 {
        chain.append(article(n));
    }
    chain.remove(&article(3)).unwrap();

    assert_eq!(
        chain.reader().items(snapshot.chain_head, None).unwrap(),
        snapshot_items
    );
}

#[test]
fn remove_then_append_keeps_invariants() {
    let mut chain = Chain::new(ChainConfig::new(4, 2).unwrap());
    for n in 0..30 {
        chain.append(article(n));
    }
    for n in (0..30).step_by(3) {
        chain.remove(&article(n)).unwrap();
    }
    for n in 30..50 {
        chain.append(article(n));
    }

    let report = chain
        .reader()
        .verify(chain.pointer.chain_head, &chain.config)
        .unwrap();
    assert!(report.is_valid(), "{:?}", report.violations);
    assert_eq!(report.items, 40);
}
