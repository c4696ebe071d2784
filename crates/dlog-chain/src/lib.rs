//! The article index chain.
//!
//! An author's published articles are indexed by a singly-linked chain of
//! content-addressed [`Segment`]s, newest first. The first few segments are
//! *live* (ranked `1..=K`) and absorb new entries; when the last live segment
//! overflows it is frozen into the *archive*, and the live segments hand a
//! batch of their oldest entries down so the archive grows at an even rate.
//! History is never rewritten wholesale: every change persists new segments
//! and shares the untouched suffix by reference.
//!
//! # Components
//!
//! - [`Segment`] / [`Rank`] -- the bounded storage unit of the chain
//! - [`ChainConfig`] -- segment capacity `L` and live-segment count `K`
//! - [`ChainWriter`] -- cascading append with archive rebalancing
//! - [`MutationEngine`] -- remove/replace with copy-on-write propagation
//! - [`ChainReader`] -- traversal, lookup and integrity verification
//! - [`HeadPointer`] -- the published root naming the owner and chain head
//!
//! # Single writer
//!
//! Each chain assumes one logical writer at a time. Nothing here locks or
//! versions the head: two writers starting from the same head will each
//! produce a valid chain and the last one published wins. Callers serialize
//! mutations per chain (the SDK does this with writer sessions).

pub mod config;
pub mod error;
pub mod head;
pub mod mutation;
pub mod reader;
pub mod segment;
pub mod writer;

pub use config::ChainConfig;
pub use error::{ChainError, ChainResult};
pub use head::HeadPointer;
pub use mutation::MutationEngine;
pub use reader::{ChainReader, ChainReport, Location, Segments, Violation, ViolationKind};
pub use segment::{Rank, Segment};
pub use writer::{AppendOutcome, ChainWriter};
