//! Hashing primitives for dlog.
//!
//! Every stored object kind hashes under its own BLAKE3 domain tag, so a
//! segment and an article with identical bytes never share a reference.
//! All hashing wraps `blake3` directly; there is no custom cryptography here.

pub mod hasher;

pub use hasher::ContentHasher;
