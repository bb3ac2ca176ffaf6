//! Duplicate detection module.
//!
//! This module provides functionality for:
//! - Storing admitted files in buckets keyed by size
//! - Deciding content equality between two files
//! - Clustering equal files bucket by bucket
//!
//! # Architecture
//!
//! - [`store`]: The size-hashed [`EntryStore`]
//! - [`compare`]: The [`Comparator`] trait with digest and byte-by-byte implementations
//! - [`finder`]: The pairwise [`ClusterFinder`] and the [`ClusterSink`] it reports to

pub mod compare;
pub mod finder;
pub mod store;

pub use compare::{
    comparator_for, ensure_digest, CompareConfig, Comparator, DigestComparator,
    ThoroughComparator,
};
pub use finder::{ClusterFinder, ClusterSink, FinderError, FinderStats};
pub use store::{bucket_index, EntryStore, BUCKET_COUNT, HASH_BITS};
