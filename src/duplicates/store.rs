//! Size-hashed entry store.
//!
//! # Overview
//!
//! Every admitted file lands in one of [`BUCKET_COUNT`] buckets, selected by
//! the low [`HASH_BITS`] bits of its exact size. Files with equal content
//! always have equal size and therefore always share a bucket, so the
//! cluster engine never has to compare across buckets.
//!
//! The converse does not hold: sizes `1` and `1 + BUCKET_COUNT` collide. Any
//! equality test must still check the exact size first.
//!
//! # Example
//!
//! ```
//! use dupescan::duplicates::{bucket_index, EntryStore, BUCKET_COUNT};
//! use dupescan::scanner::FileEntry;
//! use std::path::PathBuf;
//!
//! let mut store = EntryStore::new();
//! store.insert(FileEntry::new(PathBuf::from("/a"), 10, None));
//! store.insert(FileEntry::new(PathBuf::from("/b"), 10 + BUCKET_COUNT as u64, None));
//!
//! assert_eq!(store.len(), 2);
//! assert_eq!(store.bucket(bucket_index(10)).len(), 2);
//! ```

use std::path::Path;

use crate::scanner::{FileEntry, FileId};

/// Number of size bits used to select a bucket.
pub const HASH_BITS: u32 = 10;

/// Number of buckets in the store.
pub const BUCKET_COUNT: usize = 1 << HASH_BITS;

/// Bucket selected for a file of the given size.
#[must_use]
pub fn bucket_index(size: u64) -> usize {
    (size & (BUCKET_COUNT as u64 - 1)) as usize
}

/// Fixed array of size buckets holding admitted entries.
#[derive(Debug, Clone)]
pub struct EntryStore {
    buckets: Vec<Vec<FileEntry>>,
    len: usize,
}

impl Default for EntryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl EntryStore {
    /// Create a store with every bucket empty.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buckets: vec![Vec::new(); BUCKET_COUNT],
            len: 0,
        }
    }

    /// Whether an entry for the same physical file is already stored.
    ///
    /// Scans only the bucket `size` maps to.
    #[must_use]
    pub fn contains_file(&self, size: u64, id: FileId) -> bool {
        self.buckets[bucket_index(size)]
            .iter()
            .any(|entry| entry.id == Some(id))
    }

    /// Whether `path` was already stored for the same file.
    ///
    /// Catches one path reached twice, e.g. given as an argument and again
    /// through its parent directory.
    #[must_use]
    pub fn contains_entry(&self, size: u64, path: &Path, id: Option<FileId>) -> bool {
        self.buckets[bucket_index(size)]
            .iter()
            .any(|entry| entry.id == id && entry.path == path)
    }

    /// Append an entry to the bucket its size maps to.
    pub fn insert(&mut self, entry: FileEntry) {
        self.buckets[bucket_index(entry.size)].push(entry);
        self.len += 1;
    }

    /// Total number of stored entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the store holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Entries of one bucket, in admission order.
    ///
    /// # Panics
    ///
    /// Panics if `index >= BUCKET_COUNT`.
    #[must_use]
    pub fn bucket(&self, index: usize) -> &[FileEntry] {
        &self.buckets[index]
    }

    /// Iterate over every stored entry, bucket by bucket.
    pub fn entries(&self) -> impl Iterator<Item = &FileEntry> {
        self.buckets.iter().flatten()
    }

    /// Consume the store, yielding each non-empty bucket in index order.
    ///
    /// A bucket is freed as soon as the caller drops it.
    pub fn into_buckets(self) -> impl Iterator<Item = Vec<FileEntry>> {
        self.buckets.into_iter().filter(|bucket| !bucket.is_empty())
    }
}
