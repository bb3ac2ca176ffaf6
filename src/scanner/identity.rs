//! File identity and the directory visit set.
//!
//! # Overview
//!
//! A file's identity is its `(device, inode)` pair. Two paths with the same
//! identity name the same file: either hardlinks, or the same directory
//! reached twice through a cycle.
//!
//! [`VisitSet`] remembers the identity of every directory the walker has
//! recursed into, so a directory is never scanned twice in one run.
//!
//! # Platform Support
//!
//! - **Unix**: identity comes from `st_dev` / `st_ino`
//! - **Other**: no identity is available; [`FileId::from_metadata`] returns
//!   `None` and identity-based checks never match

use std::collections::HashSet;
use std::fs::Metadata;

/// Device and inode of a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FileId {
    /// Device id
    pub device: u64,
    /// Inode number
    pub inode: u64,
}

impl FileId {
    /// Create an identity from raw values.
    #[must_use]
    pub const fn new(device: u64, inode: u64) -> Self {
        Self { device, inode }
    }

    /// Read the identity from file metadata.
    #[cfg(unix)]
    #[must_use]
    pub fn from_metadata(metadata: &Metadata) -> Option<Self> {
        use std::os::unix::fs::MetadataExt;
        Some(Self::new(metadata.dev(), metadata.ino()))
    }

    #[cfg(not(unix))]
    #[must_use]
    pub fn from_metadata(_metadata: &Metadata) -> Option<Self> {
        None
    }

    /// Whether identities are available on this platform.
    #[must_use]
    pub const fn is_supported() -> bool {
        cfg!(unix)
    }
}

/// Directories already recursed during this run.
///
/// Membership only grows. Not thread-safe; the walker owns it exclusively.
#[derive(Debug, Default)]
pub struct VisitSet {
    seen: HashSet<FileId>,
}

impl VisitSet {
    /// Create an empty visit set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the directory has already been recursed.
    #[must_use]
    pub fn contains(&self, id: FileId) -> bool {
        self.seen.contains(&id)
    }

    /// Record a directory as recursed.
    ///
    /// Returns `true` if it was not recorded before.
    pub fn record(&mut self, id: FileId) -> bool {
        self.seen.insert(id)
    }

    /// Number of distinct directories recorded.
    #[must_use]
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    /// Whether no directory has been recorded yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
