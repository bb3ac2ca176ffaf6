//! Path classification, directory recursion and file admission.
//!
//! # Overview
//!
//! The [`Walker`] takes input paths one at a time, classifies each one
//! (regular file, directory, or something it cannot use), applies the
//! symlink policy, and either admits the file into an [`EntryStore`] or
//! recurses into the directory.
//!
//! # Features
//!
//! - Symlink policy by depth: never, top-level arguments only, or always
//! - Symlinks to directories are never recursed, even when followed
//! - Cycle detection by `(device, inode)` of every recursed directory
//! - Hidden name filtering (names starting with `.`)
//! - Empty file filtering and readability check on admission
//! - Optional hardlink collapsing ("physical" mode)
//!
//! Every per-path failure is logged as a warning and skipped; nothing here
//! aborts a run.
//!
//! # Example
//!
//! ```no_run
//! use dupescan::duplicates::EntryStore;
//! use dupescan::scanner::{SymlinkPolicy, Walker, WalkerConfig};
//! use std::path::Path;
//!
//! let config = WalkerConfig {
//!     recursive: true,
//!     symlinks: SymlinkPolicy::ArgsOnly,
//!     ..Default::default()
//! };
//!
//! let mut store = EntryStore::new();
//! let mut walker = Walker::new(&config, &mut store);
//! walker.process_path(Path::new("/home/user/Downloads"), 0);
//! let stats = walker.finish();
//! println!("{} files, {} errors", stats.files_admitted, stats.errors);
//! ```

use std::ffi::OsStr;
use std::fs::{self, File, Metadata};
use std::path::Path;

use walkdir::WalkDir;

use super::{FileEntry, FileId, FileKind, ScanError, VisitSet, WalkerConfig};
use crate::duplicates::EntryStore;

/// Counters collected while walking.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalkStats {
    /// Files added to the entry store
    pub files_admitted: usize,
    /// Directories scanned
    pub directories_recursed: usize,
    /// Paths skipped because of their type, an option, or an earlier visit (not errors)
    pub skipped: usize,
    /// Paths skipped because of an I/O failure
    pub errors: usize,
    /// Paths dropped because their file was already admitted (physical mode)
    pub links_collapsed: usize,
}

/// Walks input paths into an [`EntryStore`].
///
/// The walker owns the directory visit set for the whole run, so the same
/// walker must be used for every input path.
#[derive(Debug)]
pub struct Walker<'a> {
    config: &'a WalkerConfig,
    store: &'a mut EntryStore,
    visited: VisitSet,
    stats: WalkStats,
}

impl<'a> Walker<'a> {
    /// Create a walker admitting files into `store`.
    #[must_use]
    pub fn new(config: &'a WalkerConfig, store: &'a mut EntryStore) -> Self {
        Self {
            config,
            store,
            visited: VisitSet::new(),
            stats: WalkStats::default(),
        }
    }

    /// Process one path at the given depth.
    ///
    /// Top-level inputs are processed at depth 0; the children of a
    /// recursed directory are processed one level deeper than the
    /// directory's parent.
    pub fn process_path(&mut self, path: &Path, depth: usize) {
        if path.as_os_str().is_empty() {
            return;
        }

        let (metadata, kind) = match self.classify(path, depth) {
            Ok(Some(classified)) => classified,
            Ok(None) => {
                self.stats.skipped += 1;
                return;
            }
            Err(e) => {
                self.record_error(&e);
                return;
            }
        };

        match kind {
            FileKind::Regular => self.admit(path, &metadata),
            FileKind::Directory if self.config.recursive => {
                self.recurse(path, &metadata, depth + 1);
            }
            FileKind::Directory
            | FileKind::Symlink
            | FileKind::Fifo
            | FileKind::BlockDevice
            | FileKind::CharDevice
            | FileKind::Socket
            | FileKind::Unknown => {
                log::warn!("{} is {}; skipping", path.display(), kind);
                self.stats.skipped += 1;
            }
        }
    }

    /// Read metadata for `path` and resolve its kind under the symlink policy.
    ///
    /// Returns `Ok(None)` for links that are silently skipped: links the
    /// policy does not follow, and followed links that lead to a directory.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::Metadata`] if the path (or a followed link's
    /// target) cannot be stat'ed.
    pub fn classify(
        &self,
        path: &Path,
        depth: usize,
    ) -> Result<Option<(Metadata, FileKind)>, ScanError> {
        let metadata = fs::symlink_metadata(path).map_err(|source| ScanError::Metadata {
            path: path.to_path_buf(),
            source,
        })?;

        if !metadata.file_type().is_symlink() {
            let kind = FileKind::from_file_type(metadata.file_type());
            return Ok(Some((metadata, kind)));
        }

        if !self.config.symlinks.follows_at(depth) {
            log::debug!("Not following symlink: {}", path.display());
            return Ok(None);
        }

        let target = fs::metadata(path).map_err(|source| ScanError::Metadata {
            path: path.to_path_buf(),
            source,
        })?;

        if target.is_dir() {
            log::debug!("Not recursing into symlinked directory: {}", path.display());
            return Ok(None);
        }

        let kind = FileKind::from_file_type(target.file_type());
        Ok(Some((target, kind)))
    }

    /// Scan a directory and process each child at `depth`.
    ///
    /// Only the directory's own entries are listed; descent goes back
    /// through [`Walker::process_path`] so the symlink and cycle rules apply
    /// at every level.
    fn recurse(&mut self, path: &Path, metadata: &Metadata, depth: usize) {
        if let Some(id) = FileId::from_metadata(metadata) {
            if !self.visited.record(id) {
                log::debug!("Directory already visited: {}", path.display());
                return;
            }
        }

        let all_files = self.config.all_files;
        let listing = WalkDir::new(path)
            .min_depth(1)
            .max_depth(1)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| {
                let keep = all_files || !is_hidden(entry.file_name());
                if !keep {
                    log::trace!("Skipping hidden entry: {}", entry.path().display());
                }
                keep
            });

        let mut children = Vec::new();
        for entry in listing {
            match entry {
                Ok(entry) => children.push(entry.into_path()),
                // The directory itself could not be opened
                Err(e) if e.depth() == 0 => {
                    self.record_error(&directory_error(path, e));
                    return;
                }
                Err(e) => self.record_error(&directory_error(path, e)),
            }
        }

        self.stats.directories_recursed += 1;
        log::trace!("Recursing into {} ({} entries)", path.display(), children.len());

        for child in children {
            self.process_path(&child, depth);
        }
    }

    /// Add a regular file to the store if it passes the admission checks.
    fn admit(&mut self, path: &Path, metadata: &Metadata) {
        let size = metadata.len();

        if size == 0 {
            if self.config.ignore_empty {
                log::debug!("Skipping empty file: {}", path.display());
                self.stats.skipped += 1;
                return;
            }
        } else if let Err(source) = File::open(path) {
            self.record_error(&ScanError::Unreadable {
                path: path.to_path_buf(),
                source,
            });
            return;
        }

        let id = FileId::from_metadata(metadata);

        if self.store.contains_entry(size, path, id) {
            log::debug!("Already admitted: {}", path.display());
            self.stats.skipped += 1;
            return;
        }

        if self.config.physical {
            if let Some(id) = id {
                if self.store.contains_file(size, id) {
                    log::debug!("Skipping second path to the same file: {}", path.display());
                    self.stats.links_collapsed += 1;
                    return;
                }
            }
        }

        self.store.insert(FileEntry::new(path.to_path_buf(), size, id));
        self.stats.files_admitted += 1;
    }

    fn record_error(&mut self, error: &ScanError) {
        log::warn!("{error}");
        self.stats.errors += 1;
    }

    /// Directories recursed so far.
    #[must_use]
    pub fn visited(&self) -> &VisitSet {
        &self.visited
    }

    /// Counters collected so far.
    #[must_use]
    pub fn stats(&self) -> &WalkStats {
        &self.stats
    }

    /// Finish walking and return the collected counters.
    #[must_use]
    pub fn finish(self) -> WalkStats {
        log::debug!(
            "Walk finished: {} files admitted, {} directories, {} skipped, {} errors",
            self.stats.files_admitted,
            self.stats.directories_recursed,
            self.stats.skipped,
            self.stats.errors
        );
        self.stats
    }
}

fn directory_error(dir: &Path, error: walkdir::Error) -> ScanError {
    let path = error.path().unwrap_or(dir).to_path_buf();
    ScanError::Directory {
        path,
        source: error.into(),
    }
}

fn is_hidden(name: &OsStr) -> bool {
    name.as_encoded_bytes().first() == Some(&b'.')
}
