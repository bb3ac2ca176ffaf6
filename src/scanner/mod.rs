//! Scanner module for path classification, directory traversal and hashing.
//!
//! This module provides functionality for:
//! - Classifying input paths and applying the symlink policy
//! - Recursing into directories with cycle detection
//! - Admitting regular files into the entry store
//! - Content digests and leading-block samples
//! - Reading input paths from standard input
//!
//! # Architecture
//!
//! The scanner is divided into submodules:
//! - [`walker`]: Path classification, recursion and file admission
//! - [`identity`]: `(device, inode)` identities and the directory visit set
//! - [`hasher`]: Streaming digests (BLAKE3, SHA-256, SHA-512)
//! - [`input`]: Path records from stdin
//!
//! # Example
//!
//! ```no_run
//! use dupescan::duplicates::EntryStore;
//! use dupescan::scanner::{Walker, WalkerConfig};
//! use std::path::Path;
//!
//! let config = WalkerConfig {
//!     recursive: true,
//!     ..Default::default()
//! };
//!
//! let mut store = EntryStore::new();
//! let mut walker = Walker::new(&config, &mut store);
//! walker.process_path(Path::new("."), 0);
//! let stats = walker.finish();
//! println!("{} files admitted", stats.files_admitted);
//! ```

pub mod hasher;
pub mod identity;
pub mod input;
pub mod walker;

use std::fmt;
use std::fs::FileType;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

// Re-export main types
pub use hasher::{hash_to_hex, Digest, DigestFunction, Hash, Hasher, SAMPLE_SIZE};
pub use identity::{FileId, VisitSet};
pub use walker::{WalkStats, Walker};

/// Comparison status of an admitted file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EntryStatus {
    /// Not yet part of any reported cluster.
    #[default]
    Pending,
    /// Content could not be read; excluded from every later comparison.
    Invalid,
    /// Already emitted in a cluster; terminal.
    Reported,
}

/// A file admitted for duplicate detection.
#[derive(Debug, Clone)]
pub struct FileEntry {
    /// Path the file was reached through
    pub path: PathBuf,
    /// File size in bytes
    pub size: u64,
    /// Device and inode, where the platform provides them
    pub id: Option<FileId>,
    /// Comparison status
    pub status: EntryStatus,
    /// Hash of the leading block, computed on demand
    pub sample: Option<Hash>,
    /// Full content digest, computed on demand
    pub digest: Option<Digest>,
}

impl FileEntry {
    /// Create a pending entry with no sample or digest.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the file
    /// * `size` - File size in bytes
    /// * `id` - Device and inode of the file
    #[must_use]
    pub fn new(path: PathBuf, size: u64, id: Option<FileId>) -> Self {
        Self {
            path,
            size,
            id,
            status: EntryStatus::Pending,
            sample: None,
            digest: None,
        }
    }

    /// Whether the entry can still take part in a cluster.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.status == EntryStatus::Pending
    }

    /// Whether both entries are known to be the same physical file.
    #[must_use]
    pub fn same_file(&self, other: &Self) -> bool {
        matches!((self.id, other.id), (Some(a), Some(b)) if a == b)
    }
}

/// Symbolic link policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SymlinkPolicy {
    /// Never follow symbolic links.
    #[default]
    None,
    /// Follow symbolic links given directly as input paths.
    ArgsOnly,
    /// Follow every symbolic link to a file.
    Always,
}

impl SymlinkPolicy {
    /// Whether a link found at `depth` should be followed.
    #[must_use]
    pub fn follows_at(self, depth: usize) -> bool {
        match self {
            Self::None => false,
            Self::ArgsOnly => depth == 0,
            Self::Always => true,
        }
    }
}

/// Configuration for path walking and file admission.
#[derive(Debug, Clone, Default)]
pub struct WalkerConfig {
    /// Recurse into directories instead of skipping them.
    pub recursive: bool,

    /// Include names starting with `.` when recursing.
    pub all_files: bool,

    /// When to follow symbolic links.
    pub symlinks: SymlinkPolicy,

    /// Skip zero-byte files entirely.
    pub ignore_empty: bool,

    /// Collapse paths sharing a `(device, inode)` into one entry.
    pub physical: bool,
}

/// Resolved type of a path after the symlink policy was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// Regular file
    Regular,
    /// Directory
    Directory,
    /// Symbolic link, as reported by [`FileKind::from_file_type`] for
    /// unresolved link metadata.
    ///
    /// [`Walker::classify`](crate::scanner::Walker::classify) never yields
    /// it: links are either resolved to their target or skipped first.
    Symlink,
    /// Named pipe
    Fifo,
    /// Block device
    BlockDevice,
    /// Character device
    CharDevice,
    /// Unix domain socket
    Socket,
    /// Anything the platform reports that is none of the above
    Unknown,
}

impl FileKind {
    /// Classify a file type.
    #[must_use]
    pub fn from_file_type(file_type: FileType) -> Self {
        if file_type.is_file() {
            return Self::Regular;
        }
        if file_type.is_dir() {
            return Self::Directory;
        }
        if file_type.is_symlink() {
            return Self::Symlink;
        }

        #[cfg(unix)]
        {
            use std::os::unix::fs::FileTypeExt;
            if file_type.is_fifo() {
                return Self::Fifo;
            }
            if file_type.is_block_device() {
                return Self::BlockDevice;
            }
            if file_type.is_char_device() {
                return Self::CharDevice;
            }
            if file_type.is_socket() {
                return Self::Socket;
            }
        }

        Self::Unknown
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Regular => "a regular file",
            Self::Directory => "a directory",
            Self::Symlink => "a symbolic link",
            Self::Fifo => "a named pipe",
            Self::BlockDevice => "a block device",
            Self::CharDevice => "a character device",
            Self::Socket => "a socket",
            Self::Unknown => "of an unsupported type",
        };
        f.write_str(name)
    }
}

/// Errors that can occur while walking input paths.
///
/// None of these abort a run; the walker logs them and skips the path.
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    /// Metadata could not be read.
    #[error("{path}: {source}")]
    Metadata {
        /// Path being classified
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A non-empty file could not be opened for reading.
    #[error("{path}: {source}")]
    Unreadable {
        /// File being admitted
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A directory could not be opened or read.
    #[error("{path}: {source}")]
    Directory {
        /// Directory being recursed
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

/// Errors that can occur during file hashing or comparison.
#[derive(thiserror::Error, Debug)]
pub enum HashError {
    /// The specified file was not found.
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    /// Permission was denied when reading the file.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// An I/O error occurred while reading the file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl HashError {
    /// Classify an I/O error raised while reading `path`.
    #[must_use]
    pub fn from_io(path: &std::path::Path, error: std::io::Error) -> Self {
        use std::io::ErrorKind;

        match error.kind() {
            ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            _ => Self::Io {
                path: path.to_path_buf(),
                source: error,
            },
        }
    }
}
