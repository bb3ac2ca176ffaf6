//! Plain-text cluster reporter.
//!
//! Writes one record per line (or per NUL when null termination is enabled):
//!
//! - In normal mode, an optional header record followed by every member path.
//! - In excess mode, every member path except the anchor, and no header.
//!   Deleting exactly the printed files leaves one copy of each cluster.
//!
//! Paths are written as raw bytes on Unix, so names that are not valid UTF-8
//! survive a round trip through `xargs -0`.
//!
//! # Example
//!
//! ```
//! use dupescan::duplicates::ClusterSink;
//! use dupescan::output::report::{ReportConfig, Reporter};
//! use dupescan::scanner::{FileEntry, Hasher};
//! use std::path::PathBuf;
//!
//! let mut bucket = vec![
//!     FileEntry::new(PathBuf::from("a"), 0, None),
//!     FileEntry::new(PathBuf::from("b"), 0, None),
//! ];
//! let mut reporter = Reporter::new(Vec::new(), ReportConfig::default(), Hasher::default());
//! reporter.report(&mut bucket, &[0, 1], 1).unwrap();
//!
//! assert_eq!(reporter.into_inner(), b"a\nb\n");
//! ```

use std::io::{self, Write};
use std::path::Path;

use super::header::{HeaderFields, HeaderFormat};
use crate::duplicates::{ensure_digest, ClusterSink};
use crate::scanner::{EntryStatus, FileEntry, Hasher};

/// Configuration for the reporter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportConfig {
    /// Print every member except the anchor, without headers.
    pub excess: bool,
    /// End records with NUL instead of newline.
    pub null_terminate: bool,
    /// Header printed before each cluster; `None` disables headers.
    pub header: Option<HeaderFormat>,
}

impl ReportConfig {
    fn terminator(&self) -> u8 {
        if self.null_terminate {
            b'\0'
        } else {
            b'\n'
        }
    }
}

/// Writes clusters to an output stream.
#[derive(Debug)]
pub struct Reporter<W: Write> {
    out: W,
    config: ReportConfig,
    hasher: Hasher,
}

impl<W: Write> Reporter<W> {
    /// Create a reporter writing to `out`.
    ///
    /// `hasher` computes anchor digests for headers that reference them.
    #[must_use]
    pub fn new(out: W, config: ReportConfig, hasher: Hasher) -> Self {
        Self {
            out,
            config,
            hasher,
        }
    }

    /// Flush buffered output.
    ///
    /// # Errors
    ///
    /// Returns the underlying writer's error.
    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }

    /// Consume the reporter, returning the writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_record(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.out.write_all(bytes)?;
        self.out.write_all(&[self.config.terminator()])
    }

    fn write_path(&mut self, path: &Path) -> io::Result<()> {
        #[cfg(unix)]
        {
            use std::os::unix::ffi::OsStrExt;
            self.write_record(path.as_os_str().as_bytes())
        }
        #[cfg(not(unix))]
        {
            self.write_record(path.to_string_lossy().as_bytes())
        }
    }

    fn header_line(&self, bucket: &mut [FileEntry], cluster: &[usize], index: usize) -> Option<String> {
        let format = self.config.header.as_ref().filter(|format| !format.is_empty())?;
        let anchor = cluster[0];
        let size = bucket[anchor].size;

        let digest = if format.uses_digest() {
            match ensure_digest(&mut bucket[anchor], &self.hasher) {
                Ok(digest) => Some(digest),
                Err(e) => {
                    log::warn!("{e}");
                    None
                }
            }
        } else {
            None
        };

        Some(format.render(&HeaderFields {
            count: cluster.len(),
            index,
            size,
            digest,
        }))
    }
}

impl<W: Write> ClusterSink for Reporter<W> {
    fn report(&mut self, bucket: &mut [FileEntry], cluster: &[usize], index: usize) -> io::Result<()> {
        let Some((&anchor, rest)) = cluster.split_first() else {
            return Ok(());
        };

        if self.config.excess {
            bucket[anchor].status = EntryStatus::Reported;
            for &i in rest {
                self.write_path(&bucket[i].path)?;
                bucket[i].status = EntryStatus::Reported;
            }
            return Ok(());
        }

        if let Some(line) = self.header_line(bucket, cluster, index) {
            self.write_record(line.as_bytes())?;
        }
        for &i in cluster {
            self.write_path(&bucket[i].path)?;
            bucket[i].status = EntryStatus::Reported;
        }
        Ok(())
    }
}
