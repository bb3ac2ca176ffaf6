//! Cluster output.
//!
//! This module provides:
//! - [`header`]: Parsing and rendering of cluster header formats
//! - [`report`]: The [`Reporter`] that writes clusters as path records
//!
//! # Example
//!
//! ```no_run
//! use dupescan::duplicates::{ClusterFinder, DigestComparator, EntryStore};
//! use dupescan::output::{HeaderFormat, ReportConfig, Reporter};
//! use dupescan::scanner::Hasher;
//!
//! let store = EntryStore::new();
//! let config = ReportConfig {
//!     header: Some(HeaderFormat::default()),
//!     ..Default::default()
//! };
//!
//! let mut reporter = Reporter::new(std::io::stdout().lock(), config, Hasher::default());
//! let mut finder = ClusterFinder::new(DigestComparator::default());
//! finder.find_clusters(store, &mut reporter).unwrap();
//! ```

pub mod header;
pub mod report;

// Re-export main types
pub use header::{FormatError, HeaderFields, HeaderFormat, DEFAULT_HEADER_FORMAT};
pub use report::{ReportConfig, Reporter};
