//! Cluster engine.
//!
//! # Overview
//!
//! Clustering runs once per non-empty bucket of an [`EntryStore`], buckets in
//! index order and entries in admission order:
//!
//! 1. Each pending entry in turn becomes the anchor (`first`).
//! 2. Every later pending entry (`second`) is checked against the anchor.
//!    Different sizes never match; two paths to the same physical file always
//!    match; anything else is decided by the [`Comparator`].
//! 3. Matches join the anchor's cluster. A finished cluster is handed to a
//!    [`ClusterSink`] with a one-based index that keeps counting across
//!    buckets, and its members are marked reported.
//!
//! Clusters are anchor-centric: if the comparator is not transitive, each
//! member equals the anchor but members need not equal each other.
//!
//! # Example
//!
//! ```
//! use dupescan::duplicates::{ClusterFinder, DigestComparator, EntryStore};
//! use dupescan::scanner::FileEntry;
//! use std::path::PathBuf;
//!
//! // Empty files are equal without reading them.
//! let mut store = EntryStore::new();
//! store.insert(FileEntry::new(PathBuf::from("/a"), 0, None));
//! store.insert(FileEntry::new(PathBuf::from("/b"), 0, None));
//!
//! let mut clusters: Vec<Vec<PathBuf>> = Vec::new();
//! let mut finder = ClusterFinder::new(DigestComparator::default());
//! let stats = finder.find_clusters(store, &mut clusters).unwrap();
//!
//! assert_eq!(stats.clusters, 1);
//! assert_eq!(clusters[0], vec![PathBuf::from("/a"), PathBuf::from("/b")]);
//! ```

use std::io;
use std::path::PathBuf;

use super::compare::Comparator;
use super::store::EntryStore;
use crate::scanner::{EntryStatus, FileEntry};

/// Receives each finished cluster.
pub trait ClusterSink {
    /// Emit one cluster.
    ///
    /// `cluster` holds indices into `bucket`; the anchor comes first.
    /// `index` is the one-based cluster number.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the cluster cannot be written; this aborts
    /// the run.
    fn report(&mut self, bucket: &mut [FileEntry], cluster: &[usize], index: usize) -> io::Result<()>;
}

/// Collects the member paths of each cluster.
impl ClusterSink for Vec<Vec<PathBuf>> {
    fn report(&mut self, bucket: &mut [FileEntry], cluster: &[usize], _index: usize) -> io::Result<()> {
        self.push(cluster.iter().map(|&i| bucket[i].path.clone()).collect());
        Ok(())
    }
}

/// Errors that abort clustering.
#[derive(thiserror::Error, Debug)]
pub enum FinderError {
    /// Input paths could not be read.
    #[error("Failed to read input paths: {0}")]
    Input(#[source] io::Error),

    /// A cluster could not be written.
    #[error("Failed to write cluster: {0}")]
    Output(#[source] io::Error),
}

/// Statistics from a clustering run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FinderStats {
    /// Non-empty buckets visited
    pub buckets: usize,
    /// Comparator invocations
    pub comparisons: usize,
    /// Clusters emitted
    pub clusters: usize,
    /// Entries that ended up in a cluster
    pub reported: usize,
}

/// Pairwise cluster engine driven by a [`Comparator`].
#[derive(Debug)]
pub struct ClusterFinder<C> {
    comparator: C,
    stats: FinderStats,
}

impl<C: Comparator> ClusterFinder<C> {
    /// Create a finder around `comparator`.
    #[must_use]
    pub fn new(comparator: C) -> Self {
        Self {
            comparator,
            stats: FinderStats::default(),
        }
    }

    /// Cluster every bucket of `store`, handing each cluster to `sink`.
    ///
    /// Buckets are freed as soon as they have been processed.
    ///
    /// # Errors
    ///
    /// Returns [`FinderError::Output`] if the sink fails to write.
    pub fn find_clusters<S>(&mut self, store: EntryStore, sink: &mut S) -> Result<FinderStats, FinderError>
    where
        S: ClusterSink + ?Sized,
    {
        log::debug!("Clustering {} files", store.len());

        for mut bucket in store.into_buckets() {
            self.cluster_bucket(&mut bucket, sink)?;
        }

        log::debug!(
            "Clustering complete: {} buckets, {} comparisons, {} clusters, {} files",
            self.stats.buckets,
            self.stats.comparisons,
            self.stats.clusters,
            self.stats.reported
        );
        Ok(self.stats)
    }

    /// Cluster a single bucket.
    ///
    /// Cluster numbering continues from previous calls on this finder.
    ///
    /// # Errors
    ///
    /// Returns [`FinderError::Output`] if the sink fails to write.
    pub fn cluster_bucket<S>(&mut self, bucket: &mut [FileEntry], sink: &mut S) -> Result<(), FinderError>
    where
        S: ClusterSink + ?Sized,
    {
        self.stats.buckets += 1;
        let mut cluster: Vec<usize> = Vec::new();

        for first in 0..bucket.len() {
            if !bucket[first].is_pending() {
                continue;
            }

            for second in first + 1..bucket.len() {
                if !bucket[second].is_pending() {
                    continue;
                }

                let (head, tail) = bucket.split_at_mut(second);
                let anchor = &mut head[first];
                let candidate = &mut tail[0];

                if self.matches(anchor, candidate) {
                    if cluster.is_empty() {
                        cluster.push(first);
                    }
                    cluster.push(second);
                } else if !anchor.is_pending() {
                    // Anchor became unreadable; drop what it matched so far.
                    log::debug!(
                        "Dropping cluster anchored at {}",
                        anchor.path.display()
                    );
                    cluster.clear();
                    break;
                }
            }

            if !cluster.is_empty() {
                self.emit(bucket, &cluster, sink)?;
                cluster.clear();
            }
        }

        Ok(())
    }

    /// Statistics accumulated so far.
    #[must_use]
    pub fn stats(&self) -> FinderStats {
        self.stats
    }

    fn matches(&mut self, anchor: &mut FileEntry, candidate: &mut FileEntry) -> bool {
        if anchor.size != candidate.size {
            return false;
        }
        if anchor.same_file(candidate) {
            return true;
        }
        self.stats.comparisons += 1;
        self.comparator.equal(anchor, candidate)
    }

    fn emit<S>(&mut self, bucket: &mut [FileEntry], cluster: &[usize], sink: &mut S) -> Result<(), FinderError>
    where
        S: ClusterSink + ?Sized,
    {
        self.stats.clusters += 1;
        self.stats.reported += cluster.len();

        sink.report(bucket, cluster, self.stats.clusters)
            .map_err(FinderError::Output)?;

        for &i in cluster {
            bucket[i].status = EntryStatus::Reported;
        }
        Ok(())
    }
}
