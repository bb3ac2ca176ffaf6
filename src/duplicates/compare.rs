//! Content equality between two entries.
//!
//! # Overview
//!
//! The cluster engine asks a [`Comparator`] whether two entries have equal
//! content. Two implementations are provided:
//!
//! - [`DigestComparator`]: compares exact size, then (for files above the
//!   sample limit) a hash of the leading block, then the full digest. Samples
//!   and digests are cached on the entries, so each file is read at most
//!   once per stage no matter how many comparisons it takes part in.
//! - [`ThoroughComparator`]: compares exact size, then the raw bytes of both
//!   files. No digest is trusted.
//!
//! A file whose content cannot be read is logged once and marked
//! [`EntryStatus::Invalid`]; it never compares equal again.

use std::fs::File;
use std::io::{BufRead, BufReader};

use crate::scanner::hasher::open_file;
use crate::scanner::{Digest, DigestFunction, EntryStatus, FileEntry, Hash, HashError, Hasher, SAMPLE_SIZE};

/// Read buffer size for byte-by-byte comparison.
const COMPARE_BUFFER_SIZE: usize = 64 * 1024;

/// Configuration for content comparison.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompareConfig {
    /// Digest function for digest comparison and cluster headers.
    pub digest: DigestFunction,
    /// Compare raw bytes instead of digests.
    pub thorough: bool,
    /// Minimum size for leading-block sampling before digesting.
    pub sample_limit: u64,
}

/// Decides whether two entries have equal content.
pub trait Comparator {
    /// Return `true` if both entries have equal content.
    ///
    /// Implementations may cache data on either entry and may mark an
    /// entry [`EntryStatus::Invalid`] when its content cannot be read.
    fn equal(&mut self, first: &mut FileEntry, second: &mut FileEntry) -> bool;
}

impl<C: Comparator + ?Sized> Comparator for Box<C> {
    fn equal(&mut self, first: &mut FileEntry, second: &mut FileEntry) -> bool {
        (**self).equal(first, second)
    }
}

/// Build the comparator selected by `config`.
#[must_use]
pub fn comparator_for(config: &CompareConfig) -> Box<dyn Comparator> {
    if config.thorough {
        Box::new(ThoroughComparator)
    } else {
        Box::new(DigestComparator::new(
            Hasher::new(config.digest),
            config.sample_limit,
        ))
    }
}

/// Return the entry's digest, computing and caching it on first use.
///
/// # Errors
///
/// Returns [`HashError`] if the file cannot be read.
pub fn ensure_digest<'e>(entry: &'e mut FileEntry, hasher: &Hasher) -> Result<&'e Digest, HashError> {
    let digest = match entry.digest.take() {
        Some(digest) => digest,
        None => hasher.digest(&entry.path)?,
    };
    Ok(entry.digest.insert(digest))
}

fn invalidate(entry: &mut FileEntry, error: &HashError) {
    log::warn!("{error}");
    entry.status = EntryStatus::Invalid;
}

/// Compares sizes, leading-block samples, then full digests.
#[derive(Debug, Clone, Default)]
pub struct DigestComparator {
    hasher: Hasher,
    sample_limit: u64,
}

impl DigestComparator {
    /// Create a digest comparator.
    ///
    /// Files larger than [`SAMPLE_SIZE`] and at least `sample_limit` bytes
    /// long have their leading block compared before any full digest.
    #[must_use]
    pub fn new(hasher: Hasher, sample_limit: u64) -> Self {
        Self {
            hasher,
            sample_limit,
        }
    }

    fn uses_sample(&self, size: u64) -> bool {
        size > SAMPLE_SIZE as u64 && size >= self.sample_limit
    }

    fn sample_of(&self, entry: &mut FileEntry) -> Option<Hash> {
        if let Some(sample) = entry.sample {
            return Some(sample);
        }
        match self.hasher.sample(&entry.path) {
            Ok(sample) => {
                entry.sample = Some(sample);
                Some(sample)
            }
            Err(e) => {
                invalidate(entry, &e);
                None
            }
        }
    }
}

impl Comparator for DigestComparator {
    fn equal(&mut self, first: &mut FileEntry, second: &mut FileEntry) -> bool {
        if first.size != second.size {
            return false;
        }
        if first.size == 0 {
            return true;
        }

        if self.uses_sample(first.size) {
            let Some(a) = self.sample_of(first) else {
                return false;
            };
            let Some(b) = self.sample_of(second) else {
                return false;
            };
            if a != b {
                return false;
            }
        }

        let a = match ensure_digest(first, &self.hasher) {
            Ok(digest) => digest,
            Err(e) => {
                invalidate(first, &e);
                return false;
            }
        };
        let b = match ensure_digest(second, &self.hasher) {
            Ok(digest) => digest,
            Err(e) => {
                invalidate(second, &e);
                return false;
            }
        };
        a == b
    }
}

/// Compares sizes, then file contents byte by byte.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThoroughComparator;

fn open_reader(entry: &mut FileEntry) -> Option<BufReader<File>> {
    match open_file(&entry.path) {
        Ok(file) => Some(BufReader::with_capacity(COMPARE_BUFFER_SIZE, file)),
        Err(e) => {
            invalidate(entry, &e);
            None
        }
    }
}

impl Comparator for ThoroughComparator {
    fn equal(&mut self, first: &mut FileEntry, second: &mut FileEntry) -> bool {
        if first.size != second.size {
            return false;
        }
        if first.size == 0 {
            return true;
        }

        let Some(mut a) = open_reader(first) else {
            return false;
        };
        let Some(mut b) = open_reader(second) else {
            return false;
        };

        loop {
            let chunk_a = match a.fill_buf() {
                Ok(chunk) => chunk,
                Err(e) => {
                    invalidate(first, &HashError::from_io(&first.path, e));
                    return false;
                }
            };
            let chunk_b = match b.fill_buf() {
                Ok(chunk) => chunk,
                Err(e) => {
                    invalidate(second, &HashError::from_io(&second.path, e));
                    return false;
                }
            };

            if chunk_a.is_empty() || chunk_b.is_empty() {
                // Both must end together; a file that changed size mid-run differs.
                return chunk_a.is_empty() && chunk_b.is_empty();
            }

            let len = chunk_a.len().min(chunk_b.len());
            if chunk_a[..len] != chunk_b[..len] {
                return false;
            }
            a.consume(len);
            b.consume(len);
        }
    }
}
