//! Streaming file digests and leading-block samples.
//!
//! # Overview
//!
//! [`Hasher`] computes the content digest of a file with the configured
//! [`DigestFunction`], reading in fixed-size chunks so memory use does not
//! grow with file size. It also computes a cheap *sample*: a BLAKE3 hash of
//! the first [`SAMPLE_SIZE`] bytes, used to reject most non-duplicates before
//! any full digest is taken.
//!
//! # Example
//!
//! ```no_run
//! use dupescan::scanner::{DigestFunction, Hasher};
//! use std::path::Path;
//!
//! let hasher = Hasher::new(DigestFunction::Sha256);
//! let digest = hasher.digest(Path::new("file.bin")).unwrap();
//! println!("{digest}");
//! ```

use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::Digest as Sha2Digest;

use super::HashError;

/// Number of leading bytes covered by a sample.
pub const SAMPLE_SIZE: usize = 4096;

/// Read buffer size for streaming digests.
const BUFFER_SIZE: usize = 64 * 1024;

/// BLAKE3 hash of a file's leading block.
pub type Hash = [u8; 32];

/// Digest algorithm used to compare and label file contents.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum DigestFunction {
    /// BLAKE3 (256-bit)
    #[default]
    Blake3,
    /// SHA-256
    Sha256,
    /// SHA-512
    Sha512,
}

impl DigestFunction {
    /// Digest length in bytes.
    #[must_use]
    pub fn output_len(self) -> usize {
        match self {
            Self::Blake3 | Self::Sha256 => 32,
            Self::Sha512 => 64,
        }
    }
}

impl fmt::Display for DigestFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Blake3 => write!(f, "blake3"),
            Self::Sha256 => write!(f, "sha256"),
            Self::Sha512 => write!(f, "sha512"),
        }
    }
}

/// A computed content digest.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Digest(Vec<u8>);

impl Digest {
    /// Raw digest bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Lowercase hexadecimal rendering.
    #[must_use]
    pub fn to_hex(&self) -> String {
        hash_to_hex(&self.0)
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

/// Render bytes as lowercase hex.
#[must_use]
pub fn hash_to_hex(bytes: &[u8]) -> String {
    use std::fmt::Write;

    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        let _ = write!(out, "{byte:02x}");
    }
    out
}

/// File hasher for digests and samples.
#[derive(Debug, Clone, Copy, Default)]
pub struct Hasher {
    function: DigestFunction,
}

impl Hasher {
    /// Create a hasher using the given digest function.
    #[must_use]
    pub fn new(function: DigestFunction) -> Self {
        Self { function }
    }

    /// The digest function in use.
    #[must_use]
    pub fn function(&self) -> DigestFunction {
        self.function
    }

    /// Compute the full content digest of a file.
    ///
    /// # Errors
    ///
    /// Returns [`HashError`] if the file cannot be opened or read.
    pub fn digest(&self, path: &Path) -> Result<Digest, HashError> {
        let bytes = match self.function {
            DigestFunction::Blake3 => {
                let mut hasher = blake3::Hasher::new();
                stream_file(path, |chunk| {
                    hasher.update(chunk);
                })?;
                hasher.finalize().as_bytes().to_vec()
            }
            DigestFunction::Sha256 => {
                let mut hasher = sha2::Sha256::new();
                stream_file(path, |chunk| hasher.update(chunk))?;
                hasher.finalize().to_vec()
            }
            DigestFunction::Sha512 => {
                let mut hasher = sha2::Sha512::new();
                stream_file(path, |chunk| hasher.update(chunk))?;
                hasher.finalize().to_vec()
            }
        };
        log::trace!("Digested {} ({})", path.display(), self.function);
        Ok(Digest(bytes))
    }

    /// Compute the BLAKE3 hash of the first [`SAMPLE_SIZE`] bytes of a file.
    ///
    /// # Errors
    ///
    /// Returns [`HashError`] if the file cannot be opened or read.
    pub fn sample(&self, path: &Path) -> Result<Hash, HashError> {
        let file = open_file(path)?;
        let mut buffer = Vec::with_capacity(SAMPLE_SIZE);
        file.take(SAMPLE_SIZE as u64)
            .read_to_end(&mut buffer)
            .map_err(|e| HashError::from_io(path, e))?;
        Ok(*blake3::hash(&buffer).as_bytes())
    }
}

/// Open a file for reading, classifying the failure.
pub(crate) fn open_file(path: &Path) -> Result<File, HashError> {
    File::open(path).map_err(|e| HashError::from_io(path, e))
}

/// Feed a file to `update` chunk by chunk.
fn stream_file<F: FnMut(&[u8])>(path: &Path, mut update: F) -> Result<(), HashError> {
    let mut file = open_file(path)?;
    let mut buffer = vec![0u8; BUFFER_SIZE];
    loop {
        let read = match file.read(&mut buffer) {
            Ok(0) => return Ok(()),
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(HashError::from_io(path, e)),
        };
        update(&buffer[..read]);
    }
}
