//! Cluster header formatting.
//!
//! A header format is literal text with `%` escapes:
//!
//! | escape | value |
//! |--------|-------|
//! | `%n` | number of files in the cluster |
//! | `%i` | one-based cluster index |
//! | `%s` | size of each file in bytes |
//! | `%d` | content digest (lowercase hex) |
//! | `%c` | same as `%d` |
//! | `%%` | a literal `%` |
//!
//! # Example
//!
//! ```
//! use dupescan::output::header::{HeaderFields, HeaderFormat};
//!
//! let format = HeaderFormat::parse("%n files (%s bytes) #%i").unwrap();
//! let fields = HeaderFields { count: 3, index: 1, size: 42, digest: None };
//! assert_eq!(format.render(&fields), "3 files (42 bytes) #1");
//! ```

use thiserror::Error;

use crate::scanner::Digest;

/// Header format used when none is configured.
pub const DEFAULT_HEADER_FORMAT: &str = "%n files in cluster %i (%s bytes, digest %d)";

/// Placeholder rendered when the digest is unavailable.
pub const MISSING_DIGEST: &str = "-";

/// Errors in a header format string.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormatError {
    /// An escape character that is not recognized.
    #[error("Unknown escape '%{escape}' at position {position} in header format")]
    UnknownEscape {
        /// The character following `%`
        escape: char,
        /// Byte offset of the `%`
        position: usize,
    },

    /// The format ends with a lone `%`.
    #[error("Header format ends with an incomplete escape '%'")]
    TrailingPercent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Piece {
    Literal(String),
    Count,
    Index,
    Size,
    Digest,
}

/// A parsed cluster header format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderFormat {
    pieces: Vec<Piece>,
}

/// Values substituted into a header.
#[derive(Debug, Clone, Copy)]
pub struct HeaderFields<'a> {
    /// Number of files in the cluster
    pub count: usize,
    /// One-based cluster index
    pub index: usize,
    /// Size of each file in bytes
    pub size: u64,
    /// Content digest, if it could be computed
    pub digest: Option<&'a Digest>,
}

impl Default for HeaderFormat {
    fn default() -> Self {
        // The default format is known to be valid.
        Self::parse(DEFAULT_HEADER_FORMAT).unwrap_or(Self { pieces: Vec::new() })
    }
}

impl HeaderFormat {
    /// Parse a header format string.
    ///
    /// # Errors
    ///
    /// Returns [`FormatError`] on an unknown escape or a trailing `%`.
    pub fn parse(format: &str) -> Result<Self, FormatError> {
        let mut pieces = Vec::new();
        let mut literal = String::new();
        let mut chars = format.char_indices();

        while let Some((position, c)) = chars.next() {
            if c != '%' {
                literal.push(c);
                continue;
            }

            let piece = match chars.next() {
                None => return Err(FormatError::TrailingPercent),
                Some((_, '%')) => {
                    literal.push('%');
                    continue;
                }
                Some((_, 'n')) => Piece::Count,
                Some((_, 'i')) => Piece::Index,
                Some((_, 's')) => Piece::Size,
                Some((_, 'd' | 'c')) => Piece::Digest,
                Some((_, escape)) => return Err(FormatError::UnknownEscape { escape, position }),
            };

            if !literal.is_empty() {
                pieces.push(Piece::Literal(std::mem::take(&mut literal)));
            }
            pieces.push(piece);
        }

        if !literal.is_empty() {
            pieces.push(Piece::Literal(literal));
        }
        Ok(Self { pieces })
    }

    /// Whether the format renders nothing at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    /// Whether rendering needs the cluster digest.
    #[must_use]
    pub fn uses_digest(&self) -> bool {
        self.pieces.contains(&Piece::Digest)
    }

    /// Render a header for one cluster.
    #[must_use]
    pub fn render(&self, fields: &HeaderFields<'_>) -> String {
        let mut out = String::new();
        for piece in &self.pieces {
            match piece {
                Piece::Literal(text) => out.push_str(text),
                Piece::Count => out.push_str(&fields.count.to_string()),
                Piece::Index => out.push_str(&fields.index.to_string()),
                Piece::Size => out.push_str(&fields.size.to_string()),
                Piece::Digest => match fields.digest {
                    Some(digest) => out.push_str(&digest.to_hex()),
                    None => out.push_str(MISSING_DIGEST),
                },
            }
        }
        out
    }
}
