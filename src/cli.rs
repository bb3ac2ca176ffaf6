//! Command-line interface definitions for dupescan.
//!
//! This module defines all CLI arguments and options using the clap derive API.
//!
//! # Example
//!
//! ```bash
//! # Report duplicate files in a directory tree
//! dupescan -r ~/Downloads
//!
//! # Print only the redundant copies, NUL-terminated, for deletion
//! dupescan -r -e -0 ~/Downloads | xargs -0 rm
//!
//! # Read paths from stdin and compare them byte by byte
//! find . -name '*.jpg' | dupescan -t
//!
//! # Custom cluster headers
//! dupescan -r -f '#%i: %n x %s bytes' ~/Music
//! ```

use std::path::PathBuf;

use clap::Parser;

use crate::scanner::{DigestFunction, SymlinkPolicy};

/// Find duplicate files by content.
///
/// dupescan reports clusters of files with equal content. Paths are taken
/// from the command line, or read from standard input (one per line, or
/// NUL-separated with -0) when none are given.
#[derive(Debug, Parser)]
#[command(name = "dupescan")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Files and directories to examine (read from stdin when omitted)
    #[arg(value_name = "PATH")]
    pub paths: Vec<PathBuf>,

    /// Include files and directories whose names start with '.'
    #[arg(short, long)]
    pub all_files: bool,

    /// Digest function used to compare files and in headers
    #[arg(short, long, value_enum, value_name = "FUNCTION")]
    pub digest: Option<DigestFunction>,

    /// Print all but one file of each cluster, without headers
    #[arg(short, long)]
    pub excess: bool,

    /// Cluster header format (empty to disable)
    ///
    /// Escapes: %n files in cluster, %i cluster index, %s file size,
    /// %d digest, %c same as %d, %% a literal percent sign.
    #[arg(short, long, value_name = "FORMAT")]
    pub format: Option<String>,

    /// Follow symbolic links given as arguments
    #[arg(short = 'H', long, overrides_with_all = ["follow_all", "no_follow"])]
    pub follow_args: bool,

    /// Follow all symbolic links
    #[arg(short = 'L', long, overrides_with_all = ["follow_args", "no_follow"])]
    pub follow_all: bool,

    /// Never follow symbolic links
    #[arg(short = 'P', long, overrides_with_all = ["follow_args", "follow_all"])]
    pub no_follow: bool,

    /// Minimum file size for comparing leading blocks before full digests
    ///
    /// Supports suffixes: B, KB, KiB, MB, MiB, GB, GiB, TB, TiB
    #[arg(short = 'l', long, value_name = "SIZE", value_parser = parse_size)]
    pub sample_limit: Option<u64>,

    /// Treat paths to the same physical file as one file
    #[arg(short, long)]
    pub physical: bool,

    /// Suppress warnings; only errors are logged
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Recurse into directories
    #[arg(short, long)]
    pub recursive: bool,

    /// Compare file contents byte by byte instead of by digest
    #[arg(short, long)]
    pub thorough: bool,

    /// Ignore empty files
    #[arg(short = 'z', long)]
    pub ignore_empty: bool,

    /// Separate input and output records with NUL instead of newline
    #[arg(short = '0', long = "null")]
    pub null_terminate: bool,

    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file to load instead of the default location
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Symlink policy selected on the command line, if any.
    ///
    /// `-H`, `-L` and `-P` override each other; the last one given wins.
    #[must_use]
    pub fn symlink_policy(&self) -> Option<SymlinkPolicy> {
        if self.follow_all {
            Some(SymlinkPolicy::Always)
        } else if self.follow_args {
            Some(SymlinkPolicy::ArgsOnly)
        } else if self.no_follow {
            Some(SymlinkPolicy::None)
        } else {
            None
        }
    }
}

/// Size units accepted by [`parse_size`], matched case-insensitively.
const SIZE_UNITS: &[(&str, u64)] = &[
    ("", 1),
    ("b", 1),
    ("k", 1_000),
    ("kb", 1_000),
    ("kib", 1 << 10),
    ("m", 1_000_000),
    ("mb", 1_000_000),
    ("mib", 1 << 20),
    ("g", 1_000_000_000),
    ("gb", 1_000_000_000),
    ("gib", 1 << 30),
    ("t", 1_000_000_000_000),
    ("tb", 1_000_000_000_000),
    ("tib", 1 << 40),
];

/// Parse a size such as `4096`, `64K` or `1.5MiB` into bytes.
///
/// The unit may be separated from the number by whitespace. A fractional
/// part is rounded down to whole bytes.
///
/// ```
/// use dupescan::cli::parse_size;
///
/// assert_eq!(parse_size("1024").unwrap(), 1024);
/// assert_eq!(parse_size("1KB").unwrap(), 1000);
/// assert_eq!(parse_size("1KiB").unwrap(), 1024);
/// assert_eq!(parse_size("1MiB").unwrap(), 1_048_576);
/// ```
///
/// # Errors
///
/// Returns a message if the number is missing or malformed, the unit is
/// unknown, or the result does not fit in 64 bits.
pub fn parse_size(input: &str) -> Result<u64, String> {
    let input = input.trim();
    let unit_start = input
        .find(|c: char| c.is_ascii_alphabetic())
        .unwrap_or(input.len());
    let (number, unit) = input.split_at(unit_start);
    let number = number.trim_end();

    let multiplier = SIZE_UNITS
        .iter()
        .find(|(name, _)| unit.eq_ignore_ascii_case(name))
        .map(|&(_, multiplier)| multiplier)
        .ok_or_else(|| format!("Unknown size unit '{unit}'"))?;

    let (whole, fraction) = number.split_once('.').unwrap_or((number, ""));
    let is_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
    if (whole.is_empty() && fraction.is_empty()) || !is_digits(whole) || !is_digits(fraction) {
        return Err(format!("Invalid size '{input}'"));
    }

    let whole = match whole {
        "" => 0,
        digits => digits
            .parse::<u64>()
            .map_err(|e| format!("Invalid size '{input}': {e}"))?,
    };
    let fraction_bytes = match fraction {
        "" => 0,
        digits => {
            let fraction: f64 = format!("0.{digits}")
                .parse()
                .map_err(|e| format!("Invalid size '{input}': {e}"))?;
            (fraction * multiplier as f64) as u64
        }
    };

    whole
        .checked_mul(multiplier)
        .and_then(|bytes| bytes.checked_add(fraction_bytes))
        .ok_or_else(|| format!("Size '{input}' is too large"))
}
