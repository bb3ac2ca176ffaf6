//! dupescan - Duplicate File Finder
//!
//! A command-line tool that reports clusters of files with equal content.
//! Input paths are walked into a size-hashed store, each size bucket is
//! clustered pairwise, and clusters are printed as path records.
//!
//! # Example
//!
//! ```no_run
//! use dupescan::config::Config;
//! use std::path::PathBuf;
//!
//! let config = Config {
//!     recursive: true,
//!     ..Default::default()
//! };
//! let paths = vec![Ok(PathBuf::from("."))];
//! let summary = dupescan::run(paths, &config, std::io::stdout().lock()).unwrap();
//! eprintln!("{} clusters", summary.finder.clusters);
//! ```

pub mod cli;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod logging;
pub mod output;
pub mod scanner;

use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use crate::cli::Cli;
use crate::config::Config;
use crate::duplicates::{comparator_for, ClusterFinder, EntryStore, FinderError, FinderStats};
use crate::error::ExitCode;
use crate::output::Reporter;
use crate::scanner::input::{read_paths, strip_trailing_slashes};
use crate::scanner::{Hasher, WalkStats, Walker};

/// Counters from a complete run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Walk and admission counters
    pub walk: WalkStats,
    /// Clustering counters
    pub finder: FinderStats,
}

/// Walk `paths`, cluster the admitted files and write clusters to `out`.
///
/// Trailing separators are stripped from every input path.
///
/// # Errors
///
/// Returns an error if the header format is invalid, an input path cannot
/// be read, or `out` cannot be written. Per-path walk failures are not
/// errors; they are logged and counted in [`WalkStats::errors`].
pub fn run<I, W>(paths: I, config: &Config, out: W) -> anyhow::Result<RunSummary>
where
    I: IntoIterator<Item = io::Result<PathBuf>>,
    W: Write,
{
    let report_config = config.report_config()?;
    let walker_config = config.walker_config();
    let compare_config = config.compare_config();

    let mut store = EntryStore::new();
    let mut walker = Walker::new(&walker_config, &mut store);
    for path in paths {
        let path = strip_trailing_slashes(path.map_err(FinderError::Input)?);
        walker.process_path(&path, 0);
    }
    let walk = walker.finish();

    let mut reporter = Reporter::new(out, report_config, Hasher::new(compare_config.digest));
    let mut finder = ClusterFinder::new(comparator_for(&compare_config));
    let finder_stats = finder.find_clusters(store, &mut reporter)?;
    reporter.flush().map_err(FinderError::Output)?;

    Ok(RunSummary {
        walk,
        finder: finder_stats,
    })
}

/// Run the application for a parsed command line.
///
/// Paths come from the command line, or from standard input when none are
/// given. Clusters are written to standard output.
///
/// # Errors
///
/// Returns an error on configuration, input or output failures.
pub fn run_app(cli: Cli) -> anyhow::Result<ExitCode> {
    let config = Config::load(&cli)?;
    logging::init_logging(cli.verbose, config.quiet);

    let out = BufWriter::new(io::stdout().lock());
    let summary = if cli.paths.is_empty() {
        log::debug!("Reading paths from standard input");
        run(read_paths(io::stdin().lock(), config.input_delimiter()), &config, out)?
    } else {
        run(cli.paths.into_iter().map(Ok), &config, out)?
    };

    log::info!(
        "{} clusters, {} files reported, {} comparisons",
        summary.finder.clusters,
        summary.finder.reported,
        summary.finder.comparisons
    );
    Ok(ExitCode::from_error_count(summary.walk.errors))
}
