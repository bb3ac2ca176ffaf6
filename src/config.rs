//! Application configuration management.
//!
//! Settings are resolved in layers, later layers overriding earlier ones:
//!
//! 1. Built-in defaults ([`Config::default`])
//! 2. A TOML file: the `--config` path, or `config.toml` in the platform
//!    configuration directory if it exists
//! 3. Environment variables prefixed with `DUPESCAN_` (e.g. `DUPESCAN_RECURSIVE=true`)
//! 4. Command-line flags
//!
//! Command-line switches can only turn options on; a file or environment
//! setting is never turned off by omitting a flag.
//!
//! # Example
//!
//! ```toml
//! recursive = true
//! symlinks = "args-only"
//! digest = "sha256"
//! header_format = "%n x %s bytes"
//! ```

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cli::Cli;
use crate::duplicates::CompareConfig;
use crate::output::{FormatError, HeaderFormat, ReportConfig, DEFAULT_HEADER_FORMAT};
use crate::scanner::{DigestFunction, SymlinkPolicy, WalkerConfig};

/// Prefix of environment variables read into the configuration.
pub const ENV_PREFIX: &str = "DUPESCAN_";

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An explicitly requested configuration file does not exist.
    #[error("Configuration file not found: {0}")]
    NotFound(PathBuf),

    /// A configuration layer could not be parsed.
    #[error("Invalid configuration: {0}")]
    Invalid(#[source] Box<figment::Error>),
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Recurse into directories.
    pub recursive: bool,
    /// Include dot-files when recursing.
    pub all_files: bool,
    /// When to follow symbolic links.
    pub symlinks: SymlinkPolicy,
    /// Only log errors.
    pub quiet: bool,
    /// NUL-delimited input and output records.
    pub null_terminate: bool,
    /// Print all but one file of each cluster.
    pub excess: bool,
    /// Skip zero-byte files.
    pub ignore_empty: bool,
    /// Collapse paths to the same physical file.
    pub physical: bool,
    /// Cluster header format; empty disables headers.
    pub header_format: String,
    /// Digest function for comparison and headers.
    pub digest: DigestFunction,
    /// Byte-by-byte comparison instead of digests.
    pub thorough: bool,
    /// Minimum file size for leading-block sampling.
    pub sample_limit: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            recursive: false,
            all_files: false,
            symlinks: SymlinkPolicy::None,
            quiet: false,
            null_terminate: false,
            excess: false,
            ignore_empty: false,
            physical: false,
            header_format: DEFAULT_HEADER_FORMAT.to_string(),
            digest: DigestFunction::Blake3,
            thorough: false,
            sample_limit: 0,
        }
    }
}

impl Config {
    /// Resolve the configuration for a command line.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `--config` names a missing file or a layer
    /// fails to parse.
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let mut config: Self = Self::figment(cli.config.as_deref())?
            .extract()
            .map_err(|e| ConfigError::Invalid(Box::new(e)))?;
        config.apply_cli(cli);
        log::debug!("Resolved configuration: {config:?}");
        Ok(config)
    }

    /// Build the defaults, file and environment layers.
    ///
    /// With `explicit` set, that file must exist. Otherwise the file in the
    /// platform configuration directory is used if present.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotFound`] if `explicit` does not exist.
    pub fn figment(explicit: Option<&Path>) -> Result<Figment, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        match explicit {
            Some(path) => {
                if !path.is_file() {
                    return Err(ConfigError::NotFound(path.to_path_buf()));
                }
                figment = figment.merge(Toml::file(path));
            }
            None => {
                if let Some(path) = Self::config_path().filter(|path| path.is_file()) {
                    log::debug!("Loading configuration from {}", path.display());
                    figment = figment.merge(Toml::file(path));
                }
            }
        }

        Ok(figment.merge(Env::prefixed(ENV_PREFIX)))
    }

    /// Get the default platform-specific configuration path.
    #[must_use]
    pub fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "dupescan", "dupescan")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Overlay command-line flags.
    pub fn apply_cli(&mut self, cli: &Cli) {
        self.recursive |= cli.recursive;
        self.all_files |= cli.all_files;
        self.quiet |= cli.quiet;
        self.null_terminate |= cli.null_terminate;
        self.excess |= cli.excess;
        self.ignore_empty |= cli.ignore_empty;
        self.physical |= cli.physical;
        self.thorough |= cli.thorough;

        if let Some(policy) = cli.symlink_policy() {
            self.symlinks = policy;
        }
        if let Some(digest) = cli.digest {
            self.digest = digest;
        }
        if let Some(limit) = cli.sample_limit {
            self.sample_limit = limit;
        }
        if let Some(format) = &cli.format {
            self.header_format.clone_from(format);
        }
    }

    /// Settings for the walker.
    #[must_use]
    pub fn walker_config(&self) -> WalkerConfig {
        WalkerConfig {
            recursive: self.recursive,
            all_files: self.all_files,
            symlinks: self.symlinks,
            ignore_empty: self.ignore_empty,
            physical: self.physical,
        }
    }

    /// Settings for content comparison.
    #[must_use]
    pub fn compare_config(&self) -> CompareConfig {
        CompareConfig {
            digest: self.digest,
            thorough: self.thorough,
            sample_limit: self.sample_limit,
        }
    }

    /// Settings for the reporter.
    ///
    /// # Errors
    ///
    /// Returns [`FormatError`] if the header format is invalid.
    pub fn report_config(&self) -> Result<ReportConfig, FormatError> {
        let header = if self.header_format.is_empty() {
            None
        } else {
            Some(HeaderFormat::parse(&self.header_format)?)
        };

        Ok(ReportConfig {
            excess: self.excess,
            null_terminate: self.null_terminate,
            header,
        })
    }

    /// Input record delimiter.
    #[must_use]
    pub fn input_delimiter(&self) -> u8 {
        if self.null_terminate {
            b'\0'
        } else {
            b'\n'
        }
    }
}
