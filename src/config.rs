//! Run configuration.
//!
//! A [`Config`] is built once from the command line (or directly by library
//! callers) and passed by reference through every stage. Nothing mutates it
//! after construction.
//!
//! ```
//! use ordna::config::{Config, DateRange, parse_date};
//! use ordna::types::TransferMode;
//!
//! let range = DateRange::new(Some(parse_date("2023-03-01").unwrap()), None).unwrap();
//! let config = Config::new(TransferMode::Copy, vec!["photos".into()], "sorted".into())
//!     .unwrap()
//!     .with_date_range(range)
//!     .group_by_extension(true);
//!
//! assert!(config.group_by_extension);
//! assert!(!config.dry_run);
//! ```

use crate::filters::CompiledFilters;
use crate::types::TransferMode;
use chrono::{DateTime, Local, NaiveDate, TimeZone};
use std::path::PathBuf;
use thiserror::Error;

/// Date format accepted by `--from` and `--to`.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Errors raised while building the run configuration or loading the filter file.
///
/// All of them are fatal and reported before any filesystem work begins.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// Neither `-m` nor `-c` was given.
    #[error("must specify exactly one of -m (move) or -c (copy)")]
    MissingMode,
    /// Both `-m` and `-c` were given.
    #[error("-m (move) and -c (copy) are mutually exclusive")]
    ConflictingModes,
    #[error("need at least one source and a destination")]
    MissingSources,
    #[error("destination path must not be empty")]
    MissingDestination,
    #[error("invalid date '{value}': expected YYYY-MM-DD ({reason})")]
    InvalidDate { value: String, reason: String },
    #[error("start date {from} is after end date {to}")]
    InvertedDateRange { from: NaiveDate, to: NaiveDate },
    /// Configuration file not found at the specified path.
    #[error("configuration file not found: {}", .0.display())]
    ConfigNotFound(PathBuf),
    /// Invalid TOML syntax or structure.
    #[error("invalid configuration: {0}")]
    ConfigInvalid(String),
    #[error("invalid glob pattern '{0}'")]
    InvalidGlobPattern(String),
    #[error("invalid regex pattern '{pattern}': {reason}")]
    InvalidRegexPattern { pattern: String, reason: String },
    #[error("IO error reading configuration: {0}")]
    IoError(String),
}

/// Resolves the mutually exclusive `-m` / `-c` flags into a transfer mode.
pub fn mode_from_flags(move_files: bool, copy_files: bool) -> Result<TransferMode, ConfigError> {
    match (move_files, copy_files) {
        (true, false) => Ok(TransferMode::Move),
        (false, true) => Ok(TransferMode::Copy),
        (true, true) => Err(ConfigError::ConflictingModes),
        (false, false) => Err(ConfigError::MissingMode),
    }
}

/// Parses a `YYYY-MM-DD` date.
pub fn parse_date(value: &str) -> Result<NaiveDate, ConfigError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|e| ConfigError::InvalidDate {
        value: value.to_string(),
        reason: e.to_string(),
    })
}

/// Inclusive calendar-day window on modification time.
///
/// Both bounds are whole local days: a file is kept when its local date is
/// on or after `from` and on or before `to`, so `to` covers its day through
/// 23:59:59.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Result<Self, ConfigError> {
        if let (Some(from), Some(to)) = (from, to)
            && from > to
        {
            return Err(ConfigError::InvertedDateRange { from, to });
        }
        Ok(Self { from, to })
    }

    /// A range that admits every timestamp.
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn start(&self) -> Option<NaiveDate> {
        self.from
    }

    pub fn end(&self) -> Option<NaiveDate> {
        self.to
    }

    pub fn contains<Tz: TimeZone>(&self, timestamp: &DateTime<Tz>) -> bool {
        let day = timestamp.with_timezone(&Local).date_naive();
        if self.from.is_some_and(|from| day < from) {
            return false;
        }
        if self.to.is_some_and(|to| day > to) {
            return false;
        }
        true
    }
}

/// Immutable parameters for one run.
#[derive(Debug, Clone)]
pub struct Config {
    pub mode: TransferMode,
    pub date_range: DateRange,
    /// Append a lower-cased extension directory to each bucket.
    pub group_by_extension: bool,
    /// Print the plan instead of touching the filesystem.
    pub dry_run: bool,
    pub sources: Vec<PathBuf>,
    pub destination: PathBuf,
    pub filters: CompiledFilters,
}

impl Config {
    /// Creates a configuration with no date bounds, no extension grouping,
    /// dry-run off and the default (include everything) filters.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingSources`] when `sources` is empty and
    /// [`ConfigError::MissingDestination`] when `destination` is empty.
    pub fn new(
        mode: TransferMode,
        sources: Vec<PathBuf>,
        destination: PathBuf,
    ) -> Result<Self, ConfigError> {
        if sources.is_empty() || sources.iter().any(|s| s.as_os_str().is_empty()) {
            return Err(ConfigError::MissingSources);
        }
        if destination.as_os_str().is_empty() {
            return Err(ConfigError::MissingDestination);
        }
        Ok(Self {
            mode,
            date_range: DateRange::unbounded(),
            group_by_extension: false,
            dry_run: false,
            sources,
            destination,
            filters: CompiledFilters::default(),
        })
    }

    pub fn with_date_range(mut self, date_range: DateRange) -> Self {
        self.date_range = date_range;
        self
    }

    pub fn group_by_extension(mut self, enabled: bool) -> Self {
        self.group_by_extension = enabled;
        self
    }

    pub fn dry_run(mut self, enabled: bool) -> Self {
        self.dry_run = enabled;
        self
    }

    pub fn with_filters(mut self, filters: CompiledFilters) -> Self {
        self.filters = filters;
        self
    }
}
