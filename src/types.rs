//! Shared data model passed between discovery, planning and application.
//!
//! ```
//! use ordna::types::{Action, TransferMode};
//!
//! assert_eq!(Action::from(TransferMode::Move), Action::Move);
//! assert_eq!(Action::Copy.as_str(), "copy");
//! ```

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// How files reach the destination tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransferMode {
    /// Rename into place, falling back to copy + delete.
    Move,
    /// Leave the source untouched.
    Copy,
}

/// Metadata for one regular file found during discovery.
///
/// Built once from a single stat and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    /// Path as encountered during the walk.
    pub source_path: PathBuf,
    /// Path relative to the source root it was found under.
    pub relative_path: PathBuf,
    /// Byte length at discovery time.
    pub size: u64,
    /// Modification time, the sole basis for bucketing and filtering.
    pub modified: DateTime<Local>,
    /// Lower-cased extension including the leading dot, or empty.
    pub extension: String,
    /// Content digest. Reserved for content-addressed deduplication, never filled.
    pub digest: Option<[u8; 32]>,
}

/// What the applier does with a planned entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Action {
    Move,
    Copy,
    /// Reserved; the planner never produces it.
    SkipDuplicate,
    /// Reserved; the planner never produces it.
    Rename,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Move => "move",
            Action::Copy => "copy",
            Action::SkipDuplicate => "skip-duplicate",
            Action::Rename => "rename",
        }
    }
}

impl From<TransferMode> for Action {
    fn from(mode: TransferMode) -> Self {
        match mode {
            TransferMode::Move => Action::Move,
            TransferMode::Copy => Action::Copy,
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single planned action, one-to-one with a [`FileRecord`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanEntry {
    pub source_path: PathBuf,
    pub destination_path: PathBuf,
    pub action: Action,
}
