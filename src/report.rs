//! JSON run report.
//!
//! Written after a live run when `--report <PATH>` is given, so a run can be
//! audited afterwards: which files went where, by which method, and what failed.

use crate::applier::Applied;
use crate::cli::RunSummary;
use crate::config::Config;
use crate::planner::Collision;
use crate::types::TransferMode;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to serialize run report: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("failed to write run report {}: {error}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        error: std::io::Error,
    },
}

/// One failed file, attributed to its path.
#[derive(Debug, Clone, Serialize)]
pub struct FailureRecord {
    pub path: PathBuf,
    pub kind: &'static str,
    /// Destination written but the source could not be removed.
    pub partial: bool,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct RunReport<'a> {
    /// RFC 3339 time the report was built.
    pub timestamp: String,
    pub mode: TransferMode,
    pub dry_run: bool,
    pub group_by_extension: bool,
    pub sources: &'a [PathBuf],
    pub destination: &'a Path,
    pub discovered: usize,
    pub total_bytes: u64,
    pub applied: &'a [Applied],
    pub failures: Vec<FailureRecord>,
    pub collisions: &'a [Collision],
}

impl<'a> RunReport<'a> {
    pub fn new(config: &'a Config, summary: &'a RunSummary) -> Self {
        let discovery_failures = summary.discovery.errors.iter().map(|error| FailureRecord {
            path: error.path().to_path_buf(),
            kind: "discovery-failed",
            partial: false,
            message: error.to_string(),
        });
        let apply_failures = summary.report.failures.iter().map(|error| FailureRecord {
            path: error.source_path().to_path_buf(),
            kind: error.kind(),
            partial: error.is_partial(),
            message: error.to_string(),
        });

        Self {
            timestamp: chrono::Utc::now().to_rfc3339(),
            mode: config.mode,
            dry_run: config.dry_run,
            group_by_extension: config.group_by_extension,
            sources: &config.sources,
            destination: &config.destination,
            discovered: summary.discovery.records.len(),
            total_bytes: summary.discovery.total_bytes(),
            applied: &summary.report.applied,
            failures: discovery_failures.chain(apply_failures).collect(),
            collisions: &summary.collisions,
        }
    }

    pub fn to_json(&self) -> Result<String, ReportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn save(&self, path: &Path) -> Result<(), ReportError> {
        let json = self.to_json()?;
        fs::write(path, json).map_err(|error| ReportError::Write {
            path: path.to_path_buf(),
            error,
        })
    }
}
