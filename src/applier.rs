//! Execution of a plan: moving or copying files into their buckets, or
//! printing what would happen under dry-run.
//!
//! Entries are applied strictly in plan order. A failing entry is recorded in
//! the [`ApplyReport`] and the remaining entries are still attempted.

use crate::config::Config;
use crate::metadata::FileStat;
use crate::types::{Action, PlanEntry};
use filetime::FileTime;
use indicatif::ProgressBar;
use log::{debug, info};
use serde::Serialize;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while applying a single plan entry.
#[derive(Debug, Error)]
pub enum ApplyError {
    /// The bucket directory could not be created.
    #[error("failed to create directory {} for {}: {error}", .directory.display(), .source_path.display())]
    DirectoryCreationFailed {
        source_path: PathBuf,
        directory: PathBuf,
        #[source]
        error: io::Error,
    },
    /// Copy mode: bytes or metadata could not be copied.
    #[error("failed to copy {} to {}: {error}", .source_path.display(), .destination_path.display())]
    CopyFailed {
        source_path: PathBuf,
        destination_path: PathBuf,
        #[source]
        error: io::Error,
    },
    /// Move mode: the rename failed and so did the copy fallback.
    #[error(
        "failed to move {} to {}: rename failed ({rename_error}), copy fallback failed ({copy_error})",
        .source_path.display(),
        .destination_path.display()
    )]
    MoveFailed {
        source_path: PathBuf,
        destination_path: PathBuf,
        rename_error: io::Error,
        #[source]
        copy_error: io::Error,
    },
    /// Move mode: the copy fallback succeeded but the source could not be
    /// removed. The file now exists in both places.
    #[error(
        "copied {} to {} but could not remove the source, file is now duplicated: {error}",
        .source_path.display(),
        .destination_path.display()
    )]
    SourceNotRemoved {
        source_path: PathBuf,
        destination_path: PathBuf,
        #[source]
        error: io::Error,
    },
    /// Dry-run: the preview line could not be written.
    #[error("failed to print plan entry for {}: {error}", .source_path.display())]
    PreviewFailed {
        source_path: PathBuf,
        #[source]
        error: io::Error,
    },
}

impl ApplyError {
    /// The source file this failure belongs to.
    pub fn source_path(&self) -> &Path {
        match self {
            Self::DirectoryCreationFailed { source_path, .. }
            | Self::CopyFailed { source_path, .. }
            | Self::MoveFailed { source_path, .. }
            | Self::SourceNotRemoved { source_path, .. }
            | Self::PreviewFailed { source_path, .. } => source_path,
        }
    }

    /// Short machine-readable name of the failure kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::DirectoryCreationFailed { .. } => "directory-creation-failed",
            Self::CopyFailed { .. } => "copy-failed",
            Self::MoveFailed { .. } => "move-failed",
            Self::SourceNotRemoved { .. } => "source-not-removed",
            Self::PreviewFailed { .. } => "preview-failed",
        }
    }

    /// True when the destination was written and only cleanup failed.
    pub fn is_partial(&self) -> bool {
        matches!(self, Self::SourceNotRemoved { .. })
    }
}

/// How an entry was carried out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Method {
    /// Atomic rename.
    Renamed,
    /// Rename failed; copied then removed the source.
    CopiedThenRemoved,
    Copied,
    /// Dry-run line printed.
    Previewed,
    /// Source and destination are the same path; nothing to do.
    AlreadyInPlace,
    /// Reserved action the applier does not perform.
    Skipped,
}

/// A successfully applied plan entry.
#[derive(Debug, Clone, Serialize)]
pub struct Applied {
    #[serde(flatten)]
    pub entry: PlanEntry,
    pub method: Method,
}

/// Outcome of applying a whole plan.
#[derive(Debug, Default)]
pub struct ApplyReport {
    pub applied: Vec<Applied>,
    /// Every failure, in plan order, including partial ones.
    pub failures: Vec<ApplyError>,
}

impl ApplyReport {
    /// Failures that left an entry unapplied.
    pub fn errors(&self) -> impl Iterator<Item = &ApplyError> {
        self.failures.iter().filter(|e| !e.is_partial())
    }

    /// Partial failures: destination written, source left behind.
    pub fn warnings(&self) -> impl Iterator<Item = &ApplyError> {
        self.failures.iter().filter(|e| e.is_partial())
    }

    pub fn has_errors(&self) -> bool {
        self.errors().next().is_some()
    }
}

/// Applies plan entries for one run.
pub struct Applier<'a> {
    config: &'a Config,
    progress: ProgressBar,
}

impl<'a> Applier<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self {
            config,
            progress: ProgressBar::hidden(),
        }
    }

    /// Reports per-entry progress on `progress`.
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    /// Applies `plan` in order. Dry-run lines are written to `out`.
    pub fn apply(&self, plan: &[PlanEntry], out: &mut dyn Write) -> ApplyReport {
        let mut report = ApplyReport::default();

        for entry in plan {
            let result = if self.config.dry_run {
                preview(entry, out)
            } else {
                self.progress.set_message(
                    entry
                        .source_path
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_default(),
                );
                apply_entry(entry)
            };

            match result {
                Ok(method) => report.applied.push(Applied {
                    entry: entry.clone(),
                    method,
                }),
                Err(error) => {
                    debug!("entry failed: {}", error);
                    report.failures.push(error);
                }
            }
            self.progress.inc(1);
        }

        self.progress.finish_and_clear();
        report
    }
}

/// Convenience wrapper around [`Applier::apply`] without progress reporting.
pub fn apply(config: &Config, plan: &[PlanEntry], out: &mut dyn Write) -> ApplyReport {
    Applier::new(config).apply(plan, out)
}

fn preview(entry: &PlanEntry, out: &mut dyn Write) -> Result<Method, ApplyError> {
    writeln!(
        out,
        "{} -> {}",
        entry.source_path.display(),
        entry.destination_path.display()
    )
    .map_err(|error| ApplyError::PreviewFailed {
        source_path: entry.source_path.clone(),
        error,
    })?;
    Ok(Method::Previewed)
}

fn apply_entry(entry: &PlanEntry) -> Result<Method, ApplyError> {
    let source = entry.source_path.as_path();
    let destination = entry.destination_path.as_path();

    if matches!(entry.action, Action::SkipDuplicate | Action::Rename) {
        debug!("action {} not performed for {}", entry.action, source.display());
        return Ok(Method::Skipped);
    }

    if is_same_file(source, destination) {
        debug!("{} is already in place", source.display());
        return Ok(Method::AlreadyInPlace);
    }

    if let Some(directory) = destination.parent() {
        fs::create_dir_all(directory).map_err(|error| ApplyError::DirectoryCreationFailed {
            source_path: source.to_path_buf(),
            directory: directory.to_path_buf(),
            error,
        })?;
    }

    match entry.action {
        Action::Move => move_file(source, destination, |from, to| fs::rename(from, to)),
        _ => {
            copy_file(source, destination).map_err(|error| ApplyError::CopyFailed {
                source_path: source.to_path_buf(),
                destination_path: destination.to_path_buf(),
                error,
            })?;
            info!("copied {} -> {}", source.display(), destination.display());
            Ok(Method::Copied)
        }
    }
}

/// True when both paths name the same existing file, however they are spelled
/// (`./dest` against `dest`, a symlinked root, `..` segments).
fn is_same_file(source: &Path, destination: &Path) -> bool {
    source == destination || same_file::is_same_file(source, destination).unwrap_or(false)
}

/// Renames `source` onto `destination` with `rename`; any rename failure
/// (cross-device or otherwise) falls back to copy then delete.
fn move_file<R>(source: &Path, destination: &Path, rename: R) -> Result<Method, ApplyError>
where
    R: FnOnce(&Path, &Path) -> io::Result<()>,
{
    let rename_error = match rename(source, destination) {
        Ok(()) => {
            info!("moved {} -> {}", source.display(), destination.display());
            return Ok(Method::Renamed);
        }
        Err(e) => e,
    };

    debug!(
        "rename {} -> {} failed ({}), falling back to copy",
        source.display(),
        destination.display(),
        rename_error
    );

    copy_file(source, destination).map_err(|copy_error| ApplyError::MoveFailed {
        source_path: source.to_path_buf(),
        destination_path: destination.to_path_buf(),
        rename_error,
        copy_error,
    })?;

    fs::remove_file(source).map_err(|error| ApplyError::SourceNotRemoved {
        source_path: source.to_path_buf(),
        destination_path: destination.to_path_buf(),
        error,
    })?;

    info!(
        "moved {} -> {} (copy + remove)",
        source.display(),
        destination.display()
    );
    Ok(Method::CopiedThenRemoved)
}

/// Copies bytes, then sets access time to now, modification time to the
/// source's, and permission bits to the source's.
///
/// The destination is created with default permissions and truncated if it
/// already exists. An existing read-only destination is replaced, so a later
/// copy can overwrite an earlier one that carried a read-only mode. Returns
/// the number of bytes copied.
pub fn copy_file(source: &Path, destination: &Path) -> io::Result<u64> {
    if is_same_file(source, destination) {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "source and destination are the same file",
        ));
    }
    let stat = FileStat::read(source)?;

    let mut reader = File::open(source)?;
    if let Ok(existing) = fs::symlink_metadata(destination)
        && existing.is_file()
        && existing.permissions().readonly()
    {
        debug!("replacing read-only {}", destination.display());
        fs::remove_file(destination)?;
    }
    let mut writer = File::create(destination)?;
    let bytes = io::copy(&mut reader, &mut writer)?;
    writer.flush()?;
    drop(writer);

    // Times before permissions: a read-only mode must not block the time update.
    filetime::set_file_times(
        destination,
        FileTime::now(),
        FileTime::from_system_time(stat.modified),
    )?;
    fs::set_permissions(destination, stat.permissions.clone())?;
    debug!(
        "copied {} bytes, mode {:o}, to {}",
        bytes,
        stat.mode(),
        destination.display()
    );

    Ok(bytes)
}
