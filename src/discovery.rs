//! Recursive discovery of the files to organize.
//!
//! Every source root is walked to completion. Directories are traversed but
//! never emitted; symlinks are neither followed nor emitted. A root that
//! cannot be read, or an entry that cannot be stat'ed, is recorded as a
//! [`DiscoveryError`] and the walk carries on with everything else.

use crate::config::Config;
use crate::metadata::FileStat;
use crate::types::FileRecord;
use chrono::{DateTime, Local};
use log::{debug, trace, warn};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

/// A failure attributed to one source root and the path that triggered it.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("cannot read {} (under {}): {error}", .path.display(), .root.display())]
    Walk {
        root: PathBuf,
        path: PathBuf,
        #[source]
        error: walkdir::Error,
    },
    #[error("cannot stat {} (under {}): {error}", .path.display(), .root.display())]
    Stat {
        root: PathBuf,
        path: PathBuf,
        #[source]
        error: io::Error,
    },
}

impl DiscoveryError {
    pub fn root(&self) -> &Path {
        match self {
            Self::Walk { root, .. } | Self::Stat { root, .. } => root,
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            Self::Walk { path, .. } | Self::Stat { path, .. } => path,
        }
    }
}

/// Records found in walk order plus every error met along the way.
#[derive(Debug, Default)]
pub struct Discovery {
    pub records: Vec<FileRecord>,
    pub errors: Vec<DiscoveryError>,
}

impl Discovery {
    pub fn total_bytes(&self) -> u64 {
        self.records.iter().map(|r| r.size).sum()
    }
}

/// Walks every configured source and returns the selected files.
pub fn discover(config: &Config) -> Discovery {
    let mut discovery = Discovery::default();
    for root in &config.sources {
        let before = discovery.records.len();
        discover_root(config, root, &mut discovery);
        debug!(
            "{}: {} file(s) selected",
            root.display(),
            discovery.records.len() - before
        );
    }
    discovery
}

fn discover_root(config: &Config, root: &Path, discovery: &mut Discovery) {
    for entry in WalkDir::new(root).follow_links(false) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(error) => {
                let path = error
                    .path()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| root.to_path_buf());
                warn!("skipping {}: {}", path.display(), error);
                discovery.errors.push(DiscoveryError::Walk {
                    root: root.to_path_buf(),
                    path,
                    error,
                });
                continue;
            }
        };

        let file_type = entry.file_type();
        if file_type.is_dir() {
            continue;
        }
        if !file_type.is_file() {
            debug!("ignoring non-regular entry {}", entry.path().display());
            continue;
        }

        let relative_path = relative_to_root(root, entry.path());
        if !config.filters.should_include(&relative_path) {
            trace!("filtered out {}", entry.path().display());
            continue;
        }

        let stat = match entry
            .metadata()
            .map_err(io::Error::from)
            .and_then(|metadata| FileStat::from_metadata(&metadata))
        {
            Ok(stat) => stat,
            Err(error) => {
                warn!("cannot stat {}: {}", entry.path().display(), error);
                discovery.errors.push(DiscoveryError::Stat {
                    root: root.to_path_buf(),
                    path: entry.path().to_path_buf(),
                    error,
                });
                continue;
            }
        };

        let modified = DateTime::<Local>::from(stat.modified);
        if !config.date_range.contains(&modified) {
            trace!("outside date range: {}", entry.path().display());
            continue;
        }

        discovery.records.push(FileRecord {
            source_path: entry.path().to_path_buf(),
            relative_path,
            size: stat.size,
            modified,
            extension: extension_of(entry.path()),
            digest: None,
        });
    }
}

/// Path relative to the walk root. A root that is itself a file yields its name.
fn relative_to_root(root: &Path, path: &Path) -> PathBuf {
    match path.strip_prefix(root) {
        Ok(rel) if !rel.as_os_str().is_empty() => rel.to_path_buf(),
        _ => path.file_name().map(PathBuf::from).unwrap_or_default(),
    }
}

/// Lower-cased extension with its leading dot, or an empty string.
pub fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|ext| format!(".{}", ext.to_string_lossy().to_lowercase()))
        .unwrap_or_default()
}
