//! Platform-neutral view of the file metadata the pipeline needs.

use std::fs::{self, Metadata, Permissions};
use std::io;
use std::path::Path;
use std::time::SystemTime;

/// Size, permission bits and modification time of a file.
#[derive(Debug, Clone)]
pub struct FileStat {
    pub size: u64,
    pub permissions: Permissions,
    pub modified: SystemTime,
}

impl FileStat {
    /// Reads metadata for `path`, following a final symlink like `stat(2)`.
    pub fn read(path: &Path) -> io::Result<Self> {
        Self::from_metadata(&fs::metadata(path)?)
    }

    pub fn from_metadata(metadata: &Metadata) -> io::Result<Self> {
        Ok(Self {
            size: metadata.len(),
            permissions: metadata.permissions(),
            modified: metadata.modified()?,
        })
    }

    /// Full mode bits on Unix; elsewhere only the read-only flag is tracked.
    #[cfg(unix)]
    pub fn mode(&self) -> u32 {
        use std::os::unix::fs::PermissionsExt;
        self.permissions.mode()
    }

    #[cfg(not(unix))]
    pub fn mode(&self) -> u32 {
        if self.permissions.readonly() { 0o444 } else { 0o666 }
    }
}
