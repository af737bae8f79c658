/// Target validation - the gate in front of every destructive step
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

use crate::error::{Result, ShredError};

/// A validated regular file, ready to be overwritten
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    path: PathBuf,
    size: u64,
}

impl Target {
    /// Validate `path` as a shreddable regular file.
    ///
    /// Uses `symlink_metadata` so a symlink is rejected as itself instead
    /// of being resolved to whatever it points at.
    pub fn validate(path: &Path) -> Result<Self> {
        let meta = match fs::symlink_metadata(path) {
            Ok(meta) => meta,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ShredError::invalid_target(path, "does not exist"));
            }
            Err(e) => {
                return Err(ShredError::invalid_target(path, format!("cannot stat: {}", e)));
            }
        };

        let file_type = meta.file_type();
        if file_type.is_symlink() {
            return Err(ShredError::invalid_target(path, "refusing to wipe a symlink"));
        }
        if file_type.is_dir() {
            return Err(ShredError::invalid_target(path, "refusing to wipe a directory"));
        }
        if !file_type.is_file() {
            return Err(ShredError::invalid_target(path, "not a regular file"));
        }

        Ok(Self {
            path: path.to_path_buf(),
            size: meta.len(),
        })
    }

    /// Open the target for read/write without truncating it
    pub fn open(&self) -> Result<File> {
        OpenOptions::new()
            .read(true)
            .write(true)
            .open(&self.path)
            .map_err(|e| ShredError::invalid_target(&self.path, format!("cannot open for read/write: {}", e)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Size in bytes at validation time
    pub fn size(&self) -> u64 {
        self.size
    }
}
