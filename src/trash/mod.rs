//! Trash Enumerator/Purger
//!
//! Lists items in the platform trash (FreeDesktop `Trash/`, macOS `~/.Trash`,
//! Windows `$Recycle.Bin`), matches them by substring and deletes them
//! permanently. `delete` and `empty` are dry runs unless `force` is set.
//!
//! Independent of the overwrite engine: trashed items are removed, not
//! overwritten.

pub mod freedesktop;
pub mod macos;
pub mod recycle_bin;

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info};

use crate::error::TrashError;
use crate::shred::hints::sync_directory;
use crate::utils::{detect_platform, Platform};

pub use freedesktop::FreedesktopTrash;
pub use macos::MacTrash;
pub use recycle_bin::RecycleBinTrash;

/// One entry of the trash
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrashItem {
    pub platform: Platform,
    pub display_name: String,
    /// Where the item lived before it was trashed, when recorded
    pub original_path: Option<String>,
    pub deleted_at: Option<String>,
    pub size_bytes: Option<u64>,
    /// Trash directory holding the item
    pub location: PathBuf,
    /// Paths to remove to purge the item (payload plus metadata)
    pub delete_targets: Vec<PathBuf>,
}

impl TrashItem {
    /// Case-insensitive substring match on name, original path and location
    pub fn matches(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        self.display_name.to_lowercase().contains(&needle)
            || self
                .original_path
                .as_deref()
                .is_some_and(|p| p.to_lowercase().contains(&needle))
            || self.location.to_string_lossy().to_lowercase().contains(&needle)
    }
}

/// A platform trash location
pub trait TrashStore {
    fn platform(&self) -> Platform;

    /// Enumerate items; a missing trash directory yields an empty list
    fn list(&self) -> Result<Vec<TrashItem>, TrashError>;

    /// Permanently remove one item
    fn purge_item(&self, item: &TrashItem) -> Result<(), TrashError> {
        for target in &item.delete_targets {
            remove_path(target)?;
        }
        sync_directory(&item.location).log("trash directory fsync");
        Ok(())
    }

    /// Permanently remove everything; returns the number of items removed
    fn empty_all(&self) -> Result<usize, TrashError> {
        let items = self.list()?;
        for item in &items {
            self.purge_item(item)?;
        }
        Ok(items.len())
    }
}

/// What a delete/empty did, or would do on a dry run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PurgeReport {
    pub matched: Vec<TrashItem>,
    pub removed: usize,
    pub dry_run: bool,
}

/// Delete items matching `needle`. Nothing is removed unless `force`.
pub fn delete(store: &dyn TrashStore, needle: &str, force: bool) -> Result<PurgeReport, TrashError> {
    let matched: Vec<TrashItem> = store.list()?.into_iter().filter(|item| item.matches(needle)).collect();
    debug!(needle, matched = matched.len(), force, "trash delete");

    if !force {
        return Ok(PurgeReport {
            matched,
            removed: 0,
            dry_run: true,
        });
    }

    for item in &matched {
        store.purge_item(item)?;
        info!(name = %item.display_name, "purged from trash");
    }

    Ok(PurgeReport {
        removed: matched.len(),
        matched,
        dry_run: false,
    })
}

/// Empty the whole trash. Nothing is removed unless `force`.
pub fn empty(store: &dyn TrashStore, force: bool) -> Result<PurgeReport, TrashError> {
    let matched = store.list()?;

    if !force {
        return Ok(PurgeReport {
            matched,
            removed: 0,
            dry_run: true,
        });
    }

    let removed = store.empty_all()?;
    info!(removed, "trash emptied");

    Ok(PurgeReport {
        matched,
        removed,
        dry_run: false,
    })
}

/// Trash store of the current user on this platform
pub fn default_store() -> Result<Box<dyn TrashStore>, TrashError> {
    match detect_platform() {
        Platform::Linux => Ok(Box::new(FreedesktopTrash::for_current_user()?)),
        Platform::MacOS => Ok(Box::new(MacTrash::for_current_user()?)),
        Platform::Windows => Ok(Box::new(RecycleBinTrash::for_all_drives())),
        Platform::Unknown => Err(TrashError::Unsupported("no known trash location on this OS")),
    }
}

/// Remove a file, symlink or directory tree; missing paths are fine
pub(crate) fn remove_path(path: &Path) -> Result<(), TrashError> {
    let meta = match fs::symlink_metadata(path) {
        Ok(meta) => meta,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(e.into()),
    };

    if meta.is_dir() {
        fs::remove_dir_all(path)?;
    } else {
        fs::remove_file(path)?;
    }
    Ok(())
}

/// Size of a regular file, without following symlinks
pub(crate) fn file_size(path: &Path) -> Option<u64> {
    fs::symlink_metadata(path).ok().filter(|m| m.is_file()).map(|m| m.len())
}
