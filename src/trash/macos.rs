/// macOS user trash (`~/.Trash`)
use std::fs;
use std::path::PathBuf;

use super::{file_size, TrashItem, TrashStore};
use crate::error::TrashError;
use crate::utils::Platform;

pub struct MacTrash {
    root: PathBuf,
}

impl MacTrash {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    pub fn for_current_user() -> Result<Self, TrashError> {
        dirs::home_dir()
            .map(|home| Self::new(home.join(".Trash")))
            .ok_or(TrashError::Unsupported("cannot determine the home directory"))
    }
}

impl TrashStore for MacTrash {
    fn platform(&self) -> Platform {
        Platform::MacOS
    }

    // Finder keeps no original-path record we can read without private APIs
    fn list(&self) -> Result<Vec<TrashItem>, TrashError> {
        if !self.root.is_dir() {
            return Ok(Vec::new());
        }

        let mut items = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            let display_name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();

            items.push(TrashItem {
                platform: Platform::MacOS,
                display_name,
                original_path: None,
                deleted_at: None,
                size_bytes: file_size(&path),
                location: self.root.clone(),
                delete_targets: vec![path],
            });
        }

        items.sort_by(|a, b| a.display_name.cmp(&b.display_name));
        Ok(items)
    }
}
