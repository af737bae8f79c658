/// FreeDesktop.org trash (`$XDG_DATA_HOME/Trash`, `files/` + `info/`)
use std::fs;
use std::path::PathBuf;

use percent_encoding::percent_decode_str;

use super::{file_size, remove_path, TrashItem, TrashStore};
use crate::error::TrashError;
use crate::shred::hints::sync_directory;
use crate::utils::Platform;

pub const TRASHINFO_EXTENSION: &str = "trashinfo";

pub struct FreedesktopTrash {
    root: PathBuf,
}

impl FreedesktopTrash {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    /// Home trash of the current user
    pub fn for_current_user() -> Result<Self, TrashError> {
        dirs::data_dir()
            .map(|data| Self::new(data.join("Trash")))
            .ok_or(TrashError::Unsupported("cannot determine the user data directory"))
    }

    fn files_dir(&self) -> PathBuf {
        self.root.join("files")
    }

    fn info_dir(&self) -> PathBuf {
        self.root.join("info")
    }

    fn info_path(&self, name: &str) -> PathBuf {
        self.info_dir().join(format!("{}.{}", name, TRASHINFO_EXTENSION))
    }
}

impl TrashStore for FreedesktopTrash {
    fn platform(&self) -> Platform {
        Platform::Linux
    }

    fn list(&self) -> Result<Vec<TrashItem>, TrashError> {
        let files_dir = self.files_dir();
        if !files_dir.is_dir() || !self.info_dir().is_dir() {
            return Ok(Vec::new());
        }

        let mut items = Vec::new();
        for entry in fs::read_dir(&files_dir)? {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().into_owned();
            let info = self.info_path(&name);

            let (original_path, deleted_at) = match fs::read(&info) {
                Ok(bytes) => parse_trashinfo(&String::from_utf8_lossy(&bytes)),
                Err(_) => (None, None),
            };

            let mut delete_targets = vec![entry.path()];
            if info.exists() {
                delete_targets.push(info);
            }

            items.push(TrashItem {
                platform: Platform::Linux,
                size_bytes: file_size(&entry.path()),
                display_name: name,
                original_path,
                deleted_at,
                location: files_dir.clone(),
                delete_targets,
            });
        }

        items.sort_by(|a, b| a.display_name.cmp(&b.display_name));
        Ok(items)
    }

    /// Clears `files/` and `info/`, orphaned `.trashinfo` files included
    fn empty_all(&self) -> Result<usize, TrashError> {
        let mut removed = 0;
        for (dir, counts) in [(self.files_dir(), true), (self.info_dir(), false)] {
            if !dir.is_dir() {
                continue;
            }
            for entry in fs::read_dir(&dir)? {
                remove_path(&entry?.path())?;
                if counts {
                    removed += 1;
                }
            }
            sync_directory(&dir).log("trash directory fsync");
        }
        Ok(removed)
    }
}

/// Extract `Path=` (percent-decoded) and `DeletionDate=` from a `.trashinfo`
pub fn parse_trashinfo(text: &str) -> (Option<String>, Option<String>) {
    let mut path = None;
    let mut deleted = None;

    for line in text.lines() {
        if let Some(value) = line.strip_prefix("Path=") {
            path = Some(percent_decode_str(value.trim()).decode_utf8_lossy().into_owned());
        } else if let Some(value) = line.strip_prefix("DeletionDate=") {
            deleted = Some(value.trim().to_string());
        }
    }

    (path, deleted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trash::{delete, empty};
    use std::path::Path;
    use tempfile::tempdir;

    fn seed(root: &Path, name: &str, original: &str) {
        fs::create_dir_all(root.join("files")).unwrap();
        fs::create_dir_all(root.join("info")).unwrap();
        fs::write(root.join("files").join(name), b"payload").unwrap();
        fs::write(
            root.join("info").join(format!("{}.trashinfo", name)),
            format!("[Trash Info]\nPath={}\nDeletionDate=2026-01-02T03:04:05\n", original),
        )
        .unwrap();
    }

    #[test]
    fn test_parse_trashinfo() {
        let (path, date) = parse_trashinfo("[Trash Info]\nPath=/home/me/My%20File%C3%A9.txt\nDeletionDate=2026-03-01T10:00:00\n");
        assert_eq!(path.as_deref(), Some("/home/me/My Fileé.txt"));
        assert_eq!(date.as_deref(), Some("2026-03-01T10:00:00"));
    }

    #[test]
    fn test_malformed_escapes_kept() {
        let (path, date) = parse_trashinfo("[Trash Info]\nPath=/tmp/100%/%zz%41%4\n");
        assert_eq!(path.as_deref(), Some("/tmp/100%/%zzA%4"));
        assert_eq!(date, None);
    }

    #[test]
    fn test_missing_trash_is_empty() {
        let dir = tempdir().unwrap();
        let store = FreedesktopTrash::new(dir.path().join("Trash"));
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn test_list_and_delete() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("Trash");
        seed(&root, "notes.txt", "/home/me/notes.txt");
        seed(&root, "photo.jpg", "/home/me/Pictures/photo.jpg");

        let store = FreedesktopTrash::new(&root);
        let items = store.list().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].display_name, "notes.txt");
        assert_eq!(items[0].original_path.as_deref(), Some("/home/me/notes.txt"));
        assert_eq!(items[0].size_bytes, Some(7));
        assert_eq!(items[0].delete_targets.len(), 2);

        let report = delete(&store, "pictures", true).unwrap();
        assert_eq!(report.removed, 1);
        assert!(!root.join("files/photo.jpg").exists());
        assert!(!root.join("info/photo.jpg.trashinfo").exists());
        assert!(root.join("files/notes.txt").exists());
    }

    #[test]
    fn test_empty_clears_orphans() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("Trash");
        seed(&root, "a", "/a");
        fs::write(root.join("info/orphan.trashinfo"), b"[Trash Info]\n").unwrap();

        let store = FreedesktopTrash::new(&root);
        let report = empty(&store, true).unwrap();
        assert_eq!(report.removed, 1);
        assert_eq!(fs::read_dir(root.join("files")).unwrap().count(), 0);
        assert_eq!(fs::read_dir(root.join("info")).unwrap().count(), 0);
    }
}
