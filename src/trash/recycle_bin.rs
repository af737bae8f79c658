//! Windows Recycle Bin (`X:\$Recycle.Bin\<SID>\`)
//!
//! Each trashed item is a pair: `$I<id>` holds metadata (format version,
//! original size, deletion FILETIME, UTF-16LE original path) and `$R<id>`
//! holds the payload. Only SID folders readable by the current user are
//! listed.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, SecondsFormat, Utc};
use tracing::debug;

use super::{TrashItem, TrashStore};
use crate::error::TrashError;
use crate::utils::Platform;

/// 100ns intervals between 1601-01-01 and 1970-01-01
const FILETIME_UNIX_EPOCH: i64 = 116_444_736_000_000_000;

/// Offset of the path (v1) or the path length (v2) in a `$I` record
const INDEX_PATH_OFFSET: usize = 0x18;

/// Parsed `$I` metadata record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexRecord {
    pub version: u64,
    pub size: u64,
    pub deleted: Option<DateTime<Utc>>,
    pub original_path: String,
}

/// Parse a `$I` file. Version 1 (Vista-8.1) stores a fixed 260-char path at
/// 0x18; version 2 (Windows 10+) stores a u32 char count at 0x18 followed by
/// the path.
pub fn parse_index_record(data: &[u8]) -> Option<IndexRecord> {
    let version = read_u64(data, 0)?;
    let size = read_u64(data, 8)?;
    let filetime = read_u64(data, 16)?;

    let path_bytes = match version {
        2 => {
            let chars = u32::from_le_bytes(data.get(INDEX_PATH_OFFSET..INDEX_PATH_OFFSET + 4)?.try_into().ok()?) as usize;
            let rest = data.get(INDEX_PATH_OFFSET + 4..)?;
            &rest[..rest.len().min(chars.saturating_mul(2))]
        }
        _ => data.get(INDEX_PATH_OFFSET..)?,
    };

    let units: Vec<u16> = path_bytes
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .take_while(|&unit| unit != 0)
        .collect();

    Some(IndexRecord {
        version,
        size,
        deleted: filetime_to_utc(filetime),
        original_path: String::from_utf16_lossy(&units),
    })
}

fn read_u64(data: &[u8], at: usize) -> Option<u64> {
    data.get(at..at + 8)?.try_into().ok().map(u64::from_le_bytes)
}

/// Convert a Windows FILETIME; `None` for zero or out-of-range values
pub fn filetime_to_utc(filetime: u64) -> Option<DateTime<Utc>> {
    if filetime == 0 {
        return None;
    }
    let unix_100ns = i64::try_from(filetime).ok()? - FILETIME_UNIX_EPOCH;
    let secs = unix_100ns.div_euclid(10_000_000);
    let nanos = (unix_100ns.rem_euclid(10_000_000) * 100) as u32;
    DateTime::from_timestamp(secs, nanos)
}

/// Last component of a Windows path, whatever separator it uses
fn windows_file_name(path: &str) -> &str {
    path.rsplit(['\\', '/']).next().unwrap_or(path)
}

pub struct RecycleBinTrash {
    /// `$Recycle.Bin` directories, one per drive
    roots: Vec<PathBuf>,
}

impl RecycleBinTrash {
    pub fn new(roots: Vec<PathBuf>) -> Self {
        Self { roots }
    }

    /// `$Recycle.Bin` of every logical drive
    #[cfg(windows)]
    pub fn for_all_drives() -> Self {
        let mask = unsafe { winapi::um::fileapi::GetLogicalDrives() };
        let roots = (0..26u8)
            .filter(|i| mask & (1u32 << i) != 0)
            .map(|i| PathBuf::from(format!("{}:\\$Recycle.Bin", (b'A' + i) as char)))
            .collect();
        Self::new(roots)
    }

    #[cfg(not(windows))]
    pub fn for_all_drives() -> Self {
        Self::new(Vec::new())
    }

    fn list_sid_dir(&self, sid: &Path, items: &mut Vec<TrashItem>) -> Result<(), TrashError> {
        for entry in fs::read_dir(sid)? {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().into_owned();
            let Some(id) = name.strip_prefix("$I") else {
                continue;
            };
            if !entry.file_type()?.is_file() {
                continue;
            }

            let payload_name = format!("$R{}", id);
            let payload = sid.join(&payload_name);
            let record = fs::read(entry.path()).ok().and_then(|data| parse_index_record(&data));

            let (display_name, original_path, size_bytes, deleted_at) = match record {
                Some(record) if !record.original_path.is_empty() => (
                    windows_file_name(&record.original_path).to_string(),
                    Some(record.original_path.clone()),
                    Some(record.size),
                    record.deleted.map(|t| t.with_timezone(&Local).to_rfc3339_opts(SecondsFormat::Secs, false)),
                ),
                Some(record) => (payload_name, None, Some(record.size), None),
                None => (payload_name, None, None, None),
            };

            let mut delete_targets = vec![entry.path()];
            if fs::symlink_metadata(&payload).is_ok() {
                delete_targets.push(payload);
            }

            items.push(TrashItem {
                platform: Platform::Windows,
                display_name,
                original_path,
                deleted_at,
                size_bytes,
                location: sid.to_path_buf(),
                delete_targets,
            });
        }
        Ok(())
    }
}

impl TrashStore for RecycleBinTrash {
    fn platform(&self) -> Platform {
        Platform::Windows
    }

    fn list(&self) -> Result<Vec<TrashItem>, TrashError> {
        let mut items = Vec::new();

        for root in &self.roots {
            let Ok(sids) = fs::read_dir(root) else {
                continue;
            };
            for sid in sids.flatten() {
                let sid = sid.path();
                if !sid.is_dir() {
                    continue;
                }
                // Other users' SID folders are normally unreadable
                if let Err(e) = self.list_sid_dir(&sid, &mut items) {
                    debug!(sid = %sid.display(), "skipping recycle bin folder: {}", e);
                }
            }
        }

        items.sort_by(|a, b| a.location.cmp(&b.location).then_with(|| a.display_name.cmp(&b.display_name)));
        Ok(items)
    }

    /// Uses the shell API on Windows so Explorer's view stays consistent
    fn empty_all(&self) -> Result<usize, TrashError> {
        let items = self.list()?;

        #[cfg(windows)]
        {
            if !items.is_empty() {
                shell_empty_recycle_bin()?;
            }
        }

        #[cfg(not(windows))]
        {
            for item in &items {
                self.purge_item(item)?;
            }
        }

        Ok(items.len())
    }
}

#[cfg(windows)]
fn shell_empty_recycle_bin() -> Result<(), TrashError> {
    use winapi::um::shellapi::{SHEmptyRecycleBinW, SHERB_NOCONFIRMATION, SHERB_NOPROGRESSUI, SHERB_NOSOUND};

    let flags = SHERB_NOCONFIRMATION | SHERB_NOPROGRESSUI | SHERB_NOSOUND;
    let hr = unsafe { SHEmptyRecycleBinW(std::ptr::null_mut(), std::ptr::null(), flags) };
    if hr != 0 {
        return Err(TrashError::Shell(hr));
    }
    Ok(())
}
