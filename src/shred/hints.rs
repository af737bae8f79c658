/// Best-effort OS hints: page-cache eviction and directory fsync
///
/// None of these ever fail a run. Each returns a [`HintOutcome`] so the
/// caller can log it, and "not available here" is kept apart from real
/// I/O errors.
use std::fs::File;
use std::io;
use std::path::Path;

use tracing::{debug, warn};

/// Result of an advisory OS call
#[derive(Debug)]
pub enum HintOutcome {
    /// The OS accepted the hint
    Applied,
    /// Platform or filesystem does not offer this hint
    Unsupported(String),
    /// Hint is available but the call failed
    Failed(io::Error),
}

impl HintOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, HintOutcome::Failed(_))
    }

    /// Log the outcome; failures at warn, everything else at debug
    pub fn log(&self, what: &str) {
        match self {
            HintOutcome::Applied => debug!("{} applied", what),
            HintOutcome::Unsupported(reason) => debug!("{} skipped: {}", what, reason),
            HintOutcome::Failed(e) => warn!("{} failed: {}", what, e),
        }
    }

    /// Split an OS error into "unsupported" vs a genuine failure
    fn from_os_error(err: io::Error) -> Self {
        #[cfg(unix)]
        {
            if let Some(code) = err.raw_os_error() {
                if code == libc::ENOSYS || code == libc::EOPNOTSUPP || code == libc::ESPIPE || code == libc::EINVAL {
                    return HintOutcome::Unsupported(err.to_string());
                }
            }
        }
        HintOutcome::Failed(err)
    }
}

/// Ask the kernel to drop cached pages for `[0, len)` of `file`
#[cfg(target_os = "linux")]
pub fn drop_page_cache(file: &File, len: u64) -> HintOutcome {
    use std::os::unix::io::AsRawFd;

    let page = page_size();
    let rounded = len.div_ceil(page).saturating_mul(page);
    // A length of 0 means "to the end of the file"
    let advise_len = libc::off_t::try_from(rounded).unwrap_or(0);

    let ret = unsafe { libc::posix_fadvise(file.as_raw_fd(), 0, advise_len, libc::POSIX_FADV_DONTNEED) };
    if ret == 0 {
        HintOutcome::Applied
    } else {
        HintOutcome::from_os_error(io::Error::from_raw_os_error(ret))
    }
}

#[cfg(not(target_os = "linux"))]
pub fn drop_page_cache(_file: &File, _len: u64) -> HintOutcome {
    HintOutcome::Unsupported("page-cache eviction is only available on Linux".to_string())
}

#[cfg(target_os = "linux")]
fn page_size() -> u64 {
    use nix::unistd::{sysconf, SysconfVar};

    sysconf(SysconfVar::PAGE_SIZE)
        .ok()
        .flatten()
        .and_then(|size| u64::try_from(size).ok())
        .filter(|&size| size > 0)
        .unwrap_or(4096)
}

/// fsync a directory so renames/unlinks inside it are persisted
#[cfg(unix)]
pub fn sync_directory(dir: &Path) -> HintOutcome {
    match File::open(dir).and_then(|d| d.sync_all()) {
        Ok(()) => HintOutcome::Applied,
        Err(e) => HintOutcome::from_os_error(e),
    }
}

#[cfg(not(unix))]
pub fn sync_directory(_dir: &Path) -> HintOutcome {
    HintOutcome::Unsupported("directory fsync is only available on POSIX systems".to_string())
}
