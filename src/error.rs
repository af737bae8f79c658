//! Error types for the overwrite engine and the trash purger

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Fatal errors of a shred run.
///
/// Every variant means the target was NOT securely deleted. Best-effort
/// hygiene steps (rename, truncate, directory fsync) never surface here;
/// they are reported as [`crate::shred::HygieneFailure`] on the outcome.
#[derive(Error, Debug)]
pub enum ShredError {
    /// Path is a directory, a symlink, missing, or otherwise unusable
    #[error("Invalid target {}: {reason}", .path.display())]
    InvalidTarget {
        /// Offending path
        path: PathBuf,
        /// Why the path was rejected
        reason: String,
    },

    /// Configuration rejected before any I/O
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Write, flush or fsync failed during an overwrite pass
    #[error("Write failed on pass {pass}: {source}")]
    Write {
        /// 1-based pass number
        pass: usize,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Read-back of a sample window did not match what was written
    #[error("Verification failed on pass {pass}: sample {sample} mismatch at offset {offset}")]
    Verification {
        /// 1-based pass number
        pass: usize,
        /// 1-based sample index
        sample: usize,
        /// Byte offset of the window
        offset: u64,
    },

    /// A sample window was not fully captured while streaming
    #[error("Verification capture incomplete on pass {pass}: sample {sample} not fully captured")]
    CaptureIncomplete {
        /// 1-based pass number
        pass: usize,
        /// 1-based sample index
        sample: usize,
    },

    /// Removing the directory entry failed
    #[error("Failed to delete {}: {source}", .path.display())]
    Deletion {
        /// Path the file was last known under
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Any other I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Convenience type alias for shred results
pub type Result<T> = std::result::Result<T, ShredError>;

impl ShredError {
    /// Build an invalid-target error
    pub fn invalid_target<P: Into<PathBuf>, S: Into<String>>(path: P, reason: S) -> Self {
        ShredError::InvalidTarget {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Build a configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        ShredError::Config(msg.into())
    }

    /// True when the error fired before the destruction sequence started,
    /// i.e. the file (if any) is still at its original path.
    pub fn is_fatal_before_destruction(&self) -> bool {
        !matches!(self, ShredError::Deletion { .. })
    }
}

/// Errors of the trash enumerator/purger
#[derive(Error, Debug)]
pub enum TrashError {
    /// I/O error while listing or deleting
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// No trash location known for this platform
    #[error("Unsupported: {0}")]
    Unsupported(&'static str),

    /// Shell API returned a failure code
    #[error("Shell API failed with code: {0}")]
    Shell(i32),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_target_message() {
        let err = ShredError::invalid_target("/tmp/dir", "is a directory");
        assert!(matches!(err, ShredError::InvalidTarget { .. }));
        assert_eq!(err.to_string(), "Invalid target /tmp/dir: is a directory");
    }

    #[test]
    fn test_fatal_classification() {
        let err = ShredError::Verification { pass: 2, sample: 1, offset: 128 };
        assert!(err.is_fatal_before_destruction());

        let err = ShredError::Deletion {
            path: PathBuf::from("/tmp/x"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(!err.is_fatal_before_destruction());
    }

    #[test]
    fn test_io_conversion() {
        let err: ShredError = io::Error::new(io::ErrorKind::Other, "boom").into();
        assert!(matches!(err, ShredError::Io(_)));
    }
}
