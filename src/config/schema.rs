/// Configuration schema for a shred run
use serde::{Deserialize, Serialize};

use crate::error::{Result, ShredError};

/// Default chunk size for streaming writes (1 MiB)
pub const DEFAULT_CHUNK_SIZE: usize = 1024 * 1024;

/// Immutable configuration, resolved once per invocation
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct WipeConfig {
    /// Lower bound of the pass count (inclusive)
    #[serde(default = "default_min_passes")]
    pub min_passes: usize,

    /// Upper bound of the pass count (inclusive)
    #[serde(default = "default_max_passes")]
    pub max_passes: usize,

    /// Bytes emitted per write call
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Read back sampled windows after every pass
    #[serde(default)]
    pub verify: bool,

    /// Number of windows per pass when verifying
    #[serde(default = "default_verify_samples")]
    pub verify_samples: usize,

    /// Bytes per window when verifying
    #[serde(default = "default_verify_len")]
    pub verify_len: usize,

    /// Random renames before unlink
    #[serde(default = "default_rename_passes")]
    pub rename_passes: usize,

    /// Ask the OS to evict the file from page cache after each pass
    #[serde(default)]
    pub drop_cache: bool,

    /// Overwrite only; skip rename/truncate/unlink
    #[serde(default)]
    pub keep: bool,
}

fn default_min_passes() -> usize {
    3
}

fn default_max_passes() -> usize {
    7
}

fn default_chunk_size() -> usize {
    DEFAULT_CHUNK_SIZE
}

fn default_verify_samples() -> usize {
    6
}

fn default_verify_len() -> usize {
    64
}

fn default_rename_passes() -> usize {
    2
}

impl Default for WipeConfig {
    fn default() -> Self {
        Self {
            min_passes: default_min_passes(),
            max_passes: default_max_passes(),
            chunk_size: default_chunk_size(),
            verify: false,
            verify_samples: default_verify_samples(),
            verify_len: default_verify_len(),
            rename_passes: default_rename_passes(),
            drop_cache: false,
            keep: false,
        }
    }
}

impl WipeConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.min_passes < 1 {
            return Err(ShredError::config("min_passes must be at least 1"));
        }

        if self.max_passes < self.min_passes {
            return Err(ShredError::config(format!(
                "max_passes ({}) must be >= min_passes ({})",
                self.max_passes, self.min_passes
            )));
        }

        if self.chunk_size == 0 {
            return Err(ShredError::config("chunk_size must be greater than 0"));
        }

        Ok(())
    }

    /// Whether any sample windows will be taken
    pub fn samples_enabled(&self) -> bool {
        self.verify && self.verify_samples > 0 && self.verify_len > 0
    }
}
