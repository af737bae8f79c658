//! StreamShred - best-effort secure file deletion
//!
//! Two independent pipelines:
//! 1. The overwrite engine ([`shred`]): multi-pass random overwrite in
//!    bounded memory, sampled read-back verification, then rename churn,
//!    truncate and unlink.
//! 2. The trash purger ([`trash`]): list, match and permanently delete
//!    items in the platform trash, dry run by default.
//!
//! On SSD/NVMe storage file-level overwriting is best-effort only; the
//! controller may remap blocks behind the filesystem's back.

pub mod cli;
pub mod config;
pub mod error;
pub mod shred;
pub mod trash;
pub mod utils;

pub use config::WipeConfig;
pub use error::{Result, ShredError, TrashError};
pub use shred::{ShredOutcome, Shredder, Stage};

/// Name used in user-facing messages
pub const APP_NAME: &str = "StreamShred";
