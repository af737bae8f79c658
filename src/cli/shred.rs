/// Arguments of the `streamshred` binary
use std::path::PathBuf;

use clap::Parser;

use crate::config::DEFAULT_CHUNK_SIZE;

#[derive(Parser, Debug)]
#[command(
    name = "streamshred",
    version,
    about = "Streaming multi-pass random overwrite + delete, with optional sampled verification",
    long_about = "Overwrites each file with cryptographically strong random bytes for a random number \
                  of passes, optionally verifies sampled windows after every pass, then renames, \
                  truncates and deletes it.\n\nOn SSD/NVMe storage this is best-effort only: the \
                  controller may remap blocks. Prefer encrypted storage with key destruction there."
)]
pub struct ShredArgs {
    /// File(s) to shred
    pub files: Vec<PathBuf>,

    /// Pick files with a native dialog
    #[arg(long)]
    pub pick: bool,

    /// Minimum passes
    #[arg(long, default_value_t = 3)]
    pub min_passes: usize,

    /// Maximum passes
    #[arg(long, default_value_t = 7)]
    pub max_passes: usize,

    /// Use exactly --min-passes instead of a random count in [min, max]
    #[arg(long)]
    pub no_randomize_pass_count: bool,

    /// Chunk size in bytes (at least 4096)
    #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE)]
    pub chunk: usize,

    /// Read back sampled windows after every pass
    #[arg(long)]
    pub verify: bool,

    /// Samples per pass when verifying
    #[arg(long, default_value_t = 6)]
    pub verify_samples: usize,

    /// Bytes per sample when verifying
    #[arg(long, default_value_t = 64)]
    pub verify_len: usize,

    /// Random renames before delete
    #[arg(long, default_value_t = 2)]
    pub rename_passes: usize,

    /// Linux only: posix_fadvise(DONTNEED) after each pass (best-effort)
    #[arg(long)]
    pub drop_cache: bool,

    /// Do not delete after overwriting (testing)
    #[arg(long)]
    pub keep: bool,

    /// Skip the confirmation prompt
    #[arg(long)]
    pub force: bool,

    /// Debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl ShredArgs {
    /// The picker is used when asked for, or when no path was given
    pub fn wants_picker(&self) -> bool {
        self.pick || self.files.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flags() {
        let args = ShredArgs::parse_from([
            "streamshred",
            "--verify",
            "--verify-samples",
            "5",
            "--force",
            "a.bin",
            "b.bin",
        ]);
        assert_eq!(args.files, vec![PathBuf::from("a.bin"), PathBuf::from("b.bin")]);
        assert!(args.verify);
        assert_eq!(args.verify_samples, 5);
        assert!(args.force);
        assert!(!args.wants_picker());
    }

    #[test]
    fn test_picker_when_no_files() {
        let args = ShredArgs::parse_from(["streamshred"]);
        assert!(args.wants_picker());

        let args = ShredArgs::parse_from(["streamshred", "--pick", "x"]);
        assert!(args.wants_picker());
    }
}
