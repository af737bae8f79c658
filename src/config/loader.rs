/// Resolve a [`WipeConfig`] from command-line arguments
use super::schema::WipeConfig;
use crate::cli::shred::ShredArgs;
use crate::error::{Result, ShredError};

/// Smallest chunk size accepted from the command line
pub const MIN_CLI_CHUNK_SIZE: usize = 4096;

/// Build the run configuration from parsed arguments.
///
/// Chunk sizes below [`MIN_CLI_CHUNK_SIZE`] are raised to it, sample count
/// and sample length are raised to at least 1, and
/// `--no-randomize-pass-count` pins the pass count to `--min-passes`.
pub fn resolve_config(args: &ShredArgs) -> Result<WipeConfig> {
    if args.min_passes < 1 || args.max_passes < args.min_passes {
        return Err(ShredError::config(format!(
            "invalid pass bounds: min={} max={}",
            args.min_passes, args.max_passes
        )));
    }

    let max_passes = if args.no_randomize_pass_count {
        args.min_passes
    } else {
        args.max_passes
    };

    let config = WipeConfig {
        min_passes: args.min_passes,
        max_passes,
        chunk_size: args.chunk.max(MIN_CLI_CHUNK_SIZE),
        verify: args.verify,
        verify_samples: args.verify_samples.max(1),
        verify_len: args.verify_len.max(1),
        rename_passes: args.rename_passes,
        drop_cache: args.drop_cache,
        keep: args.keep,
    };

    config.validate()?;

    Ok(config)
}
