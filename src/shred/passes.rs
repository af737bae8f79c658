/// Pass-count selection
use rand::{CryptoRng, Rng};

use crate::error::{Result, ShredError};

/// Pick the number of overwrite passes for this run.
///
/// Uniform over `[min_passes, max_passes]`; exactly `min_passes` when the
/// bounds are equal (no randomness consumed).
pub fn select_pass_count<R: CryptoRng>(min_passes: usize, max_passes: usize, rng: &mut R) -> Result<usize> {
    if min_passes < 1 || max_passes < min_passes {
        return Err(ShredError::config(format!(
            "invalid pass bounds: min={} max={}",
            min_passes, max_passes
        )));
    }

    if min_passes == max_passes {
        return Ok(min_passes);
    }

    Ok(rng.random_range(min_passes..=max_passes))
}
