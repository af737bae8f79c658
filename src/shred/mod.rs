//! Overwrite Engine
//!
//! Validates a single regular file, overwrites it with cryptographically
//! strong random bytes for a randomly chosen number of passes (optionally
//! verifying sampled windows after each pass), then destroys it with
//! rename churn, truncate and unlink.
//!
//! Everything is sequential and blocking: every pass is fully written and
//! synced before its verification, and before the next pass starts.

pub mod destruct;
pub mod hints;
pub mod passes;
pub mod sample;
pub mod target;
pub mod writer;

use std::path::{Path, PathBuf};

use rand::rngs::ThreadRng;
use rand::CryptoRng;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::WipeConfig;
use crate::error::Result;

pub use destruct::{HygieneFailure, HygieneStep, Stage};
pub use passes::select_pass_count;
pub use sample::{SampleWindow, VerificationSummary};
pub use target::Target;
pub use writer::WipeDevice;

use sample::{choose_windows, SampleCapture};
use writer::write_pass;

/// Result of a successful run (file destroyed, or kept on request)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShredOutcome {
    pub original_path: PathBuf,
    /// Last name the file had; equals `original_path` in keep mode
    pub final_path: PathBuf,
    /// Bytes overwritten per pass
    pub size: u64,
    pub passes: usize,
    pub verification: VerificationSummary,
    pub renames: usize,
    /// Non-fatal failures of rename/truncate/directory fsync
    pub hygiene_failures: Vec<HygieneFailure>,
    /// `Stage::Done` or `Stage::Kept`
    pub final_stage: Stage,
}

impl ShredOutcome {
    pub fn removed(&self) -> bool {
        self.final_stage == Stage::Done
    }
}

/// Runs the overwrite engine with one configuration.
///
/// Generic over the random source; anything that is not a
/// [`CryptoRng`] is rejected at compile time.
pub struct Shredder<R = ThreadRng> {
    config: WipeConfig,
    rng: R,
}

impl Shredder<ThreadRng> {
    /// Shredder backed by the thread-local CSPRNG (seeded from the OS)
    pub fn new(config: WipeConfig) -> Result<Self> {
        Self::with_rng(config, rand::rng())
    }
}

impl<R: CryptoRng> Shredder<R> {
    pub fn with_rng(config: WipeConfig, rng: R) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, rng })
    }

    pub fn config(&self) -> &WipeConfig {
        &self.config
    }

    /// Validate `path`, overwrite it and (unless `keep`) destroy it.
    ///
    /// The caller is responsible for any confirmation before calling this.
    pub fn run(&mut self, path: &Path) -> Result<ShredOutcome> {
        let target = Target::validate(path)?;
        let file = target.open()?;
        self.run_with(&target, file)
    }

    /// Same as [`Shredder::run`] for an already validated target, writing
    /// through `device`. The device is closed before destruction begins.
    pub fn run_with<D: WipeDevice>(&mut self, target: &Target, mut device: D) -> Result<ShredOutcome> {
        let passes = select_pass_count(self.config.min_passes, self.config.max_passes, &mut self.rng)?;
        let size = target.size();

        info!(
            path = %target.path().display(),
            size,
            passes,
            chunk = self.config.chunk_size,
            "starting shred"
        );

        let verification = self
            .overwrite(&mut device, size, passes)
            .inspect_err(|e| warn!(stage = ?Stage::Failed, path = %target.path().display(), "{}", e))?;
        drop(device);

        let mut outcome = ShredOutcome {
            original_path: target.path().to_path_buf(),
            final_path: target.path().to_path_buf(),
            size,
            passes,
            verification,
            renames: 0,
            hygiene_failures: Vec::new(),
            final_stage: Stage::Kept,
        };

        if self.config.keep {
            info!(path = %target.path().display(), "keep requested; file left in place");
            return Ok(outcome);
        }

        let report = destruct::destroy(target.path(), self.config.rename_passes, &mut self.rng)?;
        outcome.final_path = report.final_path;
        outcome.renames = report.renames;
        outcome.hygiene_failures = report.hygiene_failures;
        outcome.final_stage = Stage::Done;

        info!(path = %target.path().display(), "file destroyed");
        Ok(outcome)
    }

    fn overwrite<D: WipeDevice>(&mut self, device: &mut D, size: u64, passes: usize) -> Result<VerificationSummary> {
        let mut summary = VerificationSummary::default();

        if size == 0 {
            info!("file is 0 bytes; skipping overwrites");
            return Ok(summary);
        }

        for pass in 1..=passes {
            let windows = if self.config.samples_enabled() {
                choose_windows(size, self.config.verify_samples, self.config.verify_len, &mut self.rng)
            } else {
                Vec::new()
            };
            debug!(pass, ?windows, "sample windows");

            let mut capture = SampleCapture::new(windows);
            debug!(stage = ?Stage::Writing, pass);
            write_pass(device, size, self.config.chunk_size, &mut self.rng, &mut capture, pass)?;

            if self.config.drop_cache {
                device.drop_cache(size).log("cache-drop");
            }

            let mut compared = 0;
            if !capture.is_empty() {
                debug!(stage = ?Stage::Verifying, pass);
                let result = capture.verify(device, pass)?;
                compared = result.samples.len();
                summary.passes.push(result);

                if self.config.drop_cache {
                    device.drop_cache(size).log("cache-drop");
                }
            }

            info!("{}", pass_message(pass, passes, compared));
        }

        Ok(summary)
    }
}

/// Progress line for a finished pass; "verified" only when windows were compared
fn pass_message(pass: usize, passes: usize, compared: usize) -> String {
    if compared > 0 {
        format!("pass {}/{} complete (verified {} samples)", pass, passes, compared)
    } else {
        format!("pass {}/{} complete", pass, passes)
    }
}
