/// Destruction sequence: rename churn -> truncate -> unlink -> directory fsync
///
/// Only the unlink is fatal. Rename, truncate and directory fsync failures
/// are logged, recorded as [`HygieneFailure`]s and the sequence moves on.
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

use rand::{CryptoRng, RngCore};
use serde::Serialize;
use tracing::{info, warn};

use super::hints::{sync_directory, HintOutcome};
use crate::error::{Result, ShredError};

/// Random bytes per generated file name (hex-encoded, so twice as many chars)
pub const RENAME_NAME_BYTES: usize = 16;

/// Regenerations allowed when a random name already exists
const RENAME_COLLISION_RETRIES: usize = 10;

/// Where a run is, or where it stopped.
///
/// `Writing`, `Verifying` and `Failed` only appear in logs. A failed run is
/// returned as `Err`, so a [`super::ShredOutcome`] always ends in `Done` or
/// `Kept`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Stage {
    Writing,
    Verifying,
    RenameChurn,
    Truncate,
    Unlink,
    /// File removed
    Done,
    /// Overwritten and left in place on request
    Kept,
    /// A fatal error stopped the run
    Failed,
}

impl Stage {
    pub fn is_terminal(self) -> bool {
        matches!(self, Stage::Done | Stage::Kept | Stage::Failed)
    }

    /// Next state after `self` succeeds. `verify` and `keep` select the
    /// optional branches; terminal states have no successor.
    pub fn next(self, verify: bool, keep: bool) -> Option<Stage> {
        match self {
            Stage::Writing if verify => Some(Stage::Verifying),
            Stage::Writing | Stage::Verifying if keep => Some(Stage::Kept),
            Stage::Writing | Stage::Verifying => Some(Stage::RenameChurn),
            Stage::RenameChurn => Some(Stage::Truncate),
            Stage::Truncate => Some(Stage::Unlink),
            Stage::Unlink => Some(Stage::Done),
            Stage::Done | Stage::Kept | Stage::Failed => None,
        }
    }
}

/// Best-effort step that can fail without failing the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HygieneStep {
    Rename,
    Truncate,
    DirectorySync,
}

/// A non-fatal failure during destruction
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HygieneFailure {
    pub step: HygieneStep,
    pub detail: String,
}

/// What the destruction sequence did
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DestructionReport {
    /// Name the file had when it was unlinked
    pub final_path: PathBuf,
    pub renames: usize,
    pub hygiene_failures: Vec<HygieneFailure>,
}

impl DestructionReport {
    fn record(&mut self, step: HygieneStep, detail: String) {
        warn!("{:?} failed (continuing): {}", step, detail);
        self.hygiene_failures.push(HygieneFailure { step, detail });
    }

    fn record_hint(&mut self, outcome: HintOutcome, dir: &Path) {
        outcome.log("directory fsync");
        if let HintOutcome::Failed(e) = outcome {
            self.hygiene_failures.push(HygieneFailure {
                step: HygieneStep::DirectorySync,
                detail: format!("{}: {}", dir.display(), e),
            });
        }
    }
}

/// Run rename churn, truncate, unlink and directory fsync on `path`
pub fn destroy<R: CryptoRng>(path: &Path, rename_passes: usize, rng: &mut R) -> Result<DestructionReport> {
    let dir = parent_dir(path);
    let mut report = DestructionReport {
        final_path: path.to_path_buf(),
        renames: 0,
        hygiene_failures: Vec::new(),
    };

    let mut stage = Stage::RenameChurn;
    while !stage.is_terminal() {
        info!(?stage, path = %report.final_path.display(), "destruction step");
        match stage {
            Stage::RenameChurn => rename_churn(&dir, rename_passes, rng, &mut report),
            Stage::Truncate => {
                if let Err(e) = truncate_to_zero(&report.final_path) {
                    report.record(HygieneStep::Truncate, format!("{}: {}", report.final_path.display(), e));
                }
            }
            Stage::Unlink => {
                fs::remove_file(&report.final_path).map_err(|source| ShredError::Deletion {
                    path: report.final_path.clone(),
                    source,
                })?;
                let outcome = sync_directory(&dir);
                report.record_hint(outcome, &dir);
            }
            Stage::Writing | Stage::Verifying | Stage::Done | Stage::Kept | Stage::Failed => {}
        }
        let Some(next) = stage.next(false, false) else { break };
        stage = next;
    }

    Ok(report)
}

fn rename_churn<R: CryptoRng>(dir: &Path, passes: usize, rng: &mut R, report: &mut DestructionReport) {
    for _ in 0..passes {
        let candidate = match free_random_name(dir, rng) {
            Some(candidate) => candidate,
            None => {
                report.record(
                    HygieneStep::Rename,
                    format!("no free random name in {} after {} tries", dir.display(), RENAME_COLLISION_RETRIES + 1),
                );
                continue;
            }
        };

        match fs::rename(&report.final_path, &candidate) {
            Ok(()) => {
                report.final_path = candidate;
                report.renames += 1;
                let outcome = sync_directory(dir);
                report.record_hint(outcome, dir);
            }
            Err(e) => report.record(
                HygieneStep::Rename,
                format!("{} -> {}: {}", report.final_path.display(), candidate.display(), e),
            ),
        }
    }
}

fn free_random_name<R: CryptoRng>(dir: &Path, rng: &mut R) -> Option<PathBuf> {
    (0..=RENAME_COLLISION_RETRIES)
        .map(|_| dir.join(random_name(rng)))
        .find(|candidate| fs::symlink_metadata(candidate).is_err())
}

/// Hex-encoded random file name
pub fn random_name<R: CryptoRng>(rng: &mut R) -> String {
    let mut bytes = [0u8; RENAME_NAME_BYTES];
    rng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

fn truncate_to_zero(path: &Path) -> std::io::Result<()> {
    let file = OpenOptions::new().write(true).open(path)?;
    file.set_len(0)?;
    file.sync_all()
}

/// Directory containing `path`; `.` for bare file names
fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_stage_transitions() {
        assert_eq!(Stage::Writing.next(true, false), Some(Stage::Verifying));
        assert_eq!(Stage::Writing.next(false, false), Some(Stage::RenameChurn));
        assert_eq!(Stage::Verifying.next(true, false), Some(Stage::RenameChurn));
        assert_eq!(Stage::Writing.next(false, true), Some(Stage::Kept));
        assert_eq!(Stage::Verifying.next(true, true), Some(Stage::Kept));
        assert_eq!(Stage::RenameChurn.next(false, false), Some(Stage::Truncate));
        assert_eq!(Stage::Truncate.next(false, false), Some(Stage::Unlink));
        assert_eq!(Stage::Unlink.next(false, false), Some(Stage::Done));
        assert_eq!(Stage::Done.next(false, false), None);
        assert!(Stage::Failed.is_terminal());
        assert!(!Stage::Unlink.is_terminal());
    }

    #[test]
    fn test_random_name_format() {
        let mut rng = rand::rng();
        let name = random_name(&mut rng);
        assert_eq!(name.len(), RENAME_NAME_BYTES * 2);
        assert!(name.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(name, random_name(&mut rng));
    }

    #[test]
    fn test_destroy_removes_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("secret.txt");
        fs::write(&path, b"top secret").unwrap();

        let report = destroy(&path, 3, &mut rand::rng()).unwrap();

        assert!(!path.exists());
        assert!(!report.final_path.exists());
        assert_eq!(report.renames, 3);
        assert_ne!(report.final_path, path);
        assert_eq!(report.final_path.parent(), Some(dir.path()));
        assert!(report.hygiene_failures.is_empty());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_destroy_without_renames() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("plain.bin");
        fs::write(&path, [1u8; 32]).unwrap();

        let report = destroy(&path, 0, &mut rand::rng()).unwrap();
        assert_eq!(report.renames, 0);
        assert_eq!(report.final_path, path);
        assert!(!path.exists());
    }

    #[test]
    fn test_only_unlink_failure_is_fatal() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ghost");

        // Missing file: every rename and the truncate fail softly, unlink fails hard
        let err = destroy(&path, 2, &mut rand::rng()).unwrap_err();
        match err {
            ShredError::Deletion { path: failed, .. } => assert_eq!(failed, path),
            other => panic!("unexpected error: {other}"),
        }
    }

    /// Always yields zero bytes, so every generated name collides
    struct ZeroRng;

    impl RngCore for ZeroRng {
        fn next_u32(&mut self) -> u32 {
            0
        }

        fn next_u64(&mut self) -> u64 {
            0
        }

        fn fill_bytes(&mut self, dst: &mut [u8]) {
            dst.fill(0);
        }
    }

    impl CryptoRng for ZeroRng {}

    #[test]
    fn test_rename_failure_does_not_stop_unlink() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("victim.bin");
        fs::write(&path, [9u8; 512]).unwrap();

        let occupied = dir.path().join(random_name(&mut ZeroRng));
        fs::write(&occupied, b"bystander").unwrap();

        let report = destroy(&path, 2, &mut ZeroRng).unwrap();

        assert!(!path.exists());
        assert_eq!(report.renames, 0);
        assert_eq!(report.final_path, path);
        assert_eq!(report.hygiene_failures.len(), 2);
        assert!(report.hygiene_failures.iter().all(|f| f.step == HygieneStep::Rename));
        assert_eq!(fs::read(&occupied).unwrap(), b"bystander");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_parent_dir_of_bare_name() {
        assert_eq!(parent_dir(Path::new("file.bin")), PathBuf::from("."));
        assert_eq!(parent_dir(Path::new("/tmp/file.bin")), PathBuf::from("/tmp"));
    }
}
