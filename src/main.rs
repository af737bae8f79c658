//! StreamShred - cross-platform streaming overwrite + delete
//!
//! For every target:
//! 1. Validate (regular file, not a directory or symlink)
//! 2. Ask for confirmation unless --force
//! 3. Overwrite with random data for N passes, verifying samples if asked
//! 4. Rename, truncate and delete unless --keep

use std::io;
use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use tracing::warn;

use streamshred::cli::{self, confirm::confirm, picker::pick_files, shred::ShredArgs};
use streamshred::config::resolve_config;
use streamshred::shred::{ShredOutcome, Shredder, Target};
use streamshred::utils::detect_platform;
use streamshred::{ShredError, WipeConfig, APP_NAME};

/// What happened to one target
enum TargetResult {
    Shredded(ShredOutcome),
    Declined,
}

fn main() -> ExitCode {
    let args = ShredArgs::parse();
    cli::init_tracing(args.verbose);

    let config = match resolve_config(&args) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("❌ {}: {}", APP_NAME, e);
            return ExitCode::from(2);
        }
    };

    if config.drop_cache && !detect_platform().supports_cache_drop() {
        warn!("--drop-cache has no effect on {}", detect_platform().name());
    }

    let targets = if args.wants_picker() {
        match pick_files(&format!("Select file(s) to shred ({})", APP_NAME)) {
            Ok(picked) if picked.is_empty() => {
                println!("[*] No files selected.");
                return ExitCode::SUCCESS;
            }
            Ok(picked) => picked,
            Err(e) => {
                eprintln!("[!] {}. Provide a file path instead.", e);
                return ExitCode::from(2);
            }
        }
    } else {
        args.files.clone()
    };

    // Keep going when one target fails; the exit code reports it
    let mut exit_code = ExitCode::SUCCESS;
    for path in &targets {
        match shred_target(path, &config, args.force) {
            Ok(TargetResult::Shredded(outcome)) => report_success(&outcome),
            Ok(TargetResult::Declined) => println!("[*] Aborted: {}", path.display()),
            Err(e) => {
                eprintln!("❌ {}: {} was NOT securely deleted: {}", APP_NAME, path.display(), e);
                exit_code = ExitCode::FAILURE;
            }
        }
    }

    exit_code
}

fn shred_target(path: &Path, config: &WipeConfig, force: bool) -> Result<TargetResult, ShredError> {
    let target = Target::validate(path)?;

    if !force {
        let stdin = io::stdin();
        if !confirm(target.path(), &mut stdin.lock(), &mut io::stdout())? {
            return Ok(TargetResult::Declined);
        }
    }

    let file = target.open()?;
    let outcome = Shredder::new(config.clone())?.run_with(&target, file)?;
    Ok(TargetResult::Shredded(outcome))
}

fn report_success(outcome: &ShredOutcome) {
    let verified = if outcome.verification.comparisons() > 0 {
        format!(", {} samples verified", outcome.verification.comparisons())
    } else {
        String::new()
    };

    if outcome.removed() {
        println!(
            "✅ {}: {} passes{} + delete: {}",
            APP_NAME,
            outcome.passes,
            verified,
            outcome.original_path.display()
        );
        for failure in &outcome.hygiene_failures {
            eprintln!(
                "⚠️  Deletion completed, but hygiene step {:?} failed: {}",
                failure.step, failure.detail
            );
        }
    } else {
        println!(
            "✅ {}: {} passes{}. File kept at: {}",
            APP_NAME,
            outcome.passes,
            verified,
            outcome.final_path.display()
        );
    }
}
