//! trash-purge - list/delete/empty the Recycle Bin (Windows) or Trash (Linux/macOS)
//!
//! Deleting from the trash is irreversible, so `delete` and `empty` only
//! report what they would remove unless --force is given.

use std::process::ExitCode;

use clap::Parser;

use streamshred::cli::{self, trash::TrashArgs, trash::TrashCommand};
use streamshred::trash::{self, PurgeReport, TrashItem, TrashStore};
use streamshred::utils::format_size;
use streamshred::TrashError;

fn main() -> ExitCode {
    let args = TrashArgs::parse();
    cli::init_tracing(args.verbose);

    let store = match trash::default_store() {
        Ok(store) => store,
        Err(e) => {
            eprintln!("❌ {}", e);
            return ExitCode::from(2);
        }
    };

    match run(store.as_ref(), args.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("❌ trash-purge failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(store: &dyn TrashStore, command: TrashCommand) -> Result<(), TrashError> {
    match command {
        TrashCommand::List { json } => {
            let items = store.list()?;
            if json {
                match serde_json::to_string_pretty(&items) {
                    Ok(text) => println!("{}", text),
                    Err(e) => eprintln!("❌ Failed to serialize listing: {}", e),
                }
            } else {
                print_items(&items);
            }
        }
        TrashCommand::Delete { needle, force } => {
            let report = trash::delete(store, &needle, force)?;
            if report.matched.is_empty() {
                println!("[*] No matches for: {:?}", needle);
                return Ok(());
            }

            println!("Matched {} item(s) for {:?}:", report.matched.len(), needle);
            for item in &report.matched {
                let origin = item
                    .original_path
                    .clone()
                    .unwrap_or_else(|| item.location.display().to_string());
                println!(" - {}  |  {}", item.display_name, origin);
            }
            print_outcome(&report, "Deleted matched items permanently.");
        }
        TrashCommand::Empty { force } => {
            let report = trash::empty(store, force)?;
            println!("{} item(s) in {} trash.", report.matched.len(), store.platform().name());
            print_outcome(&report, "Emptied trash permanently.");
        }
    }
    Ok(())
}

fn print_items(items: &[TrashItem]) {
    if items.is_empty() {
        println!("[*] No items found (or insufficient permissions).");
        return;
    }

    println!("Found {} item(s):\n", items.len());
    for (i, item) in items.iter().enumerate() {
        println!("{:>4}. {}", i + 1, item.display_name);
        if let Some(original) = &item.original_path {
            println!("     Original : {}", original);
        }
        if let Some(deleted) = &item.deleted_at {
            println!("     Deleted  : {}", deleted);
        }
        println!("     Size     : {}", format_size(item.size_bytes));
        println!("     Location : {}", item.location.display());
        println!();
    }
}

fn print_outcome(report: &PurgeReport, done: &str) {
    if report.dry_run {
        println!("\n[DRY RUN] Nothing deleted. Re-run with --force to delete permanently.");
    } else {
        println!("[+] {} ({} item(s))", done, report.removed);
    }
}
