//! Command-line surface shared by the `streamshred` and `trash-purge` binaries

pub mod confirm;
pub mod picker;
pub mod shred;
pub mod trash;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Install the stderr log subscriber. `RUST_LOG` wins over `verbose`.
pub fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    let _ = tracing_subscriber::registry().with(filter).with(fmt_layer).try_init();
}
