pub mod config;
pub mod core;
pub mod fetcher;
pub mod indicators;
pub mod models;
pub mod session;
pub mod view;

pub use crate::core::loader::{DataLocation, DatasetLoader};
pub use crate::models::{Dataset, Record};
pub use crate::session::Session;

/// Installs the fmt subscriber used by the binaries. `RUST_LOG` overrides the
/// default `info` level.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
