pub mod config;
pub mod error;
pub mod expansion;
pub mod fonts;
pub mod reveal;
pub mod tree;
pub mod viewer;
pub mod walker;

pub use error::{ConfigError, Result, TreeError};

/// Environment variable holding the tracing filter directive.
pub const LOG_ENV: &str = "FOLDERTREE_LOG";

/// Initialize stderr logging, filtered by `FOLDERTREE_LOG`.
pub fn init_logging() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("foldertree=info"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}
