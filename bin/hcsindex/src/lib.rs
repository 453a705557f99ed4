//! hcsindex CLI Library
//!
//! Command implementations and the HTTP search page behind the `hcsindex`
//! binary.
//!
//! # Modules
//!
//! - [`cmd`] - Command implementations (fetch, build, search, link, locate, check, serve)
//! - [`server`] - HTTP search page and JSON API
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! use hcsindex::cmd;
//!
//! // Build the manifest from the downloaded PDFs
//! cmd::build::run(Path::new("hcsindex.toml")).unwrap();
//! ```

pub mod cmd;
pub mod server;

// Re-export core types for convenience
pub use hcsindex_core::{Config, LinkBuilder, Manifest, SectionRecord};
pub use hcsindex_manifest::{BuildStats, ManifestBuilder};
pub use hcsindex_search::{MatchKind, SearchResult, SectionIndex};

/// Initialize tracing with the specified verbosity level.
///
/// # Arguments
///
/// * `verbose` - Verbosity level (0 = WARN, 1 = INFO, 2 = DEBUG, 3+ = TRACE)
///
/// # Example
///
/// ```no_run
/// hcsindex::init_tracing(2); // Enable DEBUG level logging
/// ```
pub fn init_tracing(verbose: u8) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();
}
