//! Command implementations.

use std::path::Path;

use color_eyre::eyre::{Result, WrapErr};
use hcsindex_core::Config;
use hcsindex_search::SectionIndex;

pub mod build;
pub mod check;
pub mod fetch;
pub mod link;
pub mod locate;
pub mod resolve;
pub mod search;
pub mod serve;

/// Load the configuration file, falling back to defaults when it is absent.
///
/// `HCSINDEX__SECTION__KEY` environment variables override file values.
pub(crate) fn load_config(config_path: &Path) -> Result<Config> {
    let config = Config::load_with_env(config_path).wrap_err("Failed to load configuration")?;
    tracing::debug!(?config, "Loaded configuration");
    Ok(config)
}

/// Load the section index named by the configuration.
pub(crate) fn load_index(config: &Config) -> Result<SectionIndex> {
    SectionIndex::load(&config.paths.manifest).wrap_err("Failed to load the section index")
}
