//! Link command - prints the viewer URL for a document page

use std::path::Path;

use color_eyre::eyre::{Result, WrapErr};

use super::load_config;

/// Run the link command.
pub fn run(config_path: &Path, document: &str, page: u32, open_browser: bool) -> Result<()> {
    tracing::info!(?config_path, document, page, "Building link");

    let config = load_config(config_path)?;
    let url = config
        .link_builder()
        .viewer_url(document, page)
        .wrap_err("Cannot build a viewer link")?;

    println!("{url}");

    if open_browser {
        open::that(&url).wrap_err("Failed to open the browser")?;
    }

    Ok(())
}
