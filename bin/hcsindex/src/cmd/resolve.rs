//! Resolve command - style and construction year to a section

use std::path::Path;

use color_eyre::eyre::{Result, WrapErr, bail};

use super::{load_config, load_index};

/// Run the resolve command.
///
/// Looks the style and year up in the configured `[[frameworks]]` table and
/// prints the section it names.
pub fn run(config_path: &Path, style: &str, year: i32, open_browser: bool) -> Result<()> {
    tracing::info!(?config_path, style, year, "Resolving style and year");

    let config = load_config(config_path)?;
    if config.frameworks.is_empty() {
        bail!(
            "No frameworks configured; add [[frameworks]] tables to {}",
            config_path.display()
        );
    }

    let index = load_index(&config)?;
    let Some(found) = index.resolve(&config.frameworks, style, year) else {
        println!("No framework section for \"{}\" in {year}", style.trim());
        return Ok(());
    };

    let record = found.record;
    println!("{} ({year})", found.framework.style);
    if let Some(period) = &found.framework.period {
        println!("  Period: {period}");
    }
    println!(
        "  {} p.{}: {}",
        record.document_id,
        record.page_number,
        record.heading()
    );

    let url = config
        .link_builder()
        .viewer_url(&record.document_id, record.page_number)
        .wrap_err("Cannot build a viewer link")?;
    println!("  {url}");

    if open_browser {
        open::that(&url).wrap_err("Failed to open the browser")?;
    }

    Ok(())
}
