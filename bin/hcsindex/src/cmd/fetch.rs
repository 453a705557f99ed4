//! Fetch command - downloads the source PDFs

use std::{path::Path, time::Instant};

use color_eyre::eyre::{Result, WrapErr, bail};
use hcsindex_manifest::{Fetcher, collect_sources, write_template_list};

use super::load_config;

/// Run the fetch command.
///
/// Downloads every configured source that is not already present.
pub fn run(config_path: &Path, force: bool) -> Result<()> {
    let start = Instant::now();
    tracing::info!(?config_path, force, "Starting fetch");

    let config = load_config(config_path)?;

    let Some(sources) =
        collect_sources(&config.fetch).wrap_err("Failed to read the source list")?
    else {
        write_template_list(&config.fetch.list_file, &config.viewer.document_base_url)
            .wrap_err("Failed to write the template source list")?;

        println!();
        println!(
            "  Created {} with the known documents.",
            config.fetch.list_file.display()
        );
        println!("  Edit it to list every PDF URL, then run `hcsindex fetch` again.");
        println!();
        return Ok(());
    };

    if sources.is_empty() {
        bail!("No sources listed in {}", config.fetch.list_file.display());
    }

    let report = Fetcher::new(&config.paths.pdf_dir)
        .with_force(force)
        .fetch_all(&sources)
        .wrap_err("Fetch failed")?;

    println!();
    println!("  Downloaded: {}", report.downloaded.len());
    println!("  Skipped:    {}", report.skipped.len());
    println!("  Failed:     {}", report.failed.len());
    println!();
    println!("  Duration:   {:.2}s", start.elapsed().as_secs_f64());
    println!("  Directory:  {}", config.paths.pdf_dir.display());
    println!();

    for (url, reason) in &report.failed {
        println!("  ✗ {url}: {reason}");
    }

    if !report.failed.is_empty() && report.failed.len() == report.total() {
        bail!("All {} downloads failed", report.failed.len());
    }

    Ok(())
}
