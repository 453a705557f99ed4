//! Build command - scans the PDFs and writes the manifest

use std::{path::Path, time::Instant};

use color_eyre::eyre::{Result, WrapErr};
use hcsindex_manifest::ManifestBuilder;

use super::load_config;

/// Run the build command.
///
/// Rebuilds the manifest from every PDF in the document directory, then
/// validates the result.
pub fn run(config_path: &Path) -> Result<()> {
    let start = Instant::now();
    tracing::info!(?config_path, "Starting build");

    let config = load_config(config_path)?;
    let output = &config.paths.manifest;

    let builder = ManifestBuilder::new(&config).wrap_err("Invalid label patterns")?;
    let (manifest, stats) = builder.build_and_write(output).wrap_err("Build failed")?;

    let duration = start.elapsed();

    // Print build statistics
    println!();
    println!("  Build completed successfully!");
    println!();
    println!("  Documents:  {}", stats.documents);
    println!("  Failed:     {}", stats.failed.len());
    println!("  Sections:   {}", stats.records);
    println!("  Pages:      {}", stats.pages_scanned);
    println!("  ToC lines:  {}", stats.toc_entries);
    println!("  Dropped:    {}", stats.dropped_out_of_range);
    println!();
    println!("  Duration:   {:.2}s", duration.as_secs_f64());
    println!("  Output:     {}", output.display());
    println!();

    for (document, reason) in &stats.failed {
        println!("  ✗ {document}: {reason}");
    }

    let report = manifest.validate();
    if report.has_errors() || report.has_warnings() {
        println!("  Validation:");
        for err in &report.errors {
            println!("  ✗ {err}");
        }
        for warn in &report.warnings {
            println!("  ⚠ {warn}");
        }
        println!();
    }

    tracing::info!(?stats, ?duration, "Build completed successfully");

    Ok(())
}
