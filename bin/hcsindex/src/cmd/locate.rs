//! Locate command - names the section a page belongs to

use std::path::Path;

use color_eyre::eyre::{Result, bail};

use super::{load_config, load_index};

/// Run the locate command.
pub fn run(config_path: &Path, document: &str, page: u32) -> Result<()> {
    tracing::info!(?config_path, document, page, "Locating section");

    let config = load_config(config_path)?;
    let index = load_index(&config)?;

    let Some(info) = index.manifest().document(document) else {
        bail!("Document not in the manifest: {document}");
    };
    if !info.contains_page(page) {
        bail!(
            "Page {page} outside {} (1..={})",
            info.document_id,
            info.total_pages
        );
    }

    match index.section_for_page(document, page) {
        Some(record) => {
            println!("{} p.{}: {}", document, page, record.heading());
            println!("  starts on page {}: {}", record.page_number, record.raw_label);
            if let Ok(url) = config.link_builder().viewer_url(document, record.page_number) {
                println!("  {url}");
            }
        }
        None => println!("{document} p.{page}: no section starts at or before this page"),
    }

    Ok(())
}
