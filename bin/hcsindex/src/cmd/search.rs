//! Search command - prints ranked sections with viewer links

use std::path::Path;

use color_eyre::eyre::{Result, WrapErr};

use super::{load_config, load_index};
use crate::server::hits;

/// Run the search command.
pub fn run(config_path: &Path, query: &str, limit: Option<usize>, json: bool) -> Result<()> {
    tracing::info!(?config_path, query, ?limit, json, "Searching");

    let config = load_config(config_path)?;
    let index = load_index(&config)?;
    let links = config.link_builder();
    let limit = limit.unwrap_or(config.search.limit);

    let results = hits(&index, &links, query, limit);

    if json {
        let out = serde_json::to_string_pretty(&results).wrap_err("Failed to encode results")?;
        println!("{out}");
        return Ok(());
    }

    if results.is_empty() {
        println!("No results for \"{}\"", query.trim());
        return Ok(());
    }

    println!();
    for (i, hit) in results.iter().enumerate() {
        println!(
            "  {:>2}. {}  ({} p.{})",
            i + 1,
            hit.heading,
            hit.document_id,
            hit.page_number
        );
        if hit.heading != hit.raw_label {
            println!("      {}", hit.raw_label);
        }
        if let Some(url) = &hit.url {
            println!("      {url}");
        }
    }
    println!();

    Ok(())
}
