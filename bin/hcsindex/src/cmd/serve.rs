//! Serve command - HTTP search page

use std::{path::Path, sync::Arc};

use color_eyre::eyre::{Result, WrapErr};
use tokio::net::TcpListener;

use super::{load_config, load_index};
use crate::server::{AppState, create_router};

/// Run the serve command.
///
/// Loads the manifest once and serves the search page until interrupted. With
/// `local`, the PDFs are served from the document directory and links point
/// there instead of the remote document location.
pub async fn run(config_path: &Path, port: u16, local: bool, open_browser: bool) -> Result<()> {
    tracing::info!(?config_path, port, local, "Starting server");

    let config = load_config(config_path)?;
    let index = load_index(&config)?;

    let addr = format!("127.0.0.1:{port}");
    let mut links = config.link_builder();
    if local {
        links = links.with_document_base(format!("http://{addr}/pdfs/"));
    }

    let state = Arc::new(AppState {
        index,
        links,
        limit: config.search.limit,
        frameworks: config.frameworks.clone(),
    });
    let pdf_dir = local.then_some(config.paths.pdf_dir.as_path());
    let app = create_router(state, pdf_dir);

    let listener = TcpListener::bind(&addr)
        .await
        .wrap_err_with(|| format!("Failed to bind to {addr}"))?;

    println!();
    println!("  Search page running at http://{addr}");
    if local {
        println!("  Serving PDFs from {}", config.paths.pdf_dir.display());
    }
    println!("  Press Ctrl+C to stop");
    println!();

    if open_browser {
        let _ = open::that(format!("http://{addr}"));
    }

    axum::serve(listener, app).await.wrap_err("Server error")?;

    Ok(())
}
