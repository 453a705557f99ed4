//! PDF fetching.
//!
//! Downloads the source documents listed in the configuration or the list
//! file into the local document directory. Files already present are kept.

use std::{
    fs::{self, File},
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};

use hcsindex_core::config::FetchConfig;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Documents written to a fresh list file.
const TEMPLATE_DOCUMENTS: [&str; 3] = [
    "Early Settlement Era Styles (1848-1906)_Adopted_2025.pdf",
    "Victorian Era Historic Context Statement.pdf",
    "Modernistic Styles Historic Context Statement.pdf",
];

/// Fetch errors.
#[derive(Debug, Error)]
pub enum FetchError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// The request failed.
    #[error("request for {url} failed: {message}")]
    Network { url: String, message: String },

    /// No usable file name in the URL.
    #[error("cannot derive a file name from '{0}'")]
    InvalidUrl(String),
}

/// Result type for fetching.
pub type Result<T> = std::result::Result<T, FetchError>;

/// Outcome of a fetch run.
#[derive(Debug, Clone, Default)]
pub struct FetchReport {
    /// Files downloaded.
    pub downloaded: Vec<String>,

    /// Files that already existed.
    pub skipped: Vec<String>,

    /// URLs that failed, with the reason.
    pub failed: Vec<(String, String)>,
}

impl FetchReport {
    /// Total number of sources handled.
    pub fn total(&self) -> usize {
        self.downloaded.len() + self.skipped.len() + self.failed.len()
    }
}

/// What happened to a single source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Downloaded, with the number of bytes written.
    Downloaded(u64),

    /// Already present.
    Skipped,
}

/// Parse a list file: one URL per line, blank lines and `#` comments ignored.
pub fn parse_source_list(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

/// All configured sources: `[fetch].sources` followed by the list file, without
/// duplicates.
///
/// Returns `None` when there is no list file and nothing is configured.
pub fn collect_sources(config: &FetchConfig) -> Result<Option<Vec<String>>> {
    let mut sources = config.sources.clone();

    if config.list_file.exists() {
        let text = fs::read_to_string(&config.list_file)?;
        sources.extend(parse_source_list(&text));
    } else if sources.is_empty() {
        return Ok(None);
    }

    let mut unique = Vec::with_capacity(sources.len());
    for source in sources {
        if !unique.contains(&source) {
            unique.push(source);
        }
    }

    debug!(count = unique.len(), "collected sources");
    Ok(Some(unique))
}

/// Write a starter list file with the known documents under `document_base`.
pub fn write_template_list(path: &Path, document_base: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut text = String::from("# One PDF URL per line.\n");
    for name in TEMPLATE_DOCUMENTS {
        text.push_str(document_base);
        text.push_str(&urlencoding::encode(name));
        text.push('\n');
    }

    fs::write(path, text)?;
    info!(path = %path.display(), "wrote template list file");
    Ok(())
}

/// Local file name for a source URL: its last path segment, percent-decoded.
pub fn file_name_for(url: &str) -> Result<String> {
    let path = url.split(['?', '#']).next().unwrap_or_default();
    let segment = path.rsplit('/').next().unwrap_or_default();
    let name = urlencoding::decode(segment)
        .map_err(|_| FetchError::InvalidUrl(url.to_string()))?
        .into_owned();

    if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
        return Err(FetchError::InvalidUrl(url.to_string()));
    }

    Ok(name)
}

/// Blocking PDF downloader.
pub struct Fetcher {
    pdf_dir: PathBuf,
    force: bool,
    agent: ureq::Agent,
}

impl Fetcher {
    /// Create a fetcher writing into `pdf_dir`.
    pub fn new(pdf_dir: impl Into<PathBuf>) -> Self {
        Self {
            pdf_dir: pdf_dir.into(),
            force: false,
            agent: ureq::agent(),
        }
    }

    /// Re-download files that already exist.
    #[must_use]
    pub fn with_force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    /// Fetch every source. A failed download does not stop the others.
    pub fn fetch_all(&self, sources: &[String]) -> Result<FetchReport> {
        fs::create_dir_all(&self.pdf_dir)?;
        let mut report = FetchReport::default();

        info!(count = sources.len(), dir = %self.pdf_dir.display(), "fetching documents");

        for url in sources {
            let name = match file_name_for(url) {
                Ok(name) => name,
                Err(e) => {
                    warn!(url = %url, error = %e, "skipping source");
                    report.failed.push((url.clone(), e.to_string()));
                    continue;
                }
            };

            match self.fetch_one(url, &name) {
                Ok(FetchOutcome::Downloaded(bytes)) => {
                    info!(file = %name, bytes, "downloaded");
                    report.downloaded.push(name);
                }
                Ok(FetchOutcome::Skipped) => {
                    debug!(file = %name, "already present");
                    report.skipped.push(name);
                }
                Err(e) => {
                    warn!(url = %url, error = %e, "download failed");
                    report.failed.push((url.clone(), e.to_string()));
                }
            }
        }

        info!(
            downloaded = report.downloaded.len(),
            skipped = report.skipped.len(),
            failed = report.failed.len(),
            "fetch complete"
        );

        Ok(report)
    }

    /// Fetch a single source into `<pdf_dir>/<name>`.
    pub fn fetch_one(&self, url: &str, name: &str) -> Result<FetchOutcome> {
        let target = self.pdf_dir.join(name);
        if target.exists() && !self.force {
            return Ok(FetchOutcome::Skipped);
        }

        let response = self
            .agent
            .get(url)
            .set("User-Agent", "hcsindex")
            .call()
            .map_err(|e| FetchError::Network {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        let partial = self.pdf_dir.join(format!("{name}.part"));
        let written = match write_body(response.into_reader(), &partial) {
            Ok(written) => written,
            Err(e) => {
                let _ = fs::remove_file(&partial);
                return Err(e.into());
            }
        };
        fs::rename(&partial, &target)?;

        Ok(FetchOutcome::Downloaded(written))
    }
}

fn write_body(mut body: impl io::Read, path: &Path) -> io::Result<u64> {
    let mut out = BufWriter::new(File::create(path)?);
    let written = io::copy(&mut body, &mut out)?;
    out.flush()?;
    Ok(written)
}
