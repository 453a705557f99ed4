//! Build orchestration.
//!
//! Scans every PDF in the document directory and assembles the manifest.

use std::{
    collections::HashSet,
    path::{Path, PathBuf},
    time::Instant,
};

use hcsindex_core::{
    Config, CoreError, DocumentInfo, Manifest, SectionRecord, config::BuildConfig,
};
use thiserror::Error;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::{
    bio::{BIO_THEME, is_bio_document, parse_bio_lines},
    extract::{PageSource, PdfDocument},
    patterns::{PatternError, PatternTable},
    toc::{looks_like_toc, parse_toc_lines},
};

/// Build errors.
#[derive(Debug, Error)]
pub enum BuildError {
    /// The document directory does not exist.
    #[error("PDF directory not found: {0}, run `hcsindex fetch` first")]
    MissingPdfDir(PathBuf),

    /// The document directory holds no PDFs.
    #[error("no PDF files found in {0}")]
    NoDocuments(PathBuf),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Directory walk error.
    #[error("walk error: {0}")]
    Walk(#[from] walkdir::Error),

    /// Pattern table error.
    #[error("pattern error: {0}")]
    Pattern(#[from] PatternError),

    /// Manifest persistence error.
    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Result type for build operations.
pub type Result<T> = std::result::Result<T, BuildError>;

/// Build statistics.
#[derive(Debug, Clone, Default)]
pub struct BuildStats {
    /// Number of documents indexed.
    pub documents: usize,

    /// Documents that could not be read, with the reason.
    pub failed: Vec<(String, String)>,

    /// Number of section records emitted.
    pub records: usize,

    /// Number of pages whose text was extracted.
    pub pages_scanned: usize,

    /// Number of table-of-contents entries parsed.
    pub toc_entries: usize,

    /// Table-of-contents entries pointing outside their document.
    pub dropped_out_of_range: usize,

    /// Build duration in milliseconds.
    pub duration_ms: u64,
}

/// The sections found in one document.
#[derive(Debug, Clone)]
pub struct IndexedDocument {
    /// Document metadata.
    pub info: DocumentInfo,

    /// Records in page order.
    pub records: Vec<SectionRecord>,

    /// Pages whose text was extracted.
    pub pages_scanned: usize,

    /// Table-of-contents entries parsed.
    pub toc_entries: usize,

    /// Table-of-contents entries dropped for pointing outside the document.
    pub dropped_out_of_range: usize,
}

/// Manifest builder that orchestrates the scan of all documents.
#[derive(Debug)]
pub struct ManifestBuilder {
    patterns: PatternTable,
    options: BuildConfig,
    pdf_dir: PathBuf,
}

impl ManifestBuilder {
    /// Create a builder from the configuration.
    pub fn new(config: &Config) -> Result<Self> {
        let patterns = PatternTable::compile(&config.label_patterns(), config.build.min_label_len)?;
        debug!(patterns = patterns.len(), "compiled label patterns");

        Ok(Self {
            patterns,
            options: config.build.clone(),
            pdf_dir: config.paths.pdf_dir.clone(),
        })
    }

    /// Set the document directory.
    #[must_use]
    pub fn with_pdf_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.pdf_dir = dir.into();
        self
    }

    /// PDF files in the document directory, sorted by file name.
    pub fn find_documents(&self) -> Result<Vec<PathBuf>> {
        if !self.pdf_dir.is_dir() {
            return Err(BuildError::MissingPdfDir(self.pdf_dir.clone()));
        }

        let mut documents = Vec::new();
        for entry in WalkDir::new(&self.pdf_dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry?;
            let is_pdf = entry
                .path()
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
            if entry.file_type().is_file() && is_pdf {
                documents.push(entry.into_path());
            }
        }

        Ok(documents)
    }

    /// Scan every document and assemble the manifest.
    pub fn build(&self) -> Result<(Manifest, BuildStats)> {
        let start = Instant::now();
        let mut stats = BuildStats::default();

        let paths = self.find_documents()?;
        if paths.is_empty() {
            return Err(BuildError::NoDocuments(self.pdf_dir.clone()));
        }

        info!(
            dir = %self.pdf_dir.display(),
            documents = paths.len(),
            "starting build"
        );

        let mut documents = Vec::with_capacity(paths.len());
        let mut records = Vec::new();

        for path in &paths {
            let document_id = document_id(path);

            let source = match PdfDocument::open(path) {
                Ok(source) => source,
                Err(e) => {
                    warn!(document = %document_id, error = %e, "skipping unreadable document");
                    stats.failed.push((document_id, e.to_string()));
                    continue;
                }
            };

            let indexed = self.index_document(&document_id, &source);
            info!(
                document = %document_id,
                pages = indexed.info.total_pages,
                sections = indexed.records.len(),
                "indexed document"
            );

            stats.pages_scanned += indexed.pages_scanned;
            stats.toc_entries += indexed.toc_entries;
            stats.dropped_out_of_range += indexed.dropped_out_of_range;
            documents.push(indexed.info);
            records.extend(indexed.records);
        }

        let manifest = Manifest::new(documents, records);
        stats.documents = manifest.documents.len();
        stats.records = manifest.len();
        stats.duration_ms = start.elapsed().as_millis() as u64;

        info!(
            documents = stats.documents,
            failed = stats.failed.len(),
            records = stats.records,
            pages_scanned = stats.pages_scanned,
            toc_entries = stats.toc_entries,
            dropped_out_of_range = stats.dropped_out_of_range,
            duration_ms = stats.duration_ms,
            "build complete"
        );

        Ok((manifest, stats))
    }

    /// Build the manifest and write it to `path`.
    pub fn build_and_write(&self, path: &Path) -> Result<(Manifest, BuildStats)> {
        let (manifest, stats) = self.build()?;
        manifest.write_to_file(path)?;
        info!(path = %path.display(), "wrote manifest");
        Ok((manifest, stats))
    }

    /// Extract the sections of a single document.
    pub fn index_document(&self, document_id: &str, source: &dyn PageSource) -> IndexedDocument {
        let total_pages = source.page_count();
        let scan_limit = match self.options.max_scan_pages {
            0 => total_pages,
            max => max.min(total_pages),
        };
        let toc_limit = if self.options.scan_toc {
            self.options.toc_max_pages.min(total_pages)
        } else {
            0
        };
        let bio = is_bio_document(document_id, &self.options.bio_marker);

        let mut indexed = IndexedDocument {
            info: DocumentInfo::new(document_id, total_pages),
            records: Vec::new(),
            pages_scanned: 0,
            toc_entries: 0,
            dropped_out_of_range: 0,
        };
        let mut bio_records = Vec::new();

        for page in 1..=scan_limit.max(toc_limit) {
            let text = match source.page_text(page) {
                Ok(text) => text,
                Err(e) => {
                    warn!(document = %document_id, page, error = %e, "could not extract page text");
                    String::new()
                }
            };
            indexed.pages_scanned += 1;

            if bio && page <= scan_limit {
                bio_records.extend(parse_bio_lines(&text).into_iter().map(|label| {
                    SectionRecord::new(document_id, page, "", BIO_THEME, label)
                }));
            }

            if page <= toc_limit && looks_like_toc(&text) && self.scan_toc_page(&mut indexed, &text)
            {
                debug!(document = %document_id, page, "table of contents page");
                continue;
            }

            if page > scan_limit {
                continue;
            }

            if let Some(found) = self.patterns.first_match(&text) {
                debug!(
                    document = %document_id,
                    page,
                    pattern = %found.pattern,
                    label = %found.raw_label,
                    "section heading"
                );
                indexed.records.push(SectionRecord::new(
                    document_id,
                    page,
                    found.style,
                    found.theme,
                    found.raw_label,
                ));
            }
        }

        if bio {
            if bio_records.is_empty() {
                warn!(document = %document_id, "no biography entries found, using section headings");
            } else {
                indexed.records = bio_records;
            }
        }

        indexed.records = dedupe_and_sort(indexed.records);
        indexed
    }

    /// Parse a table-of-contents page into records. Returns whether the page
    /// held any entries.
    fn scan_toc_page(&self, indexed: &mut IndexedDocument, text: &str) -> bool {
        let entries = parse_toc_lines(text);
        if entries.is_empty() {
            return false;
        }

        indexed.toc_entries += entries.len();
        for entry in entries {
            if !indexed.info.contains_page(entry.page) {
                debug!(
                    document = %indexed.info.document_id,
                    label = %entry.label,
                    page = entry.page,
                    "dropping out-of-range table of contents entry"
                );
                indexed.dropped_out_of_range += 1;
                continue;
            }

            let label = self.patterns.classify(&entry.label);
            indexed.records.push(SectionRecord::new(
                indexed.info.document_id.clone(),
                entry.page,
                label.style,
                label.theme,
                label.raw_label,
            ));
        }

        true
    }
}

fn document_id(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Drop repeated `(page, label)` pairs and order by page, keeping discovery
/// order within a page.
fn dedupe_and_sort(records: Vec<SectionRecord>) -> Vec<SectionRecord> {
    let mut seen = HashSet::new();
    let mut records: Vec<_> = records
        .into_iter()
        .filter(|r| seen.insert((r.page_number, r.raw_label.to_lowercase())))
        .collect();
    records.sort_by_key(|r| r.page_number);
    records
}
