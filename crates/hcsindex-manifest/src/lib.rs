//! hcsindex Manifest Library
//!
//! Fetches the source PDFs and turns them into a section manifest.
//!
//! # Modules
//!
//! - [`fetch`] - Download source PDFs into the document directory
//! - [`extract`] - Per-page text extraction with lopdf
//! - [`patterns`] - Configurable style/theme label patterns
//! - [`toc`] - Table-of-contents parsing
//! - [`bio`] - Architect biography documents
//! - [`build`] - Build orchestration

pub mod bio;
pub mod build;
pub mod extract;
pub mod fetch;
pub mod patterns;
pub mod toc;

pub use build::{BuildError, BuildStats, IndexedDocument, ManifestBuilder};
pub use extract::{ExtractError, PageSource, PdfDocument, TextPages};
pub use fetch::{FetchError, FetchOutcome, FetchReport, Fetcher, collect_sources, write_template_list};
pub use patterns::{LabelMatch, PatternError, PatternTable};
pub use toc::TocEntry;
