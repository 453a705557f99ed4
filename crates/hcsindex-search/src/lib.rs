//! hcsindex Search Library
//!
//! Case-insensitive section search over the manifest.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! use hcsindex_search::SectionIndex;
//!
//! let index = SectionIndex::load(Path::new("data/metadata/manifest.json")).unwrap();
//! for result in index.search_limited("art deco", 10) {
//!     println!("{} p.{}", result.record.document_id, result.record.page_number);
//! }
//! ```

pub mod index;
pub mod query;

use hcsindex_core::CoreError;
pub use index::{MatchKind, Resolution, SearchResult, SectionIndex};
pub use query::{normalize, tokenize};
use thiserror::Error;

/// Search-related errors.
#[derive(Debug, Error)]
pub enum SearchError {
    /// Manifest could not be loaded.
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl SearchError {
    /// Whether the manifest has not been built yet.
    pub fn is_manifest_missing(&self) -> bool {
        match self {
            Self::Core(e) => e.is_manifest_missing(),
        }
    }
}

/// Result type for search operations.
pub type Result<T> = std::result::Result<T, SearchError>;
