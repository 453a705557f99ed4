//! Viewer link construction.
//!
//! Links follow the pdf.js contract
//! `<viewer-base>?file=<document-path>#page=<page_number>`, where the document
//! path is itself percent-encoded so the viewer receives it intact.

use thiserror::Error;

/// Malformed link input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LinkError {
    /// No document id given.
    #[error("document id cannot be empty")]
    EmptyDocument,

    /// Page numbers are 1-based.
    #[error("page number must be >= 1 (got {0})")]
    InvalidPage(u32),

    /// No viewer configured.
    #[error("viewer base URL cannot be empty")]
    EmptyViewer,

    /// The viewer base would swallow the query or the page anchor.
    #[error("viewer base URL must not contain '?' or '#': {0}")]
    ViewerHasQuery(String),
}

/// Builds viewer URLs for documents and pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkBuilder {
    viewer_base: String,
    document_base: String,
}

impl LinkBuilder {
    /// Create a link builder from a viewer page and a document location prefix.
    pub fn new(viewer_base: impl Into<String>, document_base: impl Into<String>) -> Self {
        Self {
            viewer_base: viewer_base.into().trim().to_string(),
            document_base: document_base.into().trim().to_string(),
        }
    }

    /// Return a copy pointing at a different document location.
    #[must_use]
    pub fn with_document_base(&self, document_base: impl Into<String>) -> Self {
        Self::new(self.viewer_base.clone(), document_base)
    }

    /// Location of a document, as the viewer will fetch it.
    pub fn document_url(&self, document_id: &str) -> Result<String, LinkError> {
        let document_id = document_id.trim();
        if document_id.is_empty() {
            return Err(LinkError::EmptyDocument);
        }

        Ok(format!(
            "{}{}",
            self.document_base,
            urlencoding::encode(document_id)
        ))
    }

    /// Viewer URL opening `document_id` at `page_number`.
    pub fn viewer_url(&self, document_id: &str, page_number: u32) -> Result<String, LinkError> {
        if self.viewer_base.is_empty() {
            return Err(LinkError::EmptyViewer);
        }
        if self.viewer_base.contains(['?', '#']) {
            return Err(LinkError::ViewerHasQuery(self.viewer_base.clone()));
        }
        if page_number == 0 {
            return Err(LinkError::InvalidPage(page_number));
        }

        let document = self.document_url(document_id)?;

        Ok(format!(
            "{}?file={}#page={page_number}",
            self.viewer_base,
            urlencoding::encode(&document)
        ))
    }
}
