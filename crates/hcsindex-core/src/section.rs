//! Section records and document metadata.

use serde::{Deserialize, Serialize};

/// A page-anchored, labeled section of a document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SectionRecord {
    /// File name of the document, e.g. `victorian.pdf`.
    pub document_id: String,

    /// 1-based page number within the document.
    pub page_number: u32,

    /// Architectural style, possibly empty.
    #[serde(default)]
    pub style: String,

    /// Theme or category, possibly empty.
    #[serde(default)]
    pub theme: String,

    /// The label text as found in the document.
    pub raw_label: String,
}

impl SectionRecord {
    /// Create a new record.
    pub fn new(
        document_id: impl Into<String>,
        page_number: u32,
        style: impl Into<String>,
        theme: impl Into<String>,
        raw_label: impl Into<String>,
    ) -> Self {
        Self {
            document_id: document_id.into(),
            page_number,
            style: style.into(),
            theme: theme.into(),
            raw_label: raw_label.into(),
        }
    }

    /// Short human-readable heading: style and theme when present, else the label.
    pub fn heading(&self) -> String {
        match (self.style.is_empty(), self.theme.is_empty()) {
            (false, false) => format!("{} ({})", self.style, self.theme),
            (false, true) => self.style.clone(),
            (true, false) => self.theme.clone(),
            (true, true) => self.raw_label.clone(),
        }
    }
}

/// Metadata for one indexed document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentInfo {
    /// File name of the document.
    pub document_id: String,

    /// Display title (file stem).
    pub title: String,

    /// Number of pages in the PDF.
    pub total_pages: u32,
}

impl DocumentInfo {
    /// Create document metadata, deriving the title from the file name.
    pub fn new(document_id: impl Into<String>, total_pages: u32) -> Self {
        let document_id = document_id.into();
        let title = document_id
            .strip_suffix(".pdf")
            .or_else(|| document_id.strip_suffix(".PDF"))
            .unwrap_or(&document_id)
            .to_string();

        Self {
            document_id,
            title,
            total_pages,
        }
    }

    /// Whether `page_number` is a real page of this document.
    pub fn contains_page(&self, page_number: u32) -> bool {
        (1..=self.total_pages).contains(&page_number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading() {
        let both = SectionRecord::new("a.pdf", 1, "Art Deco", "Evaluation Criteria", "x");
        assert_eq!(both.heading(), "Art Deco (Evaluation Criteria)");

        let label_only = SectionRecord::new("a.pdf", 1, "", "", "Anshen + Allen");
        assert_eq!(label_only.heading(), "Anshen + Allen");
    }

    #[test]
    fn test_document_title_and_range() {
        let doc = DocumentInfo::new("Victorian Era.pdf", 12);
        assert_eq!(doc.title, "Victorian Era");
        assert!(doc.contains_page(1));
        assert!(doc.contains_page(12));
        assert!(!doc.contains_page(0));
        assert!(!doc.contains_page(13));
    }

    #[test]
    fn test_record_defaults_empty_style_and_theme() {
        let json = r#"{"document_id":"a.pdf","page_number":3,"raw_label":"Queen Anne"}"#;
        let record: SectionRecord = serde_json::from_str(json).unwrap();
        assert!(record.style.is_empty());
        assert!(record.theme.is_empty());
    }
}
