//! The persisted section manifest.
//!
//! The manifest is a flat JSON file holding every indexed document and every
//! section record. It is written wholesale by the builder and read by search.
//! Loading is lenient: malformed records are skipped and logged rather than
//! failing the whole load.

use std::{collections::HashMap, fs, path::Path};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::{
    error::{CoreError, Result},
    section::{DocumentInfo, SectionRecord},
};

/// Current manifest format version.
pub const MANIFEST_VERSION: u32 = 1;

/// Ordered list of sections across all documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    /// Format version.
    pub version: u32,

    /// Indexed documents, ordered by file name.
    pub documents: Vec<DocumentInfo>,

    /// Section records, ordered by document then page.
    pub records: Vec<SectionRecord>,
}

/// Raw on-disk shape, decoded before per-record validation.
#[derive(Deserialize)]
struct RawManifest {
    #[serde(default)]
    version: Option<u32>,
    #[serde(default)]
    documents: Vec<Value>,
    #[serde(default)]
    records: Vec<Value>,
}

/// Problems found by [`Manifest::validate`].
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    /// Invariant violations.
    pub errors: Vec<String>,

    /// Suspicious but usable content.
    pub warnings: Vec<String>,
}

impl ValidationReport {
    /// Record an invariant violation.
    pub fn add_error(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    /// Record a warning.
    pub fn add_warning(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }

    /// Append the findings of another report.
    pub fn merge(&mut self, other: ValidationReport) {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }

    /// Whether any invariant is violated.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Whether any warning was raised.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

impl Manifest {
    /// Create a manifest from documents and records.
    pub fn new(documents: Vec<DocumentInfo>, records: Vec<SectionRecord>) -> Self {
        Self {
            version: MANIFEST_VERSION,
            documents,
            records,
        }
    }

    /// Number of section records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the manifest holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Look up a document by id.
    pub fn document(&self, document_id: &str) -> Option<&DocumentInfo> {
        self.documents.iter().find(|d| d.document_id == document_id)
    }

    /// Records of one document, in manifest order.
    pub fn records_for<'a, 'b>(
        &'a self,
        document_id: &'b str,
    ) -> impl Iterator<Item = &'a SectionRecord> + use<'a, 'b> {
        self.records
            .iter()
            .filter(move |r| r.document_id == document_id)
    }

    /// Serialize the manifest to pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Decode a manifest, skipping malformed documents and records.
    ///
    /// Returns the manifest and one message per skipped entry.
    pub fn from_json_lenient(json: &str) -> serde_json::Result<(Self, Vec<String>)> {
        let raw: RawManifest = serde_json::from_str(json)?;
        let mut skipped = Vec::new();

        if let Some(version) = raw.version.filter(|v| *v > MANIFEST_VERSION) {
            warn!(version, supported = MANIFEST_VERSION, "Manifest is newer than this tool");
        }

        let mut documents: Vec<DocumentInfo> = Vec::with_capacity(raw.documents.len());
        for (i, value) in raw.documents.into_iter().enumerate() {
            match serde_json::from_value::<DocumentInfo>(value) {
                Ok(doc) if !doc.document_id.is_empty() => documents.push(doc),
                Ok(_) => skipped.push(format!("documents[{i}]: empty document_id")),
                Err(e) => skipped.push(format!("documents[{i}]: {e}")),
            }
        }

        let pages: HashMap<&str, u32> = documents
            .iter()
            .map(|d| (d.document_id.as_str(), d.total_pages))
            .collect();

        let mut records = Vec::with_capacity(raw.records.len());
        for (i, value) in raw.records.into_iter().enumerate() {
            let record = match serde_json::from_value::<SectionRecord>(value) {
                Ok(record) => record,
                Err(e) => {
                    skipped.push(format!("records[{i}]: {e}"));
                    continue;
                }
            };

            match pages.get(record.document_id.as_str()) {
                None => skipped.push(format!(
                    "records[{i}]: unknown document '{}'",
                    record.document_id
                )),
                Some(&total) if record.page_number == 0 || record.page_number > total => {
                    skipped.push(format!(
                        "records[{i}]: page {} outside 1..={total} of '{}'",
                        record.page_number, record.document_id
                    ))
                }
                Some(_) => records.push(record),
            }
        }

        Ok((
            Self {
                version: raw.version.unwrap_or(MANIFEST_VERSION),
                documents,
                records,
            },
            skipped,
        ))
    }

    /// Load a manifest file.
    ///
    /// A missing file is reported as [`CoreError::ManifestMissing`].
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CoreError::ManifestMissing {
                path: path.to_path_buf(),
            });
        }

        let json = fs::read_to_string(path)?;
        let (manifest, skipped) =
            Self::from_json_lenient(&json).map_err(|e| CoreError::manifest(path, e.to_string()))?;

        for reason in &skipped {
            warn!(path = %path.display(), %reason, "Skipping malformed manifest entry");
        }

        info!(
            path = %path.display(),
            documents = manifest.documents.len(),
            records = manifest.records.len(),
            skipped = skipped.len(),
            "Loaded manifest"
        );

        Ok(manifest)
    }

    /// Write the manifest, replacing any previous file.
    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let mut json = self.to_json_pretty()?;
        json.push('\n');
        fs::write(path, json)?;
        Ok(())
    }

    /// Check the manifest for invariant violations and suspicious content.
    pub fn validate(&self) -> ValidationReport {
        let mut report = ValidationReport::default();

        if self.documents.is_empty() {
            report.add_warning("manifest has no documents");
        }

        for doc in &self.documents {
            if doc.document_id.is_empty() {
                report.add_error("document with empty document_id");
            }
        }

        for record in &self.records {
            match self.document(&record.document_id) {
                None => report.add_error(format!(
                    "section '{}' references unknown document '{}'",
                    record.raw_label, record.document_id
                )),
                Some(doc) if !doc.contains_page(record.page_number) => {
                    report.add_error(format!(
                        "{}: section '{}' page {} outside 1..={}",
                        doc.document_id, record.raw_label, record.page_number, doc.total_pages
                    ))
                }
                Some(_) => {}
            }
        }

        for doc in &self.documents {
            let mut count = 0;
            let mut prev_page = 0;
            let mut has_evaluation = false;

            for record in self.records_for(&doc.document_id) {
                count += 1;
                if record.page_number < prev_page {
                    report.add_warning(format!(
                        "{}: section '{}' page {} comes after page {prev_page}",
                        doc.document_id, record.raw_label, record.page_number
                    ));
                }
                prev_page = record.page_number;

                has_evaluation |= record
                    .raw_label
                    .to_lowercase()
                    .contains("evaluation criteria")
                    || record.theme.eq_ignore_ascii_case("evaluation criteria");
            }

            if count == 0 {
                report.add_warning(format!("{}: no sections found", doc.document_id));
            } else if !has_evaluation {
                report.add_warning(format!(
                    "{}: no 'Evaluation Criteria' sections found",
                    doc.document_id
                ));
            }
        }

        report
    }
}

impl Default for Manifest {
    fn default() -> Self {
        Self::new(Vec::new(), Vec::new())
    }
}
