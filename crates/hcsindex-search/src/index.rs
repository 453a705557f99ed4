//! Section search over the manifest.
//!
//! The corpus is small, so every query is a linear scan over pre-normalized
//! labels. Results are ranked by match kind (exact, substring, token overlap),
//! then by the number of shared tokens, then by manifest order.

use std::{collections::BTreeSet, path::Path};

use hcsindex_core::{FrameworkConfig, Manifest, SectionRecord};
use serde::Serialize;
use tracing::{debug, info};

use crate::{
    Result,
    query::{normalize, tokenize},
};

/// A style and construction year resolved to a section through the
/// framework table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Resolution<'a> {
    /// The framework row that covers the style and year.
    pub framework: &'a FrameworkConfig,

    /// The section named by that row.
    pub record: &'a SectionRecord,
}

/// How a record matched a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    /// The query equals the style or theme.
    Exact,

    /// The query occurs in the style, theme or label.
    Substring,

    /// The query shares at least one token with the record.
    TokenOverlap,
}

impl MatchKind {
    /// Ranking weight; higher ranks first.
    pub fn weight(self) -> u32 {
        match self {
            Self::Exact => 3,
            Self::Substring => 2,
            Self::TokenOverlap => 1,
        }
    }
}

/// A ranked search hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResult<'a> {
    /// The matching record.
    pub record: &'a SectionRecord,

    /// How it matched.
    pub kind: MatchKind,

    /// `kind weight * 100 + shared tokens`.
    pub score: u32,
}

/// Normalized view of one record.
#[derive(Debug, Clone)]
struct Entry {
    style: String,
    theme: String,
    label: String,
    tokens: BTreeSet<String>,
}

impl Entry {
    fn new(record: &SectionRecord) -> Self {
        let mut tokens = tokenize(&record.style);
        tokens.extend(tokenize(&record.theme));
        tokens.extend(tokenize(&record.raw_label));

        Self {
            style: normalize(&record.style),
            theme: normalize(&record.theme),
            label: normalize(&record.raw_label),
            tokens,
        }
    }

    fn matches(&self, query: &str, query_tokens: &BTreeSet<String>) -> Option<(MatchKind, u32)> {
        let shared = self.tokens.intersection(query_tokens).count() as u32;

        let exact = [&self.style, &self.theme]
            .into_iter()
            .any(|field| !field.is_empty() && field == query);
        if exact {
            return Some((MatchKind::Exact, shared));
        }

        let substring = [&self.style, &self.theme, &self.label]
            .into_iter()
            .any(|field| field.contains(query));
        if substring {
            return Some((MatchKind::Substring, shared));
        }

        (shared > 0).then_some((MatchKind::TokenOverlap, shared))
    }
}

/// In-memory search index over a manifest.
#[derive(Debug, Clone)]
pub struct SectionIndex {
    manifest: Manifest,
    entries: Vec<Entry>,
}

impl SectionIndex {
    /// Index a manifest.
    pub fn new(manifest: Manifest) -> Self {
        let entries = manifest.records.iter().map(Entry::new).collect();
        Self { manifest, entries }
    }

    /// Load and index the manifest at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let index = Self::new(Manifest::load(path)?);
        info!(
            documents = index.manifest.documents.len(),
            records = index.len(),
            "loaded section index"
        );
        Ok(index)
    }

    /// The indexed manifest.
    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    /// Number of indexed records.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the index holds no records.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All matching records, best first.
    ///
    /// An empty or whitespace-only query matches nothing.
    pub fn search(&self, query: &str) -> Vec<SearchResult<'_>> {
        let normalized = normalize(query);
        if normalized.is_empty() {
            return Vec::new();
        }
        let query_tokens = tokenize(&normalized);

        let mut results: Vec<_> = self
            .manifest
            .records
            .iter()
            .zip(&self.entries)
            .filter_map(|(record, entry)| {
                let (kind, shared) = entry.matches(&normalized, &query_tokens)?;
                Some(SearchResult {
                    record,
                    kind,
                    score: kind.weight() * 100 + shared,
                })
            })
            .collect();

        // Stable: equal scores keep manifest order.
        results.sort_by(|a, b| b.score.cmp(&a.score));

        debug!(query = %normalized, results = results.len(), "search");
        results
    }

    /// At most `limit` matching records, best first.
    pub fn search_limited(&self, query: &str, limit: usize) -> Vec<SearchResult<'_>> {
        let mut results = self.search(query);
        results.truncate(limit);
        results
    }

    /// The section containing `page`: the last record of the document that
    /// starts at or before it.
    pub fn section_for_page(&self, document_id: &str, page: u32) -> Option<&SectionRecord> {
        self.manifest
            .records_for(document_id)
            .filter(|r| r.page_number <= page)
            .max_by_key(|r| r.page_number)
    }

    /// First record of the document whose label contains `needle`, ignoring
    /// case.
    pub fn find_label(&self, document_id: &str, needle: &str) -> Option<&SectionRecord> {
        let needle = normalize(needle);
        if needle.is_empty() {
            return None;
        }

        self.manifest
            .records_for(document_id)
            .find(|r| normalize(&r.raw_label).contains(&needle))
    }

    /// Resolve a style and year to a section.
    ///
    /// Framework rows are tried in order; the first row covering the style and
    /// year whose section label is found in the manifest wins.
    pub fn resolve<'a>(
        &'a self,
        frameworks: &'a [FrameworkConfig],
        style: &str,
        year: i32,
    ) -> Option<Resolution<'a>> {
        frameworks
            .iter()
            .filter(|framework| framework.covers(style, year))
            .find_map(|framework| {
                let record = self.find_label(&framework.document, &framework.section_label);
                if record.is_none() {
                    debug!(
                        document = %framework.document,
                        label = %framework.section_label,
                        "framework section not in manifest"
                    );
                }
                Some(Resolution {
                    framework,
                    record: record?,
                })
            })
    }
}

#[cfg(test)]
mod tests {
    use hcsindex_core::DocumentInfo;
    use tempfile::TempDir;

    use super::*;

    fn sample_index() -> SectionIndex {
        let documents = vec![
            DocumentInfo::new("modern.pdf", 80),
            DocumentInfo::new("victorian.pdf", 120),
        ];
        let records = vec![
            SectionRecord::new(
                "modern.pdf",
                4,
                "",
                "Commercial Architecture",
                "Theme: Commercial Architecture",
            ),
            SectionRecord::new("modern.pdf", 12, "Art Deco", "", "Art Deco"),
            SectionRecord::new(
                "modern.pdf",
                30,
                "Streamline Moderne",
                "Evaluation Criteria",
                "Evaluation Criteria: Streamline Moderne",
            ),
            SectionRecord::new("modern.pdf", 44, "", "Deco Interiors", "Sub-theme: Deco Interiors"),
            SectionRecord::new(
                "victorian.pdf",
                10,
                "Queen Anne",
                "Evaluation Criteria",
                "Evaluation Criteria: Queen Anne",
            ),
            SectionRecord::new("victorian.pdf", 42, "Italianate", "", "Style: Italianate"),
        ];
        SectionIndex::new(Manifest::new(documents, records))
    }

    fn pages<'a>(results: &'a [SearchResult<'a>]) -> Vec<(&'a str, u32)> {
        results
            .iter()
            .map(|r| (r.record.document_id.as_str(), r.record.page_number))
            .collect()
    }

    #[test]
    fn test_exact_ranks_above_token_overlap() {
        let index = sample_index();
        let results = index.search("art deco");

        assert_eq!(results[0].kind, MatchKind::Exact);
        assert_eq!(results[0].record.page_number, 12);
        assert_eq!(results[0].score, 302);

        let overlap = results
            .iter()
            .find(|r| r.record.page_number == 44)
            .unwrap();
        assert_eq!(overlap.kind, MatchKind::TokenOverlap);
        assert_eq!(overlap.score, 101);
        assert!(results[0].score > overlap.score);
    }

    #[test]
    fn test_case_insensitive() {
        let index = sample_index();
        assert_eq!(
            pages(&index.search("art deco")),
            pages(&index.search("Art Deco"))
        );
        assert_eq!(
            pages(&index.search("ART   DECO ")),
            pages(&index.search("art deco"))
        );
    }

    #[test]
    fn test_substring_match() {
        let index = sample_index();
        let results = index.search("moder");

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].kind, MatchKind::Substring);
        assert_eq!(results[0].record.page_number, 30);
    }

    #[test]
    fn test_evaluation_criteria_theme() {
        let index = sample_index();
        let results = index.search("Evaluation Criteria");

        // Exact theme matches in manifest order.
        assert_eq!(pages(&results), vec![("modern.pdf", 30), ("victorian.pdf", 10)]);
        assert!(results.iter().all(|r| r.kind == MatchKind::Exact));
    }

    #[test]
    fn test_token_overlap_ordering() {
        let index = sample_index();
        let results = index.search("queen interiors commercial architecture");

        assert!(results.iter().all(|r| r.kind == MatchKind::TokenOverlap));
        // Two shared tokens beat one; ties keep manifest order.
        assert_eq!(
            pages(&results),
            vec![("modern.pdf", 4), ("modern.pdf", 44), ("victorian.pdf", 10)]
        );
        assert_eq!(results[0].score, 102);
    }

    #[test]
    fn test_empty_and_unmatched_queries() {
        let index = sample_index();
        assert!(index.search("").is_empty());
        assert!(index.search("   \t").is_empty());
        assert!(index.search("brutalist parking garage").is_empty());
    }

    #[test]
    fn test_search_limited() {
        let index = sample_index();
        assert_eq!(index.search_limited("evaluation", 1).len(), 1);
        assert_eq!(index.search_limited("evaluation", 10).len(), 2);
    }

    #[test]
    fn test_section_for_page() {
        let index = sample_index();

        assert_eq!(index.section_for_page("modern.pdf", 3), None);
        assert_eq!(index.section_for_page("modern.pdf", 12).unwrap().style, "Art Deco");
        assert_eq!(
            index.section_for_page("modern.pdf", 29).unwrap().style,
            "Art Deco"
        );
        assert_eq!(
            index.section_for_page("modern.pdf", 80).unwrap().page_number,
            44
        );
        assert_eq!(index.section_for_page("missing.pdf", 5), None);
    }

    #[test]
    fn test_find_label() {
        let index = sample_index();

        assert_eq!(
            index.find_label("victorian.pdf", "italianate").unwrap().page_number,
            42
        );
        assert_eq!(index.find_label("victorian.pdf", "art deco"), None);
        assert_eq!(index.find_label("victorian.pdf", " "), None);
    }

    fn frameworks() -> Vec<FrameworkConfig> {
        let row = |style: &str, start, end, document: &str, label: &str| FrameworkConfig {
            style: style.to_string(),
            period: None,
            year_start: start,
            year_end: end,
            document: document.to_string(),
            section_label: label.to_string(),
        };
        vec![
            row("Queen Anne", 1880, 1910, "victorian.pdf", "Missing Section"),
            row("Queen Anne", 1880, 1910, "victorian.pdf", "queen anne"),
            row("Art Deco", 1920, 1940, "modern.pdf", "Art Deco"),
        ]
    }

    #[test]
    fn test_resolve_style_and_year() {
        let index = sample_index();
        let frameworks = frameworks();

        let found = index.resolve(&frameworks, "art deco", 1931).unwrap();
        assert_eq!(found.record.document_id, "modern.pdf");
        assert_eq!(found.record.page_number, 12);

        // The first covering row names a label that is not indexed.
        let found = index.resolve(&frameworks, "Queen Anne", 1895).unwrap();
        assert_eq!(found.record.page_number, 10);
        assert_eq!(found.framework.section_label, "queen anne");
    }

    #[test]
    fn test_resolve_outside_years() {
        let index = sample_index();
        let frameworks = frameworks();

        assert_eq!(index.resolve(&frameworks, "Art Deco", 1950), None);
        assert_eq!(index.resolve(&frameworks, "Brutalist", 1960), None);
        assert_eq!(index.resolve(&frameworks, "", 1931), None);
        assert_eq!(index.resolve(&[], "Art Deco", 1931), None);
    }

    #[test]
    fn test_results_serialize() {
        let index = sample_index();
        let results = index.search("italianate");
        let json = serde_json::to_value(&results).unwrap();

        assert_eq!(json[0]["kind"], "exact");
        assert_eq!(json[0]["record"]["page_number"], 42);
    }

    #[test]
    fn test_load_missing_manifest() {
        let dir = TempDir::new().unwrap();
        let err = SectionIndex::load(&dir.path().join("manifest.json")).unwrap_err();
        assert!(err.is_manifest_missing());
    }

    #[test]
    fn test_load_manifest() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("manifest.json");
        sample_index().manifest().write_to_file(&path).unwrap();

        let index = SectionIndex::load(&path).unwrap();
        assert_eq!(index.len(), 6);
        assert!(!index.is_empty());
    }
}
