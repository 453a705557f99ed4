//! Table-of-contents parsing.

use std::sync::LazyLock;

use regex::Regex;

use crate::patterns::clean_label;

/// `Label ........ 30` or `Label      30`.
static LEADER_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.+?)(?:\s*\.{2,}\s*|\s*…+\s*|\s{3,})(\d{1,4})\s*$").expect("valid regex")
});

/// `Label 30`.
static SIMPLE_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.+?)\s+(\d{1,4})\s*$").expect("valid regex"));

static PAGE_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{1,4}$").expect("valid regex"));

const GENERIC_TERMS: [&str; 5] = ["introduction", "overview", "summary", "conclusion", "appendix"];

const SPECIFIC_TERMS: [&str; 8] = [
    "style",
    "criteria",
    "context",
    "theme",
    "evaluation",
    "greek",
    "gothic",
    "victorian",
];

/// One table-of-contents line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TocEntry {
    /// Entry label.
    pub label: String,

    /// Page the entry points at.
    pub page: u32,
}

/// Whether a page looks like a table of contents.
pub fn looks_like_toc(text: &str) -> bool {
    text.to_lowercase().contains("contents") || text.matches('.').count() > 20
}

/// Parse the entries of a table-of-contents page.
///
/// Entries with page 0, labels that are too short or purely numeric, the
/// "contents" heading itself and generic front/back matter are dropped.
pub fn parse_toc_lines(text: &str) -> Vec<TocEntry> {
    let lines: Vec<&str> = text.lines().map(str::trim).collect();
    let mut entries = Vec::new();

    for (i, line) in lines.iter().enumerate() {
        if line.is_empty() || PAGE_NUMBER.is_match(line) {
            continue;
        }

        let (label, page) = if let Some(caps) = LEADER_LINE
            .captures(line)
            .or_else(|| SIMPLE_LINE.captures(line))
        {
            (caps[1].to_string(), caps[2].parse::<u32>().unwrap_or(0))
        } else if let Some(next) = lines.get(i + 1).filter(|next| PAGE_NUMBER.is_match(next)) {
            (line.to_string(), next.parse::<u32>().unwrap_or(0))
        } else {
            continue;
        };

        let label = clean_label(&label);
        if keep_entry(&label, page) {
            entries.push(TocEntry { label, page });
        }
    }

    entries
}

fn keep_entry(label: &str, page: u32) -> bool {
    let lower = label.to_lowercase();

    if page == 0
        || label.chars().count() < 3
        || lower.contains("table of contents")
        || lower == "contents"
        || lower == "page"
        || lower.starts_with("page ")
        || label.chars().all(|c| c.is_ascii_digit())
    {
        return false;
    }

    let generic = GENERIC_TERMS.iter().any(|term| lower.contains(term));
    !generic || SPECIFIC_TERMS.iter().any(|term| lower.contains(term))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dot_leader_lines() {
        let text = "Table of Contents\n\
                    Evaluation Criteria: Gothic Revival .......... 30\n\
                    Sub-Theme: Art Deco ................................ 18\n\
                    Theme: Residential Architecture    12\n";

        let entries = parse_toc_lines(text);

        assert_eq!(
            entries,
            vec![
                TocEntry {
                    label: "Evaluation Criteria: Gothic Revival".to_string(),
                    page: 30
                },
                TocEntry {
                    label: "Sub-Theme: Art Deco".to_string(),
                    page: 18
                },
                TocEntry {
                    label: "Theme: Residential Architecture".to_string(),
                    page: 12
                },
            ]
        );
    }

    #[test]
    fn test_simple_and_split_lines() {
        let text = "Gothic Revival 25\nQueen Anne\n41\n";
        let entries = parse_toc_lines(text);

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].label, "Gothic Revival");
        assert_eq!(entries[0].page, 25);
        assert_eq!(entries[1].label, "Queen Anne");
        assert_eq!(entries[1].page, 41);
    }

    #[test]
    fn test_junk_is_dropped() {
        let text = "Contents 1\nPage 4\nIntroduction ........ 3\n\
                    Introduction to Victorian Styles ...... 5\nAb 9\nChapter 0\n";
        let entries = parse_toc_lines(text);

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].label, "Introduction to Victorian Styles");
    }

    #[test]
    fn test_looks_like_toc() {
        assert!(looks_like_toc("TABLE OF CONTENTS\nStyles 4"));
        assert!(looks_like_toc("Styles .........................  4"));
        assert!(!looks_like_toc("Evaluation Criteria: Gothic Revival\nSome prose."));
    }
}
