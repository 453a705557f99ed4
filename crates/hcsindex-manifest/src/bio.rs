//! Architect biography documents.
//!
//! Biography compilations are not organized by style headings. Their entries
//! are architect names (`Last, First`), firm names (`Anshen + Allen`) and
//! `See also:` cross references, one per line.

use std::sync::LazyLock;

use regex::Regex;

/// Theme assigned to every biography record.
pub const BIO_THEME: &str = "Architect Biography";

static PERSON_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z][a-z]+, [A-Z]").expect("valid regex"));

static FIRM_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Z][a-z]+\s+\+\s+[A-Z][a-z]+").expect("valid regex"));

const SEE_ALSO: &str = "See also:";

/// Entry labels found on one page of a biography document, in line order.
pub fn parse_bio_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| is_bio_entry(line))
        .collect()
}

fn is_bio_entry(line: &str) -> bool {
    if line.chars().count() < 3 {
        return false;
    }

    if PERSON_LINE.is_match(line) {
        return line.split(',').next().is_some_and(|last| last.trim().chars().count() > 2);
    }

    if let Some(names) = line.strip_prefix(SEE_ALSO) {
        return names.trim().chars().count() > 3;
    }

    FIRM_LINE.is_match(line) && line.chars().count() > 5
}

/// Whether a document file name marks a biography compilation.
pub fn is_bio_document(document_id: &str, marker: &str) -> bool {
    !marker.is_empty() && document_id.to_lowercase().contains(&marker.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bio_entries() {
        let text = "Architects and Builders\n\
                    Maybeck, Bernard Ralph\n\
                    Born 1862 in New York City.\n\
                    See also: Morgan, Julia\n\
                    Anshen + Allen\n\
                    Li, Wei\n\
                    See also:\n";

        assert_eq!(
            parse_bio_lines(text),
            vec![
                "Maybeck, Bernard Ralph".to_string(),
                "See also: Morgan, Julia".to_string(),
                "Anshen + Allen".to_string(),
            ]
        );
    }

    #[test]
    fn test_whitespace_is_collapsed() {
        assert_eq!(parse_bio_lines("   Polk,   Willis  "), vec!["Polk, Willis".to_string()]);
    }

    #[test]
    fn test_bio_document_marker() {
        assert!(is_bio_document("Bios_Architects_A-L.pdf", "bios_"));
        assert!(!is_bio_document("victorian.pdf", "bios_"));
        assert!(!is_bio_document("bios_a.pdf", ""));
    }
}
