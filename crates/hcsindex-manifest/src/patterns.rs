//! Label pattern table.
//!
//! Compiles the configured `[[patterns]]` into case-insensitive regular
//! expressions and maps page text to a style/theme label. Patterns are tried in
//! table order and the first one producing a usable label wins.

use hcsindex_core::PatternConfig;
use regex::{Captures, Regex, RegexBuilder};
use thiserror::Error;

/// Labels longer than this are running text, not headings.
pub const MAX_LABEL_LEN: usize = 200;

/// Pattern compilation errors.
#[derive(Debug, Error)]
pub enum PatternError {
    /// A pattern is not a valid regular expression.
    #[error("invalid label pattern '{name}': {source}")]
    Invalid {
        name: String,
        #[source]
        source: regex::Error,
    },

    /// The table is empty.
    #[error("label pattern table is empty")]
    Empty,
}

/// A compiled label pattern.
#[derive(Debug, Clone)]
pub struct LabelPattern {
    name: String,
    regex: Regex,
    style: Option<String>,
    theme: Option<String>,
}

/// The style/theme label found by a pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelMatch {
    /// Style, possibly empty.
    pub style: String,

    /// Theme, possibly empty.
    pub theme: String,

    /// Cleaned text of the whole match.
    pub raw_label: String,

    /// Name of the pattern that matched.
    pub pattern: String,
}

impl LabelPattern {
    /// Compile one configured pattern.
    pub fn compile(config: &PatternConfig) -> Result<Self, PatternError> {
        let regex = RegexBuilder::new(&config.pattern)
            .case_insensitive(true)
            .build()
            .map_err(|source| PatternError::Invalid {
                name: config.display_name().to_string(),
                source,
            })?;

        Ok(Self {
            name: config.display_name().to_string(),
            regex,
            style: config.style.clone(),
            theme: config.theme.clone(),
        })
    }

    /// Pattern name for logs.
    pub fn name(&self) -> &str {
        &self.name
    }

    fn label_from(&self, caps: &Captures<'_>, min_len: usize) -> Option<LabelMatch> {
        let raw_label = clean_label(caps.get(0)?.as_str());
        let len = raw_label.chars().count();
        if len < min_len || len > MAX_LABEL_LEN {
            return None;
        }

        let style = field(caps, "style", self.style.as_deref());
        let theme = field(caps, "theme", self.theme.as_deref());

        // A capture group that cleaned down to nothing (e.g. only dot leaders)
        // carries no label.
        let captured_empty = ["style", "theme"]
            .iter()
            .any(|group| caps.name(group).is_some_and(|m| clean_label(m.as_str()).is_empty()));
        if captured_empty {
            return None;
        }

        Some(LabelMatch {
            style,
            theme,
            raw_label,
            pattern: self.name.clone(),
        })
    }
}

fn field(caps: &Captures<'_>, group: &str, fixed: Option<&str>) -> String {
    caps.name(group)
        .map(|m| clean_label(m.as_str()))
        .or_else(|| fixed.map(str::to_string))
        .unwrap_or_default()
}

/// Compiled pattern table in priority order.
#[derive(Debug, Clone)]
pub struct PatternTable {
    patterns: Vec<LabelPattern>,
    min_label_len: usize,
}

impl PatternTable {
    /// Compile a pattern table.
    pub fn compile(configs: &[PatternConfig], min_label_len: usize) -> Result<Self, PatternError> {
        if configs.is_empty() {
            return Err(PatternError::Empty);
        }

        let patterns = configs
            .iter()
            .map(LabelPattern::compile)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            patterns,
            min_label_len,
        })
    }

    /// Number of patterns.
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Whether the table has no patterns.
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Apply the table to `text`: the first pattern, in order, that yields a
    /// usable label wins.
    pub fn first_match(&self, text: &str) -> Option<LabelMatch> {
        self.patterns.iter().find_map(|pattern| {
            pattern
                .regex
                .captures_iter(text)
                .find_map(|caps| pattern.label_from(&caps, self.min_label_len))
        })
    }

    /// Classify a single label, such as a table-of-contents entry.
    ///
    /// Falls back to an unclassified label (empty style and theme) when no
    /// pattern matches. The raw label is always the whole input.
    pub fn classify(&self, label: &str) -> LabelMatch {
        let raw_label = clean_label(label);
        match self.first_match(label) {
            Some(found) => LabelMatch {
                raw_label,
                ..found
            },
            None => LabelMatch {
                style: String::new(),
                theme: String::new(),
                raw_label,
                pattern: String::new(),
            },
        }
    }
}

/// Normalize label text.
///
/// Everything from the first dot leader on is dropped (it only separates the
/// label from its page number), whitespace is collapsed and trailing
/// separators are trimmed.
pub fn clean_label(text: &str) -> String {
    let head = text
        .split("..")
        .next()
        .unwrap_or_default()
        .split('…')
        .next()
        .unwrap_or_default();

    head.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .trim_end_matches([':', ';', ',', '-', '.'])
        .trim()
        .to_string()
}
