//! Tool configuration management.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{
    error::{CoreError, Result},
    link::LinkBuilder,
};

/// Main configuration structure for hcsindex.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Local file locations.
    #[serde(default)]
    pub paths: PathsConfig,

    /// External PDF viewer settings.
    #[serde(default)]
    pub viewer: ViewerConfig,

    /// PDF download settings.
    #[serde(default)]
    pub fetch: FetchConfig,

    /// Manifest build settings.
    #[serde(default)]
    pub build: BuildConfig,

    /// Search settings.
    #[serde(default)]
    pub search: SearchConfig,

    /// Label patterns, applied in order. Empty means the built-in table.
    #[serde(default)]
    pub patterns: Vec<PatternConfig>,

    /// Evaluative frameworks used to resolve a style and year to a section.
    #[serde(default)]
    pub frameworks: Vec<FrameworkConfig>,
}

/// Local file locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Directory holding the downloaded PDFs.
    #[serde(default = "default_pdf_dir")]
    pub pdf_dir: PathBuf,

    /// Manifest file written by `build` and read by `search`.
    #[serde(default = "default_manifest_path")]
    pub manifest: PathBuf,
}

/// External viewer configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewerConfig {
    /// Viewer page, e.g. the hosted pdf.js viewer.
    #[serde(default = "default_viewer_base")]
    pub base_url: String,

    /// Prefix under which the viewer can fetch each document.
    #[serde(default = "default_document_base")]
    pub document_base_url: String,
}

/// PDF download configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Source URLs listed directly in the config file.
    #[serde(default)]
    pub sources: Vec<String>,

    /// Plain-text file with one source URL per line.
    #[serde(default = "default_list_file")]
    pub list_file: PathBuf,
}

/// Manifest build configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Whether to parse table-of-contents pages.
    #[serde(default = "default_true")]
    pub scan_toc: bool,

    /// How many leading pages may hold a table of contents.
    #[serde(default = "default_toc_max_pages")]
    pub toc_max_pages: u32,

    /// Upper bound on pages scanned for headings (0 = all pages).
    #[serde(default)]
    pub max_scan_pages: u32,

    /// Labels shorter than this are ignored.
    #[serde(default = "default_min_label_len")]
    pub min_label_len: usize,

    /// File-name marker for architect biography documents.
    #[serde(default = "default_bio_marker")]
    pub bio_marker: String,
}

/// Search configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Default maximum number of results shown.
    #[serde(default = "default_limit")]
    pub limit: usize,
}

/// One entry of the label pattern table.
///
/// `pattern` is matched case-insensitively. Named groups `style` and `theme`
/// take precedence over the fixed `style` and `theme` values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternConfig {
    /// Optional display name used in logs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Regular expression.
    pub pattern: String,

    /// Fixed style assigned on match.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,

    /// Fixed theme assigned on match.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
}

/// A row of the evaluative framework table: the section of a document that
/// covers a style within a range of construction years.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameworkConfig {
    /// Style name, matched case-insensitively as a substring.
    pub style: String,

    /// Period name shown with the result.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period: Option<String>,

    /// First year covered (inclusive).
    pub year_start: i32,

    /// Last year covered (inclusive).
    pub year_end: i32,

    /// Document file name.
    pub document: String,

    /// Text contained in the label of the section to open.
    pub section_label: String,
}

impl FrameworkConfig {
    /// Whether this framework covers `style` in `year`.
    pub fn covers(&self, style: &str, year: i32) -> bool {
        let style = style.trim().to_lowercase();
        !style.is_empty()
            && self.style.to_lowercase().contains(&style)
            && (self.year_start..=self.year_end).contains(&year)
    }
}

impl PatternConfig {
    fn new(pattern: &str, style: Option<&str>, theme: Option<&str>) -> Self {
        Self {
            name: None,
            pattern: pattern.to_string(),
            style: style.map(str::to_string),
            theme: theme.map(str::to_string),
        }
    }

    /// Name for log output, falling back to the pattern text.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.pattern)
    }
}

// Default value functions
fn default_pdf_dir() -> PathBuf {
    PathBuf::from("data/pdfs")
}

fn default_manifest_path() -> PathBuf {
    PathBuf::from("data/metadata/manifest.json")
}

fn default_viewer_base() -> String {
    "https://mozilla.github.io/pdf.js/web/viewer.html".to_string()
}

fn default_document_base() -> String {
    "https://raw.githubusercontent.com/zeldasfsurvey/sfsurvey-hcs-pdfs/main/".to_string()
}

fn default_list_file() -> PathBuf {
    PathBuf::from("data/config/pdf_list.txt")
}

fn default_true() -> bool {
    true
}

fn default_toc_max_pages() -> u32 {
    10
}

fn default_min_label_len() -> usize {
    4
}

fn default_bio_marker() -> String {
    "bios_".to_string()
}

fn default_limit() -> usize {
    10
}

/// Built-in label pattern table.
///
/// Sub-style and sub-theme come before style and theme so the more specific
/// heading wins; compound style names come before their shorter suffixes.
pub fn default_patterns() -> Vec<PatternConfig> {
    let mut patterns = vec![
        PatternConfig::new(
            r"Evaluation Criteria:\s*(?P<style>.+)",
            None,
            Some("Evaluation Criteria"),
        ),
        PatternConfig::new(
            r"Evaluative Criteria:\s*(?P<style>.+)",
            None,
            Some("Evaluation Criteria"),
        ),
        PatternConfig::new(
            r"Evaluative Frameworks?:\s*(?P<style>.+)",
            None,
            Some("Evaluative Framework"),
        ),
        PatternConfig::new(r"Sub[- ]?style:\s*(?P<style>.+)", None, Some("Sub-style")),
        PatternConfig::new(r"\bStyle:\s*(?P<style>.+)", None, None),
        PatternConfig::new(r"Sub[- ]?theme:\s*(?P<theme>.+)", None, None),
        PatternConfig::new(r"\bTheme:\s*(?P<theme>.+)", None, None),
        PatternConfig::new(r"Historic(?:al)? Context:\s*(?P<theme>.+)", None, None),
        PatternConfig::new(r"Context Statement:\s*(?P<theme>.+)", None, None),
        PatternConfig::new(
            r"(?:Property|Building|Resource) Type:\s*(?P<theme>.+)",
            None,
            None,
        ),
        PatternConfig::new(
            r"(?:Period of Significance|Time Period|\bEra):\s*.+",
            None,
            Some("Period of Significance"),
        ),
    ];

    let styles = [
        (r"Gothic Revival", "Gothic Revival"),
        (r"Art Deco", "Art Deco"),
        (r"Streamline Moderne", "Streamline Moderne"),
        (r"International Style", "International Style"),
        (r"Queen Anne", "Queen Anne"),
        (r"Italianate", "Italianate"),
        (r"Second Empire", "Second Empire"),
        (r"Stick[/\\]?Eastlake", "Stick/Eastlake"),
        (r"Folk Victorian", "Folk Victorian"),
        (r"Greek Revival", "Greek Revival"),
        (r"Neoclassical", "Neoclassical"),
        (r"Spanish Colonial Revival", "Spanish Colonial Revival"),
        (r"Colonial Revival", "Colonial Revival"),
        (r"Tudor Revival", "Tudor Revival"),
        (r"Mission Revival", "Mission Revival"),
        (r"Craftsman", "Craftsman"),
        (r"Bungalow", "Bungalow"),
        (r"Prairie School", "Prairie School"),
        (r"Art Moderne", "Art Moderne"),
        (r"Moderne", "Moderne"),
        (r"Bauhaus", "Bauhaus"),
        (r"Mid[- ]?Century Modern", "Mid-Century Modern"),
        (r"Brutalist", "Brutalist"),
        (r"New Formalism", "New Formalism"),
        (r"Postmodern", "Postmodern"),
    ];

    patterns.extend(
        styles
            .iter()
            .map(|(regex, style)| PatternConfig::new(&format!(r"\b{regex}\b"), Some(style), None)),
    );

    patterns
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            pdf_dir: default_pdf_dir(),
            manifest: default_manifest_path(),
        }
    }
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            base_url: default_viewer_base(),
            document_base_url: default_document_base(),
        }
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            sources: Vec::new(),
            list_file: default_list_file(),
        }
    }
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            scan_toc: true,
            toc_max_pages: default_toc_max_pages(),
            max_scan_pages: 0,
            min_label_len: default_min_label_len(),
            bio_marker: default_bio_marker(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            limit: default_limit(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CoreError::config(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content).map_err(|e| {
            CoreError::config_with_source(
                format!("Failed to parse config file: {}", path.display()),
                e,
            )
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration, using the defaults when the file does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            return Self::load(path);
        }

        tracing::info!(path = %path.display(), "No configuration file, using defaults");
        Ok(Self::default())
    }

    /// Load configuration using the config crate, with `HCSINDEX__*` overrides.
    pub fn load_with_env(path: &Path) -> Result<Self> {
        Self::load_layered(path, None)
    }

    /// Layered load; `env` replaces the process environment when given.
    fn load_layered(path: &Path, env: Option<config::Map<String, String>>) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path).required(false))
            .add_source(
                config::Environment::with_prefix("HCSINDEX")
                    .separator("__")
                    .try_parsing(true)
                    .source(env),
            )
            .build()?;

        let config: Config = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.viewer.base_url.trim().is_empty() {
            return Err(CoreError::config("viewer.base_url cannot be empty"));
        }

        if self.search.limit == 0 {
            return Err(CoreError::config("search.limit must be greater than zero"));
        }

        if let Some(index) = self.patterns.iter().position(|p| p.pattern.trim().is_empty()) {
            return Err(CoreError::config(format!(
                "patterns[{index}].pattern cannot be empty"
            )));
        }

        for (index, framework) in self.frameworks.iter().enumerate() {
            if framework.style.trim().is_empty()
                || framework.document.trim().is_empty()
                || framework.section_label.trim().is_empty()
            {
                return Err(CoreError::config(format!(
                    "frameworks[{index}] needs style, document and section_label"
                )));
            }
            if framework.year_start > framework.year_end {
                return Err(CoreError::config(format!(
                    "frameworks[{index}].year_start is after year_end"
                )));
            }
        }

        if !self.viewer.document_base_url.is_empty()
            && !self.viewer.document_base_url.ends_with('/')
        {
            tracing::warn!("viewer.document_base_url should end with a slash");
        }

        Ok(())
    }

    /// The configured pattern table, or the built-in one.
    pub fn label_patterns(&self) -> Vec<PatternConfig> {
        if self.patterns.is_empty() {
            default_patterns()
        } else {
            self.patterns.clone()
        }
    }

    /// Link builder for the configured viewer.
    pub fn link_builder(&self) -> LinkBuilder {
        LinkBuilder::new(&self.viewer.base_url, &self.viewer.document_base_url)
    }
}
