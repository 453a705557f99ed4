//! Check command - validate configuration and manifest

use std::{collections::BTreeSet, path::Path};

use color_eyre::eyre::{Result, bail};
use hcsindex_core::{Config, Manifest, ValidationReport};
use hcsindex_manifest::PatternTable;

/// Run the check command.
///
/// Validates the configuration, the label patterns and the manifest.
pub fn run(config_path: &Path, strict: bool) -> Result<()> {
    tracing::info!(?config_path, strict, "Checking configuration and manifest");

    let mut result = ValidationReport::default();

    // Validate configuration
    println!("Checking configuration...");
    let config = match Config::load_with_env(config_path) {
        Ok(c) => {
            println!("  ✓ Configuration valid");
            Some(c)
        }
        Err(e) => {
            result.add_error(format!("Configuration error: {e}"));
            println!("  ✗ Configuration invalid: {e}");
            None
        }
    };

    if let Some(ref cfg) = config {
        println!("\nChecking label patterns...");
        check_patterns(cfg, &mut result);

        println!("\nChecking directories...");
        check_directories(cfg, &mut result);

        println!("\nChecking manifest...");
        check_manifest(cfg, &mut result);
    }

    // Print summary
    println!();
    println!("Summary:");
    println!("  Errors:   {}", result.errors.len());
    println!("  Warnings: {}", result.warnings.len());

    if result.has_errors() {
        println!();
        println!("Errors:");
        for err in &result.errors {
            println!("  ✗ {err}");
        }
    }

    if result.has_warnings() {
        println!();
        println!("Warnings:");
        for warn in &result.warnings {
            println!("  ⚠ {warn}");
        }
    }

    // Determine exit status
    if result.has_errors() {
        bail!("Validation failed with {} error(s)", result.errors.len());
    }

    if strict && result.has_warnings() {
        bail!(
            "Validation failed with {} warning(s) (strict mode)",
            result.warnings.len()
        );
    }

    println!();
    println!("✓ All checks passed");

    Ok(())
}

/// Compile the label pattern table.
fn check_patterns(config: &Config, result: &mut ValidationReport) {
    match PatternTable::compile(&config.label_patterns(), config.build.min_label_len) {
        Ok(table) => {
            let source = if config.patterns.is_empty() {
                "built-in"
            } else {
                "configured"
            };
            println!("  ✓ {} {source} patterns compile", table.len());
        }
        Err(e) => {
            result.add_error(e.to_string());
            println!("  ✗ {e}");
        }
    }
}

/// Check that the document directory and source list exist.
fn check_directories(config: &Config, result: &mut ValidationReport) {
    let pdf_dir = &config.paths.pdf_dir;
    if pdf_dir.is_dir() {
        println!("  ✓ {}/ exists", pdf_dir.display());
    } else {
        result.add_warning(format!(
            "PDF directory missing: {}/ (run `hcsindex fetch`)",
            pdf_dir.display()
        ));
        println!("  ⚠ {}/ missing", pdf_dir.display());
    }

    let list_file = &config.fetch.list_file;
    if list_file.is_file() || !config.fetch.sources.is_empty() {
        println!("  ✓ Sources configured");
    } else {
        result.add_warning(format!("Source list missing: {}", list_file.display()));
        println!("  ⚠ {} missing", list_file.display());
    }
}

/// Load and validate the manifest.
fn check_manifest(config: &Config, result: &mut ValidationReport) {
    let manifest = match Manifest::load(&config.paths.manifest) {
        Ok(manifest) => manifest,
        Err(e) if e.is_manifest_missing() => {
            result.add_warning(e.to_string());
            println!("  ⚠ {} missing", config.paths.manifest.display());
            return;
        }
        Err(e) => {
            result.add_error(e.to_string());
            println!("  ✗ {e}");
            return;
        }
    };

    println!(
        "  ✓ {} sections in {} documents",
        manifest.len(),
        manifest.documents.len()
    );

    result.merge(manifest.validate());

    // Documents indexed earlier but since removed from the PDF directory.
    if config.paths.pdf_dir.is_dir() {
        let on_disk: BTreeSet<String> = std::fs::read_dir(&config.paths.pdf_dir)
            .into_iter()
            .flatten()
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .collect();

        for doc in &manifest.documents {
            if !on_disk.contains(&doc.document_id) {
                result.add_warning(format!(
                    "{} is in the manifest but not in {}",
                    doc.document_id,
                    config.paths.pdf_dir.display()
                ));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use hcsindex_core::{DocumentInfo, SectionRecord};
    use tempfile::TempDir;

    use super::*;

    fn config_in(dir: &Path) -> Config {
        let mut config = Config::default();
        config.paths.pdf_dir = dir.join("pdfs");
        config.paths.manifest = dir.join("manifest.json");
        config
    }

    #[test]
    fn test_missing_manifest_is_a_warning() {
        let dir = TempDir::new().unwrap();
        let mut result = ValidationReport::default();

        check_manifest(&config_in(dir.path()), &mut result);

        assert!(!result.has_errors());
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].contains("Index not built"));
    }

    #[test]
    fn test_manifest_findings_are_collected() {
        let dir = TempDir::new().unwrap();
        let config = config_in(dir.path());
        std::fs::create_dir_all(&config.paths.pdf_dir).unwrap();
        std::fs::write(config.paths.pdf_dir.join("victorian.pdf"), b"%PDF-1.5").unwrap();

        Manifest::new(
            vec![
                DocumentInfo::new("victorian.pdf", 40),
                DocumentInfo::new("removed.pdf", 10),
            ],
            vec![SectionRecord::new(
                "victorian.pdf",
                3,
                "Queen Anne",
                "Evaluation Criteria",
                "Evaluation Criteria: Queen Anne",
            )],
        )
        .write_to_file(&config.paths.manifest)
        .unwrap();

        let mut result = ValidationReport::default();
        check_manifest(&config, &mut result);

        assert!(!result.has_errors());
        assert!(result.warnings.iter().any(|w| w.contains("removed.pdf: no sections")));
        assert!(
            result
                .warnings
                .iter()
                .any(|w| w.contains("removed.pdf is in the manifest but not in"))
        );
        assert!(!result.warnings.iter().any(|w| w.starts_with("victorian.pdf is in")));
    }

    #[test]
    fn test_invalid_pattern_is_an_error() {
        let mut config = Config::default();
        config.patterns.push(hcsindex_core::PatternConfig {
            name: Some("broken".to_string()),
            pattern: "(unclosed".to_string(),
            style: None,
            theme: None,
        });
        let mut result = ValidationReport::default();

        check_patterns(&config, &mut result);

        assert!(result.has_errors());
        assert!(result.errors[0].contains("broken"));
    }
}
