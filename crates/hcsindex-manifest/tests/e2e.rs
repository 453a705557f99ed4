//! End-to-end tests for the manifest builder.
//!
//! These tests write small real PDFs with lopdf and run the full build over
//! them.

use std::{fs, path::Path};

use hcsindex_core::{Config, Manifest};
use hcsindex_manifest::{ManifestBuilder, PageSource, PdfDocument};
use lopdf::{
    Document, Object, Stream,
    content::{Content, Operation},
    dictionary,
};
use tempfile::TempDir;

/// How page lines are laid out in the content stream.
#[derive(Clone, Copy)]
enum Layout {
    /// One `BT`/`ET` block per line.
    BlockPerLine,
    /// One `BT`/`ET` block per page, lines moved with `Td` and `T*`.
    Typeset,
}

/// Write a PDF with one text line per `BT`/`ET` block.
fn write_pdf(path: &Path, pages: &[&str]) {
    write_pdf_with(path, pages, Layout::BlockPerLine);
}

fn line_operations(text: &str, layout: Layout) -> Vec<Operation> {
    let mut operations = Vec::new();
    match layout {
        Layout::BlockPerLine => {
            for (i, line) in text.lines().enumerate() {
                let y = 720 - 14 * i as i64;
                operations.push(Operation::new("BT", vec![]));
                operations.push(Operation::new("Tf", vec!["F1".into(), 11_i64.into()]));
                operations.push(Operation::new("Td", vec![72_i64.into(), y.into()]));
                operations.push(Operation::new("Tj", vec![Object::string_literal(line)]));
                operations.push(Operation::new("ET", vec![]));
            }
        }
        Layout::Typeset => {
            operations.push(Operation::new("BT", vec![]));
            operations.push(Operation::new("Tf", vec!["F1".into(), 11_i64.into()]));
            operations.push(Operation::new("TL", vec![14_i64.into()]));
            operations.push(Operation::new("Td", vec![72_i64.into(), 720_i64.into()]));
            for (i, line) in text.lines().enumerate() {
                match i {
                    0 => {}
                    // Alternate the two ways of starting a new line.
                    i if i % 2 == 1 => {
                        operations.push(Operation::new("Td", vec![0_i64.into(), (-14_i64).into()]));
                    }
                    _ => operations.push(Operation::new("T*", vec![])),
                }
                operations.push(Operation::new("Tj", vec![Object::string_literal(line)]));
            }
            operations.push(Operation::new("ET", vec![]));
        }
    }
    operations
}

fn write_pdf_with(path: &Path, pages: &[&str], layout: Layout) {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids = Vec::new();
    for text in pages {
        let content = Content {
            operations: line_operations(text, layout),
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
            "MediaBox" => vec![0_i64.into(), 0_i64.into(), 612_i64.into(), 792_i64.into()],
        });
        kids.push(page_id.into());
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => pages.len() as i64,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.save(path).unwrap();
}

fn sample_corpus(dir: &Path) {
    write_pdf(
        &dir.join("victorian.pdf"),
        &[
            "Table of Contents\n\
             Theme: Residential Development .......... 2\n\
             Evaluation Criteria: Queen Anne .......... 3\n\
             Theme: Lost Chapter .......... 99",
            "Theme: Residential Development\nRow houses and flats.",
            "Evaluation Criteria: Queen Anne\nTowers and bay windows.",
            "Italianate cornices line the street.",
        ],
    );
    write_pdf(
        &dir.join("moderne.pdf"),
        &["Art Deco towers downtown", "Nothing to see here"],
    );
    fs::write(dir.join("broken.pdf"), b"definitely not a pdf").unwrap();
}

fn builder(dir: &Path) -> ManifestBuilder {
    ManifestBuilder::new(&Config::default())
        .unwrap()
        .with_pdf_dir(dir)
}

#[test]
fn test_generated_pdf_text_is_readable() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("one.pdf");
    write_pdf(&path, &["Style: Queen Anne"]);

    let doc = PdfDocument::open(&path).unwrap();
    assert_eq!(doc.page_count(), 1);
    assert!(doc.page_text(1).unwrap().contains("Queen Anne"));
}

#[test]
fn test_typeset_lines_stay_separate() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("typeset.pdf");
    write_pdf_with(
        &path,
        &["Evaluation Criteria: Queen Anne\n\
           Towers and bay windows define the style across the city.\n\
           Theme: Residential Development"],
        Layout::Typeset,
    );

    let doc = PdfDocument::open(&path).unwrap();
    let text = doc.page_text(1).unwrap();
    let lines: Vec<_> = text.lines().collect();
    assert_eq!(
        lines,
        vec![
            "Evaluation Criteria: Queen Anne",
            "Towers and bay windows define the style across the city.",
            "Theme: Residential Development",
        ]
    );

    let (manifest, _) = builder(dir.path()).build().unwrap();
    let record = manifest.records_for("typeset.pdf").next().unwrap();
    assert_eq!(record.style, "Queen Anne");
    assert_eq!(record.page_number, 1);
}

#[test]
fn test_typeset_toc_page_is_parsed() {
    let dir = TempDir::new().unwrap();
    write_pdf_with(
        &dir.path().join("typeset.pdf"),
        &[
            "Table of Contents\n\
             Theme: Residential Development .......... 2\n\
             Evaluation Criteria: Queen Anne .......... 3",
            "Row houses and flats.",
            "Towers and bay windows.",
        ],
        Layout::Typeset,
    );

    let (manifest, stats) = builder(dir.path()).build().unwrap();
    assert_eq!(stats.toc_entries, 2);
    assert!(
        manifest
            .records_for("typeset.pdf")
            .any(|r| r.style == "Queen Anne" && r.page_number == 3)
    );
    assert!(
        manifest
            .records_for("typeset.pdf")
            .any(|r| r.theme == "Residential Development" && r.page_number == 2)
    );
}

#[test]
fn test_build_corpus() {
    let dir = TempDir::new().unwrap();
    sample_corpus(dir.path());

    let (manifest, stats) = builder(dir.path()).build().unwrap();

    assert_eq!(stats.documents, 2);
    assert_eq!(stats.failed.len(), 1);
    assert_eq!(stats.failed[0].0, "broken.pdf");
    assert_eq!(stats.toc_entries, 3);
    assert_eq!(stats.dropped_out_of_range, 1);
    assert_eq!(stats.records, manifest.len());

    let names: Vec<_> = manifest.documents.iter().map(|d| d.document_id.as_str()).collect();
    assert_eq!(names, vec!["moderne.pdf", "victorian.pdf"]);

    for record in &manifest.records {
        let doc = manifest.document(&record.document_id).unwrap();
        assert!(doc.contains_page(record.page_number), "{record:?}");
    }

    assert!(manifest.records.iter().any(|r| r.style == "Art Deco"));
    assert!(
        manifest
            .records_for("victorian.pdf")
            .any(|r| r.style == "Queen Anne" && r.page_number == 3)
    );
    assert!(!manifest.records.iter().any(|r| r.raw_label.contains("Lost Chapter")));
    assert!(!manifest.validate().has_errors());
}

#[test]
fn test_builds_are_deterministic() {
    let dir = TempDir::new().unwrap();
    sample_corpus(dir.path());
    let first_path = dir.path().join("out/first.json");
    let second_path = dir.path().join("out/second.json");

    let (first, _) = builder(dir.path()).build_and_write(&first_path).unwrap();
    let (second, _) = builder(dir.path()).build_and_write(&second_path).unwrap();

    assert_eq!(first.records, second.records);
    assert_eq!(
        fs::read(&first_path).unwrap(),
        fs::read(&second_path).unwrap()
    );

    let loaded = Manifest::load(&first_path).unwrap();
    assert_eq!(loaded, first);
}
