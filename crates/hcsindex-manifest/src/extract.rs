//! Page text extraction.
//!
//! The builder only needs page count and per-page text, so documents are
//! accessed through [`PageSource`]. [`PdfDocument`] reads real PDFs with lopdf;
//! [`TextPages`] serves text that was extracted elsewhere, such as OCR output
//! or a cached text dump, and is what the builder is tested against.
//!
//! Page text keeps the line structure of the page: every move to a new text
//! line ends the current line, so a heading and the paragraph below it never
//! run together.

use std::{collections::BTreeMap, fs, path::Path};

use lopdf::{Document, Encoding, Object, content::Content};
use thiserror::Error;

/// Text extraction errors.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not a readable PDF.
    #[error("PDF parse error: {0}")]
    Parse(#[from] lopdf::Error),

    /// Encrypted PDFs cannot be scanned.
    #[error("encrypted PDFs are not supported")]
    Encrypted,

    /// The document has no pages.
    #[error("document has no pages")]
    NoPages,

    /// Requested page does not exist.
    #[error("page {page} out of range (page_count={page_count})")]
    PageOutOfRange { page: u32, page_count: u32 },
}

/// Result type for extraction.
pub type Result<T> = std::result::Result<T, ExtractError>;

/// A document whose pages can be read as text.
pub trait PageSource {
    /// Number of pages.
    fn page_count(&self) -> u32;

    /// Text of a 1-based page.
    fn page_text(&self, page_number: u32) -> Result<String>;
}

/// A PDF opened with lopdf.
#[derive(Debug)]
pub struct PdfDocument {
    doc: Document,
    page_count: u32,
}

impl PdfDocument {
    /// Open a PDF file.
    pub fn open(path: &Path) -> Result<Self> {
        let bytes = fs::read(path)?;
        Self::from_bytes(&bytes)
    }

    /// Parse a PDF held in memory.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.windows(b"/Encrypt".len()).any(|w| w == b"/Encrypt") {
            return Err(ExtractError::Encrypted);
        }

        let doc = Document::load_mem(bytes)?;
        let page_count = doc.get_pages().len() as u32;
        if page_count == 0 {
            return Err(ExtractError::NoPages);
        }

        Ok(Self { doc, page_count })
    }
}

impl PageSource for PdfDocument {
    fn page_count(&self) -> u32 {
        self.page_count
    }

    fn page_text(&self, page_number: u32) -> Result<String> {
        check_page(page_number, self.page_count)?;
        let page_id = *self
            .doc
            .get_pages()
            .get(&page_number)
            .ok_or(ExtractError::PageOutOfRange {
                page: page_number,
                page_count: self.page_count,
            })?;

        let encodings = self
            .doc
            .get_page_fonts(page_id)?
            .into_iter()
            .map(|(name, font)| font.get_font_encoding(&self.doc).map(|enc| (name, enc)))
            .collect::<std::result::Result<BTreeMap<Vec<u8>, Encoding<'_>>, _>>()?;
        let content = Content::decode(&self.doc.get_page_content(page_id)?)?;

        let mut text = PageText::default();
        let mut encoding = None;
        for op in &content.operations {
            let operands = op.operands.as_slice();
            match op.operator.as_str() {
                "Tf" => {
                    encoding = operands
                        .first()
                        .and_then(|font| font.as_name().ok())
                        .and_then(|name| encodings.get(name));
                }
                "Tj" | "TJ" => text.show(encoding, operands)?,
                "'" => {
                    text.new_line();
                    text.show(encoding, operands)?;
                }
                // aw ac string
                "\"" => {
                    text.new_line();
                    text.show(encoding, operands.get(2..).unwrap_or_default())?;
                }
                "T*" => text.new_line(),
                "Td" | "TD" => {
                    let dy = number(operands, 1);
                    if dy.abs() > f32::EPSILON {
                        text.y += dy;
                        text.new_line();
                    } else {
                        text.space();
                    }
                }
                "Tm" => {
                    let y = number(operands, 5);
                    if (y - text.y).abs() > f32::EPSILON {
                        text.new_line();
                    } else {
                        text.space();
                    }
                    text.y = y;
                }
                "BT" => text.y = 0.0,
                "ET" => text.new_line(),
                _ => {}
            }
        }

        Ok(text.finish())
    }
}

/// Text of one page being assembled line by line.
#[derive(Debug, Default)]
struct PageText {
    text: String,
    /// Vertical position of the current line within the text object.
    y: f32,
}

impl PageText {
    fn show(&mut self, encoding: Option<&Encoding<'_>>, operands: &[Object]) -> Result<()> {
        match encoding {
            Some(encoding) => self.collect(encoding, operands),
            None => {
                tracing::debug!("text shown without a decodable font");
                Ok(())
            }
        }
    }

    fn collect(&mut self, encoding: &Encoding<'_>, operands: &[Object]) -> Result<()> {
        for operand in operands {
            match operand {
                Object::String(bytes, _) => {
                    self.text.push_str(&Document::decode_text(encoding, bytes)?);
                }
                Object::Array(items) => self.collect(encoding, items)?,
                // Large negative kerning inside TJ is a word gap.
                Object::Integer(gap) if *gap < -100 => self.space(),
                Object::Real(gap) if *gap < -100.0 => self.space(),
                _ => {}
            }
        }
        Ok(())
    }

    fn new_line(&mut self) {
        let trimmed = self.text.trim_end_matches(' ').len();
        self.text.truncate(trimmed);
        if !self.text.is_empty() && !self.text.ends_with('\n') {
            self.text.push('\n');
        }
    }

    fn space(&mut self) {
        if !self.text.is_empty() && !self.text.ends_with([' ', '\n']) {
            self.text.push(' ');
        }
    }

    fn finish(mut self) -> String {
        self.new_line();
        self.text
    }
}

fn number(operands: &[Object], index: usize) -> f32 {
    operands
        .get(index)
        .and_then(|value| value.as_float().ok())
        .unwrap_or_default()
}

/// Pages of already-extracted text.
///
/// Lets [`ManifestBuilder::index_document`](crate::ManifestBuilder::index_document)
/// run over text from any source, one string per page.
#[derive(Debug, Clone, Default)]
pub struct TextPages {
    pages: Vec<String>,
}

impl TextPages {
    /// Create a source from page texts, first page first.
    pub fn new<I, S>(pages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            pages: pages.into_iter().map(Into::into).collect(),
        }
    }
}

impl PageSource for TextPages {
    fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    fn page_text(&self, page_number: u32) -> Result<String> {
        check_page(page_number, self.page_count())?;
        Ok(self.pages[page_number as usize - 1].clone())
    }
}

fn check_page(page: u32, page_count: u32) -> Result<()> {
    if page == 0 || page > page_count {
        return Err(ExtractError::PageOutOfRange { page, page_count });
    }
    Ok(())
}
