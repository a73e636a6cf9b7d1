//! PDF text extraction using lopdf and pdf-extract.

use lopdf::Document;
use tracing::{debug, trace, warn};

use super::{PdfProcessor, Result};
use crate::error::PdfError;

/// PDF text extractor.
pub struct PdfExtractor {
    document: Option<Document>,
    raw_data: Vec<u8>,
}

/// Extracted content from a PDF.
#[derive(Debug, Clone, Default)]
pub struct PdfContent {
    /// Text of all pages that yielded any, joined with newlines.
    pub text: String,
    /// Pages with their content.
    pub pages: Vec<PdfPage>,
    /// Pages that produced no text (image-only or unreadable).
    pub skipped_pages: Vec<u32>,
}

impl PdfContent {
    /// True when no page yielded text.
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Content from a single PDF page.
#[derive(Debug, Clone)]
pub struct PdfPage {
    /// Page number (1-indexed).
    pub number: u32,
    /// Extracted text from this page.
    pub text: String,
}

impl PdfExtractor {
    /// Create a new PDF extractor.
    pub fn new() -> Self {
        Self {
            document: None,
            raw_data: Vec::new(),
        }
    }

    /// Load a document from bytes and extract its text in one step.
    pub fn from_bytes(data: &[u8]) -> Result<PdfContent> {
        let mut extractor = Self::new();
        extractor.load(data)?;
        extractor.extract_all()
    }

    /// Extract the text of every page.
    ///
    /// Pages that yield no text, or whose text cannot be decoded, are skipped.
    /// If text extraction fails for the whole document, the content is empty
    /// rather than an error so callers fall back to zeroed fields.
    pub fn extract_all(&self) -> Result<PdfContent> {
        if self.document.is_none() {
            return Err(PdfError::Parse("No document loaded".to_string()));
        }

        let page_texts = match self.page_texts() {
            Ok(texts) => texts,
            Err(e) => {
                warn!("Text extraction failed for the whole document: {}", e);
                Vec::new()
            }
        };

        let mut content = PdfContent::default();
        let page_count = self.page_count();

        for number in 1..=page_count {
            let text = page_texts
                .get((number - 1) as usize)
                .map(|t| t.trim().to_string())
                .unwrap_or_default();

            if text.is_empty() {
                trace!("Page {} has no extractable text, skipping", number);
                content.skipped_pages.push(number);
                continue;
            }

            content.pages.push(PdfPage { number, text });
        }

        content.text = content
            .pages
            .iter()
            .map(|p| p.text.as_str())
            .collect::<Vec<_>>()
            .join("\n");

        debug!(
            "PDF text: {} pages, {} with text, {} chars",
            page_count,
            content.pages.len(),
            content.text.len()
        );

        Ok(content)
    }

    fn page_texts(&self) -> Result<Vec<String>> {
        pdf_extract::extract_text_from_mem_by_pages(&self.raw_data)
            .map_err(|e| PdfError::TextExtraction(e.to_string()))
    }
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfProcessor for PdfExtractor {
    fn load(&mut self, data: &[u8]) -> Result<()> {
        let mut doc = Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;

        // Handle PDFs with empty password encryption
        if doc.is_encrypted() {
            if doc.decrypt("").is_err() {
                return Err(PdfError::Encrypted);
            }
            debug!("Decrypted PDF with empty password");

            // Save decrypted document to raw_data for pdf_extract
            let mut decrypted_data = Vec::new();
            doc.save_to(&mut decrypted_data)
                .map_err(|e| PdfError::Parse(format!("Failed to save decrypted PDF: {}", e)))?;
            self.raw_data = decrypted_data;
        } else {
            self.raw_data = data.to_vec();
        }

        let page_count = doc.get_pages().len();
        if page_count == 0 {
            return Err(PdfError::NoPages);
        }

        debug!("Loaded PDF with {} pages", page_count);
        self.document = Some(doc);
        Ok(())
    }

    fn page_count(&self) -> u32 {
        self.document
            .as_ref()
            .map(|doc| doc.get_pages().len() as u32)
            .unwrap_or(0)
    }

    fn extract_text(&self) -> Result<String> {
        Ok(self.extract_all()?.text)
    }

    fn extract_page_text(&self, page: u32) -> Result<String> {
        if page == 0 || page > self.page_count() {
            return Err(PdfError::InvalidPage(page));
        }

        let texts = self.page_texts()?;
        Ok(texts
            .get((page - 1) as usize)
            .map(|t| t.trim().to_string())
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Object, Stream};

    /// Builds a PDF with one page per entry; `None` pages have no text.
    fn build_pdf(pages: &[Option<&str>]) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                "F1" => font_id,
            },
        });

        let mut kids = Vec::new();
        for text in pages {
            let operations = match text {
                Some(text) => vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 12.into()]),
                    Operation::new("Td", vec![72.into(), 700.into()]),
                    Operation::new("Tj", vec![Object::string_literal(*text)]),
                    Operation::new("ET", vec![]),
                ],
                None => vec![],
            };
            let content = Content { operations };
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        let pages_dict = dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages_dict));
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut buf = Vec::new();
        doc.save_to(&mut buf).unwrap();
        buf
    }

    #[test]
    fn test_extract_text_skips_blank_pages() {
        let data = build_pdf(&[Some("Gross Salary: 9,50,000"), None]);
        let content = PdfExtractor::from_bytes(&data).unwrap();

        assert_eq!(content.pages.len(), 1);
        assert_eq!(content.skipped_pages, vec![2]);
        assert!(content.text.contains("Gross Salary"));
    }

    #[test]
    fn test_document_without_text_reads_as_zeroes() {
        let data = build_pdf(&[None, None]);
        let content = PdfExtractor::from_bytes(&data).unwrap();

        assert!(content.is_empty());
        assert!(content.pages.is_empty());
        assert_eq!(content.skipped_pages, vec![1, 2]);
        assert_eq!(
            crate::form16::extract_financials(&content.text),
            crate::models::financials::ExtractedFinancials::default()
        );
    }

    #[test]
    fn test_pdf_extractor_new() {
        let extractor = PdfExtractor::new();
        assert!(extractor.document.is_none());
        assert_eq!(extractor.page_count(), 0);
    }

    #[test]
    fn test_extract_without_document() {
        let extractor = PdfExtractor::new();
        assert!(matches!(extractor.extract_all(), Err(PdfError::Parse(_))));
    }

    #[test]
    fn test_load_rejects_non_pdf() {
        let mut extractor = PdfExtractor::new();
        let result = extractor.load(b"Gross Salary: 1,00,000 (not a PDF)");
        assert!(matches!(result, Err(PdfError::Parse(_))));
    }

    #[test]
    fn test_invalid_page_number() {
        let extractor = PdfExtractor::new();
        assert!(matches!(extractor.extract_page_text(1), Err(PdfError::InvalidPage(1))));
    }
}
