//! PDF text extraction using lopdf and pdf-extract.

use lopdf::{Document, Object};
use tracing::{debug, trace};

use super::{PdfProcessor, PdfType, Result};
use crate::error::PdfError;
use crate::invoice::segmenter::PAGE_SEPARATOR;

/// Characters of text above which a document counts as text-based.
const TEXT_THRESHOLD: usize = 50;

/// PDF content extractor using lopdf.
pub struct PdfExtractor {
    document: Option<Document>,
    raw_data: Vec<u8>,
}

/// Extracted content from a PDF.
#[derive(Debug, Clone)]
pub struct PdfContent {
    /// Type of PDF content.
    pub pdf_type: PdfType,
    /// Page texts, each followed by a page-break marker.
    pub text: String,
    /// Pages with their content.
    pub pages: Vec<PdfPage>,
}

impl PdfContent {
    /// Non-whitespace characters over all pages.
    pub fn text_chars(&self) -> usize {
        self.pages.iter().map(|p| real_chars(&p.text)).sum()
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

    /// Extract the text of every page, up to `max_pages` (0 = all).
    ///
    /// Pages are read with lopdf. When that yields too little text the whole
    /// document is read again with pdf-extract as a single page.
    pub fn extract_all(&self, max_pages: usize) -> Result<PdfContent> {
        let page_count = self.page_count();
        if page_count == 0 {
            return Err(PdfError::NoPages);
        }

        let limit = match max_pages {
            0 => page_count,
            n => page_count.min(n as u32),
        };

        let mut pages: Vec<PdfPage> = (1..=limit)
            .map(|number| {
                let text = self.extract_page_text(number).unwrap_or_else(|e| {
                    trace!(page = number, error = %e, "page text unavailable");
                    String::new()
                });
                PdfPage { number, text }
            })
            .collect();

        let page_chars: usize = pages.iter().map(|p| real_chars(&p.text)).sum();
        if page_chars <= TEXT_THRESHOLD {
            match self.extract_text() {
                Ok(text) if real_chars(&text) > page_chars => {
                    debug!("using pdf-extract text for the whole document");
                    pages = vec![PdfPage { number: 1, text }];
                }
                Ok(_) => {}
                Err(e) => trace!(error = %e, "pdf-extract fallback failed"),
            }
        }

        let text: String = pages
            .iter()
            .map(|p| format!("{}{}", p.text, PAGE_SEPARATOR))
            .collect();

        let content = PdfContent {
            pdf_type: self.analyze(&pages),
            text,
            pages,
        };
        debug!(
            "PDF extraction: {} pages, {} chars -> {:?}",
            content.pages.len(),
            content.text_chars(),
            content.pdf_type
        );
        Ok(content)
    }

    /// Content type from the extracted pages and the image XObjects.
    fn analyze(&self, pages: &[PdfPage]) -> PdfType {
        let chars: usize = pages.iter().map(|p| real_chars(&p.text)).sum();
        classify(chars > TEXT_THRESHOLD, self.image_count() > 0)
    }

    /// Number of image XObjects in the document.
    fn image_count(&self) -> usize {
        let Some(doc) = self.document.as_ref() else {
            return 0;
        };

        doc.objects
            .values()
            .filter(|object| match object {
                Object::Stream(stream) => stream
                    .dict
                    .get(b"Subtype")
                    .and_then(|subtype| subtype.as_name())
                    .is_ok_and(|name| name == b"Image"),
                _ => false,
            })
            .count()
    }

    fn document(&self) -> Result<&Document> {
        self.document
            .as_ref()
            .ok_or_else(|| PdfError::Parse("no document loaded".to_string()))
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

        // Invoices are often "encrypted" with an empty user password
        if doc.is_encrypted() {
            if doc.decrypt("").is_err() {
                return Err(PdfError::Encrypted);
            }
            debug!("Decrypted PDF with empty password");

            // pdf-extract reads the decrypted copy
            let mut decrypted_data = Vec::new();
            doc.save_to(&mut decrypted_data)
                .map_err(|e| PdfError::Parse(format!("failed to save decrypted PDF: {}", e)))?;
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
        pdf_extract::extract_text_from_mem(&self.raw_data)
            .map_err(|e| PdfError::TextExtraction(e.to_string()))
    }

    fn extract_page_text(&self, page: u32) -> Result<String> {
        let doc = self.document()?;
        if page == 0 || page > self.page_count() {
            return Err(PdfError::InvalidPage(page));
        }

        doc.extract_text(&[page])
            .map_err(|e| PdfError::TextExtraction(e.to_string()))
    }
}

fn classify(has_text: bool, has_images: bool) -> PdfType {
    match (has_text, has_images) {
        (true, false) => PdfType::Text,
        (false, true) => PdfType::Image,
        (true, true) => PdfType::Hybrid,
        (false, false) => PdfType::Empty,
    }
}

fn real_chars(text: &str) -> usize {
    text.chars().filter(|c| !c.is_whitespace()).count()
}
