//! Text Extractor — turns an uploaded document (PDF / DOCX / image) into
//! plain text. Image OCR is the only path that talks to the AI caller; its
//! failures surface as extraction errors.

use std::io::{Cursor, Read};

use base64::Engine;
use quick_xml::events::Event;
use quick_xml::Reader;
use tracing::info;

use crate::errors::AppError;
use crate::llm::{GeminiClient, LlmError, Part};

/// Fixed OCR instruction sent alongside the image payload.
const OCR_PROMPT: &str = "Analyze this image of a resume and extract all the text content from it verbatim. Organize it clearly.";

/// Downstream analysis needs at least this much text to be meaningful.
pub const MIN_TEXT_CHARS: usize = 50;

/// Supported document kinds, classified by filename extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Docx,
    /// Carries the image MIME type for the multimodal OCR request.
    Image(&'static str),
}

impl DocumentKind {
    /// Case-insensitive extension lookup. Unknown extensions are rejected
    /// before any decode work happens.
    pub fn from_filename(filename: &str) -> Result<Self, AppError> {
        let ext = filename
            .rsplit('.')
            .next()
            .unwrap_or_default()
            .to_lowercase();
        match ext.as_str() {
            "pdf" => Ok(DocumentKind::Pdf),
            "docx" | "doc" => Ok(DocumentKind::Docx),
            "jpg" | "jpeg" => Ok(DocumentKind::Image("image/jpeg")),
            "png" => Ok(DocumentKind::Image("image/png")),
            "webp" => Ok(DocumentKind::Image("image/webp")),
            _ => Err(AppError::UnsupportedFormat(filename.to_string())),
        }
    }
}

/// Extracts plain text from a raw document. PDF and DOCX decode locally;
/// images are delegated to the model for OCR.
pub async fn extract_text(
    bytes: &[u8],
    filename: &str,
    llm: &GeminiClient,
) -> Result<String, AppError> {
    match DocumentKind::from_filename(filename)? {
        DocumentKind::Pdf => extract_pdf(bytes),
        DocumentKind::Docx => extract_docx(bytes),
        DocumentKind::Image(mime_type) => extract_image(bytes, mime_type, llm).await,
    }
}

/// Per-page text, concatenated in page order. Pages with no extractable text
/// contribute nothing rather than failing the document.
fn extract_pdf(bytes: &[u8]) -> Result<String, AppError> {
    pdf_extract::extract_text_from_mem(bytes)
        .map_err(|e| AppError::Extraction(format!("Error reading PDF: {e}")))
}

/// Reads `word/document.xml` out of the DOCX archive and joins paragraph
/// texts with newlines, in document order.
fn extract_docx(bytes: &[u8]) -> Result<String, AppError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| AppError::Extraction(format!("Error reading DOCX: {e}")))?;

    let mut document_xml = String::new();
    archive
        .by_name("word/document.xml")
        .map_err(|e| AppError::Extraction(format!("Error reading DOCX: {e}")))?
        .read_to_string(&mut document_xml)
        .map_err(|e| AppError::Extraction(format!("Error reading DOCX: {e}")))?;

    parse_docx_paragraphs(&document_xml)
        .map_err(|e| AppError::Extraction(format!("Error reading DOCX: {e}")))
}

/// Streams the WordprocessingML body: `w:t` runs are concatenated, `w:p`
/// boundaries become newlines.
fn parse_docx_paragraphs(document_xml: &str) -> Result<String, quick_xml::Error> {
    let mut reader = Reader::from_str(document_xml);
    reader.trim_text(false);

    let mut paragraphs: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut in_text_run = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"t" => in_text_run = true,
                b"p" => current.clear(),
                _ => {}
            },
            Event::Text(t) => {
                if in_text_run {
                    current.push_str(&t.unescape()?);
                }
            }
            Event::End(e) => match e.local_name().as_ref() {
                b"t" => in_text_run = false,
                b"p" => paragraphs.push(std::mem::take(&mut current)),
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(paragraphs.join("\n"))
}

/// Sends the image through the resilient dispatcher with the verbatim-OCR
/// instruction and returns the model's text as-is.
async fn extract_image(
    bytes: &[u8],
    mime_type: &str,
    llm: &GeminiClient,
) -> Result<String, AppError> {
    info!("Image detected; delegating OCR to the model");
    let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
    let parts = [
        Part::text(OCR_PROMPT),
        Part::inline_image(mime_type, encoded),
    ];
    llm.generate(&parts).await.map_err(|e| match e {
        // Missing credentials is a process misconfiguration, not a bad file.
        LlmError::NoCredentials => AppError::Llm(e),
        other => AppError::Extraction(format!("Error reading Image: {other}")),
    })
}
