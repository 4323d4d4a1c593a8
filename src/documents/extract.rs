//! Text extraction from uploaded files: plain text, PDF text layer, DOCX
//! paragraphs.

use std::path::Path;

use docx_rs::{DocumentChild, ParagraphChild, RunChild};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    PlainText,
    Pdf,
    Docx,
}

#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("unsupported file type: {0}")]
    Unsupported(String),
    #[error("could not read PDF: {0}")]
    Pdf(String),
    #[error("could not read Word document: {0}")]
    Docx(String),
    #[error("file contains no readable text")]
    NoText,
}

const DOCX_MIME: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
const MSWORD_MIME: &str = "application/msword";

impl DocumentKind {
    /// Picks the reader from the declared content type, falling back to the
    /// file extension when the type is missing or generic.
    pub fn detect(content_type: Option<&str>, file_name: &str) -> Result<Self, ExtractError> {
        let mime = content_type
            .map(|c| c.split(';').next().unwrap_or("").trim().to_ascii_lowercase())
            .unwrap_or_default();
        match mime.as_str() {
            "text/plain" => return Ok(DocumentKind::PlainText),
            "application/pdf" => return Ok(DocumentKind::Pdf),
            // legacy .doc payloads are handed to the docx reader and fail there
            DOCX_MIME | MSWORD_MIME => return Ok(DocumentKind::Docx),
            _ => {}
        }

        let ext = Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match ext.as_str() {
            "txt" => Ok(DocumentKind::PlainText),
            "pdf" => Ok(DocumentKind::Pdf),
            "docx" => Ok(DocumentKind::Docx),
            _ if !mime.is_empty() => Err(ExtractError::Unsupported(mime)),
            _ => Err(ExtractError::Unsupported(file_name.to_string())),
        }
    }
}

pub fn extract_text(kind: DocumentKind, bytes: &[u8]) -> Result<String, ExtractError> {
    let text = match kind {
        DocumentKind::PlainText => String::from_utf8_lossy(bytes).into_owned(),
        DocumentKind::Pdf => extract_pdf(bytes)?,
        DocumentKind::Docx => extract_docx(bytes)?,
    };
    debug!(?kind, chars = text.len(), "text extracted");
    if text.trim().is_empty() {
        return Err(ExtractError::NoText);
    }
    Ok(text)
}

fn extract_pdf(bytes: &[u8]) -> Result<String, ExtractError> {
    let doc = lopdf::Document::load_mem(bytes).map_err(|e| ExtractError::Pdf(e.to_string()))?;
    let pages: Vec<u32> = doc.get_pages().keys().copied().collect();
    doc.extract_text(&pages)
        .map_err(|e| ExtractError::Pdf(e.to_string()))
}

fn extract_docx(bytes: &[u8]) -> Result<String, ExtractError> {
    let docx = docx_rs::read_docx(bytes).map_err(|e| ExtractError::Docx(e.to_string()))?;
    let paragraphs: Vec<String> = docx
        .document
        .children
        .iter()
        .filter_map(|child| match child {
            DocumentChild::Paragraph(p) => Some(p),
            _ => None,
        })
        .map(|p| {
            p.children
                .iter()
                .filter_map(|c| match c {
                    ParagraphChild::Run(run) => Some(run),
                    _ => None,
                })
                .flat_map(|run| run.children.iter())
                .filter_map(|rc| match rc {
                    RunChild::Text(t) => Some(t.text.as_str()),
                    _ => None,
                })
                .collect::<String>()
        })
        .collect();
    Ok(paragraphs.join("\n"))
}
