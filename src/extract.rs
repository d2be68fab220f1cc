//! Per-file plain-text extraction.
//!
//! Each recognized document type has a dedicated reader; everything else yields an empty
//! string. Extraction never fails the run: corrupt files, unsupported encodings, and unknown
//! extensions all degrade to empty text for that file, logged at `warn` level so the pipeline
//! keeps moving with whatever was recoverable.

use docx_rs::{DocumentChild, ParagraphChild, RunChild, read_docx};
use std::path::Path;

/// Extract plain text from a source document, dispatching on its file extension.
///
/// Returns the extracted text, or an empty string when the type is unrecognized or the file
/// cannot be parsed. The file is only ever read, never modified.
pub fn extract_text(path: &Path) -> String {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());

    let result = match extension.as_deref() {
        Some("txt") => read_plain_text(path),
        Some("pdf") => read_pdf_text(path),
        Some("docx") => read_docx_text(path),
        _ => {
            tracing::debug!(path = %path.display(), "Skipping unsupported file type");
            return String::new();
        }
    };

    match result {
        Ok(text) => text,
        Err(error) => {
            tracing::warn!(path = %path.display(), error = %error, "Failed to extract text");
            String::new()
        }
    }
}

fn read_plain_text(path: &Path) -> Result<String, anyhow::Error> {
    Ok(std::fs::read_to_string(path)?)
}

fn read_pdf_text(path: &Path) -> Result<String, anyhow::Error> {
    Ok(pdf_extract::extract_text(path)?)
}

fn read_docx_text(path: &Path) -> Result<String, anyhow::Error> {
    let bytes = std::fs::read(path)?;
    let docx = read_docx(&bytes)?;

    let mut text = String::new();
    for child in &docx.document.children {
        if let DocumentChild::Paragraph(paragraph) = child {
            let mut line = String::new();
            for content in &paragraph.children {
                if let ParagraphChild::Run(run) = content {
                    for piece in &run.children {
                        match piece {
                            RunChild::Text(t) => line.push_str(&t.text),
                            RunChild::Tab(_) => line.push(' '),
                            _ => {}
                        }
                    }
                }
            }
            text.push_str(&line);
            text.push('\n');
        }
    }
    Ok(text)
}
