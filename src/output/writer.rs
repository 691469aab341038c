//! Document writers for exported artifacts

use crate::error::{Result, ResumeFitError};
use docx_rs::{Docx, Paragraph, Run};
use printpdf::{BuiltinFont, Mm, PdfDocument};
use serde::{Deserialize, Serialize};
use std::io::Cursor;
use unicode_segmentation::UnicodeSegmentation;

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_MM: f32 = 10.0;
const LINE_HEIGHT_MM: f32 = 8.0;
/// Cursor position (from the top) past which a new page starts
const PAGE_BREAK_MM: f32 = 280.0;
const FONT_SIZE: f32 = 11.0;
const WRAP_COLUMNS: usize = 90;

/// Turns artifact text into file bytes.
pub trait DocumentWriter {
    fn write(&self, text: &str) -> Result<Vec<u8>>;
    fn extension(&self) -> &'static str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExportFormat {
    Txt,
    Pdf,
    Docx,
}

impl ExportFormat {
    pub fn parse(format: &str) -> std::result::Result<Self, String> {
        match format.to_lowercase().as_str() {
            "txt" | "text" => Ok(ExportFormat::Txt),
            "pdf" => Ok(ExportFormat::Pdf),
            "docx" | "word" => Ok(ExportFormat::Docx),
            _ => Err(format!("Invalid export format: {}. Supported: txt, pdf, docx", format)),
        }
    }

    pub fn writer(&self, title: &str) -> Box<dyn DocumentWriter> {
        match self {
            ExportFormat::Txt => Box::new(PlainTextWriter),
            ExportFormat::Pdf => Box::new(PdfWriter::new(title)),
            ExportFormat::Docx => Box::new(DocxWriter),
        }
    }
}

pub struct PlainTextWriter;

impl DocumentWriter for PlainTextWriter {
    fn write(&self, text: &str) -> Result<Vec<u8>> {
        let mut bytes = text.as_bytes().to_vec();
        if !text.ends_with('\n') {
            bytes.push(b'\n');
        }
        Ok(bytes)
    }

    fn extension(&self) -> &'static str {
        "txt"
    }
}

/// A4 PDF in Helvetica with simple word wrapping.
pub struct PdfWriter {
    title: String,
}

impl PdfWriter {
    pub fn new(title: impl Into<String>) -> Self {
        Self { title: title.into() }
    }
}

impl DocumentWriter for PdfWriter {
    fn write(&self, text: &str) -> Result<Vec<u8>> {
        let (doc, first_page, first_layer) =
            PdfDocument::new(&self.title, Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
        let font = doc.add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| ResumeFitError::DocumentWrite(e.to_string()))?;

        let mut layer = doc.get_page(first_page).get_layer(first_layer);
        let mut cursor = MARGIN_MM;

        for line in wrap_text(&sanitize(text), WRAP_COLUMNS) {
            if cursor > PAGE_BREAK_MM {
                let (page, page_layer) = doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
                layer = doc.get_page(page).get_layer(page_layer);
                cursor = MARGIN_MM;
            }
            if !line.is_empty() {
                layer.use_text(line, FONT_SIZE, Mm(MARGIN_MM), Mm(PAGE_HEIGHT_MM - cursor), &font);
            }
            cursor += LINE_HEIGHT_MM;
        }

        doc.save_to_bytes()
            .map_err(|e| ResumeFitError::DocumentWrite(e.to_string()))
    }

    fn extension(&self) -> &'static str {
        "pdf"
    }
}

/// Word document with one paragraph per line. No wrapping; Word reflows.
pub struct DocxWriter;

impl DocumentWriter for DocxWriter {
    fn write(&self, text: &str) -> Result<Vec<u8>> {
        let docx = text
            .lines()
            .fold(Docx::new(), |docx, line| {
                let paragraph = if line.is_empty() {
                    Paragraph::new()
                } else {
                    Paragraph::new().add_run(Run::new().add_text(line))
                };
                docx.add_paragraph(paragraph)
            });

        let mut buffer = Cursor::new(Vec::new());
        docx.build()
            .pack(&mut buffer)
            .map_err(|e| ResumeFitError::DocumentWrite(e.to_string()))?;
        Ok(buffer.into_inner())
    }

    fn extension(&self) -> &'static str {
        "docx"
    }
}

/// Keep to what the builtin PDF fonts can draw.
fn sanitize(text: &str) -> String {
    text.chars()
        .filter_map(|c| match c {
            '\u{2022}' | '\u{25AA}' | '\u{25CF}' | '\u{2013}' | '\u{2014}' => Some('-'),
            '\u{2018}' | '\u{2019}' => Some('\''),
            '\u{201C}' | '\u{201D}' => Some('"'),
            '\t' => Some(' '),
            '\r' => None,
            c if c == '\n' || (c as u32) < 0x100 && !c.is_control() => Some(c),
            _ => Some('?'),
        })
        .collect()
}

/// Wrap each line at `width` characters, breaking on word boundaries.
/// Words longer than `width` are split.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();

    for source_line in text.split('\n') {
        let mut current = String::new();
        let mut current_len = 0;

        for segment in source_line.split_word_bounds() {
            let segment_len = segment.graphemes(true).count();

            if current_len + segment_len > width && current_len > 0 {
                lines.push(current.trim_end().to_string());
                current.clear();
                current_len = 0;
                if segment.trim().is_empty() {
                    continue;
                }
            }

            if segment_len > width {
                for grapheme in segment.graphemes(true) {
                    if current_len == width {
                        lines.push(std::mem::take(&mut current));
                        current_len = 0;
                    }
                    current.push_str(grapheme);
                    current_len += 1;
                }
            } else {
                current.push_str(segment);
                current_len += segment_len;
            }
        }

        lines.push(current.trim_end().to_string());
    }

    lines
}
