//! Text extraction from various file formats

use crate::error::{Result, ResumeFitError};
use docx_rs::{DocumentChild, Paragraph, ParagraphChild, RunChild, Table, TableCellContent, TableChild, TableRowChild};
use once_cell::sync::Lazy;
use pulldown_cmark::{html, Parser};
use regex::Regex;

static HTML_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("valid tag regex"));

/// Turns raw file bytes into plain text.
pub trait TextExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String>;
}

pub struct PdfExtractor;

impl TextExtractor for PdfExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String> {
        pdf_extract::extract_text_from_mem(bytes)
            .map_err(|e| ResumeFitError::PdfExtraction(format!("Failed to extract text from PDF: {}", e)))
    }
}

/// Word documents. Paragraphs become lines; table cells are read row by row.
pub struct DocxExtractor;

impl TextExtractor for DocxExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String> {
        let docx = docx_rs::read_docx(bytes)
            .map_err(|e| ResumeFitError::DocxExtraction(format!("Failed to read Word document: {}", e)))?;

        let mut lines = Vec::new();
        for child in &docx.document.children {
            match child {
                DocumentChild::Paragraph(paragraph) => lines.push(paragraph_text(paragraph)),
                DocumentChild::Table(table) => table_lines(table, &mut lines),
                _ => {}
            }
        }

        Ok(lines.join("\n").trim().to_string())
    }
}

fn paragraph_text(paragraph: &Paragraph) -> String {
    let mut text = String::new();
    push_paragraph_children(&paragraph.children, &mut text);
    text
}

fn push_paragraph_children(children: &[ParagraphChild], text: &mut String) {
    for child in children {
        match child {
            ParagraphChild::Run(run) => {
                for run_child in &run.children {
                    match run_child {
                        RunChild::Text(t) => text.push_str(&t.text),
                        RunChild::Tab(_) => text.push(' '),
                        RunChild::Break(_) => text.push('\n'),
                        _ => {}
                    }
                }
            }
            ParagraphChild::Hyperlink(link) => push_paragraph_children(&link.children, text),
            _ => {}
        }
    }
}

#[allow(irrefutable_let_patterns)]
fn table_lines(table: &Table, lines: &mut Vec<String>) {
    for row in &table.rows {
        let TableChild::TableRow(row) = row else { continue };
        for cell in &row.cells {
            let TableRowChild::TableCell(cell) = cell else { continue };
            for content in &cell.children {
                match content {
                    TableCellContent::Paragraph(paragraph) => lines.push(paragraph_text(paragraph)),
                    TableCellContent::Table(nested) => table_lines(nested, lines),
                    _ => {}
                }
            }
        }
    }
}

pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String> {
        Ok(String::from_utf8_lossy(bytes).into_owned())
    }
}

pub struct MarkdownExtractor;

impl TextExtractor for MarkdownExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String> {
        let markdown_content = String::from_utf8_lossy(bytes);

        let parser = Parser::new(&markdown_content);
        let mut html_output = String::new();
        html::push_html(&mut html_output, parser);

        Ok(Self::html_to_text(&html_output))
    }
}

impl MarkdownExtractor {
    fn html_to_text(html: &str) -> String {
        // Block ends become line breaks so list items stay separate requirements
        let text = html
            .replace("<br />", "\n")
            .replace("</p>", "\n")
            .replace("</li>", "\n")
            .replace("&nbsp;", " ")
            .replace("&quot;", "\"")
            .replace("&#39;", "'");

        let clean_text = HTML_TAG.replace_all(&text, "");
        let clean_text = clean_text
            .replace("&lt;", "<")
            .replace("&gt;", ">")
            .replace("&amp;", "&");

        clean_text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }
}
