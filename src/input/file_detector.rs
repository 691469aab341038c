//! File type detection

use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    Pdf,
    Text,
    Markdown,
    Docx,
    /// Legacy binary Word format. Recognised but not readable; users are asked to convert it
    Doc,
    Unknown,
}

impl FileType {
    /// Extensions of every readable type, for messages.
    pub const SUPPORTED_EXTENSIONS: [&'static str; 6] = ["pdf", "txt", "text", "md", "markdown", "docx"];

    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "pdf" => FileType::Pdf,
            "txt" | "text" => FileType::Text,
            "md" | "markdown" => FileType::Markdown,
            "docx" => FileType::Docx,
            "doc" => FileType::Doc,
            _ => FileType::Unknown,
        }
    }

    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(Self::from_extension)
            .unwrap_or(FileType::Unknown)
    }

    pub fn is_supported(&self) -> bool {
        matches!(
            self,
            FileType::Pdf | FileType::Text | FileType::Markdown | FileType::Docx
        )
    }
}
