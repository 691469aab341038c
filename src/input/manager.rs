//! Path-keyed text extraction with an in-memory cache

use crate::error::{Result, ResumeFitError};
use crate::input::file_detector::FileType;
use crate::input::text_extractor::{
    DocxExtractor, MarkdownExtractor, PdfExtractor, PlainTextExtractor, TextExtractor,
};
use log::info;
use std::collections::HashMap;
use std::path::Path;
use tokio::fs;

pub struct InputManager {
    cache: HashMap<String, String>,
    enable_cache: bool,
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}

impl InputManager {
    pub fn new() -> Self {
        Self {
            cache: HashMap::new(),
            enable_cache: true,
        }
    }

    pub fn with_cache(mut self, enable: bool) -> Self {
        self.enable_cache = enable;
        self
    }

    pub async fn extract_text(&mut self, path: &Path) -> Result<String> {
        let path_str = path.to_string_lossy().to_string();

        if self.enable_cache {
            if let Some(cached_text) = self.cache.get(&path_str) {
                info!("Using cached text for: {}", path.display());
                return Ok(cached_text.clone());
            }
        }

        if !path.exists() {
            return Err(ResumeFitError::InvalidInput(format!(
                "File does not exist: {}",
                path.display()
            )));
        }

        let file_type = FileType::from_path(path);
        let extractor: &dyn TextExtractor = match file_type {
            FileType::Pdf => &PdfExtractor,
            FileType::Text => &PlainTextExtractor,
            FileType::Markdown => &MarkdownExtractor,
            FileType::Docx => &DocxExtractor,
            FileType::Doc => {
                return Err(ResumeFitError::UnsupportedFormat(format!(
                    "{} is a legacy Word document; save it as .docx, PDF or plain text and try again",
                    path.display()
                )));
            }
            FileType::Unknown => {
                return Err(ResumeFitError::UnsupportedFormat(format!(
                    "Unsupported file type for: {}",
                    path.display()
                )));
            }
        };

        info!("Extracting {:?} text from: {}", file_type, path.display());
        let bytes = fs::read(path).await?;
        let text = extractor.extract(&bytes)?;

        if self.enable_cache {
            self.cache.insert(path_str, text.clone());
        }

        Ok(text)
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }
}
