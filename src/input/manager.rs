//! Input manager routing documents to the matching extractor

use crate::error::{Result, SkillMatcherError};
use crate::input::file_detector::FileType;
use crate::input::text_extractor::{MarkdownExtractor, PlainTextExtractor, TextExtractor};
use log::{debug, info};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub struct InputManager {
    cache: HashMap<PathBuf, String>,
    enable_cache: bool,
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
        if self.enable_cache {
            if let Some(cached_text) = self.cache.get(path) {
                debug!("Using cached text for: {}", path.display());
                return Ok(cached_text.clone());
            }
        }

        if !path.exists() {
            return Err(SkillMatcherError::InvalidInput(format!(
                "File does not exist: {}",
                path.display()
            )));
        }

        let text = match self.detect_file_type(path)? {
            FileType::Text => {
                info!("Reading plain text file: {}", path.display());
                PlainTextExtractor.extract(path).await?
            }
            FileType::Markdown => {
                info!("Processing markdown file: {}", path.display());
                MarkdownExtractor.extract(path).await?
            }
            FileType::Unknown => {
                return Err(SkillMatcherError::UnsupportedFormat(format!(
                    "{} (supported: .txt, .md, .markdown)",
                    path.display()
                )));
            }
        };

        if text.trim().is_empty() {
            return Err(SkillMatcherError::InvalidInput(format!(
                "No text found in: {}",
                path.display()
            )));
        }

        if self.enable_cache {
            self.cache.insert(path.to_path_buf(), text.clone());
        }

        Ok(text)
    }

    fn detect_file_type(&self, path: &Path) -> Result<FileType> {
        FileType::from_path(path).ok_or_else(|| {
            SkillMatcherError::UnsupportedFormat(format!("File has no extension: {}", path.display()))
        })
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_reads_supported_files_and_caches() {
        let dir = TempDir::new().unwrap();
        let resume = dir.path().join("resume.txt");
        let job = dir.path().join("job.md");
        std::fs::write(&resume, "Expert in Rust").unwrap();
        std::fs::write(&job, "## Requirements\n\n- **Python**\n").unwrap();

        let mut manager = InputManager::new();
        assert_eq!(manager.extract_text(&resume).await.unwrap(), "Expert in Rust");
        assert_eq!(manager.extract_text(&job).await.unwrap(), "Requirements\n\n- Python");
        assert_eq!(manager.cache_size(), 2);

        std::fs::write(&resume, "changed").unwrap();
        assert_eq!(manager.extract_text(&resume).await.unwrap(), "Expert in Rust");

        manager.clear_cache();
        assert_eq!(manager.extract_text(&resume).await.unwrap(), "changed");
    }

    #[tokio::test]
    async fn test_cache_can_be_disabled() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "Go").unwrap();

        let mut manager = InputManager::new().with_cache(false);
        manager.extract_text(&path).await.unwrap();
        assert_eq!(manager.cache_size(), 0);
    }

    #[tokio::test]
    async fn test_rejects_unsupported_and_missing_files() {
        let dir = TempDir::new().unwrap();
        let pdf = dir.path().join("resume.pdf");
        std::fs::write(&pdf, b"%PDF-1.4").unwrap();
        let bare = dir.path().join("resume");
        std::fs::write(&bare, "Rust").unwrap();
        let blank = dir.path().join("blank.txt");
        std::fs::write(&blank, "  \n").unwrap();

        let mut manager = InputManager::new();
        assert!(matches!(
            manager.extract_text(&pdf).await,
            Err(SkillMatcherError::UnsupportedFormat(_))
        ));
        assert!(matches!(
            manager.extract_text(&bare).await,
            Err(SkillMatcherError::UnsupportedFormat(_))
        ));
        assert!(matches!(
            manager.extract_text(&dir.path().join("missing.txt")).await,
            Err(SkillMatcherError::InvalidInput(_))
        ));
        assert!(matches!(
            manager.extract_text(&blank).await,
            Err(SkillMatcherError::InvalidInput(_))
        ));
    }
}
