//! Local store of Model2Vec models used for semantic skill matching

use crate::error::{Result, SkillMatcherError};
use crate::processing::embeddings::Model2VecProvider;
use hf_hub::api::tokio::Api;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use tokio::fs;

pub const DEFAULT_MODEL_ID: &str = "potion-base-8M";

/// Preference order for auto-selection
const PREFERRED_MODELS: &[&str] = &["potion-base-8M", "m2v-base", "m2v-large"];

/// Files fetched from the hub; only the tokenizer and safetensors weights are mandatory
const MODEL_FILES: &[(&str, bool)] = &[
    ("model.safetensors", true),
    ("tokenizer.json", true),
    ("config.json", false),
    ("README.md", false),
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingModelInfo {
    pub id: String,
    pub name: String,
    pub repo_id: String,
    pub size_mb: u64,
    pub dimensions: u32,
    pub description: String,
}

impl EmbeddingModelInfo {
    fn new(id: &str, name: &str, repo_id: &str, size_mb: u64, dimensions: u32, description: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            repo_id: repo_id.to_string(),
            size_mb,
            dimensions,
            description: description.to_string(),
        }
    }
}

fn known_models() -> BTreeMap<String, EmbeddingModelInfo> {
    [
        EmbeddingModelInfo::new(
            "potion-base-8M",
            "Potion Base 8M",
            "minishlab/potion-base-8M",
            33,
            256,
            "Compact static embeddings; good default for skill phrases",
        ),
        EmbeddingModelInfo::new(
            "m2v-base",
            "Model2Vec Base",
            "minishlab/M2V_base_output",
            90,
            256,
            "Original Model2Vec base distillation",
        ),
        EmbeddingModelInfo::new(
            "m2v-large",
            "Model2Vec Large",
            "minishlab/M2V_large_output",
            250,
            512,
            "Larger vocabulary, slower to load",
        ),
    ]
    .into_iter()
    .map(|info| (info.id.clone(), info))
    .collect()
}

pub struct EmbeddingModelManager {
    models_dir: PathBuf,
    available_models: BTreeMap<String, EmbeddingModelInfo>,
    downloaded_models: BTreeSet<String>,
}

impl EmbeddingModelManager {
    pub async fn new(models_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&models_dir).await.map_err(|e| {
            SkillMatcherError::ModelError(format!("Failed to create models directory: {}", e))
        })?;

        let mut manager = Self {
            models_dir,
            available_models: known_models(),
            downloaded_models: BTreeSet::new(),
        };
        manager.scan_downloaded_models().await?;
        Ok(manager)
    }

    async fn scan_downloaded_models(&mut self) -> Result<()> {
        let mut entries = fs::read_dir(&self.models_dir).await.map_err(|e| {
            SkillMatcherError::ModelError(format!("Failed to scan models directory: {}", e))
        })?;

        while let Some(entry) = entries.next_entry().await? {
            if entry.file_type().await?.is_dir() && is_model_directory(&entry.path()).await {
                let model_id = entry.file_name().to_string_lossy().to_string();
                debug!("Found downloaded model: {}", model_id);
                self.downloaded_models.insert(model_id);
            }
        }
        Ok(())
    }

    /// Fetch a known model from the Hugging Face Hub into the models directory
    pub async fn download_model(&mut self, model_id: &str) -> Result<PathBuf> {
        let info = self
            .available_models
            .get(model_id)
            .cloned()
            .ok_or_else(|| SkillMatcherError::ModelError(format!("Unknown embedding model: {}", model_id)))?;

        let model_dir = self.models_dir.join(model_id);
        if self.downloaded_models.contains(model_id) {
            return Ok(model_dir);
        }

        info!("Downloading embedding model {} ({} MB) from {}", info.name, info.size_mb, info.repo_id);
        fs::create_dir_all(&model_dir).await?;

        let api = Api::new().map_err(|e| SkillMatcherError::ModelError(format!("Failed to initialize HF API: {}", e)))?;
        let repo = api.repo(hf_hub::Repo::model(info.repo_id.clone()));

        for (file, required) in MODEL_FILES {
            match repo.get(file).await {
                Ok(cached) => {
                    fs::copy(&cached, model_dir.join(file)).await.map_err(|e| {
                        SkillMatcherError::ModelError(format!("Failed to copy {}: {}", file, e))
                    })?;
                    debug!("Downloaded {}", file);
                }
                Err(e) if !required => warn!("Optional file {} not available: {}", file, e),
                Err(e) => {
                    return Err(SkillMatcherError::ModelError(format!(
                        "Failed to download required file {}: {}",
                        file, e
                    )))
                }
            }
        }

        self.downloaded_models.insert(model_id.to_string());
        info!("Embedding model {} ready at {}", model_id, model_dir.display());
        Ok(model_dir)
    }

    pub fn get_model_path(&self, model_id: &str) -> Option<PathBuf> {
        self.downloaded_models
            .contains(model_id)
            .then(|| self.models_dir.join(model_id))
    }

    pub async fn ensure_model_available(&mut self, model_id: &str) -> Result<PathBuf> {
        match self.get_model_path(model_id) {
            Some(path) => Ok(path),
            None => self.download_model(model_id).await,
        }
    }

    /// Resolve, download if needed, and load a model as an embedding provider
    pub async fn load_provider(&mut self, model: &str) -> Result<Model2VecProvider> {
        let model_id = self
            .resolve_model_id(model)
            .ok_or_else(|| SkillMatcherError::ModelError(format!("Unknown embedding model: {}", model)))?;
        let path = self.ensure_model_available(&model_id).await?;

        // Model loading reads and parses the weights synchronously
        tokio::task::spawn_blocking(move || Model2VecProvider::load(&path, model_id))
            .await
            .map_err(|e| SkillMatcherError::ModelError(format!("Model loading task failed: {}", e)))?
    }

    pub fn list_available_models(&self) -> Vec<&EmbeddingModelInfo> {
        self.available_models.values().collect()
    }

    pub fn is_model_downloaded(&self, model_id: &str) -> bool {
        self.downloaded_models.contains(model_id)
    }

    /// First downloaded model in preference order, else the default
    pub fn auto_select_model(&self) -> String {
        PREFERRED_MODELS
            .iter()
            .find(|id| self.downloaded_models.contains(**id))
            .unwrap_or(&DEFAULT_MODEL_ID)
            .to_string()
    }

    /// Accepts a model id, a hub repo id, or a display name (case-insensitive)
    pub fn resolve_model_id(&self, input: &str) -> Option<String> {
        if self.available_models.contains_key(input) {
            return Some(input.to_string());
        }

        let input_lower = input.to_lowercase();
        self.available_models
            .values()
            .find(|info| info.repo_id == input || info.name.to_lowercase() == input_lower || info.id.to_lowercase() == input_lower)
            .map(|info| info.id.clone())
    }
}

/// A model directory holds the tokenizer and safetensors weights
async fn is_model_directory(path: &Path) -> bool {
    for (file, required) in MODEL_FILES {
        if *required && fs::metadata(path.join(file)).await.is_err() {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_manager_creates_directory_and_lists_models() {
        let temp_dir = TempDir::new().unwrap();
        let models_dir = temp_dir.path().join("models");
        let manager = EmbeddingModelManager::new(models_dir.clone()).await.unwrap();

        assert!(models_dir.is_dir());
        let ids: Vec<&str> = manager.list_available_models().iter().map(|m| m.id.as_str()).collect();
        assert!(ids.contains(&"potion-base-8M"));
        assert!(!manager.is_model_downloaded("potion-base-8M"));
    }

    #[tokio::test]
    async fn test_scan_detects_complete_model_dirs_only() {
        let temp_dir = TempDir::new().unwrap();
        let complete = temp_dir.path().join("m2v-base");
        let partial = temp_dir.path().join("m2v-large");
        std::fs::create_dir_all(&complete).unwrap();
        std::fs::create_dir_all(&partial).unwrap();
        std::fs::write(complete.join("model.safetensors"), b"").unwrap();
        std::fs::write(complete.join("tokenizer.json"), b"{}").unwrap();
        std::fs::write(partial.join("tokenizer.json"), b"{}").unwrap();

        let manager = EmbeddingModelManager::new(temp_dir.path().to_path_buf()).await.unwrap();
        assert!(manager.is_model_downloaded("m2v-base"));
        assert!(!manager.is_model_downloaded("m2v-large"));
        assert_eq!(manager.get_model_path("m2v-base"), Some(complete));
        assert_eq!(manager.auto_select_model(), "m2v-base");
    }

    #[tokio::test]
    async fn test_auto_select_defaults_when_nothing_downloaded() {
        let temp_dir = TempDir::new().unwrap();
        let manager = EmbeddingModelManager::new(temp_dir.path().to_path_buf()).await.unwrap();
        assert_eq!(manager.auto_select_model(), DEFAULT_MODEL_ID);
    }

    #[tokio::test]
    async fn test_resolve_model_id() {
        let temp_dir = TempDir::new().unwrap();
        let manager = EmbeddingModelManager::new(temp_dir.path().to_path_buf()).await.unwrap();

        assert_eq!(manager.resolve_model_id("potion-base-8M").as_deref(), Some("potion-base-8M"));
        assert_eq!(manager.resolve_model_id("minishlab/M2V_large_output").as_deref(), Some("m2v-large"));
        assert_eq!(manager.resolve_model_id("potion base 8m").as_deref(), Some("potion-base-8M"));
        assert_eq!(manager.resolve_model_id("gpt-5"), None);
    }

    #[tokio::test]
    async fn test_unknown_model_download_fails_without_network() {
        let temp_dir = TempDir::new().unwrap();
        let mut manager = EmbeddingModelManager::new(temp_dir.path().to_path_buf()).await.unwrap();
        assert!(matches!(
            manager.download_model("no-such-model").await,
            Err(SkillMatcherError::ModelError(_))
        ));
    }
}
