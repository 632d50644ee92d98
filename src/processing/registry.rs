//! Build-once lookup tables shared by every analysis

use crate::error::Result;
use crate::processing::acronyms::AcronymResolver;
use crate::processing::dictionary::{base_name, SkillDictionary};
use crate::processing::embeddings::{EmbeddingProvider, SkillEmbeddingIndex};
use log::{info, warn};
use std::sync::Arc;

/// Dictionary, acronym table and optional skill embeddings.
///
/// Constructed once and shared behind an `Arc`; nothing mutates it afterwards,
/// so concurrent extractions can read it freely.
pub struct SkillRegistry {
    dictionary: SkillDictionary,
    acronyms: AcronymResolver,
    embeddings: Option<SkillEmbeddingIndex>,
}

impl SkillRegistry {
    /// Lexical-only registry over the built-in taxonomy
    pub fn new() -> Self {
        Self::from_dictionary(SkillDictionary::standard())
    }

    pub fn from_dictionary(dictionary: SkillDictionary) -> Self {
        let acronyms = AcronymResolver::build(&dictionary);
        info!(
            "Skill registry ready: {} skills, {} acronym forms, {} ambiguous acronyms",
            dictionary.len(),
            acronyms.len(),
            acronyms.ambiguous_acronyms().count()
        );
        Self {
            dictionary,
            acronyms,
            embeddings: None,
        }
    }

    /// Built-in taxonomy plus one precomputed vector per skill name
    pub fn with_embeddings(provider: Arc<dyn EmbeddingProvider>) -> Result<Self> {
        Self::new().attach_embeddings(provider)
    }

    pub fn attach_embeddings(self, provider: Arc<dyn EmbeddingProvider>) -> Result<Self> {
        let index = SkillEmbeddingIndex::build(provider, &self.dictionary)?;
        Ok(self.install(index))
    }

    /// Like `attach_embeddings`, but a provider that cannot embed the taxonomy leaves the registry lexical
    pub fn attach_embeddings_or_lexical(self, provider: Arc<dyn EmbeddingProvider>) -> Self {
        match SkillEmbeddingIndex::build(provider, &self.dictionary) {
            Ok(index) => self.install(index),
            Err(e) => {
                warn!("Could not precompute skill vectors ({}); using lexical matching only", e);
                self
            }
        }
    }

    fn install(mut self, index: SkillEmbeddingIndex) -> Self {
        info!(
            "Semantic matching enabled with {} ({} skill vectors)",
            index.provider().model_id(),
            index.len()
        );
        self.embeddings = Some(index);
        self
    }

    pub fn dictionary(&self) -> &SkillDictionary {
        &self.dictionary
    }

    pub fn acronyms(&self) -> &AcronymResolver {
        &self.acronyms
    }

    pub fn embeddings(&self) -> Option<&SkillEmbeddingIndex> {
        self.embeddings.as_ref()
    }

    pub fn has_embeddings(&self) -> bool {
        self.embeddings.is_some()
    }

    /// Lower-cased surface forms of a skill: its name, parenthetical-free base and acronym aliases
    pub fn surface_forms(&self, name: &str) -> Vec<String> {
        let mut forms = vec![name.to_lowercase()];
        forms.push(base_name(name).to_lowercase());
        forms.extend(self.acronyms.aliases_for(name).iter().map(|alias| alias.to_lowercase()));
        forms.retain(|form| !form.is_empty());
        forms.sort();
        forms.dedup();
        forms
    }
}

impl Default for SkillRegistry {
    fn default() -> Self {
        Self::new()
    }
}
