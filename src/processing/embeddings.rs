//! Embedding providers and the precomputed skill-name vector index

use crate::error::{Result, SkillMatcherError};
use crate::processing::dictionary::{SkillDefinition, SkillDictionary};
use log::{debug, info};
use model2vec_rs::model::StaticModel;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

/// Maps text to fixed-dimension vectors
pub trait EmbeddingProvider: Send + Sync {
    fn model_id(&self) -> &str;

    fn dim(&self) -> usize;

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.embed_batch(&[text.to_string()])?
            .pop()
            .ok_or_else(|| SkillMatcherError::Embedding(format!("{} returned no vector", self.model_id())))
    }
}

/// Static Model2Vec embeddings loaded from a local model directory
pub struct Model2VecProvider {
    model: StaticModel,
    model_id: String,
    dim: usize,
}

impl Model2VecProvider {
    pub fn load(model_path: &Path, model_id: impl Into<String>) -> Result<Self> {
        let start_time = Instant::now();
        info!("Loading Model2Vec embedding model from: {}", model_path.display());

        let model = StaticModel::from_pretrained(
            model_path,
            None, // token
            None, // normalize
            None, // subfolder
        )?;

        let dim = model.encode_single("skill").len();
        if dim == 0 {
            return Err(SkillMatcherError::ModelError(format!(
                "Model at {} produced empty embeddings",
                model_path.display()
            )));
        }

        info!("Model loaded in {:.2?} (dim {})", start_time.elapsed(), dim);
        Ok(Self {
            model,
            model_id: model_id.into(),
            dim,
        })
    }
}

impl EmbeddingProvider for Model2VecProvider {
    fn model_id(&self) -> &str {
        &self.model_id
    }

    fn dim(&self) -> usize {
        self.dim
    }

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self.model.encode(texts))
    }

    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        Ok(self.model.encode_single(text))
    }
}

/// Cosine similarity; 0 for empty, mismatched or zero-norm vectors
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.is_empty() || a.len() != b.len() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot_product / (norm_a * norm_b)
    }
}

/// One vector per dictionary skill, computed once when the registry is built
pub struct SkillEmbeddingIndex {
    provider: Arc<dyn EmbeddingProvider>,
    skills: Vec<SkillDefinition>,
    vectors: Vec<Vec<f32>>,
}

impl SkillEmbeddingIndex {
    pub fn build(provider: Arc<dyn EmbeddingProvider>, dictionary: &SkillDictionary) -> Result<Self> {
        let start_time = Instant::now();
        let skills: Vec<SkillDefinition> = dictionary.iter().cloned().collect();
        let names: Vec<String> = skills.iter().map(|s| s.name.clone()).collect();

        let vectors = provider.embed_batch(&names)?;
        if vectors.len() != skills.len() {
            return Err(SkillMatcherError::Embedding(format!(
                "{} returned {} vectors for {} skills",
                provider.model_id(),
                vectors.len(),
                skills.len()
            )));
        }

        debug!(
            "Embedded {} skill names with {} in {:.2?}",
            skills.len(),
            provider.model_id(),
            start_time.elapsed()
        );
        Ok(Self {
            provider,
            skills,
            vectors,
        })
    }

    pub fn provider(&self) -> &Arc<dyn EmbeddingProvider> {
        &self.provider
    }

    pub fn len(&self) -> usize {
        self.skills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }

    /// Most similar skill for a vector; earlier dictionary entries win ties
    pub fn best_match(&self, vector: &[f32]) -> Option<(&SkillDefinition, f32)> {
        let mut best: Option<(&SkillDefinition, f32)> = None;
        for (skill, skill_vector) in self.skills.iter().zip(&self.vectors) {
            let similarity = cosine_similarity(vector, skill_vector);
            if best.map_or(true, |(_, score)| similarity > score) {
                best = Some((skill, similarity));
            }
        }
        best
    }

    /// Embed all phrases in one batch; each gets its best skill if similarity reaches the threshold
    pub fn match_phrases(&self, phrases: &[String], threshold: f32) -> Result<Vec<Option<(SkillDefinition, f32)>>> {
        if phrases.is_empty() {
            return Ok(Vec::new());
        }

        let vectors = self.provider.embed_batch(phrases)?;
        if vectors.len() != phrases.len() {
            return Err(SkillMatcherError::Embedding(format!(
                "{} returned {} vectors for {} phrases",
                self.provider.model_id(),
                vectors.len(),
                phrases.len()
            )));
        }

        Ok(vectors
            .iter()
            .map(|vector| {
                self.best_match(vector)
                    .filter(|(_, similarity)| *similarity >= threshold)
                    .map(|(skill, similarity)| (skill.clone(), similarity))
            })
            .collect())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// One-hot vector per skill name, with a few synonyms folded onto their skill.
    /// Anything else lands on a shared "unknown" dimension.
    pub(crate) struct ConceptProvider {
        concepts: HashMap<String, usize>,
    }

    impl ConceptProvider {
        pub(crate) fn new() -> Self {
            let mut concepts: HashMap<String, usize> = SkillDictionary::standard()
                .iter()
                .enumerate()
                .map(|(idx, def)| (def.key(), idx))
                .collect();
            for (synonym, skill) in [("k8s", "kubernetes"), ("sklearn", "scikit-learn")] {
                let idx = concepts[skill];
                concepts.insert(synonym.to_string(), idx);
            }
            Self { concepts }
        }
    }

    impl EmbeddingProvider for ConceptProvider {
        fn model_id(&self) -> &str {
            "concept-test"
        }

        fn dim(&self) -> usize {
            SkillDictionary::standard().len() + 1
        }

        fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
            let dim = self.dim();
            Ok(texts
                .iter()
                .map(|text| {
                    let mut vector = vec![0.0; dim];
                    let idx = self.concepts.get(&text.trim().to_lowercase()).copied().unwrap_or(dim - 1);
                    vector[idx] = 1.0;
                    vector
                })
                .collect())
        }
    }

    /// Serves the first batch (the registry build), fails every later one
    pub(crate) struct FlakyProvider {
        inner: ConceptProvider,
        calls: AtomicUsize,
    }

    impl FlakyProvider {
        pub(crate) fn new() -> Self {
            Self {
                inner: ConceptProvider::new(),
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl EmbeddingProvider for FlakyProvider {
        fn model_id(&self) -> &str {
            "flaky-test"
        }

        fn dim(&self) -> usize {
            self.inner.dim()
        }

        fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
            if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
                self.inner.embed_batch(texts)
            } else {
                Err(SkillMatcherError::Embedding("model unavailable".to_string()))
            }
        }
    }

    /// Serves the first batch immediately, sleeps before every later one
    pub(crate) struct SlowProvider {
        inner: ConceptProvider,
        delay: Duration,
        calls: AtomicUsize,
    }

    impl SlowProvider {
        pub(crate) fn new(delay: Duration) -> Self {
            Self {
                inner: ConceptProvider::new(),
                delay,
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl EmbeddingProvider for SlowProvider {
        fn model_id(&self) -> &str {
            "slow-test"
        }

        fn dim(&self) -> usize {
            self.inner.dim()
        }

        fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
            if self.calls.fetch_add(1, Ordering::SeqCst) > 0 {
                std::thread::sleep(self.delay);
            }
            self.inner.embed_batch(texts)
        }
    }

    #[test]
    fn test_cosine_similarity() {
        assert!((cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]) - 1.0).abs() < 1e-6);
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).abs() < 1e-6);
        assert_eq!(cosine_similarity(&[], &[]), 0.0);
        assert_eq!(cosine_similarity(&[1.0], &[1.0, 2.0]), 0.0);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
    }

    #[test]
    fn test_default_embed_uses_batch() {
        let provider = ConceptProvider::new();
        let vector = provider.embed("python").unwrap();
        assert_eq!(vector.len(), provider.dim());

        let flaky = FlakyProvider::new();
        assert!(flaky.embed("python").is_ok());
        assert!(flaky.embed("python").is_err());
    }

    #[test]
    fn test_index_matches_synonyms_above_threshold() {
        let dictionary = SkillDictionary::standard();
        let index = SkillEmbeddingIndex::build(Arc::new(ConceptProvider::new()), &dictionary).unwrap();
        assert_eq!(index.len(), dictionary.len());

        let matched = index
            .match_phrases(&["k8s".to_string(), "lasagna".to_string()], 0.7)
            .unwrap();
        let (skill, similarity) = matched[0].as_ref().unwrap();
        assert_eq!(skill.name, "Kubernetes");
        assert!((similarity - 1.0).abs() < 1e-6);
        assert!(matched[1].is_none());
    }

    #[test]
    fn test_index_build_rejects_short_batches() {
        struct Truncating;
        impl EmbeddingProvider for Truncating {
            fn model_id(&self) -> &str {
                "truncating"
            }
            fn dim(&self) -> usize {
                1
            }
            fn embed_batch(&self, _texts: &[String]) -> Result<Vec<Vec<f32>>> {
                Ok(vec![vec![1.0]])
            }
        }

        let result = SkillEmbeddingIndex::build(Arc::new(Truncating), &SkillDictionary::standard());
        assert!(matches!(result, Err(SkillMatcherError::Embedding(_))));
    }
}
