//! Skill extraction: n-gram matching, context analysis, confidence scoring and deduplication

use crate::config::ExtractionConfig;
use crate::error::{Result, SkillMatcherError};
use crate::processing::clamp_unit;
use crate::processing::context::{ContextAnalyzer, ContextAssessment, SkillLevel, MEDIUM_IMPORTANCE};
use crate::processing::dictionary::{SkillCategory, SkillDefinition};
use crate::processing::exact_matcher::{Candidate, ExactMatcher, MatchSource};
use crate::processing::fuzzy_matcher::FuzzyMatcher;
use crate::processing::registry::SkillRegistry;
use crate::processing::text_processor::{ngrams, tokenize, ContextWindow, NGram};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// Longest n-gram sent to the embedding provider
const SEMANTIC_MAX_TOKENS: usize = 3;
const SEMANTIC_MIN_CHARS: usize = 3;
/// Penalty on base confidence when the surrounding language is not a hard requirement
const SOFT_CONTEXT_DISCOUNT: f32 = 0.8;

/// One detected, scored occurrence of a skill
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillMention {
    pub skill: SkillDefinition,
    pub matched_text: String,
    pub context: ContextWindow,
    /// Byte span of the match in the analyzed text
    pub start: usize,
    pub end: usize,
    pub base_confidence: f32,
    pub skill_level: SkillLevel,
    pub level_confidence: f32,
    pub context_importance: f32,
    pub confidence: f32,
    pub source: MatchSource,
}

impl SkillMention {
    fn from_candidate(candidate: Candidate, context: ContextWindow, assessment: &ContextAssessment) -> Self {
        let confidence = compose_confidence(
            candidate.base_confidence,
            assessment.level_confidence,
            assessment.importance,
        );
        Self {
            skill: candidate.skill,
            matched_text: candidate.matched_text,
            context,
            start: candidate.start,
            end: candidate.end,
            base_confidence: clamp_unit(candidate.base_confidence),
            skill_level: assessment.level,
            level_confidence: clamp_unit(assessment.level_confidence),
            context_importance: clamp_unit(assessment.importance),
            confidence,
            source: candidate.source,
        }
    }

    pub fn name(&self) -> &str {
        &self.skill.name
    }

    /// Lower-cased skill name, the identity used for deduplication
    pub fn key(&self) -> String {
        self.skill.key()
    }
}

/// Final mention confidence from match strength, level and requirement language
pub fn compose_confidence(base_confidence: f32, level_confidence: f32, context_importance: f32) -> f32 {
    let base = if context_importance <= MEDIUM_IMPORTANCE {
        base_confidence * SOFT_CONTEXT_DISCOUNT
    } else {
        base_confidence
    };
    clamp_unit(base * 0.5 + level_confidence * 0.2 + context_importance * 0.3)
}

pub struct SkillExtractor {
    registry: Arc<SkillRegistry>,
    config: ExtractionConfig,
    context: ContextAnalyzer,
}

impl SkillExtractor {
    pub fn new(registry: Arc<SkillRegistry>, config: ExtractionConfig) -> Self {
        Self {
            registry,
            config,
            context: ContextAnalyzer::new(),
        }
    }

    pub fn registry(&self) -> &Arc<SkillRegistry> {
        &self.registry
    }

    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    /// Exact, acronym and fuzzy matching only
    pub fn extract(&self, text: &str) -> Vec<SkillMention> {
        if text.trim().is_empty() {
            return Vec::new();
        }
        let (candidates, _) = self.lexical_candidates(text);
        self.finalize(text, candidates)
    }

    /// Lexical matching plus the embedding pass over phrases nothing else recognized.
    ///
    /// Provider failures and timeouts are logged and the lexical result is returned.
    pub async fn extract_with_semantics(&self, text: &str) -> Vec<SkillMention> {
        if text.trim().is_empty() {
            return Vec::new();
        }

        let (mut candidates, unmatched) = self.lexical_candidates(text);
        if self.registry.has_embeddings() {
            let phrases: Vec<NGram> = unmatched
                .into_iter()
                .filter(|g| g.token_count <= SEMANTIC_MAX_TOKENS && g.text.chars().count() >= SEMANTIC_MIN_CHARS)
                .collect();

            match self.semantic_candidates(text, &phrases).await {
                Ok(found) => {
                    debug!("Semantic pass matched {} of {} phrases", found.len(), phrases.len());
                    candidates.extend(found);
                }
                Err(e) => warn!("Semantic matching skipped, using lexical matches only: {}", e),
            }
        }

        self.finalize(text, candidates)
    }

    pub fn extract_resume(&self, text: &str) -> ResumeSkillProfile {
        ResumeSkillProfile::from_mentions(self.extract(text))
    }

    pub async fn extract_resume_with_semantics(&self, text: &str) -> ResumeSkillProfile {
        ResumeSkillProfile::from_mentions(self.extract_with_semantics(text).await)
    }

    /// Candidates in text order, plus the n-grams that matched nothing
    fn lexical_candidates(&self, text: &str) -> (Vec<Candidate>, Vec<NGram>) {
        let exact = ExactMatcher::new(
            self.registry.dictionary(),
            self.registry.acronyms(),
            self.config.acronym_confidence,
        );
        let fuzzy = FuzzyMatcher::new(
            self.registry.dictionary(),
            self.config.fuzzy_max_distance,
            self.config.fuzzy_min_length,
        );

        let mut candidates = Vec::new();
        let mut unmatched = Vec::new();
        for gram in ngrams(&tokenize(text), self.config.max_ngram) {
            if let Some(candidate) = exact.match_phrase(text, &gram) {
                candidates.push(candidate);
                continue;
            }
            let near = fuzzy.match_phrase(text, &gram);
            if near.is_empty() {
                unmatched.push(gram);
            } else {
                candidates.extend(near);
            }
        }
        (candidates, unmatched)
    }

    async fn semantic_candidates(&self, text: &str, phrases: &[NGram]) -> Result<Vec<Candidate>> {
        if phrases.is_empty() {
            return Ok(Vec::new());
        }

        let registry = Arc::clone(&self.registry);
        let threshold = self.config.semantic_threshold;
        let texts: Vec<String> = phrases.iter().map(|g| g.text.clone()).collect();
        let task = tokio::task::spawn_blocking(move || match registry.embeddings() {
            Some(index) => index.match_phrases(&texts, threshold),
            None => Ok(Vec::new()),
        });

        let timeout_ms = self.config.embedding_timeout_ms;
        let matches = tokio::time::timeout(Duration::from_millis(timeout_ms), task)
            .await
            .map_err(|_| SkillMatcherError::EmbeddingTimeout(timeout_ms))?
            .map_err(|e| SkillMatcherError::Embedding(format!("Embedding task failed: {}", e)))??;

        Ok(phrases
            .iter()
            .zip(matches)
            .filter_map(|(gram, hit)| {
                hit.map(|(skill, similarity)| {
                    Candidate::new(skill, text, gram, similarity, MatchSource::Semantic { similarity })
                })
            })
            .collect())
    }

    /// Context analysis, negation filtering and per-skill deduplication (higher confidence wins)
    fn finalize(&self, text: &str, candidates: Vec<Candidate>) -> Vec<SkillMention> {
        let mut mentions: Vec<SkillMention> = Vec::new();
        let mut by_skill: HashMap<String, usize> = HashMap::new();
        let mut negated = 0usize;

        for candidate in candidates {
            let window = ContextWindow::around(text, candidate.start, candidate.end, self.config.context_window);
            let assessment = self.context.analyze(&window);
            if assessment.negated {
                negated += 1;
                continue;
            }

            let mention = SkillMention::from_candidate(candidate, window, &assessment);
            match by_skill.get(&mention.key()) {
                Some(&idx) => {
                    if mention.confidence > mentions[idx].confidence {
                        mentions[idx] = mention;
                    }
                }
                None => {
                    by_skill.insert(mention.key(), mentions.len());
                    mentions.push(mention);
                }
            }
        }

        debug!("Extracted {} skills ({} negated occurrences dropped)", mentions.len(), negated);
        mentions
    }
}

/// A skill name with the score it is ranked by
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedSkill {
    pub name: String,
    pub category: SkillCategory,
    pub score: f32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillLevelCounts {
    pub expert: usize,
    pub intermediate: usize,
    pub beginner: usize,
    pub unspecified: usize,
}

impl SkillLevelCounts {
    pub fn record(&mut self, level: SkillLevel) {
        match level {
            SkillLevel::Expert => self.expert += 1,
            SkillLevel::Intermediate => self.intermediate += 1,
            SkillLevel::Beginner => self.beginner += 1,
            SkillLevel::Unspecified => self.unspecified += 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeSummary {
    pub total_skills: usize,
    pub technical_count: usize,
    pub soft_count: usize,
    pub skill_levels: SkillLevelCounts,
    pub top_skills: Vec<RankedSkill>,
}

/// One mention per skill, highest confidence first
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResumeSkillProfile {
    mentions: Vec<SkillMention>,
}

impl ResumeSkillProfile {
    /// Keeps the most confident mention of each skill
    pub fn from_mentions(mentions: impl IntoIterator<Item = SkillMention>) -> Self {
        let mut best: Vec<SkillMention> = Vec::new();
        let mut by_skill: HashMap<String, usize> = HashMap::new();
        for mention in mentions {
            match by_skill.get(&mention.key()) {
                Some(&idx) if mention.confidence > best[idx].confidence => best[idx] = mention,
                Some(_) => {}
                None => {
                    by_skill.insert(mention.key(), best.len());
                    best.push(mention);
                }
            }
        }

        // Stable sort keeps text order among equal confidences
        best.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
        Self { mentions: best }
    }

    pub fn from_text(extractor: &SkillExtractor, text: &str) -> Self {
        extractor.extract_resume(text)
    }

    pub fn mentions(&self) -> &[SkillMention] {
        &self.mentions
    }

    pub fn get(&self, name: &str) -> Option<&SkillMention> {
        let key = name.to_lowercase();
        self.mentions.iter().find(|m| m.key() == key)
    }

    pub fn len(&self) -> usize {
        self.mentions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mentions.is_empty()
    }

    pub fn summary(&self, top_n: usize) -> ResumeSummary {
        let mut skill_levels = SkillLevelCounts::default();
        for mention in &self.mentions {
            skill_levels.record(mention.skill_level);
        }

        ResumeSummary {
            total_skills: self.mentions.len(),
            technical_count: count_category(&self.mentions, SkillCategory::Technical),
            soft_count: count_category(&self.mentions, SkillCategory::Soft),
            skill_levels,
            top_skills: self
                .mentions
                .iter()
                .take(top_n)
                .map(|m| RankedSkill {
                    name: m.skill.name.clone(),
                    category: m.skill.category,
                    score: m.confidence,
                })
                .collect(),
        }
    }
}

pub(crate) fn count_category<'a>(mentions: impl IntoIterator<Item = &'a SkillMention>, category: SkillCategory) -> usize {
    mentions
        .into_iter()
        .filter(|m| m.skill.category == category)
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::embeddings::tests::{ConceptProvider, FlakyProvider, SlowProvider};

    fn extractor() -> SkillExtractor {
        SkillExtractor::new(Arc::new(SkillRegistry::new()), ExtractionConfig::default())
    }

    fn semantic_extractor(registry: SkillRegistry, timeout_ms: u64) -> SkillExtractor {
        let config = ExtractionConfig {
            enable_semantic: true,
            embedding_timeout_ms: timeout_ms,
            ..ExtractionConfig::default()
        };
        SkillExtractor::new(Arc::new(registry), config)
    }

    fn names(mentions: &[SkillMention]) -> Vec<&str> {
        mentions.iter().map(|m| m.name()).collect()
    }

    #[test]
    fn test_expert_level_python() {
        let mentions = extractor().extract("Expert level Python programming");
        assert_eq!(names(&mentions), vec!["Python"]);
        assert_eq!(mentions[0].skill_level, SkillLevel::Expert);
        assert_eq!(mentions[0].level_confidence, 1.0);
        assert_eq!(mentions[0].matched_text, "Python");
    }

    #[test]
    fn test_negated_skills_are_dropped() {
        let mentions = extractor().extract("Python not required. Experience with React not required.");
        assert!(!names(&mentions).contains(&"Python"));
        assert!(!names(&mentions).contains(&"React"));
    }

    #[test]
    fn test_empty_and_blank_text() {
        assert!(extractor().extract("").is_empty());
        assert!(extractor().extract("   \n\t ").is_empty());
    }

    #[test]
    fn test_duplicate_mentions_keep_highest_confidence() {
        let text = "Wrote Python scripts for the billing team and some reporting dashboards. \
                    Later became an expert Python developer.";
        let mentions = extractor().extract(text);
        let python: Vec<&SkillMention> = mentions.iter().filter(|m| m.name() == "Python").collect();
        assert_eq!(python.len(), 1);
        assert_eq!(python[0].skill_level, SkillLevel::Expert);
        assert!((python[0].confidence - 0.75).abs() < 1e-6);
        assert!(python[0].start > 10);
    }

    #[test]
    fn test_confidence_composition() {
        // High importance keeps base confidence
        assert!((compose_confidence(1.0, 1.0, 1.0) - 1.0).abs() < 1e-6);
        // Preferred context discounts base by 0.8
        let expected = 0.8 * 0.5 + 0.5 * 0.2 + 0.7 * 0.3;
        assert!((compose_confidence(1.0, 0.5, 0.7) - expected).abs() < 1e-6);
        assert_eq!(compose_confidence(5.0, 5.0, 5.0), 1.0);
    }

    #[test]
    fn test_required_context_beats_optional_wording() {
        let extractor = extractor();
        let docker = |text: &str| {
            extractor
                .extract(text)
                .into_iter()
                .find(|m| m.name() == "Docker")
                .unwrap()
        };
        let required = docker("Docker is required for this position");
        let plus = docker("Docker would be a plus for this position");
        assert_eq!(required.context_importance, 1.0);
        assert_eq!(plus.context_importance, 0.4);
        assert!(required.confidence > plus.confidence);
    }

    #[test]
    fn test_acronym_and_expansion_share_a_skill() {
        let mentions = extractor().extract("Built ML pipelines; machine learning research background.");
        let ml: Vec<&SkillMention> = mentions.iter().filter(|m| m.name() == "Machine Learning").collect();
        assert_eq!(ml.len(), 1);
        assert_eq!(ml[0].source, MatchSource::Exact);
    }

    #[test]
    fn test_fuzzy_typo_is_recognized() {
        let mentions = extractor().extract("Deployed services on Kubernetse clusters");
        let k8s = mentions.iter().find(|m| m.name() == "Kubernetes").unwrap();
        assert_eq!(k8s.source, MatchSource::Fuzzy { distance: 2 });
        assert_eq!(k8s.matched_text, "Kubernetse");
    }

    #[test]
    fn test_all_scores_within_unit_interval() {
        let text = "Strong Rust and Go skills are essential. Familiarity with Terraform is a plus. \
                    Advanced SQL, working knowledge of Docker, basic Figma, mentoring junior engineers!";
        for mention in extractor().extract(text) {
            for value in [
                mention.base_confidence,
                mention.level_confidence,
                mention.context_importance,
                mention.confidence,
            ] {
                assert!((0.0..=1.0).contains(&value), "{} out of range for {}", value, mention.name());
            }
        }
    }

    #[test]
    fn test_adversarial_text_does_not_panic() {
        let extractor = extractor();
        let long = "python ".repeat(500);
        let inputs = [
            "....!!!???",
            "ünïcödé — “quotes” … C++ C# .NET",
            "+++ ### /// ---",
            long.as_str(),
        ];
        for input in inputs {
            let _ = extractor.extract(input);
        }
    }

    #[test]
    fn test_resume_profile_summary() {
        let profile = extractor().extract_resume(
            "Expert Python developer. Good communication and teamwork. Basic Docker.",
        );
        let summary = profile.summary(2);
        assert_eq!(summary.total_skills, profile.len());
        assert_eq!(summary.technical_count + summary.soft_count, summary.total_skills);
        assert!(summary.soft_count >= 1);
        assert_eq!(summary.top_skills.len(), 2);
        assert!(summary.skill_levels.expert >= 1);

        let confidences: Vec<f32> = profile.mentions().iter().map(|m| m.confidence).collect();
        assert!(confidences.windows(2).all(|w| w[0] >= w[1]));
        assert!(profile.get("python").is_some());
    }

    #[tokio::test]
    async fn test_semantic_pass_finds_synonyms() {
        let registry = SkillRegistry::with_embeddings(Arc::new(ConceptProvider::new())).unwrap();
        let extractor = semantic_extractor(registry, 2000);

        let lexical = extractor.extract("Ran k8s clusters in production");
        assert!(lexical.iter().all(|m| m.name() != "Kubernetes"));

        let mentions = extractor.extract_with_semantics("Ran k8s clusters in production").await;
        let k8s = mentions.iter().find(|m| m.name() == "Kubernetes").unwrap();
        assert_eq!(k8s.matched_text, "k8s");
        assert!(matches!(k8s.source, MatchSource::Semantic { .. }));
    }

    #[tokio::test]
    async fn test_provider_failure_falls_back_to_lexical() {
        let registry = SkillRegistry::with_embeddings(Arc::new(FlakyProvider::new())).unwrap();
        let extractor = semantic_extractor(registry, 2000);

        let text = "Expert Python developer running k8s";
        let mentions = extractor.extract_with_semantics(text).await;
        assert_eq!(mentions, extractor.extract(text));
    }

    #[tokio::test]
    async fn test_provider_timeout_falls_back_to_lexical() {
        let provider = SlowProvider::new(Duration::from_millis(500));
        let registry = SkillRegistry::with_embeddings(Arc::new(provider)).unwrap();
        let extractor = semantic_extractor(registry, 20);

        let text = "Expert Python developer running k8s";
        let mentions = extractor.extract_with_semantics(text).await;
        assert_eq!(names(&mentions), names(&extractor.extract(text)));
        assert!(mentions.iter().all(|m| m.name() != "Kubernetes"));
    }

    #[tokio::test]
    async fn test_semantic_entry_point_without_embeddings_is_lexical() {
        let extractor = extractor();
        let text = "Expert Python developer";
        assert_eq!(extractor.extract_with_semantics(text).await, extractor.extract(text));
    }
}
