//! Job posting analysis: skill importance on top of extraction confidence, plus key phrases

use crate::config::ExtractionConfig;
use crate::processing::clamp_unit;
use crate::processing::dictionary::SkillCategory;
use crate::processing::exact_matcher::MatchSource;
use crate::processing::extractor::{count_category, RankedSkill, SkillExtractor, SkillMention};
use crate::processing::registry::SkillRegistry;
use crate::processing::text_processor::{char_index, is_word_boundary, normalize_unicode};
use aho_corasick::{AhoCorasick, MatchKind};
use log::{debug, warn};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Mentions at which the frequency component saturates
const MENTION_SATURATION: f32 = 3.0;
const DEFAULT_POSITION_SCORE: f32 = 0.5;

/// Which requirement block of the posting a skill was found in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequirementSection {
    Required,
    Preferred,
    General,
}

impl RequirementSection {
    pub fn multiplier(self) -> f32 {
        match self {
            RequirementSection::Required => 1.5,
            RequirementSection::Preferred => 0.8,
            RequirementSection::General => 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobSkillMention {
    pub mention: SkillMention,
    pub importance: f32,
    pub mention_count: usize,
    pub position_score: f32,
    pub section: RequirementSection,
}

impl JobSkillMention {
    pub fn name(&self) -> &str {
        self.mention.name()
    }

    pub fn key(&self) -> String {
        self.mention.key()
    }
}

/// Job skills, one per name, most important first
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobSkillProfile {
    skills: Vec<JobSkillMention>,
}

impl JobSkillProfile {
    /// Keeps the most important entry per skill
    pub fn from_mentions(mentions: impl IntoIterator<Item = JobSkillMention>) -> Self {
        let mut best: Vec<JobSkillMention> = Vec::new();
        let mut by_skill: HashMap<String, usize> = HashMap::new();
        for mention in mentions {
            match by_skill.get(&mention.key()) {
                Some(&idx) if mention.importance > best[idx].importance => best[idx] = mention,
                Some(_) => {}
                None => {
                    by_skill.insert(mention.key(), best.len());
                    best.push(mention);
                }
            }
        }
        best.sort_by(|a, b| b.importance.total_cmp(&a.importance));
        Self { skills: best }
    }

    pub fn skills(&self) -> &[JobSkillMention] {
        &self.skills
    }

    pub fn get(&self, name: &str) -> Option<&JobSkillMention> {
        let key = name.to_lowercase();
        self.skills.iter().find(|s| s.key() == key)
    }

    pub fn len(&self) -> usize {
        self.skills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }

    pub fn summary(&self, top_n: usize) -> JobSummary {
        let mentions = self.skills.iter().map(|s| &s.mention);
        JobSummary {
            total_skills_found: self.skills.len(),
            technical_count: count_category(mentions.clone(), SkillCategory::Technical),
            soft_count: count_category(mentions, SkillCategory::Soft),
            top_skills: self
                .skills
                .iter()
                .take(top_n)
                .map(|s| RankedSkill {
                    name: s.mention.skill.name.clone(),
                    category: s.mention.skill.category,
                    score: s.importance,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobSummary {
    pub total_skills_found: usize,
    pub technical_count: usize,
    pub soft_count: usize,
    pub top_skills: Vec<RankedSkill>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobAnalysis {
    pub skills: JobSkillProfile,
    pub key_phrases: Vec<String>,
    pub summary: JobSummary,
}

pub struct JobRequirementsAnalyzer {
    extractor: SkillExtractor,
    required_section: Regex,
    preferred_section: Regex,
    key_phrase_patterns: Vec<Regex>,
    top_n: usize,
}

impl JobRequirementsAnalyzer {
    pub fn new(registry: Arc<SkillRegistry>, config: ExtractionConfig) -> Self {
        Self::from_extractor(SkillExtractor::new(registry, config))
    }

    pub fn from_extractor(extractor: SkillExtractor) -> Self {
        // A section runs from its keyword to the next blank line or the end of the text
        let required_section = Regex::new(r"(?is)\b(?:required|must have|essential|mandatory)\b.*?(?:\n[ \t]*\n|\z)")
            .expect("Invalid required section regex");
        let preferred_section = Regex::new(r"(?is)\b(?:preferred|nice to have|bonus|optional)\b.*?(?:\n[ \t]*\n|\z)")
            .expect("Invalid preferred section regex");

        // Up to three words after the lead-in; dots and slashes only inside a word ("node.js", "ci/cd")
        let object = r"[\w+#]+(?:[./-][\w+#]+)*(?:\s+[\w+#]+(?:[./-][\w+#]+)*){0,2}";
        let key_phrase_patterns = [
            r"(?i)\b\d+\+?\s*(?:years?|yrs?)\b[^.\n]{0,40}?\bexperience\b".to_string(),
            r"(?i)\b(?:(?:bachelor|master|associate)(?:'s|s)?\b(?:\s+degree)?|ph\.?d\b\.?|mba\b)(?:\s+(?:in|of)\s+[a-z]+(?:\s+[a-z]+)?)?".to_string(),
            r"(?i)\bdegree\s+in\s+[a-z]+(?:\s+[a-z]+)?".to_string(),
            format!(r"(?i)\bexperience\s+(?:with|in)\s+{}", object),
            format!(r"(?i)\bknowledge\s+of\s+{}", object),
            format!(r"(?i)\bfamiliarity\s+with\s+{}", object),
        ]
        .iter()
        .map(|pattern| Regex::new(pattern).expect("Invalid key phrase regex"))
        .collect();

        Self {
            extractor,
            required_section,
            preferred_section,
            key_phrase_patterns,
            top_n: 10,
        }
    }

    /// Number of skills listed in the summary
    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    pub fn extractor(&self) -> &SkillExtractor {
        &self.extractor
    }

    pub fn analyze(&self, text: &str) -> JobAnalysis {
        let mentions = self.extractor.extract(text);
        self.build_analysis(text, mentions)
    }

    pub async fn analyze_with_semantics(&self, text: &str) -> JobAnalysis {
        let mentions = self.extractor.extract_with_semantics(text).await;
        self.build_analysis(text, mentions)
    }

    fn build_analysis(&self, text: &str, mentions: Vec<SkillMention>) -> JobAnalysis {
        let required_text = section_text(&self.required_section, text);
        let preferred_text = section_text(&self.preferred_section, text);

        let scored: Vec<JobSkillMention> = mentions
            .into_iter()
            .map(|mention| self.score_mention(text, &required_text, &preferred_text, mention))
            .collect();

        let skills = JobSkillProfile::from_mentions(scored);
        let summary = skills.summary(self.top_n);
        let key_phrases = self.key_phrases(text);
        debug!(
            "Job analysis: {} skills, {} key phrases",
            skills.len(),
            key_phrases.len()
        );

        JobAnalysis {
            skills,
            key_phrases,
            summary,
        }
    }

    fn score_mention(&self, text: &str, required_text: &str, preferred_text: &str, mention: SkillMention) -> JobSkillMention {
        let mut forms = self.extractor.registry().surface_forms(mention.name());
        // Misspellings are not surface forms
        if !matches!(mention.source, MatchSource::Fuzzy { .. }) {
            forms.push(mention.matched_text.to_lowercase());
        }
        forms.sort();
        forms.dedup();

        let (mention_count, first_occurrence) = count_occurrences(text, &forms);
        let count_score = (mention_count as f32 / MENTION_SATURATION).min(1.0);

        let total_chars = text.chars().count();
        let position_score = match first_occurrence {
            Some(byte_offset) if total_chars > 0 => 1.0 - char_index(text, byte_offset) as f32 / total_chars as f32,
            _ => DEFAULT_POSITION_SCORE,
        };

        let section = if count_occurrences(required_text, &forms).0 > 0 {
            RequirementSection::Required
        } else if count_occurrences(preferred_text, &forms).0 > 0 {
            RequirementSection::Preferred
        } else {
            RequirementSection::General
        };

        let importance = clamp_unit(
            (count_score * 0.2 + position_score * 0.2 + mention.confidence * 0.3 + mention.context_importance * 0.3)
                * section.multiplier(),
        );

        JobSkillMention {
            mention,
            importance,
            mention_count,
            position_score: clamp_unit(position_score),
            section,
        }
    }

    /// Years of experience, degrees and "experience with / knowledge of / familiarity with" phrases.
    /// Deduplicated case-insensitively, first occurrence kept.
    pub fn key_phrases(&self, text: &str) -> Vec<String> {
        let text = normalize_unicode(text);
        let mut seen = HashSet::new();
        let mut phrases = Vec::new();

        for pattern in &self.key_phrase_patterns {
            for found in pattern.find_iter(&text) {
                let phrase = found
                    .as_str()
                    .trim()
                    .trim_end_matches(|c: char| matches!(c, '.' | ',' | ';' | ':' | '/' | '-'))
                    .split_whitespace()
                    .collect::<Vec<_>>()
                    .join(" ");
                if phrase.is_empty() {
                    continue;
                }
                if seen.insert(phrase.to_lowercase()) {
                    phrases.push(phrase);
                }
            }
        }
        phrases
    }
}

/// All matches of a section pattern, concatenated
fn section_text(pattern: &Regex, text: &str) -> String {
    pattern
        .find_iter(text)
        .map(|m| m.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Whole-word, case-insensitive occurrences of any form, with the first byte offset
fn count_occurrences(text: &str, forms: &[String]) -> (usize, Option<usize>) {
    if text.is_empty() || forms.is_empty() {
        return (0, None);
    }

    let matcher = match AhoCorasick::builder()
        .ascii_case_insensitive(true)
        .match_kind(MatchKind::LeftmostLongest)
        .build(forms)
    {
        Ok(matcher) => matcher,
        Err(e) => {
            warn!("Could not build occurrence matcher for {:?}: {}", forms, e);
            return (0, None);
        }
    };

    let mut count = 0;
    let mut first = None;
    for found in matcher.find_iter(text) {
        if is_word_boundary(text, found.start(), found.end()) {
            count += 1;
            first.get_or_insert(found.start());
        }
    }
    (count, first)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analyzer() -> JobRequirementsAnalyzer {
        JobRequirementsAnalyzer::new(Arc::new(SkillRegistry::new()), ExtractionConfig::default())
    }

    #[test]
    fn test_must_have_outranks_nice_to_have() {
        let analyzer = analyzer();
        // Same length prefix so position and count are equal
        let must = analyzer.analyze("Must have    Rust.");
        let nice = analyzer.analyze("Nice to have Rust.");

        let must = must.skills.get("rust").unwrap();
        let nice = nice.skills.get("rust").unwrap();
        assert_eq!(must.position_score, nice.position_score);
        assert_eq!(must.section, RequirementSection::Required);
        assert_eq!(nice.section, RequirementSection::Preferred);
        assert!(must.importance > nice.importance);
    }

    #[test]
    fn test_everyday_words_do_not_become_requirements() {
        let analysis = analyzer().analyze(
            "Requirements: You must have Python experience and write tests.\nBest practices matter.",
        );
        let names: Vec<&str> = analysis.skills.skills().iter().map(|s| s.name()).collect();
        assert!(names.contains(&"Python"), "{:?}", names);
        assert!(!names.contains(&"Rust"), "{:?}", names);
        assert!(!names.contains(&"Jest"), "{:?}", names);
    }

    #[test]
    fn test_typo_is_not_counted_as_a_surface_form() {
        let analysis = analyzer().analyze("Pyhton scripting, Pyhton tooling and more Pyhton.");
        let python = analysis.skills.get("python").unwrap();
        assert!(matches!(python.mention.source, MatchSource::Fuzzy { .. }));
        assert_eq!(python.mention_count, 0);
        assert_eq!(python.position_score, DEFAULT_POSITION_SCORE);
    }

    #[test]
    fn test_acronym_and_expansion_count_together() {
        let analysis = analyzer().analyze(
            "We run everything on AWS. Experience with Amazon Web Services networking is required.",
        );
        let aws: Vec<&JobSkillMention> = analysis.skills.skills().iter().filter(|s| s.name() == "AWS").collect();
        assert_eq!(aws.len(), 1);
        assert!(aws[0].mention_count >= 2);
    }

    #[test]
    fn test_mention_count_is_whole_word() {
        let (count, first) = count_occurrences("Go, golang and GO again", &["go".to_string()]);
        assert_eq!(count, 2);
        assert_eq!(first, Some(0));
    }

    #[test]
    fn test_count_and_position_scores() {
        let analysis = analyzer().analyze("Python. Then Python again. More Python later. We also use Docker.");
        let python = analysis.skills.get("python").unwrap();
        let docker = analysis.skills.get("docker").unwrap();
        assert_eq!(python.mention_count, 3);
        assert_eq!(python.position_score, 1.0);
        assert!(docker.position_score < python.position_score);
        assert!(python.importance > docker.importance);
    }

    #[test]
    fn test_sections_end_at_blank_line() {
        let text = "Required skills:\n- Kotlin\n- Swift\n\nNice to have:\n- Figma\n\nAbout us: we use Jira.";
        let analysis = analyzer().analyze(text);
        assert_eq!(analysis.skills.get("kotlin").unwrap().section, RequirementSection::Required);
        assert_eq!(analysis.skills.get("figma").unwrap().section, RequirementSection::Preferred);
        assert_eq!(analysis.skills.get("jira").unwrap().section, RequirementSection::General);
    }

    #[test]
    fn test_skills_sorted_by_importance_and_bounded() {
        let text = "Senior engineer. Must have Rust and PostgreSQL. Docker preferred. Terraform is a bonus.";
        let analysis = analyzer().analyze(text);
        let importances: Vec<f32> = analysis.skills.skills().iter().map(|s| s.importance).collect();
        assert!(importances.windows(2).all(|w| w[0] >= w[1]));
        assert!(importances.iter().all(|i| (0.0..=1.0).contains(i)));
        assert_eq!(analysis.summary.total_skills_found, analysis.skills.len());
    }

    #[test]
    fn test_key_phrases() {
        let text = "5+ years of experience building APIs. Bachelor’s degree in Computer Science. \
                    Experience with Rust and Tokio. Knowledge of distributed systems. \
                    Familiarity with Kubernetes. experience with rust and tokio.";
        let phrases = analyzer().key_phrases(text);

        assert_eq!(phrases[0], "5+ years of experience");
        assert!(phrases.contains(&"Bachelor's degree in Computer Science".to_string()));
        assert!(phrases.contains(&"Experience with Rust and Tokio".to_string()));
        assert!(phrases.contains(&"Knowledge of distributed systems".to_string()));
        assert!(phrases.contains(&"Familiarity with Kubernetes".to_string()));
        let experience_with = phrases
            .iter()
            .filter(|p| p.to_lowercase() == "experience with rust and tokio")
            .count();
        assert_eq!(experience_with, 1);
    }

    #[test]
    fn test_empty_job_text() {
        let analysis = analyzer().analyze("");
        assert!(analysis.skills.is_empty());
        assert!(analysis.key_phrases.is_empty());
        assert_eq!(analysis.summary.total_skills_found, 0);
    }
}
