//! Exact dictionary and acronym matching over token n-grams

use crate::processing::acronyms::AcronymResolver;
use crate::processing::dictionary::{SkillDefinition, SkillDictionary};
use crate::processing::text_processor::NGram;
use serde::{Deserialize, Serialize};

/// How a candidate was recognized
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MatchSource {
    Exact,
    Acronym,
    Fuzzy { distance: usize },
    Semantic { similarity: f32 },
}

impl MatchSource {
    pub fn label(&self) -> &'static str {
        match self {
            MatchSource::Exact => "exact",
            MatchSource::Acronym => "acronym",
            MatchSource::Fuzzy { .. } => "fuzzy",
            MatchSource::Semantic { .. } => "semantic",
        }
    }
}

/// A recognized skill at a byte span of the source text, before context analysis
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub skill: SkillDefinition,
    pub matched_text: String,
    pub start: usize,
    pub end: usize,
    pub base_confidence: f32,
    pub source: MatchSource,
}

impl Candidate {
    pub fn new(skill: SkillDefinition, source_text: &str, gram: &NGram, base_confidence: f32, source: MatchSource) -> Self {
        Self {
            skill,
            matched_text: source_text[gram.start..gram.end].to_string(),
            start: gram.start,
            end: gram.end,
            base_confidence,
            source,
        }
    }
}

pub struct ExactMatcher<'a> {
    dictionary: &'a SkillDictionary,
    acronyms: &'a AcronymResolver,
    acronym_confidence: f32,
}

impl<'a> ExactMatcher<'a> {
    pub fn new(dictionary: &'a SkillDictionary, acronyms: &'a AcronymResolver, acronym_confidence: f32) -> Self {
        Self {
            dictionary,
            acronyms,
            acronym_confidence,
        }
    }

    /// Dictionary hit first, then acronym or expansion resolution
    pub fn match_phrase(&self, source_text: &str, gram: &NGram) -> Option<Candidate> {
        if let Some(skill) = self.dictionary.lookup(&gram.text) {
            return Some(Candidate::new(skill.clone(), source_text, gram, 1.0, MatchSource::Exact));
        }

        self.acronyms.resolve(&gram.text).map(|skill| {
            Candidate::new(
                skill.clone(),
                source_text,
                gram,
                self.acronym_confidence,
                MatchSource::Acronym,
            )
        })
    }
}
