//! Context analysis around a matched skill: proficiency level, negation and
//! requirement strength
//!
//! Each check is a small function over a [`ContextWindow`] so it can be tested
//! without running the whole extraction pipeline.

use crate::processing::text_processor::{first_chars, last_chars, ContextWindow};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Characters on each side of the match searched for level keywords
const LEVEL_ZONE: usize = 50;
/// Words inspected for negation, counted from the start of the match
const NEGATION_WORDS_AFTER: usize = 3;

pub const HIGH_IMPORTANCE: f32 = 1.0;
pub const MEDIUM_IMPORTANCE: f32 = 0.7;
pub const LOW_IMPORTANCE: f32 = 0.4;
pub const DEFAULT_IMPORTANCE: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillLevel {
    Unspecified,
    Beginner,
    Intermediate,
    Expert,
}

impl SkillLevel {
    pub fn confidence(self) -> f32 {
        match self {
            SkillLevel::Expert => 1.0,
            SkillLevel::Intermediate => 0.7,
            SkillLevel::Beginner => 0.4,
            SkillLevel::Unspecified => 0.5,
        }
    }
}

impl fmt::Display for SkillLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SkillLevel::Unspecified => "unspecified",
            SkillLevel::Beginner => "beginner",
            SkillLevel::Intermediate => "intermediate",
            SkillLevel::Expert => "expert",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContextAssessment {
    pub level: SkillLevel,
    pub level_confidence: f32,
    pub negated: bool,
    pub importance: f32,
}

pub struct ContextAnalyzer {
    /// Checked in order; the first tier with a hit wins
    level_patterns: Vec<(SkillLevel, Regex)>,
    negation: Regex,
    /// (score, cue pattern), highest first
    importance_patterns: Vec<(f32, Regex)>,
}

impl ContextAnalyzer {
    pub fn new() -> Self {
        let level_patterns = vec![
            (
                SkillLevel::Expert,
                Regex::new(r"\b(?:expert|advanced|extensive|strong|proficient)\b").expect("Invalid expert regex"),
            ),
            (
                SkillLevel::Intermediate,
                Regex::new(r"\b(?:intermediate|moderate|working|good)\b").expect("Invalid intermediate regex"),
            ),
            (
                SkillLevel::Beginner,
                Regex::new(r"\b(?:basic|beginner|elementary|familiar|exposure)\b").expect("Invalid beginner regex"),
            ),
        ];

        let negation = Regex::new(
            r"(?:\bnot required\b|\bnot necessary\b|\bno need for\b|\bno experience (?:in|with)\b|\bdon't need\b|\boptional\b)",
        )
        .expect("Invalid negation regex");

        let importance_patterns = vec![
            (
                HIGH_IMPORTANCE,
                Regex::new(r"\b(?:required|must-have|must|essential|critical|key|core)\b").expect("Invalid high importance regex"),
            ),
            (
                MEDIUM_IMPORTANCE,
                Regex::new(r"\b(?:preferred|desired|important|should have|good to have|strong)\b")
                    .expect("Invalid medium importance regex"),
            ),
            (
                LOW_IMPORTANCE,
                Regex::new(r"\b(?:plus|bonus|nice to have|optional|helpful)\b").expect("Invalid low importance regex"),
            ),
        ];

        Self {
            level_patterns,
            negation,
            importance_patterns,
        }
    }

    /// Level keywords within 50 chars before or after the match
    pub fn detect_level(&self, window: &ContextWindow) -> (SkillLevel, f32) {
        let before = last_chars(window.before(), LEVEL_ZONE);
        let after = first_chars(window.after(), LEVEL_ZONE);

        for (level, pattern) in &self.level_patterns {
            if pattern.is_match(before) || pattern.is_match(after) {
                return (*level, level.confidence());
            }
        }
        (SkillLevel::Unspecified, SkillLevel::Unspecified.confidence())
    }

    /// Negation cue anywhere in the window prefix or the first words from the match on
    pub fn is_negated(&self, window: &ContextWindow) -> bool {
        let prefix = window.before().trim();
        let following = window.text[window.match_start..]
            .split_whitespace()
            .take(NEGATION_WORDS_AFTER)
            .collect::<Vec<_>>()
            .join(" ");
        let inspected = format!("{} {}", prefix, following);
        self.negation.is_match(&inspected)
    }

    /// Strength of requirement language in the sentence holding the match
    pub fn importance(&self, window: &ContextWindow) -> f32 {
        let sentence = sentence_of(window);
        self.importance_patterns
            .iter()
            .find(|(_, pattern)| pattern.is_match(sentence))
            .map_or(DEFAULT_IMPORTANCE, |(score, _)| *score)
    }

    pub fn analyze(&self, window: &ContextWindow) -> ContextAssessment {
        let (level, level_confidence) = self.detect_level(window);
        ContextAssessment {
            level,
            level_confidence,
            negated: self.is_negated(window),
            importance: self.importance(window),
        }
    }
}

impl Default for ContextAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

fn is_sentence_end(c: char) -> bool {
    matches!(c, '.' | '!' | '?')
}

/// Sentence containing the match; terminators inside the match itself do not split
fn sentence_of(window: &ContextWindow) -> &str {
    let start = window
        .before()
        .rfind(is_sentence_end)
        .map_or(0, |idx| idx + 1);
    let end = window
        .after()
        .find(is_sentence_end)
        .map_or(window.text.len(), |idx| window.match_end + idx);
    &window.text[start..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window(text: &str, skill: &str) -> ContextWindow {
        let start = text.find(skill).unwrap();
        ContextWindow::around(text, start, start + skill.len(), 100)
    }

    #[test]
    fn test_expert_level_before_match() {
        let analyzer = ContextAnalyzer::new();
        let (level, confidence) = analyzer.detect_level(&window("Expert level Python programming", "Python"));
        assert_eq!(level, SkillLevel::Expert);
        assert_eq!(confidence, 1.0);
    }

    #[test]
    fn test_level_precedence_and_default() {
        let analyzer = ContextAnalyzer::new();
        let (level, _) = analyzer.detect_level(&window("Basic SQL, but strong overall", "SQL"));
        assert_eq!(level, SkillLevel::Expert);

        let (level, confidence) = analyzer.detect_level(&window("Good working knowledge of Docker", "Docker"));
        assert_eq!(level, SkillLevel::Intermediate);
        assert_eq!(confidence, 0.7);

        let (level, _) = analyzer.detect_level(&window("Familiar with Rust", "Rust"));
        assert_eq!(level, SkillLevel::Beginner);

        let (level, confidence) = analyzer.detect_level(&window("Used Kafka daily", "Kafka"));
        assert_eq!(level, SkillLevel::Unspecified);
        assert_eq!(confidence, 0.5);
    }

    #[test]
    fn test_level_zone_is_bounded() {
        let analyzer = ContextAnalyzer::new();
        let padding = "x".repeat(60);
        let text = format!("expert {} Python", padding);
        let (level, _) = analyzer.detect_level(&window(&text, "Python"));
        assert_eq!(level, SkillLevel::Unspecified);
    }

    #[test]
    fn test_level_keyword_must_be_whole_word() {
        let analyzer = ContextAnalyzer::new();
        let (level, _) = analyzer.detect_level(&window("Goodyear uses Terraform", "Terraform"));
        assert_eq!(level, SkillLevel::Unspecified);
    }

    #[test]
    fn test_negation_after_match() {
        let analyzer = ContextAnalyzer::new();
        assert!(analyzer.is_negated(&window("React not required.", "React")));
        assert!(analyzer.is_negated(&window("Go is optional here", "Go")));
    }

    #[test]
    fn test_negation_before_match() {
        let analyzer = ContextAnalyzer::new();
        assert!(analyzer.is_negated(&window("No experience with Java", "Java")));
        assert!(analyzer.is_negated(&window("We don't need Perl", "Perl")));
        assert!(!analyzer.is_negated(&window("Deep experience with Java", "Java")));
    }

    #[test]
    fn test_negation_window_heuristic_boundaries() {
        let analyzer = ContextAnalyzer::new();
        // Cue further than three words after the match is missed
        assert!(!analyzer.is_negated(&window("Scala skills are really not required", "Scala")));
        // Any earlier cue inside the window prefix triggers, even in another sentence
        assert!(analyzer.is_negated(&window("Travel not required. Python daily.", "Python")));
    }

    #[test]
    fn test_importance_tiers() {
        let analyzer = ContextAnalyzer::new();
        assert_eq!(analyzer.importance(&window("Python is required for this role", "Python")), 1.0);
        assert_eq!(analyzer.importance(&window("Docker preferred", "Docker")), 0.7);
        assert_eq!(analyzer.importance(&window("Figma is a plus", "Figma")), 0.4);
        assert_eq!(analyzer.importance(&window("We use Jira", "Jira")), 0.5);
    }

    #[test]
    fn test_importance_is_sentence_scoped() {
        let analyzer = ContextAnalyzer::new();
        let text = "Kotlin is required. We also like Swift.";
        assert_eq!(analyzer.importance(&window(text, "Swift")), 0.5);
        assert_eq!(analyzer.importance(&window(text, "Kotlin")), 1.0);
    }

    #[test]
    fn test_dotted_skill_stays_in_its_sentence() {
        let analyzer = ContextAnalyzer::new();
        let text = "Must know Node.js well";
        let start = text.find("Node.js").unwrap();
        let window = ContextWindow::around(text, start, start + "Node.js".len(), 100);
        assert_eq!(analyzer.importance(&window), 1.0);
    }

    #[test]
    fn test_importance_cues_need_word_boundaries() {
        let analyzer = ContextAnalyzer::new();
        // "keyboard" contains the cue "key"
        assert_eq!(analyzer.importance(&window("Keyboard shortcuts in Vim", "Vim")), 0.5);
    }

    #[test]
    fn test_analyze_combines_checks() {
        let analyzer = ContextAnalyzer::new();
        let assessment = analyzer.analyze(&window("Strong Python skills are essential", "Python"));
        assert_eq!(assessment.level, SkillLevel::Expert);
        assert!(!assessment.negated);
        assert_eq!(assessment.importance, 1.0);
    }
}
