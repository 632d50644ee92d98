//! Edit-distance matching for phrases with no exact or acronym hit

use crate::processing::dictionary::{SkillDefinition, SkillDictionary};
use crate::processing::exact_matcher::{Candidate, MatchSource};
use crate::processing::text_processor::NGram;
use strsim::levenshtein;

/// Everyday words within a couple of edits of a skill name ("must" / Rust, "best" / Jest).
/// Sorted for binary search.
const COMMON_WORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "all", "also", "an", "and", "any", "are", "area",
    "areas", "as", "at", "away", "back", "base", "based", "be", "been", "before", "being", "best",
    "better", "both", "build", "built", "but", "by", "call", "can", "canvas", "case", "cases",
    "clear", "code", "confidence", "core", "could", "data", "date", "days", "deal", "does", "done",
    "down", "each", "easy", "edit", "edits", "else", "empty", "even", "ever", "every", "exact",
    "fast", "few", "file", "files", "find", "first", "for", "from", "full", "gain", "gave", "get",
    "give", "goal", "goals", "good", "great", "group", "grow", "had", "hand", "hard", "has", "have",
    "having", "help", "here", "high", "hold", "how", "idea", "ideal", "ideas", "initialize", "into",
    "is", "it", "its", "join", "junior", "just", "keep", "key", "kind", "last", "lava", "lead",
    "least", "less", "level", "like", "line", "list", "lists", "live", "long", "look", "made",
    "main", "make", "many", "may", "mean", "meet", "more", "most", "much", "must", "need", "needs",
    "new", "next", "nice", "none", "not", "note", "now", "of", "off", "often", "on", "once", "one",
    "only", "open", "or", "our", "out", "over", "own", "part", "pass", "past", "peer", "peers",
    "plan", "plus", "post", "posts", "rate", "rates", "reach", "read", "ready", "real", "reset",
    "rest", "result", "results", "role", "roles", "root", "rule", "rules", "run", "runs", "same",
    "scale", "scan", "score", "scores", "scoring", "seen", "self", "senior", "set", "sets", "shift",
    "should", "show", "side", "size", "skill", "skills", "soft", "some", "soon", "still", "string",
    "strings", "strong", "such", "sure", "take", "task", "tasks", "team", "teams", "test",
    "testing", "tests", "text", "than", "that", "the", "their", "them", "then", "there", "these",
    "they", "this", "those", "time", "tool", "tools", "travel", "true", "trust", "turn", "type",
    "under", "unit", "upon", "used", "user", "uses", "using", "very", "view", "want", "was", "way",
    "ways", "well", "went", "were", "west", "what", "when", "where", "which", "while", "who",
    "will", "with", "within", "work", "works", "world", "would", "year", "years", "yet", "you",
    "your",
];

/// A phrase that starts or ends with a common word is never a misspelled skill
fn is_common_phrase(phrase: &str) -> bool {
    let first = phrase.split(' ').next().unwrap_or(phrase);
    let last = phrase.rsplit(' ').next().unwrap_or(phrase);
    COMMON_WORDS.binary_search(&first).is_ok() || COMMON_WORDS.binary_search(&last).is_ok()
}

pub struct FuzzyMatcher<'a> {
    /// (definition, lower-cased name, char count), in dictionary order
    names: Vec<(&'a SkillDefinition, String, usize)>,
    max_distance: usize,
    min_length: usize,
}

impl<'a> FuzzyMatcher<'a> {
    pub fn new(dictionary: &'a SkillDictionary, max_distance: usize, min_length: usize) -> Self {
        let names = dictionary
            .iter()
            .map(|def| {
                let key = def.key();
                let len = key.chars().count();
                (def, key, len)
            })
            .collect();

        Self {
            names,
            max_distance,
            min_length,
        }
    }

    /// Base confidence for an accepted edit distance
    pub fn confidence_for(&self, distance: usize) -> f32 {
        1.0 - distance as f32 / (self.max_distance as f32 + 1.0)
    }

    /// Every dictionary skill within the distance threshold, closest first
    pub fn match_phrase(&self, source_text: &str, gram: &NGram) -> Vec<Candidate> {
        let phrase_len = gram.text.chars().count();
        if phrase_len < self.min_length || is_common_phrase(&gram.text) {
            return Vec::new();
        }

        let mut hits: Vec<(usize, &SkillDefinition)> = Vec::new();
        for (definition, name, name_len) in &self.names {
            if *name_len < self.min_length {
                continue;
            }
            if name_len.abs_diff(phrase_len) > self.max_distance {
                continue;
            }
            let distance = levenshtein(&gram.text, name);
            if distance <= self.max_distance {
                hits.push((distance, *definition));
            }
        }

        // Stable: equal distances keep dictionary order
        hits.sort_by_key(|(distance, _)| *distance);

        hits.into_iter()
            .map(|(distance, definition)| {
                Candidate::new(
                    definition.clone(),
                    source_text,
                    gram,
                    self.confidence_for(distance),
                    MatchSource::Fuzzy { distance },
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::text_processor::{ngrams, tokenize};

    fn matches(text: &str) -> Vec<Candidate> {
        let dictionary = SkillDictionary::standard();
        let matcher = FuzzyMatcher::new(&dictionary, 2, 4);
        let grams = ngrams(&tokenize(text), 1);
        grams.iter().flat_map(|g| matcher.match_phrase(text, g)).collect()
    }

    #[test]
    fn test_typo_is_matched_with_distance_confidence() {
        let found = matches("Kubernetse");
        let best = found.first().unwrap();
        assert_eq!(best.skill.name, "Kubernetes");
        assert_eq!(best.source, MatchSource::Fuzzy { distance: 2 });
        assert!((best.base_confidence - (1.0 - 2.0 / 3.0)).abs() < 1e-6);
        assert_eq!(best.matched_text, "Kubernetse");
    }

    #[test]
    fn test_single_edit_scores_higher() {
        let found = matches("Pythn");
        let best = found.first().unwrap();
        assert_eq!(best.skill.name, "Python");
        assert!((best.base_confidence - 2.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_short_words_never_fuzzy_match() {
        // "Rust"/"Ruby" and "Go"/"R" are too close to everyday short words
        assert!(matches("bus").is_empty());
        assert!(matches("to").is_empty());
    }

    #[test]
    fn test_transposed_letters_are_matched() {
        let python = matches("Pyhton");
        assert_eq!(python[0].skill.name, "Python");
        assert_eq!(python[0].source, MatchSource::Fuzzy { distance: 2 });
        assert_eq!(matches("Djagno")[0].skill.name, "Django");
        assert_eq!(matches("Djngo")[0].skill.name, "Django");
    }

    #[test]
    fn test_common_words_never_fuzzy_match() {
        for word in ["must", "best", "string", "canvas", "reach", "have", "data", "strong", "testing"] {
            assert!(matches(word).is_empty(), "{} matched {:?}", word, matches(word).first().map(|c| &c.skill.name));
        }
        // "as code" is one edit from VS Code
        let text = "Infrastructure as code";
        let dictionary = SkillDictionary::standard();
        let matcher = FuzzyMatcher::new(&dictionary, 2, 4);
        let grams = ngrams(&tokenize(text), 2);
        assert!(grams.iter().all(|g| g.text != "as code" || matcher.match_phrase(text, g).is_empty()));
    }

    #[test]
    fn test_common_word_list_is_sorted() {
        assert!(COMMON_WORDS.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_distance_beyond_threshold_rejected() {
        assert!(matches("Kbrnts").is_empty());
    }

    #[test]
    fn test_candidates_sorted_closest_first() {
        let found = matches("Swifts");
        assert!(!found.is_empty());
        let distances: Vec<usize> = found
            .iter()
            .map(|c| match c.source {
                MatchSource::Fuzzy { distance } => distance,
                _ => usize::MAX,
            })
            .collect();
        let mut sorted = distances.clone();
        sorted.sort();
        assert_eq!(distances, sorted);
        assert_eq!(found[0].skill.name, "Swift");
    }
}
