//! Bidirectional acronym <-> skill name resolution
//!
//! Manual pairs are registered first, then acronyms derived from every
//! multi-word skill name in taxonomy order. A later registration of the same
//! acronym replaces the earlier one; every contested acronym is recorded so
//! callers can see which skills lost.

use crate::processing::dictionary::{base_name, SkillDefinition, SkillDictionary};
use crate::processing::text_processor::normalize_phrase;
use log::debug;
use std::collections::{BTreeMap, HashMap};

/// Well-known (expansion, acronym) pairs
pub const MANUAL_ACRONYMS: &[(&str, &str)] = &[
    ("Amazon Web Services", "AWS"),
    ("Artificial Intelligence", "AI"),
    ("Machine Learning", "ML"),
    ("Natural Language Processing (NLP)", "NLP"),
    ("User Interface", "UI"),
    ("User Experience", "UX"),
    ("Continuous Integration", "CI"),
    ("Continuous Deployment", "CD"),
    ("Infrastructure as Code (IaC)", "IaC"),
];

/// Derived acronyms that spell ordinary English words are never registered
const FUNCTION_WORDS: &[&str] = &[
    "an", "as", "at", "be", "by", "do", "go", "if", "in", "is", "it", "me", "my", "no", "of", "on",
    "or", "so", "to", "up", "us", "we",
];

#[derive(Debug, Clone, Default)]
pub struct AcronymResolver {
    /// Lower-cased surface form (acronym or expansion) -> resolved skill
    forward: HashMap<String, SkillDefinition>,
    /// Lower-cased canonical name -> alternate surface forms
    aliases: HashMap<String, Vec<String>>,
    /// Lower-cased acronym -> every skill that claimed it, in registration order
    claims: BTreeMap<String, Vec<String>>,
}

impl AcronymResolver {
    pub fn build(dictionary: &SkillDictionary) -> Self {
        let mut resolver = Self::default();

        for (expansion, acronym) in MANUAL_ACRONYMS {
            let target = dictionary
                .lookup(acronym)
                .or_else(|| dictionary.lookup(expansion))
                .cloned()
                .unwrap_or_else(|| SkillDefinition::synthesized(*expansion));

            resolver.register_acronym(acronym, &target);
            resolver.register_expansion(expansion, &target);
            resolver.register_expansion(&base_name(expansion), &target);
        }

        for definition in dictionary.iter() {
            if let Some(acronym) = derive_acronym(&definition.name) {
                if FUNCTION_WORDS.contains(&acronym.to_lowercase().as_str()) {
                    debug!("Skipping derived acronym '{}' for {}", acronym, definition.name);
                    continue;
                }
                resolver.register_acronym(&acronym, definition);
            }
        }

        for (acronym, claimants) in resolver.ambiguous_acronyms() {
            debug!("Acronym '{}' claimed by {:?}; resolves to the last", acronym, claimants);
        }

        resolver
    }

    fn register_acronym(&mut self, acronym: &str, target: &SkillDefinition) {
        let key = acronym.to_lowercase();
        let target_key = target.key();

        let claimants = self.claims.entry(key.clone()).or_default();
        if !claimants.iter().any(|c| c.to_lowercase() == target_key) {
            claimants.push(target.name.clone());
        }

        if let Some(previous) = self.forward.insert(key.clone(), target.clone()) {
            if previous.key() != target_key {
                if let Some(list) = self.aliases.get_mut(&previous.key()) {
                    list.retain(|alias| alias.to_lowercase() != key);
                }
            }
        }
        self.push_alias(&target_key, acronym);
    }

    fn register_expansion(&mut self, expansion: &str, target: &SkillDefinition) {
        let target_key = target.key();
        for form in [expansion.to_lowercase(), normalize_phrase(expansion)] {
            if form.is_empty() {
                continue;
            }
            self.forward.insert(form, target.clone());
        }
        self.push_alias(&target_key, expansion);
    }

    fn push_alias(&mut self, target_key: &str, form: &str) {
        if form.to_lowercase() == target_key || form.trim().is_empty() {
            return;
        }
        let list = self.aliases.entry(target_key.to_string()).or_default();
        if !list.iter().any(|existing| existing.eq_ignore_ascii_case(form)) {
            list.push(form.to_string());
        }
    }

    /// Resolve an acronym or an expansion, case-insensitively, to its skill
    pub fn resolve(&self, phrase: &str) -> Option<&SkillDefinition> {
        let key = phrase.trim().to_lowercase();
        self.forward
            .get(&key)
            .or_else(|| self.forward.get(&normalize_phrase(&key)))
    }

    /// Alternate surface forms of a canonical skill name
    pub fn aliases_for(&self, name: &str) -> &[String] {
        self.aliases
            .get(&name.to_lowercase())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Acronyms claimed by more than one skill, with claimants in registration order
    pub fn ambiguous_acronyms(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.claims
            .iter()
            .filter(|(_, claimants)| claimants.len() > 1)
            .map(|(acronym, claimants)| (acronym.as_str(), claimants.as_slice()))
    }

    /// Every registered acronym with the skill it resolves to
    pub fn acronyms(&self) -> impl Iterator<Item = (&str, &SkillDefinition)> {
        self.claims
            .keys()
            .filter_map(|acronym| self.forward.get(acronym).map(|def| (acronym.as_str(), def)))
    }

    pub fn len(&self) -> usize {
        self.forward.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }
}

/// First letters of a multi-word name, parenthetical removed; `None` for single words
pub fn derive_acronym(name: &str) -> Option<String> {
    let base = base_name(name);
    let words: Vec<&str> = base.split_whitespace().collect();
    if words.len() < 2 {
        return None;
    }
    let acronym: String = words
        .iter()
        .filter_map(|word| word.chars().next())
        .flat_map(char::to_uppercase)
        .collect();
    (acronym.chars().count() >= 2).then_some(acronym)
}
