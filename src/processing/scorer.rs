//! Resume-to-job compatibility scoring

use crate::processing::clamp_unit;
use crate::processing::context::SkillLevel;
use crate::processing::extractor::ResumeSkillProfile;
use crate::processing::job_analyzer::JobSkillProfile;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Missing skills at or above this importance are critical gaps
pub const CRITICAL_IMPORTANCE: f32 = 0.7;

const IMPORTANCE_WEIGHT: f32 = 0.7;
const COVERAGE_WEIGHT: f32 = 0.3;

/// A skill with the single weight the scorer needs: confidence for resumes, importance for jobs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillWeight {
    pub name: String,
    pub weight: f32,
    pub level: SkillLevel,
}

impl SkillWeight {
    pub fn new(name: impl Into<String>, weight: f32, level: SkillLevel) -> Self {
        Self {
            name: name.into(),
            weight,
            level,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillMatch {
    pub skill_name: String,
    pub job_importance: f32,
    pub resume_confidence: f32,
    pub job_level: SkillLevel,
    pub resume_level: SkillLevel,
    pub match_quality: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissingSkill {
    pub skill_name: String,
    pub importance: f32,
    pub level: SkillLevel,
}

impl MissingSkill {
    pub fn is_critical(&self) -> bool {
        self.importance >= CRITICAL_IMPORTANCE
    }

    /// Report label: HIGH / MEDIUM / LOW
    pub fn priority(&self) -> &'static str {
        if self.importance >= 0.7 {
            "HIGH"
        } else if self.importance >= 0.4 {
            "MEDIUM"
        } else {
            "LOW"
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtraSkill {
    pub skill_name: String,
    pub confidence: f32,
    pub level: SkillLevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchStats {
    pub total_job_skills: usize,
    pub matched_skills: usize,
    pub missing_skills: usize,
    pub extra_skills: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub matches: Vec<SkillMatch>,
    pub missing_skills: Vec<MissingSkill>,
    pub extra_skills: Vec<ExtraSkill>,
    pub overall_score: f32,
    pub importance_score: f32,
    pub coverage_score: f32,
    pub stats: MatchStats,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationTier {
    Excellent,
    Good,
    Partial,
    Poor,
}

impl RecommendationTier {
    pub fn from_score(score: f32) -> Self {
        if score >= 0.8 {
            RecommendationTier::Excellent
        } else if score >= 0.6 {
            RecommendationTier::Good
        } else if score >= 0.4 {
            RecommendationTier::Partial
        } else {
            RecommendationTier::Poor
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            RecommendationTier::Excellent => "Strong candidate. Consider for interview.",
            RecommendationTier::Good => "Solid candidate with some gaps worth probing.",
            RecommendationTier::Partial => "Potential candidate; training would be needed for missing skills.",
            RecommendationTier::Poor => "Significant skill gaps for this role.",
        }
    }
}

impl fmt::Display for RecommendationTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RecommendationTier::Excellent => "excellent match",
            RecommendationTier::Good => "good match",
            RecommendationTier::Partial => "partial match",
            RecommendationTier::Poor => "poor match",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub tier: RecommendationTier,
    pub message: String,
    pub critical_gap_count: usize,
    pub critical_gaps: Vec<String>,
}

impl MatchResult {
    pub fn recommendation(&self) -> Recommendation {
        let tier = RecommendationTier::from_score(self.overall_score);
        let critical_gaps: Vec<String> = self
            .missing_skills
            .iter()
            .filter(|m| m.is_critical())
            .map(|m| m.skill_name.clone())
            .collect();

        let mut message = tier.message().to_string();
        match critical_gaps.len() {
            0 => {}
            1 => message.push_str(" Note: 1 critical skill is missing."),
            n => message.push_str(&format!(" Note: {} critical skills are missing.", n)),
        }

        Recommendation {
            tier,
            message,
            critical_gap_count: critical_gaps.len(),
            critical_gaps,
        }
    }
}

/// Pure function of two skill sets; never fails
#[derive(Debug, Clone, Copy, Default)]
pub struct MatchScorer;

impl MatchScorer {
    pub fn new() -> Self {
        Self
    }

    pub fn score(&self, resume: &ResumeSkillProfile, job: &JobSkillProfile) -> MatchResult {
        let resume_weights: Vec<SkillWeight> = resume
            .mentions()
            .iter()
            .map(|m| SkillWeight::new(m.skill.name.clone(), m.confidence, m.skill_level))
            .collect();
        let job_weights: Vec<SkillWeight> = job
            .skills()
            .iter()
            .map(|s| SkillWeight::new(s.mention.skill.name.clone(), s.importance, s.mention.skill_level))
            .collect();
        self.score_weights(&resume_weights, &job_weights)
    }

    /// Score raw (name, weight) sets; names compare case-insensitively, duplicates keep the larger weight
    pub fn score_weights(&self, resume: &[SkillWeight], job: &[SkillWeight]) -> MatchResult {
        let resume_set = index_by_name(resume);
        let job_set = index_by_name(job);

        let mut matches = Vec::new();
        let mut missing_skills = Vec::new();
        let mut matched_importance = 0.0f32;
        let mut total_importance = 0.0f32;

        for (key, job_skill) in &job_set {
            let job_importance = clamp_unit(job_skill.weight);
            total_importance += job_importance;

            match resume_set.get(key) {
                Some(resume_skill) => {
                    let resume_confidence = clamp_unit(resume_skill.weight);
                    matched_importance += job_importance;
                    matches.push(SkillMatch {
                        skill_name: job_skill.name.clone(),
                        job_importance,
                        resume_confidence,
                        job_level: job_skill.level,
                        resume_level: resume_skill.level,
                        match_quality: clamp_unit((job_importance + resume_confidence) / 2.0),
                    });
                }
                None => missing_skills.push(MissingSkill {
                    skill_name: job_skill.name.clone(),
                    importance: job_importance,
                    level: job_skill.level,
                }),
            }
        }

        let mut extra_skills: Vec<ExtraSkill> = resume_set
            .iter()
            .filter(|(key, _)| !job_set.contains_key(*key))
            .map(|(_, skill)| ExtraSkill {
                skill_name: skill.name.clone(),
                confidence: clamp_unit(skill.weight),
                level: skill.level,
            })
            .collect();

        // Name as tie-breaker keeps output independent of hash order
        matches.sort_by(|a, b| {
            b.match_quality
                .total_cmp(&a.match_quality)
                .then_with(|| a.skill_name.cmp(&b.skill_name))
        });
        missing_skills.sort_by(|a, b| {
            b.importance
                .total_cmp(&a.importance)
                .then_with(|| a.skill_name.cmp(&b.skill_name))
        });
        extra_skills.sort_by(|a, b| {
            b.confidence
                .total_cmp(&a.confidence)
                .then_with(|| a.skill_name.cmp(&b.skill_name))
        });

        let importance_score = if total_importance > 0.0 {
            clamp_unit(matched_importance / total_importance)
        } else {
            0.0
        };
        let coverage_score = if job_set.is_empty() {
            0.0
        } else {
            clamp_unit(matches.len() as f32 / job_set.len() as f32)
        };
        let overall_score = clamp_unit(importance_score * IMPORTANCE_WEIGHT + coverage_score * COVERAGE_WEIGHT);

        let stats = MatchStats {
            total_job_skills: job_set.len(),
            matched_skills: matches.len(),
            missing_skills: missing_skills.len(),
            extra_skills: extra_skills.len(),
        };

        MatchResult {
            matches,
            missing_skills,
            extra_skills,
            overall_score,
            importance_score,
            coverage_score,
            stats,
        }
    }
}

fn index_by_name(skills: &[SkillWeight]) -> HashMap<String, &SkillWeight> {
    let mut index: HashMap<String, &SkillWeight> = HashMap::new();
    for skill in skills {
        let key = skill.name.trim().to_lowercase();
        if key.is_empty() {
            continue;
        }
        match index.get(&key) {
            Some(existing) if existing.weight >= skill.weight => {}
            _ => {
                index.insert(key, skill);
            }
        }
    }
    index
}
