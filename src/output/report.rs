//! Report structures built from analysis results

use crate::processing::context::SkillLevel;
use crate::processing::dictionary::{SkillCategory, Subcategory};
use crate::processing::extractor::{ResumeSkillProfile, ResumeSummary, SkillMention};
use crate::processing::job_analyzer::{JobAnalysis, JobSkillMention, JobSummary, RequirementSection};
use crate::processing::scorer::{MatchResult, MatchStats, Recommendation};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Report metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// When the report was generated
    pub generated_at: DateTime<Utc>,

    /// Version of the matcher used
    pub matcher_version: String,

    /// Documents analyzed, in command-line order
    pub source_files: Vec<String>,

    /// Total processing time
    pub processing_time_ms: u64,

    /// Embedding model used for the semantic pass, if any
    pub embedding_model: Option<String>,
}

impl ReportMetadata {
    pub fn new(source_files: Vec<String>, processing_time: Duration, embedding_model: Option<String>) -> Self {
        Self {
            generated_at: Utc::now(),
            matcher_version: env!("CARGO_PKG_VERSION").to_string(),
            source_files,
            processing_time_ms: processing_time.as_millis() as u64,
            embedding_model,
        }
    }
}

/// One detected skill as shown in a resume report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillEntry {
    pub name: String,
    pub category: SkillCategory,
    pub subcategory: Subcategory,
    pub level: SkillLevel,
    pub confidence: f32,
    pub matched_text: String,
    /// How the skill was recognized (exact, acronym, fuzzy, semantic)
    pub match_kind: String,
    pub context: String,
}

impl From<&SkillMention> for SkillEntry {
    fn from(mention: &SkillMention) -> Self {
        Self {
            name: mention.skill.name.clone(),
            category: mention.skill.category,
            subcategory: mention.skill.subcategory,
            level: mention.skill_level,
            confidence: mention.confidence,
            matched_text: mention.matched_text.clone(),
            match_kind: mention.source.label().to_string(),
            context: mention.context.text.trim().to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobSkillEntry {
    pub name: String,
    pub category: SkillCategory,
    pub importance: f32,
    pub mention_count: usize,
    pub section: RequirementSection,
    pub level: SkillLevel,
}

impl From<&JobSkillMention> for JobSkillEntry {
    fn from(skill: &JobSkillMention) -> Self {
        Self {
            name: skill.mention.skill.name.clone(),
            category: skill.mention.skill.category,
            importance: skill.importance,
            mention_count: skill.mention_count,
            section: skill.section,
            level: skill.mention.skill_level,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResumeReport {
    pub summary: ResumeSummary,
    pub skills: Vec<SkillEntry>,
    pub metadata: ReportMetadata,
}

impl ResumeReport {
    pub fn new(profile: &ResumeSkillProfile, top_n: usize, metadata: ReportMetadata) -> Self {
        Self {
            summary: profile.summary(top_n),
            skills: profile.mentions().iter().map(SkillEntry::from).collect(),
            metadata,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobReport {
    pub summary: JobSummary,
    pub skills: Vec<JobSkillEntry>,
    pub key_phrases: Vec<String>,
    pub metadata: ReportMetadata,
}

impl JobReport {
    pub fn new(analysis: &JobAnalysis, metadata: ReportMetadata) -> Self {
        Self {
            summary: analysis.summary.clone(),
            skills: analysis.skills.skills().iter().map(JobSkillEntry::from).collect(),
            key_phrases: analysis.key_phrases.clone(),
            metadata,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchedSkillEntry {
    pub name: String,
    pub job_importance: f32,
    pub resume_confidence: f32,
    pub match_quality: f32,
    pub resume_level: SkillLevel,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GapEntry {
    pub name: String,
    pub importance: f32,
    /// HIGH / MEDIUM / LOW
    pub priority: String,
    pub critical: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtraSkillEntry {
    pub name: String,
    pub confidence: f32,
}

/// Percentages shown in match reports
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub overall_percentage: u8,
    pub importance_percentage: u8,
    pub coverage_percentage: u8,
}

impl ScoreBreakdown {
    fn from_result(result: &MatchResult) -> Self {
        Self {
            overall_percentage: to_percentage(result.overall_score),
            importance_percentage: to_percentage(result.importance_score),
            coverage_percentage: to_percentage(result.coverage_score),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchReport {
    pub scores: ScoreBreakdown,
    pub overall_score: f32,
    pub recommendation: Recommendation,
    pub stats: MatchStats,
    pub matches: Vec<MatchedSkillEntry>,
    pub missing_skills: Vec<GapEntry>,
    pub extra_skills: Vec<ExtraSkillEntry>,
    pub resume_summary: ResumeSummary,
    pub job_summary: JobSummary,
    pub metadata: ReportMetadata,
}

impl MatchReport {
    pub fn new(
        result: &MatchResult,
        resume: &ResumeSkillProfile,
        job: &JobAnalysis,
        top_n: usize,
        metadata: ReportMetadata,
    ) -> Self {
        let matches = result
            .matches
            .iter()
            .map(|m| MatchedSkillEntry {
                name: m.skill_name.clone(),
                job_importance: m.job_importance,
                resume_confidence: m.resume_confidence,
                match_quality: m.match_quality,
                resume_level: m.resume_level,
            })
            .collect();

        let missing_skills = result
            .missing_skills
            .iter()
            .map(|m| GapEntry {
                name: m.skill_name.clone(),
                importance: m.importance,
                priority: m.priority().to_string(),
                critical: m.is_critical(),
            })
            .collect();

        let extra_skills = result
            .extra_skills
            .iter()
            .map(|e| ExtraSkillEntry {
                name: e.skill_name.clone(),
                confidence: e.confidence,
            })
            .collect();

        Self {
            scores: ScoreBreakdown::from_result(result),
            overall_score: result.overall_score,
            recommendation: result.recommendation(),
            stats: result.stats,
            matches,
            missing_skills,
            extra_skills,
            resume_summary: resume.summary(top_n),
            job_summary: job.summary.clone(),
            metadata,
        }
    }
}

/// Any report the CLI can render
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "report", rename_all = "snake_case")]
pub enum Report {
    Resume(ResumeReport),
    Job(JobReport),
    Match(MatchReport),
}

impl Report {
    pub fn metadata(&self) -> &ReportMetadata {
        match self {
            Report::Resume(r) => &r.metadata,
            Report::Job(r) => &r.metadata,
            Report::Match(r) => &r.metadata,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Report::Resume(_) => "resume",
            Report::Job(_) => "job",
            Report::Match(_) => "match",
        }
    }
}

pub(crate) fn to_percentage(score: f32) -> u8 {
    (score.clamp(0.0, 1.0) * 100.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExtractionConfig;
    use crate::processing::extractor::SkillExtractor;
    use crate::processing::job_analyzer::JobRequirementsAnalyzer;
    use crate::processing::registry::SkillRegistry;
    use crate::processing::scorer::MatchScorer;
    use std::sync::Arc;

    fn metadata() -> ReportMetadata {
        ReportMetadata::new(vec!["resume.txt".to_string()], Duration::from_millis(12), None)
    }

    #[test]
    fn test_match_report_from_analysis() {
        let registry = Arc::new(SkillRegistry::new());
        let extractor = SkillExtractor::new(registry.clone(), ExtractionConfig::default());
        let analyzer = JobRequirementsAnalyzer::new(registry, ExtractionConfig::default());

        let resume = extractor.extract_resume("Expert in Python and Docker.");
        let job = analyzer.analyze("Required: Python and Kubernetes.");
        let result = MatchScorer::new().score(&resume, &job.skills);

        let report = MatchReport::new(&result, &resume, &job, 5, metadata());
        assert_eq!(report.stats.matched_skills, 1);
        assert_eq!(report.matches[0].name, "Python");
        assert_eq!(report.missing_skills[0].name, "Kubernetes");
        assert_eq!(report.missing_skills[0].priority, "HIGH");
        assert!(report.missing_skills[0].critical);
        assert_eq!(report.scores.overall_percentage, to_percentage(result.overall_score));
        assert_eq!(report.metadata.processing_time_ms, 12);
    }

    #[test]
    fn test_resume_report_entries() {
        let registry = Arc::new(SkillRegistry::new());
        let extractor = SkillExtractor::new(registry, ExtractionConfig::default());
        let profile = extractor.extract_resume("Advanced knowledge of Kubernetse.");

        let report = ResumeReport::new(&profile, 3, metadata());
        assert_eq!(report.skills.len(), 1);
        assert_eq!(report.skills[0].name, "Kubernetes");
        assert_eq!(report.skills[0].match_kind, "fuzzy");
        assert_eq!(report.skills[0].level, SkillLevel::Expert);
    }

    #[test]
    fn test_report_serializes_with_kind_tag() {
        let report = Report::Resume(ResumeReport::new(&ResumeSkillProfile::default(), 3, metadata()));
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["report"], "resume");
        assert_eq!(report.kind(), "resume");
        assert_eq!(to_percentage(0.581), 58);
        assert_eq!(to_percentage(1.7), 100);
    }
}
