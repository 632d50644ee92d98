//! Output formatters: console, JSON and Markdown renderings of reports

use crate::config::OutputFormat;
use crate::error::{Result, SkillMatcherError};
use crate::output::report::*;
use crate::processing::extractor::{RankedSkill, ResumeSummary};
use crate::processing::scorer::RecommendationTier;
use colored::{Color, Colorize};
use std::path::Path;

/// Trait for rendering reports
pub trait OutputFormatter {
    fn format_report(&self, report: &Report) -> Result<String>;
    fn supports_format(&self) -> OutputFormat;
}

/// Console formatter with colors
pub struct ConsoleFormatter {
    use_colors: bool,
    detailed: bool,
}

/// JSON formatter for scripting and integration
pub struct JsonFormatter {
    pretty: bool,
}

/// Markdown formatter for saved reports
pub struct MarkdownFormatter {
    include_metadata: bool,
}

/// Report generator that coordinates the formatters
pub struct ReportGenerator {
    console_formatter: ConsoleFormatter,
    json_formatter: JsonFormatter,
    markdown_formatter: MarkdownFormatter,
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool, detailed: bool) -> Self {
        Self { use_colors, detailed }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn format_header(&self, title: &str, level: u8) -> String {
        let prefix = match level {
            1 => "█",
            2 => "▓",
            _ => "▒",
        };

        let color = match level {
            1 => Color::Blue,
            2 => Color::Green,
            _ => Color::Yellow,
        };

        if self.use_colors {
            format!("\n{} {}\n", prefix.color(color).bold(), title.color(color).bold())
        } else {
            format!("\n{} {}\n", prefix, title)
        }
    }

    fn format_tier_badge(&self, tier: RecommendationTier) -> String {
        let (badge, color) = match tier {
            RecommendationTier::Excellent => ("EXCELLENT", Color::Green),
            RecommendationTier::Good => ("GOOD", Color::BrightGreen),
            RecommendationTier::Partial => ("PARTIAL", Color::Yellow),
            RecommendationTier::Poor => ("POOR", Color::BrightRed),
        };

        if self.use_colors {
            format!("[{}]", badge.color(color).bold())
        } else {
            format!("[{}]", badge)
        }
    }

    fn format_priority(&self, priority: &str) -> String {
        let color = match priority {
            "HIGH" => Color::Red,
            "MEDIUM" => Color::Yellow,
            _ => Color::White,
        };
        self.colorize(&format!("{:<6}", priority), color)
    }

    fn format_ranked(&self, output: &mut String, skills: &[RankedSkill], label: &str) {
        for (idx, skill) in skills.iter().enumerate() {
            output.push_str(&format!(
                "  {:>2}. {:<32} {} {:.2}  ({})\n",
                idx + 1,
                skill.name,
                label,
                skill.score,
                skill.category
            ));
        }
    }

    fn format_resume_summary(&self, output: &mut String, summary: &ResumeSummary) {
        output.push_str(&format!(
            "Skills found: {} ({} technical, {} soft)\n",
            summary.total_skills, summary.technical_count, summary.soft_count
        ));
        output.push_str(&format!(
            "Levels: {} expert, {} intermediate, {} beginner, {} unspecified\n",
            summary.skill_levels.expert,
            summary.skill_levels.intermediate,
            summary.skill_levels.beginner,
            summary.skill_levels.unspecified
        ));
    }

    fn format_resume(&self, report: &ResumeReport) -> String {
        let mut output = String::new();
        output.push_str(&self.format_header("📄 RESUME SKILL ANALYSIS", 1));
        output.push_str(&self.format_metadata(&report.metadata));

        output.push_str(&self.format_header("Summary", 2));
        self.format_resume_summary(&mut output, &report.summary);

        output.push_str(&self.format_header("Top Skills", 2));
        if report.summary.top_skills.is_empty() {
            output.push_str(&self.colorize("  No skills detected\n", Color::Yellow));
        }
        self.format_ranked(&mut output, &report.summary.top_skills, "confidence");

        if self.detailed && !report.skills.is_empty() {
            output.push_str(&self.format_header("All Mentions", 3));
            for skill in &report.skills {
                output.push_str(&format!(
                    "  • {} [{}] {:.2} via {} \"{}\"\n",
                    self.colorize(&skill.name, Color::Cyan),
                    skill.level,
                    skill.confidence,
                    skill.match_kind,
                    skill.matched_text
                ));
            }
        }
        output
    }

    fn format_job(&self, report: &JobReport) -> String {
        let mut output = String::new();
        output.push_str(&self.format_header("📋 JOB REQUIREMENTS ANALYSIS", 1));
        output.push_str(&self.format_metadata(&report.metadata));

        output.push_str(&self.format_header("Summary", 2));
        output.push_str(&format!(
            "Skills found: {} ({} technical, {} soft)\n",
            report.summary.total_skills_found, report.summary.technical_count, report.summary.soft_count
        ));

        output.push_str(&self.format_header("Most Important Skills", 2));
        if report.summary.top_skills.is_empty() {
            output.push_str(&self.colorize("  No skills detected\n", Color::Yellow));
        }
        self.format_ranked(&mut output, &report.summary.top_skills, "importance");

        if !report.key_phrases.is_empty() {
            output.push_str(&self.format_header("Key Requirements", 3));
            for phrase in &report.key_phrases {
                output.push_str(&format!("  • {}\n", phrase));
            }
        }

        if self.detailed && !report.skills.is_empty() {
            output.push_str(&self.format_header("All Skills", 3));
            for skill in &report.skills {
                output.push_str(&format!(
                    "  • {:<32} importance {:.2}  mentions {}  section {:?}\n",
                    skill.name, skill.importance, skill.mention_count, skill.section
                ));
            }
        }
        output
    }

    fn format_match(&self, report: &MatchReport) -> String {
        let mut output = String::new();
        output.push_str(&self.format_header("🎯 RESUME / JOB MATCH", 1));
        output.push_str(&self.format_metadata(&report.metadata));

        output.push_str(&self.format_header("Result", 2));
        output.push_str(&format!(
            "Overall Score: {}% {}\n",
            report.scores.overall_percentage,
            self.format_tier_badge(report.recommendation.tier)
        ));
        output.push_str(&format!(
            "Importance-weighted: {}% | Coverage: {}% ({}/{} skills)\n",
            report.scores.importance_percentage,
            report.scores.coverage_percentage,
            report.stats.matched_skills,
            report.stats.total_job_skills
        ));
        output.push_str(&format!(
            "Recommendation: {}\n",
            self.colorize(&report.recommendation.message, Color::Cyan)
        ));

        output.push_str(&self.format_header("Matched Skills", 2));
        if report.matches.is_empty() {
            output.push_str("  None\n");
        }
        for skill in &report.matches {
            output.push_str(&format!(
                "  {} {:<32} quality {:.2}  (job {:.2}, resume {:.2})\n",
                self.colorize("✓", Color::Green),
                skill.name,
                skill.match_quality,
                skill.job_importance,
                skill.resume_confidence
            ));
        }

        output.push_str(&self.format_header("Missing Skills", 2));
        if report.missing_skills.is_empty() {
            output.push_str("  None\n");
        }
        for gap in &report.missing_skills {
            output.push_str(&format!(
                "  {} {} {:<32} importance {:.2}\n",
                self.colorize("✗", Color::Red),
                self.format_priority(&gap.priority),
                gap.name,
                gap.importance
            ));
        }

        if self.detailed && !report.extra_skills.is_empty() {
            output.push_str(&self.format_header("Additional Resume Skills", 3));
            for extra in &report.extra_skills {
                output.push_str(&format!("  + {:<32} confidence {:.2}\n", extra.name, extra.confidence));
            }
        }
        output
    }

    fn format_metadata(&self, metadata: &ReportMetadata) -> String {
        let mut line = format!(
            "Generated: {} | Processing time: {}ms",
            metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
            metadata.processing_time_ms
        );
        if let Some(model) = &metadata.embedding_model {
            line.push_str(&format!(" | Semantic model: {}", model));
        }
        line.push('\n');
        line
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_report(&self, report: &Report) -> Result<String> {
        Ok(match report {
            Report::Resume(r) => self.format_resume(r),
            Report::Job(r) => self.format_job(r),
            Report::Match(r) => self.format_match(r),
        })
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Console
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_report(&self, report: &Report) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(report)?)
        } else {
            Ok(serde_json::to_string(report)?)
        }
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Json
    }
}

impl MarkdownFormatter {
    pub fn new(include_metadata: bool) -> Self {
        Self { include_metadata }
    }

    fn metadata_block(&self, metadata: &ReportMetadata) -> String {
        if !self.include_metadata {
            return String::new();
        }
        let files: Vec<String> = metadata
            .source_files
            .iter()
            .map(|f| {
                let name = Path::new(f)
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_else(|| f.clone());
                format!("`{}`", name)
            })
            .collect();
        let mut block = format!(
            "**Generated:** {} | **Processing Time:** {}ms\n",
            metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
            metadata.processing_time_ms
        );
        if !files.is_empty() {
            block.push_str(&format!("**Files:** {}\n", files.join(", ")));
        }
        block.push('\n');
        block
    }

    fn ranked_table(output: &mut String, skills: &[RankedSkill], score_label: &str) {
        output.push_str(&format!("| # | Skill | Category | {} |\n", score_label));
        output.push_str("|---|-------|----------|-------|\n");
        for (idx, skill) in skills.iter().enumerate() {
            output.push_str(&format!(
                "| {} | {} | {} | {:.2} |\n",
                idx + 1,
                skill.name,
                skill.category,
                skill.score
            ));
        }
        output.push('\n');
    }

    fn format_resume(&self, report: &ResumeReport) -> String {
        let mut output = String::from("# Resume Skill Analysis\n\n");
        output.push_str(&self.metadata_block(&report.metadata));

        let summary = &report.summary;
        output.push_str("## Summary\n\n");
        output.push_str(&format!(
            "- **Skills found:** {} ({} technical, {} soft)\n",
            summary.total_skills, summary.technical_count, summary.soft_count
        ));
        output.push_str(&format!(
            "- **Levels:** {} expert, {} intermediate, {} beginner, {} unspecified\n\n",
            summary.skill_levels.expert,
            summary.skill_levels.intermediate,
            summary.skill_levels.beginner,
            summary.skill_levels.unspecified
        ));

        output.push_str("## Top Skills\n\n");
        Self::ranked_table(&mut output, &summary.top_skills, "Confidence");
        output
    }

    fn format_job(&self, report: &JobReport) -> String {
        let mut output = String::from("# Job Requirements Analysis\n\n");
        output.push_str(&self.metadata_block(&report.metadata));

        output.push_str("## Summary\n\n");
        output.push_str(&format!(
            "- **Skills found:** {} ({} technical, {} soft)\n\n",
            report.summary.total_skills_found, report.summary.technical_count, report.summary.soft_count
        ));

        output.push_str("## Most Important Skills\n\n");
        Self::ranked_table(&mut output, &report.summary.top_skills, "Importance");

        if !report.key_phrases.is_empty() {
            output.push_str("## Key Requirements\n\n");
            for phrase in &report.key_phrases {
                output.push_str(&format!("- {}\n", phrase));
            }
            output.push('\n');
        }
        output
    }

    fn format_match(&self, report: &MatchReport) -> String {
        let mut output = String::from("# Resume / Job Match Report\n\n");
        output.push_str(&self.metadata_block(&report.metadata));

        output.push_str("## Result\n\n");
        output.push_str(&format!(
            "**Overall Score:** {}% ({})\n\n",
            report.scores.overall_percentage, report.recommendation.tier
        ));
        output.push_str(&format!("**Recommendation:** {}\n\n", report.recommendation.message));
        output.push_str("| Component | Score |\n");
        output.push_str("|-----------|-------|\n");
        output.push_str(&format!(
            "| Importance-weighted | {}% |\n",
            report.scores.importance_percentage
        ));
        output.push_str(&format!(
            "| Coverage | {}% ({}/{}) |\n\n",
            report.scores.coverage_percentage, report.stats.matched_skills, report.stats.total_job_skills
        ));

        output.push_str("## Matched Skills\n\n");
        if report.matches.is_empty() {
            output.push_str("_None_\n\n");
        } else {
            output.push_str("| Skill | Job Importance | Resume Confidence | Quality |\n");
            output.push_str("|-------|----------------|-------------------|---------|\n");
            for skill in &report.matches {
                output.push_str(&format!(
                    "| {} | {:.2} | {:.2} | {:.2} |\n",
                    skill.name, skill.job_importance, skill.resume_confidence, skill.match_quality
                ));
            }
            output.push('\n');
        }

        output.push_str("## Missing Skills\n\n");
        if report.missing_skills.is_empty() {
            output.push_str("_None_\n\n");
        } else {
            for gap in &report.missing_skills {
                output.push_str(&format!(
                    "- **{}** `{}` (importance {:.2})\n",
                    gap.priority, gap.name, gap.importance
                ));
            }
            output.push('\n');
        }

        if !report.extra_skills.is_empty() {
            output.push_str("## Additional Resume Skills\n\n");
            let names: Vec<&str> = report.extra_skills.iter().map(|e| e.name.as_str()).collect();
            output.push_str(&names.join(", "));
            output.push_str("\n\n");
        }
        output
    }
}

impl OutputFormatter for MarkdownFormatter {
    fn format_report(&self, report: &Report) -> Result<String> {
        Ok(match report {
            Report::Resume(r) => self.format_resume(r),
            Report::Job(r) => self.format_job(r),
            Report::Match(r) => self.format_match(r),
        })
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Markdown
    }
}

impl ReportGenerator {
    pub fn new() -> Self {
        Self::with_options(true, false, true, true)
    }

    pub fn with_options(use_colors: bool, detailed: bool, pretty_json: bool, include_metadata: bool) -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(use_colors, detailed),
            json_formatter: JsonFormatter::new(pretty_json),
            markdown_formatter: MarkdownFormatter::new(include_metadata),
        }
    }

    pub fn generate_report(&self, report: &Report, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Console => self.console_formatter.format_report(report),
            OutputFormat::Json => self.json_formatter.format_report(report),
            OutputFormat::Markdown => self.markdown_formatter.format_report(report),
        }
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

pub fn save_report_to_file(content: &str, file_path: &Path) -> Result<()> {
    use std::fs;
    if let Some(parent) = file_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(file_path, content).map_err(|e| {
        SkillMatcherError::OutputFormatting(format!("Failed to write {}: {}", file_path.display(), e))
    })
}

pub fn suggest_filename(format: OutputFormat, source_name: &str, timestamp: bool) -> String {
    let base_name = Path::new(source_name)
        .file_stem()
        .unwrap_or_default()
        .to_string_lossy();

    let timestamp_suffix = if timestamp {
        format!("_{}", chrono::Utc::now().format("%Y%m%d_%H%M%S"))
    } else {
        String::new()
    };

    match format {
        OutputFormat::Console => format!("{}_skills{}.txt", base_name, timestamp_suffix),
        OutputFormat::Json => format!("{}_skills{}.json", base_name, timestamp_suffix),
        OutputFormat::Markdown => format!("{}_skills{}.md", base_name, timestamp_suffix),
    }
}
