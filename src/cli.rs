//! CLI interface for the skill matcher

use crate::config::OutputFormat;
use crate::processing::dictionary::SkillCategory;
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};

/// Extensions accepted for resumes and job postings
pub const SUPPORTED_EXTENSIONS: &[&str] = &["txt", "md", "markdown"];

#[derive(Parser)]
#[command(name = "skill-matcher")]
#[command(about = "Skill extraction and resume-to-job compatibility scoring")]
#[command(
    long_about = "Extract skills from resumes and job postings with exact, acronym, fuzzy and optional semantic matching, then score how well a resume covers a job's requirements"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

/// Options shared by every analysis command
#[derive(Args, Debug, Clone)]
pub struct ReportOptions {
    /// Output format: console, json, markdown (defaults to the configured format)
    #[arg(short, long, value_parser = parse_output_format)]
    pub format: Option<OutputFormat>,

    /// Number of top skills to list
    #[arg(short, long)]
    pub top: Option<usize>,

    /// Also match phrases semantically with the configured embedding model
    #[arg(long)]
    pub semantic: bool,

    /// Show every mention instead of only the summary
    #[arg(short, long)]
    pub detailed: bool,

    /// Save output to file
    #[arg(short, long)]
    pub save: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Extract and summarize the skills in a resume
    Resume {
        /// Path to resume file (TXT, MD)
        file: PathBuf,

        #[command(flatten)]
        options: ReportOptions,
    },

    /// Extract job requirements and rank them by importance
    Job {
        /// Path to job description file (TXT, MD)
        file: PathBuf,

        #[command(flatten)]
        options: ReportOptions,
    },

    /// Score a resume against a job description
    Match {
        /// Path to resume file (TXT, MD)
        #[arg(short, long)]
        resume: PathBuf,

        /// Path to job description file (TXT, MD)
        #[arg(short, long)]
        job: PathBuf,

        #[command(flatten)]
        options: ReportOptions,
    },

    /// List the built-in skill taxonomy
    Skills {
        /// Only show one category: technical or soft
        #[arg(long, value_parser = parse_category)]
        category: Option<SkillCategory>,

        /// Show the acronym table instead of skill names
        #[arg(long)]
        acronyms: bool,
    },

    /// Embedding model management commands
    Models {
        #[command(subcommand)]
        action: ModelAction,
    },

    /// Show configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
pub enum ModelAction {
    /// List known embedding models and their download status
    List,

    /// Download an embedding model
    Download {
        /// Model id, display name or HuggingFace repo ID
        model: String,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Reset configuration to defaults
    Reset,

    /// Print the configuration file location
    Path,
}

/// Parse and validate output format
pub fn parse_output_format(format: &str) -> Result<OutputFormat, String> {
    match format.to_lowercase().as_str() {
        "console" => Ok(OutputFormat::Console),
        "json" => Ok(OutputFormat::Json),
        "markdown" | "md" => Ok(OutputFormat::Markdown),
        _ => Err(format!(
            "Invalid output format: {}. Supported: console, json, markdown",
            format
        )),
    }
}

pub fn parse_category(category: &str) -> Result<SkillCategory, String> {
    category.parse().map_err(|e: crate::error::SkillMatcherError| e.to_string())
}

/// Validate file extension
pub fn validate_file_extension(path: &Path, allowed_extensions: &[&str]) -> Result<(), String> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => {
            if allowed_extensions.contains(&ext.to_lowercase().as_str()) {
                Ok(())
            } else {
                Err(format!(
                    "Unsupported file extension: .{}. Allowed: {}",
                    ext,
                    allowed_extensions.join(", ")
                ))
            }
        }
        None => Err("File has no extension".to_string()),
    }
}
