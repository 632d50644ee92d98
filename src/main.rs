//! skill-matcher: skill extraction and resume-to-job compatibility scoring

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, warn};
use skill_matcher::cli::{self, Cli, Commands, ConfigAction, ModelAction, ReportOptions};
use skill_matcher::config::{Config, OutputFormat};
use skill_matcher::error::{Result, SkillMatcherError};
use skill_matcher::input::InputManager;
use skill_matcher::output::report::{JobReport, MatchReport, Report, ReportMetadata, ResumeReport};
use skill_matcher::output::{save_report_to_file, ReportGenerator};
use skill_matcher::processing::dictionary::{SkillCategory, SkillDictionary};
use skill_matcher::processing::embedding_manager::EmbeddingModelManager;
use skill_matcher::processing::extractor::SkillExtractor;
use skill_matcher::processing::job_analyzer::JobRequirementsAnalyzer;
use skill_matcher::processing::registry::SkillRegistry;
use skill_matcher::processing::scorer::MatchScorer;
use std::path::Path;
use std::process;
use std::sync::Arc;
use std::time::{Duration, Instant};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config_path = cli.config.clone().unwrap_or_else(Config::config_path);
    let config = match Config::load_from(&config_path) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run_command(cli.command, config, &config_path).await {
        error!("Command failed: {}", e);
        process::exit(1);
    }
}

async fn run_command(command: Commands, config: Config, config_path: &Path) -> Result<()> {
    match command {
        Commands::Resume { file, options } => {
            let start = Instant::now();
            let text = read_document(&file, "Resume").await?;
            let (registry, model) = build_registry(&config, options.semantic).await?;
            let extractor = SkillExtractor::new(registry, config.extraction.clone());

            let profile = extractor.extract_resume_with_semantics(&text).await;
            info!("Found {} skills in {}", profile.len(), file.display());

            let metadata = ReportMetadata::new(vec![display_path(&file)], start.elapsed(), model);
            let report = Report::Resume(ResumeReport::new(&profile, top_n(&config, &options), metadata));
            emit_report(&report, &config, &options)
        }

        Commands::Job { file, options } => {
            let start = Instant::now();
            let text = read_document(&file, "Job description").await?;
            let (registry, model) = build_registry(&config, options.semantic).await?;
            let analyzer =
                JobRequirementsAnalyzer::new(registry, config.extraction.clone()).with_top_n(top_n(&config, &options));

            let analysis = analyzer.analyze_with_semantics(&text).await;
            info!("Found {} required skills in {}", analysis.skills.len(), file.display());

            let metadata = ReportMetadata::new(vec![display_path(&file)], start.elapsed(), model);
            let report = Report::Job(JobReport::new(&analysis, metadata));
            emit_report(&report, &config, &options)
        }

        Commands::Match { resume, job, options } => {
            let start = Instant::now();
            let mut input_manager = InputManager::new();
            cli::validate_file_extension(&resume, cli::SUPPORTED_EXTENSIONS)
                .map_err(|e| SkillMatcherError::InvalidInput(format!("Resume file: {}", e)))?;
            cli::validate_file_extension(&job, cli::SUPPORTED_EXTENSIONS)
                .map_err(|e| SkillMatcherError::InvalidInput(format!("Job description file: {}", e)))?;
            let resume_text = input_manager.extract_text(&resume).await?;
            let job_text = input_manager.extract_text(&job).await?;

            let (registry, model) = build_registry(&config, options.semantic).await?;
            let top_n = top_n(&config, &options);
            let extractor = SkillExtractor::new(registry.clone(), config.extraction.clone());
            let analyzer = JobRequirementsAnalyzer::new(registry, config.extraction.clone()).with_top_n(top_n);

            let (profile, analysis) = tokio::join!(
                extractor.extract_resume_with_semantics(&resume_text),
                analyzer.analyze_with_semantics(&job_text)
            );
            let result = MatchScorer::new().score(&profile, &analysis.skills);
            info!(
                "Matched {}/{} job skills, overall score {:.3}",
                result.stats.matched_skills, result.stats.total_job_skills, result.overall_score
            );

            let metadata = ReportMetadata::new(
                vec![display_path(&resume), display_path(&job)],
                start.elapsed(),
                model,
            );
            let report = Report::Match(MatchReport::new(&result, &profile, &analysis, top_n, metadata));
            emit_report(&report, &config, &options)
        }

        Commands::Skills { category, acronyms } => {
            let registry = SkillRegistry::new();
            if acronyms {
                println!("🔤 Acronyms\n");
                for (acronym, skill) in registry.acronyms().acronyms() {
                    println!("  {:<10} → {}", acronym, skill.name);
                }
                let ambiguous: Vec<_> = registry.acronyms().ambiguous_acronyms().collect();
                if !ambiguous.is_empty() {
                    println!("\n⚠️  Ambiguous (last claimant wins):");
                    for (acronym, claimants) in ambiguous {
                        println!("  {:<10} {}", acronym, claimants.join(", "));
                    }
                }
                return Ok(());
            }

            print_taxonomy(registry.dictionary(), category);
            Ok(())
        }

        Commands::Models { action } => {
            let mut manager = EmbeddingModelManager::new(config.models.models_dir.clone()).await?;
            match action {
                ModelAction::List => {
                    println!("🧠 Embedding Models\n");
                    for model in manager.list_available_models() {
                        let status = if manager.is_model_downloaded(&model.id) {
                            "✅ Downloaded"
                        } else {
                            "⬇️  Available"
                        };
                        println!(
                            "  • {} ({}) - {} MB, {} dims [{}]",
                            model.id, model.repo_id, model.size_mb, model.dimensions, status
                        );
                        println!("    {}", model.description);
                    }
                    println!("\nDefault: {}", config.models.default_embedding_model);
                    println!("Auto-selected: {}", manager.auto_select_model());
                }

                ModelAction::Download { model } => {
                    let model_id = manager.resolve_model_id(&model).ok_or_else(|| {
                        SkillMatcherError::ModelError(format!("Unknown embedding model: {}", model))
                    })?;
                    if manager.is_model_downloaded(&model_id) {
                        println!("✅ Model '{}' is already downloaded!", model_id);
                        return Ok(());
                    }

                    let spinner = spinner(format!("Downloading {}...", model_id));
                    let result = manager.download_model(&model_id).await;
                    spinner.finish_and_clear();

                    let model_path = result?;
                    println!("✅ Model '{}' downloaded successfully!", model_id);
                    println!("📁 Location: {}", model_path.display());
                }
            }
            Ok(())
        }

        Commands::Config { action } => {
            match action {
                Some(ConfigAction::Show) | None => {
                    let content = toml::to_string_pretty(&config).map_err(|e| {
                        SkillMatcherError::Configuration(format!("Failed to serialize config: {}", e))
                    })?;
                    println!("⚙️  Configuration ({})\n", config_path.display());
                    println!("{}", content);
                }

                Some(ConfigAction::Reset) => {
                    Config::default().save_to(config_path)?;
                    println!("✅ Configuration reset: {}", config_path.display());
                }

                Some(ConfigAction::Path) => println!("{}", config_path.display()),
            }
            Ok(())
        }
    }
}

async fn read_document(path: &Path, label: &str) -> Result<String> {
    cli::validate_file_extension(path, cli::SUPPORTED_EXTENSIONS)
        .map_err(|e| SkillMatcherError::InvalidInput(format!("{} file: {}", label, e)))?;
    InputManager::new().with_cache(false).extract_text(path).await
}

/// Lexical registry, plus skill embeddings when semantic matching is requested.
/// A model that cannot be loaded leaves matching lexical.
async fn build_registry(config: &Config, semantic: bool) -> Result<(Arc<SkillRegistry>, Option<String>)> {
    let registry = SkillRegistry::new();
    if !(semantic || config.extraction.enable_semantic) {
        return Ok((Arc::new(registry), None));
    }

    config.ensure_models_dir()?;
    let mut manager = EmbeddingModelManager::new(config.models.models_dir.clone()).await?;
    let model = &config.models.default_embedding_model;

    let spinner = spinner(format!("Loading embedding model {}...", model));
    let loaded = manager.load_provider(model).await;
    spinner.finish_and_clear();

    match loaded {
        Ok(provider) => {
            let registry = registry.attach_embeddings_or_lexical(Arc::new(provider));
            let model_id = registry.embeddings().map(|index| index.provider().model_id().to_string());
            Ok((Arc::new(registry), model_id))
        }
        Err(e) => {
            warn!("Semantic matching unavailable ({}); using lexical matching only", e);
            Ok((Arc::new(registry), None))
        }
    }
}

fn emit_report(report: &Report, config: &Config, options: &ReportOptions) -> Result<()> {
    let format = options.format.unwrap_or(config.output.format);
    let generator = ReportGenerator::with_options(config.output.color_output, options.detailed, true, true);
    let rendered = generator.generate_report(report, format)?;

    match &options.save {
        Some(path) => {
            // Saved files never carry terminal color codes
            let content = if format == OutputFormat::Console && config.output.color_output {
                ReportGenerator::with_options(false, options.detailed, true, true).generate_report(report, format)?
            } else {
                rendered
            };
            save_report_to_file(&content, path)?;
            println!("💾 {} report saved to {}", report.kind(), path.display());
        }
        None => println!("{}", rendered),
    }
    Ok(())
}

fn print_taxonomy(dictionary: &SkillDictionary, category: Option<SkillCategory>) {
    let categories = match category {
        Some(category) => vec![category],
        None => vec![SkillCategory::Technical, SkillCategory::Soft],
    };

    for category in categories {
        println!("📚 {} skills\n", category);
        let mut current = None;
        for skill in dictionary.by_category(category) {
            if current != Some(skill.subcategory) {
                current = Some(skill.subcategory);
                println!("  {}", skill.subcategory);
            }
            println!("    • {}", skill.name);
        }
        println!();
    }
}

fn top_n(config: &Config, options: &ReportOptions) -> usize {
    options.top.unwrap_or(config.output.top_n)
}

fn display_path(path: &Path) -> String {
    path.display().to_string()
}

fn spinner(message: String) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg} [{elapsed}]")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}
