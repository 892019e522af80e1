//! CLI command definitions for refgame-forge.
//!
//! Provides commands for generating reference game instances, inspecting
//! distractor selection, checking model replies against response patterns and
//! scoring played episodes.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use serde::Serialize;
use tracing::{info, warn};

use crate::config::{parse_language_list, GenerationConfig};
use crate::distance::DistanceMatrix;
use crate::distractor::select_distractors;
use crate::export::write_instance_files;
use crate::generator::{InstanceFile, InstanceGenerator};
use crate::grid::{GridCollection, GridGroup};
use crate::locale::LocalePatternTable;
use crate::patterns::{
    is_correct_answer, target_aliases, AnswerTurn, EpisodeScore, EpisodeScorer, ParseMode,
    PlayerRole, ResponseCheck, ResponseValidator,
};
use crate::prompts::PromptTemplates;

/// Default language for single-language commands.
const DEFAULT_LANGUAGE: &str = "en";

/// Reference game instance generator for LLM evaluation.
#[derive(Parser)]
#[command(name = "refgame-forge")]
#[command(about = "Generate multilingual reference game instances for LLM evaluation")]
#[command(version)]
#[command(
    long_about = "refgame-forge builds reference game instances from grid pools.\n\nFor every target grid the two most similar grids (by edit distance) are chosen as distractors, and each triplet is played with the target in all three slots.\n\nExample usage:\n  refgame-forge generate --grids resources/grids_v1.5.json --templates resources/initial_prompts --output in"
)]
pub struct Cli {
    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short, long, default_value = "info", global = true)]
    pub log_level: String,
}

/// Available CLI subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Generate instance files, one per language.
    #[command(alias = "gen")]
    Generate(GenerateArgs),

    /// Show the distance matrix and selected distractors of grid groups.
    Distractors(DistractorsArgs),

    /// Check a model reply against a role's response pattern.
    Check(CheckArgs),

    /// Score one episode from both players' replies.
    Score(ScoreArgs),

    /// List the languages of the locale table.
    Languages(LanguagesArgs),
}

/// Arguments for the generate command.
#[derive(Parser, Debug)]
pub struct GenerateArgs {
    /// YAML configuration file; flags override its values.
    #[arg(short = 'c', long)]
    pub config: Option<String>,

    /// Grid artifact (JSON object: group name -> list of grids).
    #[arg(short = 'g', long, env = "REFGAME_GRIDS")]
    pub grids: Option<String>,

    /// Directory containing one prompt template directory per language.
    #[arg(short = 't', long, env = "REFGAME_TEMPLATES")]
    pub templates: Option<String>,

    /// Output directory for instance files.
    #[arg(short = 'o', long, env = "REFGAME_OUTPUT")]
    pub output: Option<String>,

    /// Version label used in output file names (e.g. v1.5).
    #[arg(long)]
    pub bench_version: Option<String>,

    /// Comma-separated languages to generate (default: all in the locale table).
    #[arg(long)]
    pub languages: Option<String>,

    /// Locale table file (YAML or JSON) replacing the built-in table.
    #[arg(long)]
    pub locale_table: Option<String>,

    /// Output a JSON summary to stdout.
    #[arg(short = 'j', long)]
    pub json: bool,
}

/// Arguments for the distractors command.
#[derive(Parser, Debug)]
pub struct DistractorsArgs {
    /// Grid artifact (JSON object: group name -> list of grids).
    #[arg(short = 'g', long, env = "REFGAME_GRIDS")]
    pub grids: String,

    /// Only inspect this group.
    #[arg(long)]
    pub group: Option<String>,

    /// Output JSON instead of a table.
    #[arg(short = 'j', long)]
    pub json: bool,
}

/// Arguments for the check command.
#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// The model reply to check.
    pub reply: String,

    /// Player role whose pattern applies (p1 or p2).
    #[arg(short = 'r', long, default_value = "p1")]
    pub role: PlayerRole,

    /// Language of the reply.
    #[arg(long, default_value = DEFAULT_LANGUAGE)]
    pub lang: String,

    /// Parsing mode (strict or liberal).
    #[arg(short = 'm', long, default_value = "strict")]
    pub mode: ParseMode,

    /// Localized target slot name; scores a player 2 answer against it.
    #[arg(long)]
    pub target: Option<String>,

    /// Locale table file (YAML or JSON) replacing the built-in table.
    #[arg(long)]
    pub locale_table: Option<String>,

    /// Output the result as JSON.
    #[arg(short = 'j', long)]
    pub json: bool,
}

/// Arguments for the score command.
#[derive(Parser, Debug)]
pub struct ScoreArgs {
    /// Player 1's reply.
    #[arg(long)]
    pub expression: String,

    /// Player 2's reply; omit if player 2 never answered.
    #[arg(long)]
    pub answer: Option<String>,

    /// Localized target slot name of the instance.
    #[arg(long)]
    pub target: String,

    /// Language of the episode.
    #[arg(long, default_value = DEFAULT_LANGUAGE)]
    pub lang: String,

    /// Parsing mode (strict or liberal).
    #[arg(short = 'm', long, default_value = "strict")]
    pub mode: ParseMode,

    /// Locale table file (YAML or JSON) replacing the built-in table.
    #[arg(long)]
    pub locale_table: Option<String>,

    /// Output the scores as JSON.
    #[arg(short = 'j', long)]
    pub json: bool,
}

/// Arguments for the languages command.
#[derive(Parser, Debug)]
pub struct LanguagesArgs {
    /// Locale table file (YAML or JSON) replacing the built-in table.
    #[arg(long)]
    pub locale_table: Option<String>,

    /// Output JSON.
    #[arg(short = 'j', long)]
    pub json: bool,
}

/// Parse CLI arguments.
pub fn parse_cli() -> Cli {
    Cli::parse()
}

/// Run the CLI by parsing arguments and executing the command.
///
/// For more control over logging initialization, use `parse_cli()` and `run_with_cli()`.
pub async fn run() -> anyhow::Result<()> {
    run_with_cli(parse_cli()).await
}

/// Run the CLI with the parsed arguments.
pub async fn run_with_cli(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Generate(args) => run_generate_command(args).await,
        Commands::Distractors(args) => run_distractors_command(args),
        Commands::Check(args) => run_check_command(args),
        Commands::Score(args) => run_score_command(args),
        Commands::Languages(args) => run_languages_command(args),
    }
}

// ============================================================================
// Generate Command Implementation
// ============================================================================

/// Summary of a generation run.
#[derive(Debug, Serialize)]
pub struct GenerationSummary {
    pub version: String,
    pub files: Vec<GeneratedFile>,
    pub total_instances: usize,
}

/// One written instance file.
#[derive(Debug, Serialize)]
pub struct GeneratedFile {
    pub lang: String,
    pub path: String,
    pub experiments: usize,
    pub instances: usize,
}

fn build_generation_config(args: &GenerateArgs) -> anyhow::Result<GenerationConfig> {
    let mut config = match &args.config {
        Some(path) => GenerationConfig::load(path)
            .with_context(|| format!("Failed to load config '{}'", path))?,
        None => GenerationConfig::default(),
    };

    if let Some(grids) = &args.grids {
        config.grids_path = PathBuf::from(grids);
    }
    if let Some(templates) = &args.templates {
        config.templates_dir = PathBuf::from(templates);
    }
    if let Some(output) = &args.output {
        config.output_dir = PathBuf::from(output);
    }
    if let Some(version) = &args.bench_version {
        config.version = version.clone();
    }
    if let Some(languages) = &args.languages {
        config.languages = parse_language_list(languages)?;
    }
    if let Some(table) = &args.locale_table {
        config.locale_table = Some(PathBuf::from(table));
    }

    config.validate()?;
    Ok(config)
}

/// Generates every requested language.
///
/// Languages are independent and run as blocking tasks in parallel. Nothing
/// is written here; callers write the results with `write_instance_files`.
pub async fn generate_all(config: &GenerationConfig) -> anyhow::Result<Vec<(String, InstanceFile)>> {
    let table = config.load_locale_table()?;
    let languages = config.resolve_languages(&table)?;

    let grids = GridCollection::load(&config.grids_path)
        .with_context(|| format!("Failed to load grids from {}", config.grids_path.display()))?;
    info!(
        groups = grids.len(),
        languages = languages.len(),
        "Starting instance generation"
    );

    let grids = Arc::new(grids);
    let generator = Arc::new(InstanceGenerator::new(table));

    let mut handles = Vec::with_capacity(languages.len());
    for lang in languages {
        let templates = PromptTemplates::load(&config.templates_dir, &lang)
            .with_context(|| format!("Failed to load prompt templates for '{}'", lang))?;
        let grids = Arc::clone(&grids);
        let generator = Arc::clone(&generator);

        let handle = tokio::task::spawn_blocking(move || {
            let file = generator.generate(&grids, &lang, &templates);
            (lang, file)
        });
        handles.push(handle);
    }

    let mut results = Vec::with_capacity(handles.len());
    for handle in handles {
        let (lang, file) = handle.await.context("Generation task panicked")?;
        let file = file.with_context(|| format!("Failed to generate instances for '{}'", lang))?;
        results.push((lang, file));
    }
    Ok(results)
}

async fn run_generate_command(args: GenerateArgs) -> anyhow::Result<()> {
    let config = build_generation_config(&args)?;
    let results = generate_all(&config).await?;

    let paths = write_instance_files(&config.output_dir, &config.version, &results)
        .with_context(|| format!("Failed to write instance files to {}", config.output_dir.display()))?;

    let files: Vec<GeneratedFile> = results
        .iter()
        .zip(paths)
        .map(|((lang, instances), path)| GeneratedFile {
            lang: lang.clone(),
            path: path.display().to_string(),
            experiments: instances.experiments.len(),
            instances: instances.instance_count(),
        })
        .collect();

    let summary = GenerationSummary {
        version: config.version.clone(),
        total_instances: files.iter().map(|f| f.instances).sum(),
        files,
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("Generated {} instance files:", summary.files.len());
        for file in &summary.files {
            println!(
                "  {:<4} {:>6} instances in {:>3} experiments -> {}",
                file.lang, file.instances, file.experiments, file.path
            );
        }
        println!("Total: {} instances", summary.total_instances);
    }

    Ok(())
}

// ============================================================================
// Distractors Command Implementation
// ============================================================================

/// Distractor choice for one target.
#[derive(Debug, Serialize)]
pub struct DistractorReport {
    pub target: usize,
    pub first: usize,
    pub first_distance: usize,
    pub second: usize,
    pub second_distance: usize,
}

/// Distance matrix and distractors of one group.
#[derive(Debug, Serialize)]
pub struct GroupReport {
    pub group: String,
    pub distances: Vec<Vec<usize>>,
    pub distractors: Vec<DistractorReport>,
}

/// Builds the distractor report of a group.
pub fn inspect_group(group: &GridGroup) -> anyhow::Result<GroupReport> {
    let matrix = DistanceMatrix::build(&group.grids);
    let distances = matrix.as_array().outer_iter().map(|row| row.to_vec()).collect();

    let mut distractors = Vec::with_capacity(group.len());
    for target in 0..group.len() {
        let pair = select_distractors(&matrix, target)
            .with_context(|| format!("Group '{}'", group.name))?;
        distractors.push(DistractorReport {
            target,
            first: pair.first,
            first_distance: matrix.get(target, pair.first),
            second: pair.second,
            second_distance: matrix.get(target, pair.second),
        });
    }

    Ok(GroupReport {
        group: group.name.clone(),
        distances,
        distractors,
    })
}

fn run_distractors_command(args: DistractorsArgs) -> anyhow::Result<()> {
    let grids = GridCollection::load(&args.grids)
        .with_context(|| format!("Failed to load grids from {}", args.grids))?;

    let groups: Vec<&GridGroup> = match &args.group {
        Some(name) => vec![grids
            .get(name)
            .ok_or_else(|| anyhow::anyhow!("Group '{}' not found in {}", name, args.grids))?],
        None => grids.groups().iter().collect(),
    };

    let reports = groups
        .into_iter()
        .map(inspect_group)
        .collect::<anyhow::Result<Vec<_>>>()?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
        return Ok(());
    }

    for report in &reports {
        println!("== {} ({} grids)", report.group, report.distances.len());
        for (i, row) in report.distances.iter().enumerate() {
            let cells: Vec<String> = row.iter().map(|d| format!("{:>3}", d)).collect();
            println!("  {:>3} |{}", i, cells.join(""));
        }
        for d in &report.distractors {
            println!(
                "  target {:>3}: {:>3} (d={}), {:>3} (d={})",
                d.target, d.first, d.first_distance, d.second, d.second_distance
            );
        }
    }
    Ok(())
}

// ============================================================================
// Check Command Implementation
// ============================================================================

/// Result of checking a reply.
#[derive(Debug, Serialize)]
pub struct CheckOutput {
    pub lang: String,
    pub role: PlayerRole,
    pub mode: ParseMode,
    pub pattern: String,
    #[serde(flatten)]
    pub check: ResponseCheck,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correct: Option<bool>,
}

fn load_table(path: Option<&str>) -> anyhow::Result<LocalePatternTable> {
    match path {
        Some(p) => LocalePatternTable::load(Path::new(p))
            .with_context(|| format!("Failed to load locale table '{}'", p)),
        None => Ok(LocalePatternTable::default()),
    }
}

/// Checks a reply and, for player 2 with a known target, scores it.
pub fn check_reply(table: &LocalePatternTable, args: &CheckArgs) -> anyhow::Result<CheckOutput> {
    let patterns = table.get(&args.lang)?;
    let validator = ResponseValidator::for_role(patterns, args.role, args.mode)?;
    let pattern = crate::patterns::game_master_pattern(patterns, args.role, args.mode);
    let check = validator.check(&args.reply);

    let correct = match (&args.target, args.role) {
        (Some(target), PlayerRole::InstructionFollower) => {
            let aliases = target_aliases(patterns, &args.lang, target)?;
            Some(check.content().is_some_and(|c| is_correct_answer(c, &aliases)))
        }
        (Some(_), PlayerRole::InstructionGiver) => {
            warn!("--target only applies to player 2 replies; ignoring");
            None
        }
        (None, _) => None,
    };

    Ok(CheckOutput {
        lang: args.lang.clone(),
        role: args.role,
        mode: args.mode,
        pattern,
        check,
        correct,
    })
}

fn run_check_command(args: CheckArgs) -> anyhow::Result<()> {
    let table = load_table(args.locale_table.as_deref())?;
    let output = check_reply(&table, &args)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    match &output.check {
        ResponseCheck::Parsed { content } => println!("parsed: {}", content),
        ResponseCheck::Invalid { reason } => println!("invalid: {}", reason),
    }
    if let Some(correct) = output.correct {
        println!("correct: {}", correct);
    }
    Ok(())
}

// ============================================================================
// Score Command Implementation
// ============================================================================

/// Checks both replies of an episode and scores it.
///
/// Player 2's reply only counts when player 1's reply parsed.
pub fn score_episode(table: &LocalePatternTable, args: &ScoreArgs) -> anyhow::Result<EpisodeScore> {
    let patterns = table.get(&args.lang)?;
    let scorer = EpisodeScorer::new(patterns, &args.lang, &args.target)?;

    let expression = ResponseValidator::for_role(patterns, PlayerRole::InstructionGiver, args.mode)?
        .check(&args.expression);

    let answer = match &args.answer {
        Some(reply) if expression.is_parsed() => {
            let validator =
                ResponseValidator::for_role(patterns, PlayerRole::InstructionFollower, args.mode)?;
            Some((reply.as_str(), validator.check(reply)))
        }
        _ => None,
    };
    let turn = answer
        .as_ref()
        .map(|(reply, check)| AnswerTurn { reply: *reply, check });

    Ok(scorer.score(&expression, turn))
}

fn run_score_command(args: ScoreArgs) -> anyhow::Result<()> {
    let table = load_table(args.locale_table.as_deref())?;
    let score = score_episode(&table, &args)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&score)?);
        return Ok(());
    }

    println!("aborted at player 1: {}", score.aborted_at_player_1);
    println!("aborted at player 2: {}", score.aborted_at_player_2);
    println!(
        "requests: {} parsed, {} violated, ratio {}",
        score.parsed_request_count, score.violated_request_count, score.request_success_ratio
    );
    if let (Some(length), Some(tokens)) = (score.expression_length, score.expression_tokens) {
        println!("expression: {} chars, {} tokens", length, tokens);
    }
    match score.success {
        Some(success) => println!("success: {} (bench score {})", success, score.bench_score),
        None => println!("success: n/a (aborted)"),
    }
    Ok(())
}

// ============================================================================
// Languages Command Implementation
// ============================================================================

fn run_languages_command(args: LanguagesArgs) -> anyhow::Result<()> {
    let table = load_table(args.locale_table.as_deref())?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&table)?);
        return Ok(());
    }

    for lang in table.languages() {
        let patterns = table.get(lang)?;
        println!(
            "{:<4} p1_tag={:<14} p2_tag={:<10} slots={}",
            lang, patterns.p1_tag, patterns.p2_tag, patterns.p2_options
        );
    }
    Ok(())
}
