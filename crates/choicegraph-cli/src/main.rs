//! Choicegraph CLI
//!
//! Batch driver over a question corpus:
//! - `generate`: enumerate every ungrounded choice graph per question
//!   (restrict/expand walk, no knowledge-base access)
//! - `search-gold`: gold-guided staged search that grounds candidates
//!   against a SPARQL endpoint and keeps the graphs whose retrieved
//!   answers overlap the gold set

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use choicegraph_datasets::{Question, QuestionCorpus};
use choicegraph_gen::{generate_without_gold, ScoredGraph, StagedSearch};
use choicegraph_graph::Graph;
use choicegraph_kb::WikidataEndpoint;

mod config;
mod output;

use config::AppConfig;

#[derive(Parser)]
#[command(name = "choicegraph")]
#[command(
    author,
    version,
    about = "Stage semantic parses of questions against a knowledge base"
)]
struct Cli {
    /// Configuration file (YAML); built-in defaults apply when absent
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Enumerate every ungrounded choice graph per question
    Generate {
        /// Only process the first N questions
        #[arg(long)]
        limit: Option<usize>,
        /// Output JSON path (overrides `generation.save_choice_to`)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Gold-guided staged search against the configured SPARQL endpoint
    SearchGold {
        /// Only process the first N questions
        #[arg(long)]
        limit: Option<usize>,
        /// Output JSON path (overrides `generation.save_choice_to`)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = config::load_or_default(cli.config.as_deref())?;
    init_logging(&config.logger.level)?;

    match cli.command {
        Commands::Generate { limit, out } => cmd_generate(&config, limit, out),
        Commands::SearchGold { limit, out } => cmd_search_gold(&config, limit, out),
    }
}

fn init_logging(level: &str) -> Result<()> {
    let level: tracing::Level = level
        .parse()
        .map_err(|_| anyhow!("unknown log level `{level}`"))?;
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .init();
    Ok(())
}

fn cmd_generate(config: &AppConfig, limit: Option<usize>, out: Option<PathBuf>) -> Result<()> {
    let corpus = load_corpus(config)?;
    let questions = selected(&corpus, limit);

    println!(
        "{} choice graphs for {} questions",
        "Generating".green().bold(),
        questions.len()
    );

    let bar = question_progress(questions.len() as u64);
    let mut all_choices: Vec<Vec<Graph>> = Vec::new();
    for question in questions {
        let graph = initial_graph(question, config.generation.max_entities);
        let choices = generate_without_gold(&graph)?;
        tracing::debug!(
            utterance = %question.utterance,
            choices = choices.len(),
            "question enumerated"
        );
        all_choices.push(choices);
        bar.inc(1);
    }
    bar.finish_and_clear();

    let out_path = out.unwrap_or_else(|| config.generation.save_choice_to.clone());
    output::write_json_file(&out_path, &all_choices)?;

    let with_choices = all_choices.iter().filter(|c| !c.is_empty()).count();
    let total: usize = all_choices.iter().map(Vec::len).sum();
    println!("  {} {}", "→".cyan(), out_path.display());
    println!(
        "  {} coverage {:.1}% ({} of {} questions), {:.1} choices/question",
        "→".yellow(),
        100.0 * ratio(with_choices, all_choices.len()),
        with_choices,
        all_choices.len(),
        ratio(total, all_choices.len())
    );

    Ok(())
}

fn cmd_search_gold(config: &AppConfig, limit: Option<usize>, out: Option<PathBuf>) -> Result<()> {
    let corpus = load_corpus(config)?;
    let questions = selected(&corpus, limit);

    let endpoint = WikidataEndpoint::new(
        &config.kb.endpoint,
        Duration::from_secs(config.kb.timeout_secs),
        config.kb.cache_capacity,
    )?;
    let search = StagedSearch::new(&endpoint)
        .f1_threshold(config.generation.f1_threshold)
        .use_trimming(config.generation.use_trimming)
        .result_limit(config.kb.result_limit);

    println!(
        "{} staged search over {} questions via {}",
        "Running".green().bold(),
        questions.len(),
        config.kb.endpoint
    );

    let bar = question_progress(questions.len() as u64);
    let mut all_chosen: Vec<Vec<ScoredGraph>> = Vec::new();
    for question in questions {
        let gold = question.answers()?;
        if gold.is_empty() {
            tracing::warn!(utterance = %question.utterance, "no gold answers, skipping search");
            all_chosen.push(Vec::new());
            bar.inc(1);
            continue;
        }
        let graph = initial_graph(question, config.generation.max_entities);
        let chosen = search.generate_with_gold(&graph, &gold)?;
        tracing::debug!(
            utterance = %question.utterance,
            chosen = chosen.len(),
            "question searched"
        );
        all_chosen.push(chosen);
        bar.inc(1);
    }
    bar.finish_and_clear();

    let out_path = out.unwrap_or_else(|| config.generation.save_choice_to.clone());
    output::write_json_file(&out_path, &all_chosen)?;

    let answered = all_chosen.iter().filter(|c| !c.is_empty()).count();
    let stats = endpoint.cache_stats();
    println!("  {} {}", "→".cyan(), out_path.display());
    println!(
        "  {} {} of {} questions produced a chosen graph",
        "→".yellow(),
        answered,
        all_chosen.len()
    );
    println!(
        "  {} cache: {} hits, {} misses, {} entries",
        "→".yellow(),
        stats.hits,
        stats.misses,
        stats.len
    );

    Ok(())
}

fn load_corpus(config: &AppConfig) -> Result<QuestionCorpus> {
    QuestionCorpus::load(&config.dataset.path).with_context(|| {
        format!(
            "could not load question corpus from {}",
            config.dataset.path.display()
        )
    })
}

fn selected(corpus: &QuestionCorpus, limit: Option<usize>) -> &[Question] {
    let questions = corpus.questions();
    match limit {
        Some(n) => &questions[..n.min(questions.len())],
        None => questions,
    }
}

/// Seed graph for a question: all tokens, mentions truncated to the
/// configured cap, no edges yet.
fn initial_graph(question: &Question, max_entities: usize) -> Graph {
    let tokens = question.tokens();
    let mut mentions = question.mentions();
    mentions.truncate(max_entities);
    Graph::ungrounded(tokens, mentions)
}

fn question_progress(total: u64) -> ProgressBar {
    let bar = ProgressBar::new(total);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("  [{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} questions")
            .progress_chars("█▓▒░"),
    );
    bar
}

fn ratio(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}
