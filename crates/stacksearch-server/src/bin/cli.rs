//! StackSearch CLI
//!
//! Command-line access to the search pipeline and its artifacts.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use colored::Colorize;
use serde::Deserialize;
use stacksearch_core::corpus::{read_metadata, split_tags};
use stacksearch_core::{
    ArtifactPaths, SearchConfig, SearchEngine, TagVocabulary, DEFAULT_TAG_COUNT, TAG_THRESHOLD,
};
use stacksearch_server::logging::{self, LogFormat};
use tracing::Level;

/// StackSearch - semantic question search CLI
#[derive(Parser)]
#[command(name = "stacksearch")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "CLI for StackSearch question search and tag prediction")]
struct Cli {
    /// Artifact directory (falls back to STACKSEARCH_DATA_DIR, then the platform data dir)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Show artifact loading logs
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search the corpus and show predicted tags
    Search {
        /// Free-text query
        query: String,
        /// Number of results
        #[arg(short = 'n', long, default_value = "10")]
        num_results: usize,
        /// Show cosine and boost for each result
        #[arg(long)]
        explain: bool,
        /// Print the HTTP response JSON instead of formatted output
        #[arg(long)]
        json: bool,
    },

    /// Predict tags for a piece of text
    Tags {
        /// Text to classify
        text: String,
    },

    /// Show artifact sizes and dimensions
    Stats,

    /// Derive the tag vocabulary from the metadata table
    BuildTags {
        /// Number of most frequent tags to keep
        #[arg(long, default_value_t = DEFAULT_TAG_COUNT)]
        top: usize,
        /// Output JSON file
        #[arg(long)]
        output: PathBuf,
    },

    /// Report tag-prediction loss, precision and recall on labelled samples
    Evaluate {
        /// JSON Lines file of {"text": ..., "tags": [...]}
        samples: PathBuf,
    },
}

/// One line of an evaluation file
#[derive(Debug, Deserialize)]
struct LabelledSample {
    text: String,
    #[serde(default)]
    tags: Vec<String>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose { Level::INFO } else { Level::WARN };
    logging::init(LogFormat::Text, level);

    let paths = ArtifactPaths::resolve(cli.data_dir)?;

    match cli.command {
        Commands::Search {
            query,
            num_results,
            explain,
            json,
        } => run_search(&paths, &query, num_results, explain, json),
        Commands::Tags { text } => run_tags(&paths, &text),
        Commands::Stats => run_stats(&paths),
        Commands::BuildTags { top, output } => run_build_tags(&paths, top, &output),
        Commands::Evaluate { samples } => run_evaluate(&paths, &samples),
    }
}

fn load_engine(paths: &ArtifactPaths) -> anyhow::Result<SearchEngine> {
    SearchEngine::load(paths, SearchConfig::default()).context("failed to load search artifacts")
}

fn run_search(
    paths: &ArtifactPaths,
    query: &str,
    num_results: usize,
    explain: bool,
    json: bool,
) -> anyhow::Result<()> {
    let engine = load_engine(paths)?;

    if json {
        let response = engine.search(query, num_results);
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    let tags = engine.predict_tags(query);
    println!("{}", format!("=== Results for \"{}\" ===", query).cyan().bold());
    if tags.is_empty() {
        println!("{}: {}", "Tags".white().bold(), "none".dimmed());
    } else {
        println!("{}: {}", "Tags".white().bold(), tags.join(", ").yellow());
    }
    println!();

    let results = engine.explain(query, num_results);
    if results.is_empty() {
        println!("{}", "No results.".dimmed());
        return Ok(());
    }

    for (rank, (result, breakdown)) in results.iter().enumerate() {
        println!(
            "{:>3}. {} {}",
            rank + 1,
            result.title.white().bold(),
            format!("[{:.4}]", result.score).green()
        );
        println!("     {}", result.url.blue());
        println!("     {}: {}", "votes".dimmed(), result.votes);
        if explain {
            println!(
                "     {}: cosine {:.4} x boost {:.4} = {:.4}",
                "score".dimmed(),
                breakdown.cosine,
                breakdown.boost,
                breakdown.blended
            );
        }
    }

    Ok(())
}

fn run_tags(paths: &ArtifactPaths, text: &str) -> anyhow::Result<()> {
    let engine = load_engine(paths)?;
    let tags = engine.predict_tags(text);

    if tags.is_empty() {
        println!(
            "{}",
            format!("No tag above the {} threshold.", TAG_THRESHOLD).dimmed()
        );
    } else {
        for tag in tags {
            println!("{}", tag.yellow());
        }
    }
    Ok(())
}

fn run_stats(paths: &ArtifactPaths) -> anyhow::Result<()> {
    let engine = load_engine(paths)?;
    let stats = engine.stats();

    println!("{}", "=== StackSearch Artifacts ===".cyan().bold());
    println!();
    println!("{}: {}", "Corpus Items".white().bold(), stats.corpus_items);
    println!("{}: {}", "Embedding Dimensions".white().bold(), stats.embedding_dimensions);
    println!("{}: {}", "Word Vectors".white().bold(), stats.word_vectors);
    println!("{}: {}", "Tokenizer Vocabulary".white().bold(), stats.tokenizer_bound);
    println!("{}: {}", "Classifier Vocabulary".white().bold(), stats.classifier_vocabulary);
    println!("{}: {}", "Classifier Embedding Dim".white().bold(), stats.classifier_embedding_dim);
    println!("{}: {}", "Tags".white().bold(), stats.tags);
    println!("{}: {}", "Max Sequence Length".white().bold(), stats.max_sequence_length);

    println!();
    println!("{}", "=== Files ===".yellow().bold());
    for (name, path) in paths.entries() {
        println!("{:>18}: {}", name, path.display());
    }
    Ok(())
}

fn run_build_tags(paths: &ArtifactPaths, top: usize, output: &Path) -> anyhow::Result<()> {
    let records = read_metadata(&paths.metadata)
        .with_context(|| format!("failed to read {}", paths.metadata.display()))?;

    let tag_lists: Vec<Vec<String>> = records
        .iter()
        .map(|r| r.tags.as_deref().map(split_tags).unwrap_or_default())
        .collect();
    let tagged = tag_lists.iter().filter(|tags| !tags.is_empty()).count();
    if tagged == 0 {
        anyhow::bail!("{} has no tags column values", paths.metadata.display());
    }

    let vocabulary = TagVocabulary::from_tag_lists(&tag_lists, top)?;
    vocabulary.save(output)?;

    println!(
        "{} {} tags from {} tagged questions to {}",
        "Wrote".green().bold(),
        vocabulary.len(),
        tagged,
        output.display()
    );
    Ok(())
}

fn run_evaluate(paths: &ArtifactPaths, samples_path: &Path) -> anyhow::Result<()> {
    let samples = read_samples(samples_path)?;
    if samples.is_empty() {
        anyhow::bail!("{} contains no samples", samples_path.display());
    }

    let engine = load_engine(paths)?;
    let pairs: Vec<(String, Vec<String>)> = samples.into_iter().map(|s| (s.text, s.tags)).collect();
    let evaluation = engine.evaluate_tags(&pairs);

    println!("{}", "=== Tag Prediction Evaluation ===".cyan().bold());
    println!();
    println!("{}: {}", "Samples".white().bold(), evaluation.samples);
    println!("{}: {:.4}", "Mean Loss".white().bold(), evaluation.mean_loss);
    println!("{}: {:.1}%", "Precision".white().bold(), evaluation.precision * 100.0);
    println!("{}: {:.1}%", "Recall".white().bold(), evaluation.recall * 100.0);
    Ok(())
}

fn read_samples(path: &Path) -> anyhow::Result<Vec<LabelledSample>> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let mut samples = Vec::new();
    for (i, line) in BufReader::new(file).lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let sample: LabelledSample = serde_json::from_str(&line)
            .with_context(|| format!("{}:{}: invalid sample", path.display(), i + 1))?;
        samples.push(sample);
    }
    Ok(samples)
}
