//! # docqa CLI
//!
//! Ask natural-language questions about your documents.
//!
//! Documents (PDF, TXT, DOCX) are cleaned, split into sentence-aligned chunks,
//! embedded and stored in a persisted flat L2 index. A question retrieves the
//! nearest chunks and an extractive reader picks the best answer span.
//!
//! ## Commands
//!
//! - `docqa add <PATH>...` - Add documents to the index
//! - `docqa ask <QUESTION>` - Answer a question from the indexed documents
//! - `docqa docs` - List indexed documents
//! - `docqa status` - Show index statistics
//! - `docqa reset` - Delete the index
//! - `docqa shell` - Ask questions interactively
//!
//! ## Examples
//!
//! ```bash
//! docqa add handbook.pdf notes.txt
//! docqa ask "How many vacation days do I get?" -k 3
//! docqa ask "Who signs off on expenses?" --all --format json
//! ```

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use docqa_core::{AnswerResult, Embedder};
use docqa_embed::HashEmbedder;
use docqa_index::DocumentIndexer;
use docqa_query::{AnswerAggregator, LexicalReader};
use docqa_store::IndexStore;
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

mod config;

use config::Config;

#[derive(Parser)]
#[command(name = "docqa")]
#[command(about = "Question answering over your documents")]
#[command(version)]
struct Cli {
    /// Path to config file (default: ~/.config/docqa/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Output format (text, json)
    #[arg(short, long, default_value = "text")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Add documents (PDF, TXT, DOCX) to the index
    Add {
        /// Documents to ingest
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },

    /// Answer a question from the indexed documents
    Ask {
        /// Question text
        question: String,

        /// Number of contexts to read
        #[arg(short = 'k', long)]
        top_k: Option<usize>,

        /// Show every candidate answer
        #[arg(short, long)]
        all: bool,
    },

    /// List indexed documents
    Docs,

    /// Show index status
    Status,

    /// Delete the persisted index
    Reset {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Ask questions interactively
    Shell {
        /// Number of contexts to read
        #[arg(short = 'k', long)]
        top_k: Option<usize>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration
    Show,
    /// Print sample configuration file
    Init,
    /// Show config file path
    Path,
}

/// Output structure for `add`.
#[derive(Serialize)]
struct AddItem {
    path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    chunks: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Output structure for `ask`.
#[derive(Serialize)]
struct AskOutput<'a> {
    question: &'a str,
    #[serde(flatten)]
    result: &'a AnswerResult,
}

#[derive(Serialize)]
struct DocItem {
    source: String,
    chunks: usize,
}

/// Output structure for status.
#[derive(Serialize)]
struct StatusOutput {
    index_dir: String,
    total_documents: u64,
    total_chunks: u64,
    dimension: usize,
    index_size_bytes: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_updated: Option<String>,
}

/// Build the embedder named in the config.
fn create_embedder(config: &Config) -> Result<Arc<dyn Embedder>> {
    match config.embedding.model.as_str() {
        "hashing-bow" => {
            let embedder = HashEmbedder::with_dimension(config.embedding.dimension)
                .context("Failed to create embedder")?;
            Ok(Arc::new(embedder))
        }
        other => bail!("Unknown embedding model: {other}"),
    }
}

async fn open_store(config: &Config) -> Result<Arc<IndexStore>> {
    let paths = config.index_paths()?;
    let embedder = create_embedder(config)?;
    Ok(Arc::new(IndexStore::open(paths, embedder).await))
}

fn create_aggregator(config: &Config, store: Arc<IndexStore>) -> AnswerAggregator {
    let reader = LexicalReader::with_max_context_words(config.query.max_context_words);
    AnswerAggregator::new(store, Arc::new(reader))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load_from(cli.config.clone()).context("Failed to load config")?;

    // Setup logging; RUST_LOG overrides the configured level
    let level = if cli.verbose {
        "debug".to_string()
    } else {
        config.logging.level.clone()
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    match cli.command {
        Commands::Add { paths } => {
            let store = open_store(&config).await?;
            let indexer = DocumentIndexer::new(store, config.chunk_config());

            let mut items = Vec::with_capacity(paths.len());
            let mut failed = 0usize;
            for path in &paths {
                match indexer.index_file(path).await {
                    Ok(report) => items.push(AddItem {
                        path: path.display().to_string(),
                        source: Some(report.source),
                        chunks: Some(report.chunk_count),
                        error: None,
                    }),
                    Err(e) => {
                        warn!("Failed to add {:?}: {}", path, e);
                        failed += 1;
                        items.push(AddItem {
                            path: path.display().to_string(),
                            source: None,
                            chunks: None,
                            error: Some(e.to_string()),
                        });
                    }
                }
            }

            match cli.format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&items)?);
                }
                OutputFormat::Text => {
                    for item in &items {
                        match (&item.chunks, &item.error) {
                            (Some(chunks), _) => println!("Added {} ({} chunks)", item.path, chunks),
                            (_, Some(error)) => println!("Failed {}: {}", item.path, error),
                            _ => {}
                        }
                    }
                }
            }

            if failed > 0 {
                bail!("{failed} of {} documents could not be added", paths.len());
            }
        }

        Commands::Ask {
            question,
            top_k,
            all,
        } => {
            let store = open_store(&config).await?;
            let aggregator = create_aggregator(&config, store);

            let result = aggregator
                .answer(&question, config.top_k(top_k))
                .await
                .context("Question answering failed")?;

            print_answer(&question, &result, all, cli.format)?;
        }

        Commands::Docs => {
            let store = open_store(&config).await?;
            let docs: Vec<DocItem> = store
                .sources()
                .await
                .into_iter()
                .map(|(source, chunks)| DocItem { source, chunks })
                .collect();

            match cli.format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&docs)?);
                }
                OutputFormat::Text => {
                    if docs.is_empty() {
                        println!("{}", AnswerResult::NO_DOCUMENTS);
                    } else {
                        for doc in &docs {
                            println!("{} ({} chunks)", doc.source, doc.chunks);
                        }
                    }
                }
            }
        }

        Commands::Status => {
            let store = open_store(&config).await?;
            let stats = store.stats().await;
            let index_dir = config
                .index_dir()
                .map(|dir| dir.display().to_string())
                .unwrap_or_default();

            match cli.format {
                OutputFormat::Json => {
                    let output = StatusOutput {
                        index_dir,
                        total_documents: stats.total_documents,
                        total_chunks: stats.total_chunks,
                        dimension: stats.dimension,
                        index_size_bytes: stats.index_size_bytes,
                        last_updated: stats.last_updated.map(|t| t.to_rfc3339()),
                    };
                    println!("{}", serde_json::to_string_pretty(&output)?);
                }
                OutputFormat::Text => {
                    println!("Index Status for {index_dir}");
                    println!("  Documents: {}", stats.total_documents);
                    println!("  Chunks:    {}", stats.total_chunks);
                    println!("  Dimension: {}", stats.dimension);
                    println!("  Size:      {} bytes", stats.index_size_bytes);
                    if let Some(last) = stats.last_updated {
                        println!("  Updated:   {}", last.format("%Y-%m-%d %H:%M:%S"));
                    }
                }
            }
        }

        Commands::Reset { yes } => {
            let store = open_store(&config).await?;
            if !yes && !confirm(&format!(
                "Delete the index at {}? [y/N] ",
                store.paths().metadata.display()
            ))? {
                println!("Aborted.");
                return Ok(());
            }

            store.reset().await.context("Failed to reset index")?;
            println!("Index deleted.");
        }

        Commands::Shell { top_k } => {
            let store = open_store(&config).await?;
            let aggregator = create_aggregator(&config, store);
            let top_k = config.top_k(top_k);
            info!("Interactive session (top_k={}); type :quit to exit", top_k);

            let mut lines = BufReader::new(tokio::io::stdin()).lines();
            loop {
                print!("> ");
                std::io::stdout().flush()?;

                let Some(line) = lines.next_line().await? else {
                    println!();
                    break;
                };
                let question = line.trim();
                if question.is_empty() {
                    continue;
                }
                if matches!(question, ":quit" | ":q" | ":exit") {
                    break;
                }

                match aggregator.answer(question, top_k).await {
                    Ok(result) => print_answer(question, &result, false, cli.format)?,
                    Err(e) => println!("Error: {e}"),
                }
            }
        }

        Commands::Config { action } => match action {
            ConfigAction::Show => match cli.format {
                OutputFormat::Json => {
                    println!(
                        "{}",
                        serde_json::to_string_pretty(&config)
                            .context("Failed to serialize config")?
                    );
                }
                OutputFormat::Text => {
                    println!(
                        "{}",
                        toml::to_string_pretty(&config).context("Failed to serialize config")?
                    );
                }
            },
            ConfigAction::Init => {
                println!("{}", Config::sample_toml());
            }
            ConfigAction::Path => {
                if let Some(path) = cli.config.clone().or_else(Config::config_path) {
                    println!("{}", path.display());
                } else {
                    println!("Could not determine config directory");
                }
            }
        },
    }

    Ok(())
}

fn print_answer(question: &str, result: &AnswerResult, all: bool, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let output = AskOutput { question, result };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Text => {
            if let Some(message) = &result.message {
                println!("{message}");
                return Ok(());
            }

            match &result.best_answer {
                Some(best) if !best.answer.is_empty() => {
                    println!("Answer: {}", best.answer);
                    println!("Score:  {:.3}", best.score);
                    println!(
                        "Source: {} (chunk {})",
                        best.record.source, best.record.chunk_index
                    );
                    println!("Context: {}", truncate(&best.context, 300));
                }
                _ => println!("No answer found."),
            }

            if all {
                println!();
                for (i, candidate) in result.all_answers.iter().enumerate() {
                    println!(
                        "{}. {} (chunk {}, score: {:.3}, distance: {:.3})",
                        i + 1,
                        candidate.record.source,
                        candidate.record.chunk_index,
                        candidate.score,
                        candidate.distance
                    );
                    match &candidate.error {
                        Some(error) => println!("   Error: {error}"),
                        None if candidate.answer.is_empty() => println!("   (no answer)"),
                        None => println!("   {}", truncate(&candidate.answer, 200)),
                    }
                }
            }
        }
    }
    Ok(())
}

/// Ask a yes/no question on stdin.
fn confirm(prompt: &str) -> Result<bool> {
    print!("{prompt}");
    std::io::stdout().flush()?;
    let mut answer = String::new();
    std::io::stdin().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

/// Truncate a string to `max_chars` characters, adding ellipsis if needed.
fn truncate(s: &str, max_chars: usize) -> String {
    let s = s.replace('\n', " ").replace('\r', "");
    if s.chars().count() <= max_chars {
        s
    } else {
        let kept: String = s.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("line one\nline two", 100), "line one line two");
        assert_eq!(truncate("abcdefghij", 6), "abc...");
        // Multi-byte characters are never split
        assert_eq!(truncate("ééééééé", 5), "éé...");
    }

    #[test]
    fn test_cli_parses_ask() {
        let cli = Cli::try_parse_from(["docqa", "--format", "json", "ask", "Who?", "-k", "3", "--all"])
            .unwrap();
        assert!(matches!(cli.format, OutputFormat::Json));
        match cli.command {
            Commands::Ask {
                question,
                top_k,
                all,
            } => {
                assert_eq!(question, "Who?");
                assert_eq!(top_k, Some(3));
                assert!(all);
            }
            _ => panic!("Expected ask command"),
        }
    }

    #[test]
    fn test_cli_add_requires_path() {
        assert!(Cli::try_parse_from(["docqa", "add"]).is_err());
        assert!(Cli::try_parse_from(["docqa", "add", "a.pdf", "b.txt"]).is_ok());
    }

    #[test]
    fn test_create_embedder_rejects_unknown_model() {
        let mut config = Config::default();
        config.embedding.model = "gpt-embed".to_string();
        assert!(create_embedder(&config).is_err());

        config.embedding.model = "hashing-bow".to_string();
        config.embedding.dimension = 64;
        assert_eq!(create_embedder(&config).unwrap().dimension(), 64);
    }
}
