//! TF-IDF CLI - build, persist and query a TF-IDF search index

mod interactive;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tfidf::{Engine, EngineConfig, SearchResults, SinkKind, SourceConfig};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Number of search results shown when no limit is given
const DEFAULT_RESULT_LIMIT: usize = 50;

#[derive(Parser)]
#[command(name = "tfidf")]
#[command(author, version, about = "TF-IDF document search")]
#[command(propagate_version = true)]
struct Cli {
    /// YAML configuration file
    #[arg(long, short = 'c', global = true)]
    config: Option<PathBuf>,

    /// How the index is stored (json, db)
    #[arg(long, short = 't', global = true)]
    index_type: Option<String>,

    /// Index location (default: ~/.cache/tfidf/index.json or index.sqlite)
    #[arg(long, short = 'i', env = "TFIDF_INDEX_PATH", global = true)]
    index_path: Option<PathBuf>,

    /// Use smoothed TF and IDF when building
    #[arg(long, global = true)]
    smoothing: bool,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the index from a directory and save it
    Index {
        /// Directory to index (default: the configured source)
        directory: Option<PathBuf>,

        /// Index at most this many documents
        #[arg(long, short = 'n')]
        limit: Option<usize>,

        /// Descend into subdirectories
        #[arg(long, short = 'r')]
        recursive: bool,

        /// Glob patterns to include (default: all files)
        #[arg(long, short = 'p')]
        patterns: Vec<String>,

        /// Glob patterns to exclude
        #[arg(long, short = 'e')]
        exclude: Vec<String>,

        /// Skip unreadable files instead of failing
        #[arg(long)]
        lenient: bool,
    },

    /// Search the index
    Search {
        /// Search query
        query: String,

        /// Maximum number of results
        #[arg(long, short = 'n', default_value_t = DEFAULT_RESULT_LIMIT)]
        limit: usize,

        /// Output format (text, json)
        #[arg(long, short = 'o', default_value = "text")]
        format: String,
    },

    /// Rank the words of a text by how rare they are in the corpus
    Keywords {
        /// Text to analyse
        text: String,

        /// Output format (text, json)
        #[arg(long, short = 'o', default_value = "text")]
        format: String,
    },

    /// Show index status and statistics
    Status,

    /// Read queries from standard input until an empty line
    Interactive,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let config = engine_config(&cli)?;

    match cli.command {
        Commands::Index {
            directory,
            limit,
            recursive,
            patterns,
            exclude,
            lenient,
        } => cmd_index(
            config,
            directory.as_deref(),
            limit,
            recursive,
            &patterns,
            &exclude,
            lenient,
        ),
        Commands::Search {
            query,
            limit,
            format,
        } => cmd_search(config, &query, limit, &format),
        Commands::Keywords { text, format } => cmd_keywords(config, &text, &format),
        Commands::Status => cmd_status(config),
        Commands::Interactive => interactive::run(open_engine(config)?),
    }
}

/// Merge the config file with command-line overrides
fn engine_config(cli: &Cli) -> Result<EngineConfig> {
    let mut config = match &cli.config {
        Some(path) => EngineConfig::from_yaml_file(path)?,
        None => EngineConfig::default(),
    };

    if cli.smoothing {
        config.enforce_correct_smoothing = true;
    }

    let kind: SinkKind = match &cli.index_type {
        Some(index_type) => index_type.parse()?,
        None => config.sink.as_ref().map(|s| s.kind()).unwrap_or_default(),
    };

    if cli.index_path.is_some() || cli.index_type.is_some() || config.sink.is_none() {
        let configured = config
            .sink
            .as_ref()
            .filter(|sink| sink.kind() == kind)
            .map(|sink| sink.path().to_path_buf());
        let path = cli
            .index_path
            .clone()
            .or(configured)
            .unwrap_or_else(|| kind.default_path());
        config.sink = Some(kind.config(path));
    }

    Ok(config)
}

/// Open the engine and load the persisted index.
///
/// Without a persisted index the engine is still usable when a source is
/// configured: the first search builds the index.
fn open_engine(config: EngineConfig) -> Result<Engine> {
    let has_source = config.source.is_some();
    let mut engine = Engine::new(config)?;

    match engine.load_index() {
        Ok(()) => {
            if let Some(bytes) = engine.index_size()? {
                tracing::info!("Loaded index of {:.2} MB", megabytes(bytes));
            }
        }
        Err(tfidf::Error::IndexNotFound(path)) if has_source => {
            tracing::info!(
                "No index at {}, it will be built from the source",
                path.display()
            );
        }
        Err(tfidf::Error::IndexNotFound(path)) => {
            bail!(
                "No index found at {}. Run 'tfidf index <DIRECTORY>' first.",
                path.display()
            );
        }
        Err(e) => return Err(e.into()),
    }

    Ok(engine)
}

#[allow(clippy::too_many_arguments)]
fn cmd_index(
    mut config: EngineConfig,
    directory: Option<&Path>,
    limit: Option<usize>,
    recursive: bool,
    patterns: &[String],
    exclude: &[String],
    lenient: bool,
) -> Result<()> {
    if let Some(directory) = directory {
        config.source = Some(SourceConfig::Directory {
            path: directory.to_path_buf(),
            patterns: patterns.to_vec(),
            exclude: exclude.to_vec(),
            recursive,
        });
    }
    if config.source.is_none() {
        bail!("No directory to index. Pass one or configure a source.");
    }
    config.lenient |= lenient;

    let mut engine = Engine::new(config)?;

    let start = Instant::now();
    engine.build_index(limit)?;
    let built = start.elapsed();

    let start = Instant::now();
    engine.save_index()?;
    let saved = start.elapsed();

    let metadata = engine.metadata();
    let location = engine.sink().map(|s| s.location()).unwrap_or_default();
    println!(
        "Indexed {} documents, {} words in index ({:.2}s)",
        metadata.documents,
        metadata.uniq_words,
        built.as_secs_f64()
    );
    println!("Saved to {} ({:.2}s)", location, saved.as_secs_f64());
    if let Some(bytes) = engine.index_size()? {
        println!("Size on disk: {:.2} MB", megabytes(bytes));
    }
    Ok(())
}

fn cmd_search(config: EngineConfig, query: &str, limit: usize, format: &str) -> Result<()> {
    let mut engine = open_engine(config)?;
    let results = engine.search(query)?;

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&search_json(&results, limit))?);
    } else {
        print_search_results(&results, limit);
    }
    Ok(())
}

fn cmd_keywords(config: EngineConfig, text: &str, format: &str) -> Result<()> {
    let mut engine = open_engine(config)?;
    let keywords = engine.determine_keywords(text)?;

    if format == "json" {
        let data: Vec<_> = keywords
            .iter()
            .map(|(word, score)| serde_json::json!({ "word": word, "score": score }))
            .collect();
        println!("{}", serde_json::to_string_pretty(&data)?);
    } else {
        print_keywords(&keywords);
    }
    Ok(())
}

fn cmd_status(config: EngineConfig) -> Result<()> {
    let mut engine = Engine::new(config)?;
    let location = engine.sink().map(|s| s.location()).unwrap_or_default();

    match engine.load_index() {
        Ok(()) => {}
        Err(tfidf::Error::IndexNotFound(_)) => {
            println!("No index found at {}. Run 'tfidf index' first.", location);
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    }

    let metadata = engine.metadata();
    println!("TF-IDF Index Status");
    println!("===================");
    println!("Index: {}", location);
    println!("Words in index: {}", metadata.uniq_words);
    println!("Documents: {}", metadata.documents);
    println!(
        "Smoothing: {}",
        if metadata.smoothing { "on" } else { "off" }
    );
    if let Some(built_at) = &metadata.built_at {
        println!("Built at: {}", built_at);
    }
    if let Some(bytes) = engine.index_size()? {
        println!("Size on disk: {:.2} MB", megabytes(bytes));
    }
    Ok(())
}

/// Bytes to megabytes
fn megabytes(bytes: u64) -> f64 {
    bytes as f64 / (1024.0 * 1024.0)
}

/// Last path component of a document identifier
fn display_name(identifier: &str) -> &str {
    identifier
        .rsplit(&['/', '\\'][..])
        .next()
        .filter(|name| !name.is_empty())
        .unwrap_or(identifier)
}

/// Search results as a JSON value
fn search_json(results: &SearchResults, limit: usize) -> serde_json::Value {
    let hits: Vec<_> = results
        .iter()
        .take(limit)
        .enumerate()
        .map(|(i, (id, result))| {
            serde_json::json!({
                "rank": i + 1,
                "id": id,
                "score": result.score,
                "original": result.original,
                "diff": result.diff,
                "wordsContained": result.words_contained,
            })
        })
        .collect();

    serde_json::json!({
        "query": results.query,
        "total": results.len(),
        "results": hits,
        "wordsNotFound": results.words_not_found,
    })
}

/// Print search results as aligned text rows
fn print_search_results(results: &SearchResults, limit: usize) {
    if !results.words_not_found.is_empty() {
        let missing: Vec<&str> = results.words_not_found.iter().map(|w| w.as_str()).collect();
        println!("Words not in index: {}", missing.join(", "));
    }

    if results.is_empty() {
        println!("No results");
        return;
    }

    let shown: Vec<_> = results.iter().take(limit).collect();
    let offset = shown
        .iter()
        .map(|(id, _)| display_name(id).len())
        .max()
        .unwrap_or(0);

    println!("Displaying top {} of {} results\n", shown.len(), results.len());
    for (id, result) in shown {
        let words: Vec<&str> = result.words_contained.iter().map(|w| w.as_str()).collect();
        println!(
            "{:<width$} == {:.5} --> {:.5} --> {:.2} --> {}",
            display_name(id),
            result.score,
            result.original,
            result.diff,
            words.join(", "),
            width = offset
        );
    }
}

/// Print keyword scores, most salient first
fn print_keywords(keywords: &[(String, f64)]) {
    if keywords.is_empty() {
        println!("No words");
        return;
    }

    let offset = keywords.iter().map(|(w, _)| w.len()).max().unwrap_or(0) + 2;
    for (word, score) in keywords {
        println!(" * {:<width$}{:.5}", word, score, width = offset);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name() {
        assert_eq!(display_name("/srv/stories/dragon.txt"), "dragon.txt");
        assert_eq!(display_name("C:\\stories\\knight.txt"), "knight.txt");
        assert_eq!(display_name("plain"), "plain");
        assert_eq!(display_name("trailing/"), "trailing/");
    }

    #[test]
    fn test_megabytes() {
        assert_eq!(megabytes(0), 0.0);
        assert_eq!(megabytes(1024 * 1024), 1.0);
        assert_eq!(megabytes(512 * 1024), 0.5);
    }

    #[test]
    fn test_engine_config_defaults_to_json_sink() {
        let cli = Cli::parse_from(["tfidf", "status"]);
        let config = engine_config(&cli).unwrap();
        assert_eq!(config.sink.unwrap().kind(), SinkKind::Json);
    }

    #[test]
    fn test_engine_config_overrides() {
        let cli = Cli::parse_from([
            "tfidf",
            "--index-type",
            "db",
            "--index-path",
            "/tmp/x.sqlite",
            "--smoothing",
            "status",
        ]);
        let config = engine_config(&cli).unwrap();
        let sink = config.sink.unwrap();

        assert!(config.enforce_correct_smoothing);
        assert_eq!(sink.kind(), SinkKind::Database);
        assert_eq!(sink.path(), Path::new("/tmp/x.sqlite"));
    }

    #[test]
    fn test_invalid_index_type() {
        let cli = Cli::parse_from(["tfidf", "--index-type", "csv", "status"]);
        assert!(engine_config(&cli).is_err());
    }
}
