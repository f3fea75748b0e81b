use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use quarry_cli::output::{self, Format};
use quarry_cli::query_args;
use quarry_core::config::{resolve_with_base, Config, Settings};
use quarry_core::error::Error;
use quarry_core::ingest::CorpusReader;
use quarry_core::traits::DocumentIndexer;
use quarry_core::types::SearchStatus;
use quarry_engine::classifier::classify;
use quarry_engine::{validate_request, EngineOptions, QueryEngine, SearchOutcome};
use quarry_text::{TantivyIndexer, TantivyProvider};

#[derive(Parser)]
#[command(name = "quarry", version, about = "Index a text corpus and search it with highlighted snippets")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build the index from a directory of .txt files
    Index {
        /// Corpus root (defaults to data.corpus_dir)
        #[arg(long)]
        data_dir: Option<String>,
        /// Index directory, recreated on every run (defaults to data.index_dir)
        #[arg(long)]
        index_dir: Option<String>,
        /// Stop after this many documents
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Search the index
    Search {
        /// Query words; `--hits=N`, `--phrase=N`, `a_b` phrases and a trailing count are understood
        #[arg(required = true)]
        query: Vec<String>,
        /// Number of results
        #[arg(long)]
        hits: Option<usize>,
        /// Quote the first N words as a phrase
        #[arg(long)]
        phrase: Option<usize>,
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
        /// Index directory (defaults to data.index_dir)
        #[arg(long)]
        index_dir: Option<String>,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

fn resolve(flag: Option<String>, configured: &str) -> anyhow::Result<PathBuf> {
    let cwd = std::env::current_dir()?;
    Ok(resolve_with_base(&cwd, flag.as_deref().unwrap_or(configured)))
}

fn run_index(settings: &Settings, data_dir: Option<String>, index_dir: Option<String>, limit: Option<usize>) -> anyhow::Result<()> {
    let data_dir = resolve(data_dir, &settings.data.corpus_dir)?;
    let index_dir = resolve(index_dir, &settings.data.index_dir)?;
    println!("Indexing {} into {}", data_dir.display(), index_dir.display());

    let reader = match limit {
        Some(n) => CorpusReader::with_limit(n),
        None => CorpusReader::new(),
    };
    let docs = reader.read_dir(&data_dir)?;
    let mut indexer = TantivyIndexer::create(&index_dir)?.with_progress(std::io::stderr().is_terminal());
    let count = indexer.index_documents(&docs)?;
    println!("Indexed {count} documents");
    Ok(())
}

fn run_search(
    settings: &Settings,
    words: &[String],
    hits: Option<usize>,
    phrase: Option<usize>,
    format: Format,
    index_dir: Option<String>,
) -> anyhow::Result<()> {
    let parsed = query_args::parse(words, phrase);
    let count = hits.or(parsed.hits).unwrap_or(settings.search.default_hits);
    let options = EngineOptions::from(settings);
    validate_request(&parsed.query, count, options.max_hits)?;
    info!(query = %parsed.query, count, "searching");

    let index_dir = resolve(index_dir, &settings.data.index_dir)?;
    let outcome = match TantivyProvider::open(&index_dir) {
        Ok(provider) => {
            let provider = provider.with_conjunction_by_default(settings.provider.conjunction_by_default);
            QueryEngine::new(provider, options).search(&parsed.query, count)?
        }
        Err(e) => {
            tracing::warn!(error = %e, "index could not be opened");
            let shape = classify(&parsed.query, count)?.shape;
            SearchOutcome { shape, status: SearchStatus::IndexUnavailable, results: Vec::new() }
        }
    };
    print!("{}", output::render(&outcome, format, std::io::stdout().is_terminal())?);
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = Config::load().and_then(|config| {
        let settings = config.settings()?;
        match cli.command {
            Commands::Index { data_dir, index_dir, limit } => run_index(&settings, data_dir, index_dir, limit),
            Commands::Search { query, hits, phrase, format, index_dir } => {
                run_search(&settings, &query, hits, phrase, format, index_dir)
            }
        }
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            match e.downcast_ref::<Error>() {
                Some(Error::Validation(_)) => ExitCode::from(2),
                _ => ExitCode::FAILURE,
            }
        }
    }
}
