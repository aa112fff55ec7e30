use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use lexcode_core::article::format_date_fr;
use lexcode_core::config::EngineConfig;
use lexcode_core::persist::{build_or_load, invalidate_cache, IndexSource};
use lexcode_core::{Corpus, Resolution, SearchEngine};
use std::fmt::Write as _;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "lexcode")]
#[command(about = "Search the articles of a legal code with BM25", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct DatasetArgs {
    /// CSV file path
    #[arg(long)]
    file: Option<PathBuf>,
    /// Generated index's file path
    #[arg(long)]
    index: Option<PathBuf>,
    /// Delete the cached index and re-index the content
    #[arg(long, default_value_t = false)]
    retrain: bool,
    /// Rebuild when the cached index was made from another dataset
    #[arg(long, default_value_t = false)]
    verify_cache: bool,
}

impl DatasetArgs {
    fn config(&self) -> EngineConfig {
        let mut config = EngineConfig::from_env();
        if let Some(file) = &self.file {
            config.dataset_path = file.clone();
        }
        if let Some(index) = &self.index {
            config.index_path = index.clone();
        }
        config.verify_fingerprint |= self.verify_cache;
        config
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Build the index, or load it from the cache, and report its size
    Build {
        #[command(flatten)]
        dataset: DatasetArgs,
    },
    /// Answer one query, or read queries from stdin until end of input
    Search {
        #[command(flatten)]
        dataset: DatasetArgs,
        /// Results are cut once more than this many are collected
        #[arg(long)]
        limit: Option<usize>,
        query: Option<String>,
    },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Build { dataset } => build(&dataset),
        Commands::Search { dataset, limit, query } => {
            let mut config = dataset.config();
            if let Some(limit) = limit {
                config.limit = limit;
            }
            let engine = open_engine(&config, dataset.retrain)?;
            match query {
                Some(q) => {
                    print!("{}", render_results(&q, &engine.solve(&q, config.limit))?);
                    Ok(())
                }
                None => query_loop(&engine, config.limit),
            }
        }
    }
}

fn build(dataset: &DatasetArgs) -> Result<()> {
    let config = dataset.config();
    if dataset.retrain {
        invalidate_cache(&config.index_path)?;
    }
    let corpus = Corpus::from_csv_path(&config.dataset_path)?;
    let report = build_or_load(&corpus, &config.index_path, config.cache_options())?;
    let origin = match report.source {
        IndexSource::Loaded => "loaded",
        IndexSource::Built => "built",
    };
    println!(
        "index {origin}: {} articles, {} words ({})",
        corpus.len(),
        report.index.num_terms(),
        config.index_path.display()
    );
    if !report.persisted {
        anyhow::bail!("index could not be saved to {}", config.index_path.display());
    }
    Ok(())
}

fn open_engine(config: &EngineConfig, retrain: bool) -> Result<SearchEngine> {
    if retrain {
        invalidate_cache(&config.index_path)?;
    }
    Ok(SearchEngine::open(config)?)
}

fn query_loop(engine: &SearchEngine, limit: usize) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    loop {
        write!(stdout, "Query: ")?;
        stdout.flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            return Ok(());
        }
        let query = line.trim_end_matches(|c: char| c == '\n' || c == '\r');
        write!(stdout, "{}", render_results(query, &engine.solve(query, limit))?)?;
    }
}

fn render_results(query: &str, resolution: &Resolution<'_>) -> Result<String, std::fmt::Error> {
    let mut out = String::new();
    writeln!(out, "{} résultat(s) correspondant à la requête '{}'.", resolution.len(), query)?;
    for (n, article) in resolution.iter().enumerate() {
        writeln!(out, "\n>>>>>>>>>>>>>>>>>>>> Résultat n.{} <<<<<<<<<<<<<<<<<<<<<", n + 1)?;
        writeln!(out, "ID Base de données: {}", article.article_id)?;
        writeln!(out, "Article {}", article.article_num)?;
        let date = article.effective_date().map(format_date_fr).unwrap_or_else(|| "date inconnue".into());
        writeln!(out, "En vigueur depuis: {date}\n")?;
        for title in article.titles() {
            writeln!(out, "{title}")?;
        }
        writeln!(out)?;
        for paragraph in article.paragraphs() {
            writeln!(out, "{paragraph}\n")?;
        }
    }
    Ok(out)
}
