//! simsearch command line entry point
//!
//! Two modes:
//! - one-shot (a query argument is given): load, build, search, print, exit
//! - interactive (no query): read commands and queries from stdin

mod commands;
mod display;

use clap::Parser;
use simsearch::{config::MAX_TOP_K, prelude::*};
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use commands::Command;

#[derive(Parser)]
#[command(name = "simsearch")]
#[command(about = "Semantic similarity search over sample or database texts")]
#[command(version)]
struct Args {
    /// JSON config file
    #[arg(long, short, env = "SIMSEARCH_CONFIG")]
    config: Option<PathBuf>,

    /// Where to load texts from: `sample` or `database`
    #[arg(long, short, default_value = "sample")]
    source: SourceKind,

    /// Use the sample texts when the database yields no documents
    #[arg(long)]
    fallback_sample: bool,

    /// Number of results per query, defaults to the config's `top_k`
    #[arg(long, short = 'k', value_parser = clap::value_parser!(u8).range(1..=MAX_TOP_K as i64))]
    top_k: Option<u8>,

    /// Search once for this query and exit
    query: Option<String>,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "simsearch=info,simsearch_cli=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = match &args.config {
        Some(path) => match AppConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                error!("Failed to load config {}: {e}", path.display());
                std::process::exit(1);
            }
        },
        None => AppConfig::default(),
    };
    let top_k = args.top_k.map_or(config.top_k, usize::from);

    let session =
        match SearchSession::with_shared_model(SharedModel::global(), &config.embedding).await {
            Ok(session) => session,
            Err(e) => {
                error!("{e}");
                std::process::exit(1);
            }
        };
    info!(model = session.model_name(), "Session ready");

    let mut app = App {
        session,
        config,
        source: args.source,
        fallback_sample: args.fallback_sample,
        top_k,
    };

    match args.query {
        Some(query) => {
            app.build().await;
            app.search(&query).await;
        }
        None => app.run_interactive().await,
    }
}

struct App {
    session: SearchSession,
    config: AppConfig,
    source: SourceKind,
    fallback_sample: bool,
    top_k: usize,
}

impl App {
    async fn run_interactive(&mut self) {
        println!(
            "Selected source: {}. Type :build to index it, :help for commands.",
            self.source
        );
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            let line = match lines.next_line().await {
                Ok(Some(line)) => line,
                Ok(None) => break,
                Err(e) => {
                    error!("Failed to read stdin: {e}");
                    break;
                }
            };
            match commands::parse(&line) {
                None => {}
                Some(Command::Quit) => break,
                Some(Command::Build) => self.build().await,
                Some(Command::Docs) => {
                    let documents = self.session.indexed_documents().await;
                    print!("{}", display::format_documents(&documents));
                }
                Some(Command::Source(kind)) => {
                    self.source = kind;
                    println!("Selected source: {kind}. Run :build to index it.");
                }
                Some(Command::TopK(k)) => {
                    self.top_k = k;
                    println!("Showing top {k} results");
                }
                Some(Command::Help) => println!("{}", commands::HELP),
                Some(Command::Query(query)) => self.search(&query).await,
                Some(Command::Invalid(message)) => println!("{message}"),
            }
        }
    }

    async fn build(&self) {
        let documents = self.load_documents().await;
        match self.session.build_index(documents).await {
            Ok(size) => println!("Vector index built with {size} documents"),
            Err(e) => println!("{e}"),
        }
    }

    async fn load_documents(&self) -> Vec<Document> {
        let load = self
            .session
            .load_source_or_sample(self.source, &self.config, self.fallback_sample)
            .await;
        print!("{}", display::format_load(&load, self.source));
        load.documents
    }

    async fn search(&self, query: &str) {
        match self.session.search(query, self.top_k).await {
            Ok(results) => print!("{}", display::format_results(&results)),
            Err(e) => println!("{e}"),
        }
    }
}
