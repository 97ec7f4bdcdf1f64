//! # News Digest
//!
//! Crawls configured news sites, extracts article text with CSS selectors,
//! asks an OpenAI-compatible LLM for a short title and summary of each
//! article, and keeps the results as one JSON file per source and day.
//!
//! ## Usage
//!
//! ```sh
//! news_digest                         # crawl once
//! news_digest run --schedule 6        # crawl every 6 hours
//! news_digest query --source 网易      # print stored records
//! ```
//!
//! ## Architecture
//!
//! 1. **Registry**: load and validate the site list ([`sites`])
//! 2. **Indexing**: fetch each homepage and collect headline links ([`scrapers::links`])
//! 3. **Extraction**: fetch each article and pull out its text ([`scrapers::content`])
//! 4. **Cleaning**: drop boilerplate lines and bound the length ([`scrapers::cleaner`])
//! 5. **Summarization**: one provider call per article ([`summarizer`])
//! 6. **Validation and storage**: bound the summary and append it ([`validator`], [`outputs`])

use clap::Parser;
use std::error::Error;
use std::fs::OpenOptions;
use std::process::ExitCode;
use std::sync::Mutex;
use std::time::Instant;
use tracing::{debug, error, info, warn};
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod api;
mod cli;
mod config;
mod errors;
mod fetcher;
mod locale;
mod models;
mod outputs;
mod pipeline;
mod schedule;
mod scrapers;
mod sites;
mod summarizer;
mod utils;
mod validator;

use cli::{Cli, Command};
use config::{EnvFile, Settings, load_env_file};
use fetcher::HttpFetcher;
use outputs::{FileStore, RecordQuery, RecordStore};
use pipeline::Pipeline;
use schedule::{POLL_INTERVAL, Schedule};
use sites::{Site, load_sites};
use summarizer::AnySummarizer;
use utils::ensure_writable_dir;

#[tokio::main]
async fn main() -> ExitCode {
    // Before parsing, so `.env` values reach the env-backed options.
    let env_file = load_env_file(None);
    let args = Cli::parse();

    if let Err(e) = init_tracing(&args) {
        eprintln!("failed to initialize logging: {e}");
        return ExitCode::FAILURE;
    }

    match env_file {
        Ok(EnvFile::Loaded(path)) => info!(path = %path.display(), "Loaded environment file"),
        Ok(EnvFile::Absent) => debug!("No .env file found"),
        Err(e) => warn!(error = %e, "Ignoring unreadable .env file"),
    }

    let settings = Settings::from_cli(&args);
    debug!(?settings, "Resolved settings");

    let result = match args.action() {
        Command::Run { schedule: None } => run_once(&settings).await,
        Command::Run {
            schedule: Some(hours),
        } => run_scheduled(&settings, hours).await,
        Command::Query {
            source,
            date,
            filters,
        } => {
            let mut query = source.map(RecordQuery::for_source).unwrap_or_default();
            query.date = date;
            query.fields = filters;
            print_records(&settings, &query).await
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "news_digest failed");
            ExitCode::FAILURE
        }
    }
}

/// Logging to stderr, plus an optional plain-text copy appended to a file.
///
/// The file is never rotated. Stdout is left to `query` output. `RUST_LOG` wins over `--log-level`
/// when set.
fn init_tracing(args: &Cli) -> Result<(), Box<dyn Error>> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&args.log_level))?;

    let file_layer = match &args.log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            Some(
                tfmt::layer()
                    .with_ansi(false)
                    .with_target(true)
                    .with_timer(UtcTime::rfc_3339())
                    .with_writer(Mutex::new(file)),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tfmt::layer()
                .with_target(true)
                .with_file(false)
                .with_line_number(false)
                .with_timer(UtcTime::rfc_3339())
                .with_writer(std::io::stderr),
        )
        .with(file_layer)
        .try_init()?;
    Ok(())
}

/// Everything a crawl needs, built once and reused by scheduled runs.
struct Crawler {
    sites: Vec<Site>,
    pipeline: Pipeline<AnySummarizer, FileStore>,
}

impl Crawler {
    async fn build(settings: &Settings) -> Result<Self, Box<dyn Error>> {
        let sites = load_sites(settings.sites_file.as_deref())?;

        if let Err(e) = ensure_writable_dir(&settings.output_dir).await {
            error!(
                path = %settings.output_dir.display(),
                error = %e,
                "Output directory is not writable (fix perms or choose a different path)"
            );
            return Err(e);
        }

        let summarizer = AnySummarizer::from_settings(settings)?;
        let store = FileStore::new(&settings.output_dir);
        Ok(Self {
            sites,
            pipeline: Pipeline::new(settings, summarizer, store),
        })
    }

    async fn crawl(&self) {
        let start_time = Instant::now();
        info!(sites = self.sites.len(), "Crawl starting");
        let report = self.pipeline.run(&self.sites, HttpFetcher::new).await;
        for site in &report.sites {
            info!(
                site = %site.site,
                links = site.links,
                saved = site.saved,
                failed = site.failed,
                completed = site.completed,
                "Site summary"
            );
        }
        info!(
            saved = report.saved(),
            failed = report.failed(),
            elapsed_s = start_time.elapsed().as_secs(),
            "Crawl complete"
        );
    }
}

async fn run_once(settings: &Settings) -> Result<(), Box<dyn Error>> {
    let crawler = Crawler::build(settings).await?;
    crawler.crawl().await;
    Ok(())
}

/// Crawl every `hours` hours until interrupted with Ctrl-C.
async fn run_scheduled(settings: &Settings, hours: u64) -> Result<(), Box<dyn Error>> {
    let crawler = Crawler::build(settings).await?;
    let mut schedule = Schedule::every_hours(hours);
    info!(
        every_hours = hours,
        next_run_in_s = schedule.remaining(Instant::now()).as_secs(),
        "Scheduled mode; press Ctrl-C to stop"
    );

    loop {
        tokio::select! {
            signal = tokio::signal::ctrl_c() => {
                if let Err(e) = signal {
                    warn!(error = %e, "Could not listen for Ctrl-C; stopping");
                }
                info!("Interrupted; shutting down");
                return Ok(());
            }
            _ = tokio::time::sleep(POLL_INTERVAL) => {
                let now = Instant::now();
                if schedule.is_due(now) {
                    crawler.crawl().await;
                    schedule.advance(Instant::now());
                    info!(next_run_in_s = schedule.interval().as_secs(), "Waiting for next run");
                }
            }
        }
    }
}

async fn print_records(settings: &Settings, query: &RecordQuery) -> Result<(), Box<dyn Error>> {
    let store = FileStore::new(&settings.output_dir);
    let records = store.load(query).await?;
    info!(count = records.len(), "Loaded records");
    println!("{}", serde_json::to_string_pretty(&records)?);
    Ok(())
}
