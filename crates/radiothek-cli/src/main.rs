mod config;
mod download;
mod paths;
mod show;
mod tag;


use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use radiothek_api::types::{HitData, SearchResponse};
use radiothek_api::CatalogClient;

use crate::config::Config;
use crate::download::{Downloader, COVER_POLL_INTERVAL};

#[derive(Parser)]
#[command(
    name = "radiothek",
    version,
    about = "Search and download broadcasts from the ORF Radiothek"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Search the catalog for matching broadcasts
    Search {
        /// Free-text query, e.g. a show name
        query: String,
    },
    /// Download every broadcast matching a show name
    Download {
        /// Show name to match against broadcast titles
        show: String,
        /// Base directory to save shows under (overrides the config)
        #[arg(long)]
        out_base_dir: Option<PathBuf>,
        /// Print download progress
        #[arg(long)]
        progress: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::load().context("failed to load configuration")?;
    let client = CatalogClient::new(config.catalog.search_url.clone());

    match cli.command {
        Command::Search { query } => run_search(&client, &query).await,
        Command::Download {
            show,
            out_base_dir,
            progress,
        } => run_download(&client, &config, &show, out_base_dir, progress).await,
    }
}

async fn run_search(client: &CatalogClient, query: &str) -> Result<()> {
    println!("Searching for '{query}' ...\n");

    let response = client.search(query).await.context("catalog search failed")?;
    let matches = show::matching_hits(&response, query);
    if matches.is_empty() {
        print_suggestions(query, &response);
        return Ok(());
    }

    println!("Found the following broadcasts:");
    for hit in matches {
        print_hit(hit);
    }
    Ok(())
}

fn print_hit(hit: &HitData) {
    println!();
    println!("   Name:            {}", hit.title);
    println!("   ProgramKey:      {}", hit.program_key);
    println!("   BroadcastDay:    {}", hit.broadcast_day);
    println!("   Href:            {}", hit.href);
    if let (Some(start), Some(end)) = (hit.start_iso, hit.end_iso) {
        println!("   Start:           {}", start.to_rfc3339());
        println!("   Weekday:         {}", start.format("%A"));
        println!(
            "   Duration (min):  {}",
            end.signed_duration_since(start).num_minutes()
        );
        let offset_hours =
            start.signed_duration_since(Local::now()).num_seconds() as f64 / 3600.0;
        println!("   Offset (hours):  {offset_hours:.2}");
    }
}

fn print_suggestions(query: &str, response: &SearchResponse) {
    if response.suggest.is_empty() {
        println!("No search results for '{query}'.");
        return;
    }

    let suggestions: Vec<String> = response
        .suggest
        .iter()
        .map(|s| format!("'{}'", s.text))
        .collect();
    println!(
        "No results found for '{query}'. Did you mean {}?",
        suggestions.join(" or ")
    );
}

async fn run_download(
    client: &CatalogClient,
    config: &Config,
    term: &str,
    out_base_dir: Option<PathBuf>,
    progress: bool,
) -> Result<()> {
    let base = out_base_dir.unwrap_or_else(|| config.paths.out_base_dir.clone());

    let response = client.search(term).await.context("catalog search failed")?;
    let hits = show::matching_hits(&response, term);
    if hits.is_empty() {
        // Nothing to download is not an error.
        print_suggestions(term, &response);
        return Ok(());
    }

    let downloader = Downloader::new();
    let poll = progress.then(|| Duration::from_millis(config.download.progress_poll_ms));

    let mut failed = 0usize;
    for &hit in &hits {
        if let Err(err) = download_broadcast(client, &downloader, config, &base, hit, poll).await
        {
            error!("skipping broadcast '{}': {err:#}", hit.title);
            failed += 1;
        }
    }

    if failed > 0 {
        bail!("{failed} of {} matching broadcasts failed", hits.len());
    }
    Ok(())
}

/// Fetch, download, and tag one matched broadcast.
async fn download_broadcast(
    client: &CatalogClient,
    downloader: &Downloader,
    config: &Config,
    base: &Path,
    hit: &HitData,
    poll: Option<Duration>,
) -> Result<()> {
    let record = client
        .broadcast(&hit.href)
        .await
        .with_context(|| format!("fetching broadcast {}", hit.href))?;
    let show = show::resolve(&record);

    let Some(stream) = show.streams.first() else {
        info!(
            "no stream available for {} on {}, skipping",
            show.title, show.broadcast_day
        );
        return Ok(());
    };

    let url = config.stream.stream_url(stream);
    let out_dir = paths::output_path(base, &show);
    let audio_path = downloader
        .download(&url, &out_dir, &paths::file_name(&show), poll)
        .await?;

    let cover_path = downloader
        .save_cover(base, &show, poll.map(|_| COVER_POLL_INTERVAL))
        .await?;

    tag::write_tags(&audio_path, cover_path.as_deref(), &show).await?;

    println!("Saved {}", audio_path.display());
    Ok(())
}
