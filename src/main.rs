use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use playlstr::album::OriginRegistry;
use playlstr::board::{albums_from_board, hours_before, BoardQuery};
use playlstr::config::Config;
use playlstr::feedly::{FeedlyClient, HttpTransport, PageLimit, Ranking};

/// Get the default config file path (~/.config/playlstr/config.toml)
fn default_config_path() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home)
        .join(".config")
        .join("playlstr")
        .join("config.toml"))
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum RankArg {
    Newest,
    Oldest,
}

impl From<RankArg> for Ranking {
    fn from(arg: RankArg) -> Self {
        match arg {
            RankArg::Newest => Ranking::NewestFirst,
            RankArg::Oldest => Ranking::OldestFirst,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "playlstr", about = "Extract album metadata from a feedly board")]
struct Args {
    /// Config file (defaults to ~/.config/playlstr/config.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Board label to read (overrides config)
    #[arg(long, value_name = "LABEL")]
    board: Option<String>,

    /// Maximum number of stream pages to read (overrides config)
    #[arg(long, value_name = "N", conflicts_with = "max_items")]
    max_pages: Option<usize>,

    /// Stop after this many entries instead of a page count
    #[arg(long, value_name = "N")]
    max_items: Option<usize>,

    /// Only read unread entries
    #[arg(long)]
    unread_only: bool,

    /// Only read entries from the last N hours
    #[arg(long, value_name = "HOURS", value_parser = clap::value_parser!(i64).range(0..))]
    newer_than_hours: Option<i64>,

    /// Order entries newest or oldest first (server default otherwise)
    #[arg(long, value_enum)]
    ranked: Option<RankArg>,

    /// List entry ids first, then fetch entries in batches
    #[arg(long)]
    resolve_ids: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config_path = match args.config {
        Some(path) => path,
        None => default_config_path()?,
    };
    let config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    // Missing token is fatal before any request is made.
    let credentials = config.credentials()?;
    tracing::debug!(user_id = ?credentials.user_id, "Credentials loaded");

    let http = reqwest::Client::builder()
        .build()
        .context("Failed to build HTTP client")?;
    let transport = HttpTransport::new(http, credentials.access_token, config.request_timeout());
    let client = FeedlyClient::new(transport, &config.base_url)
        .with_context(|| format!("Invalid base URL: {}", config.base_url))?;

    let limit = match (args.max_items, args.max_pages) {
        (Some(items), _) => PageLimit::Items(items),
        (None, Some(pages)) => PageLimit::Pages(pages),
        (None, None) => PageLimit::Pages(config.max_pages),
    };

    let mut query = BoardQuery::new(args.board.unwrap_or_else(|| config.board.clone()), limit);
    query.page_size = config.page_size;
    query.unread_only = args.unread_only || config.unread_only;
    query.newer_than = args
        .newer_than_hours
        .map(|h| {
            hours_before(Utc::now(), h)
                .with_context(|| format!("--newer-than-hours {} is out of range", h))
        })
        .transpose()?;
    query.ranked = args.ranked.map(Ranking::from);
    query.resolve_ids = args.resolve_ids;

    let registry = OriginRegistry::with_defaults();
    let report = albums_from_board(&client, &registry, &query)
        .await
        .with_context(|| format!("Failed to read board {:?}", query.label))?;

    for (_, meta) in &report.albums {
        println!("{:?}", meta);
    }

    if !report.skipped.is_empty() {
        eprintln!(
            "Skipped {} of {} entries (run with RUST_LOG=warn for details)",
            report.skipped.len(),
            report.skipped.len() + report.albums.len()
        );
    }
    if !report.complete {
        eprintln!("Warning: stopped at the page limit before the end of the board");
    }

    Ok(())
}
