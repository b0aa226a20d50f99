//! # Elo Harvest
//!
//! A harvesting pipeline that crawls football Elo ratings from
//! [elofootball.com](http://elofootball.com/), extracts the competition
//! standings, team ranking, and match tables of every country page,
//! normalizes them into tagged records, and loads them into SQLite while
//! mirroring everything collected into cumulative JSON snapshots.
//!
//! ## Usage
//!
//! ```sh
//! # Reload the current season for every country
//! elo_harvest --current-season 2023-2024
//!
//! # Append the configured historical seasons
//! elo_harvest --mode history
//! ```
//!
//! ## Architecture
//!
//! A run is a sequential pipeline:
//! 1. **Discovery**: read the country menu (and, per country, the season menu)
//! 2. **Classification**: pick the table implementing each dataset kind
//! 3. **Transformation**: normalize rows into country/season-tagged records
//! 4. **Load**: season-scoped replace into the store plus snapshot rewrite

use clap::Parser;
use std::error::Error;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{fmt as tfmt, EnvFilter};
use url::Url;

mod classify;
mod cli;
mod crawl;
mod error;
mod hierarchy;
mod models;
mod pipeline;
mod site;
mod store;
mod transform;
mod utils;

use cli::{Cli, Mode};
use crawl::Crawler;
use hierarchy::default_history_seasons;
use pipeline::LoadPipeline;
use site::HttpPage;
use store::SqliteStore;
use utils::ensure_writable_dir;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("elo_harvest starting up");

    let args = Cli::parse();
    debug!(?args.mode, ?args.current_season, ?args.output_dir, "Parsed CLI arguments");

    // Early check: ensure the snapshot output dir is writable
    if let Err(e) = ensure_writable_dir(&args.output_dir).await {
        error!(
            path = %args.output_dir,
            error = %e,
            "Snapshot output directory is not writable (fix perms or choose a different path)"
        );
        return Err(e);
    }

    // --- Acquire the run's resources: one page handle, one store ---
    let base_url = Url::parse(&args.base_url)?;
    let page = HttpPage::new(base_url)?;
    let store = SqliteStore::connect(&args.database_url).await?;
    info!(database_url = %args.database_url, "Store ready");

    let pipeline = LoadPipeline::new(&args.output_dir);
    let mut crawler = Crawler::new(
        page,
        store,
        pipeline,
        args.current_season.clone(),
        default_history_seasons(),
    );

    let stats = match args.mode {
        Mode::Current => crawler.run_current_season().await?,
        Mode::History => crawler.run_history().await?,
    };

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        pages = stats.pages_visited,
        records = stats.records_loaded,
        malformed_rows = stats.malformed_rows,
        "Execution complete"
    );

    Ok(())
}
