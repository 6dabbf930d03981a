//! # Word of the Day Bot
//!
//! A reddit bot that replies to comments mentioning the Merriam-Webster word
//! of the day.
//!
//! ## Usage
//!
//! ```sh
//! REDDIT_USERNAME=... REDDIT_PASSWORD=... \
//! REDDIT_CLIENT_ID=... REDDIT_CLIENT_SECRET=... wotd_bot
//! ```
//!
//! ## Architecture
//!
//! 1. **Login**: resolve credentials and obtain an OAuth token
//! 2. **Ledger**: load the ids of comments already answered
//! 3. **Poll**: every 10 seconds, scrape the word, scan 25 recent comments,
//!    reply to matches and record them
//! 4. **Shutdown**: Ctrl-C stops the loop between passes

use clap::Parser;
use std::error::Error;
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod bot;
mod cli;
mod config;
mod ledger;
mod models;
mod reddit;
mod reply;
mod scrapers;
mod utils;

use cli::Cli;
use config::Credentials;
use ledger::Ledger;
use reddit::RedditClient;
use scrapers::merriam_webster::MerriamWebster;

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
    info!(version = env!("CARGO_PKG_VERSION"), "wotd_bot starting up");

    let args = Cli::parse();
    debug!(?args.config, %args.subreddit, %args.ledger, "Parsed CLI arguments");

    if let Err(e) = run(&args).await {
        error!(error = %e, "Bot stopped on error");
        return Err(e);
    }

    let elapsed = start_time.elapsed();
    info!(?elapsed, secs = elapsed.as_secs(), "Shut down cleanly");
    Ok(())
}

async fn run(args: &Cli) -> Result<(), Box<dyn Error>> {
    let credentials = Credentials::from_cli(args).await?;
    let feed = RedditClient::login(credentials, &args.user_agent).await?;

    let mut ledger = Ledger::load(&args.ledger).await?;
    if ledger.is_empty() {
        info!(path = %ledger.path().display(), "Ledger is empty; every matching comment is fair game");
    } else {
        info!(path = %ledger.path().display(), entries = ledger.len(), "Ledger ready");
    }

    let http = reqwest::Client::builder()
        .user_agent(&args.user_agent)
        .timeout(Duration::from_secs(30))
        .build()?;
    let words = MerriamWebster::new(http);

    let passes = bot::run(
        &words,
        &feed,
        &mut ledger,
        &args.subreddit,
        bot::POLL_INTERVAL,
        shutdown_signal(),
    )
    .await?;
    info!(passes, ledger_size = ledger.len(), "Polling stopped");
    Ok(())
}

/// Resolves on Ctrl-C. If the handler cannot be installed the bot keeps
/// running until killed.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Could not listen for Ctrl-C; only an external kill will stop the bot");
        std::future::pending::<()>().await;
    }
}
