//! The poll loop.
//!
//! Each pass fetches the word of the day, lists the newest comments of the
//! subreddit and answers every comment that mentions the word, has not been
//! answered before and was not written by the bot itself. Passes are separated
//! by a fixed sleep; a shutdown signal is honoured between passes.
//!
//! ```text
//! FETCH_WORD -> ITERATE_COMMENTS -> SLEEP -> FETCH_WORD -> ...
//!                                      \
//!                                       shutdown -> exit
//! ```
//!
//! Every failure (word fetch, listing, reply, ledger write) ends the loop with
//! an error. A reply is sent before its id is recorded, so a crash between
//! the two can produce a duplicate reply after restart.

use crate::ledger::Ledger;
use crate::models::{Comment, PassReport, WordOfDay};
use crate::reddit::CommentFeed;
use crate::reply::compose;
use crate::scrapers::WordSource;
use crate::utils::{mentions, truncate_for_log};
use std::error::Error;
use std::future::Future;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument};

/// Comments requested per pass.
pub const BATCH_SIZE: usize = 25;
/// Pause between the end of one pass and the start of the next.
pub const POLL_INTERVAL: Duration = Duration::from_secs(10);

/// What to do with a single comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Doesn't mention the word.
    Ignore,
    /// Mentions the word but is already in the ledger.
    AlreadyAnswered,
    /// Mentions the word but the bot wrote it.
    OwnComment,
    Reply,
}

/// Decide whether `comment` should be answered.
///
/// Reddit usernames are case-insensitive, so the author check is too.
pub fn decide(word: &str, comment: &Comment, ledger: &Ledger, bot_username: &str) -> Decision {
    if !mentions(&comment.body, word) {
        Decision::Ignore
    } else if ledger.contains(&comment.id) {
        Decision::AlreadyAnswered
    } else if comment.author.eq_ignore_ascii_case(bot_username) {
        Decision::OwnComment
    } else {
        Decision::Reply
    }
}

/// Run a single pass: fetch the word, scan one batch, reply and record.
#[instrument(level = "info", skip_all, fields(subreddit = %subreddit))]
pub async fn run_pass<W, F>(
    words: &W,
    feed: &F,
    ledger: &mut Ledger,
    subreddit: &str,
) -> Result<PassReport, Box<dyn Error>>
where
    W: WordSource,
    F: CommentFeed,
{
    let word = words.fetch_word().await?;
    let comments = feed.recent_comments(subreddit, BATCH_SIZE).await?;

    let mut report = PassReport {
        scanned: comments.len(),
        ..PassReport::default()
    };

    for comment in &comments {
        match decide(&word.headword, comment, ledger, feed.bot_username()) {
            Decision::Ignore => {}
            Decision::AlreadyAnswered => {
                debug!(comment_id = %comment.id, "Already answered");
                report.skipped_seen += 1;
            }
            Decision::OwnComment => {
                debug!(comment_id = %comment.id, "Skipping own comment");
                report.skipped_own += 1;
            }
            Decision::Reply => {
                answer(&word, feed, ledger, comment).await?;
                report.replied += 1;
            }
        }
    }

    Ok(report)
}

async fn answer<F: CommentFeed>(
    word: &WordOfDay,
    feed: &F,
    ledger: &mut Ledger,
    comment: &Comment,
) -> Result<(), Box<dyn Error>> {
    info!(
        comment_id = %comment.id,
        author = %comment.author,
        body = %truncate_for_log(&comment.body, 120),
        "Comment found"
    );

    let text = compose(
        &word.headword,
        &word.attribute,
        &word.syllables,
        &word.definitions,
    );
    feed.reply(comment, &text).await?;
    ledger.record(&comment.id).await?;

    info!(comment_id = %comment.id, "Replied to comment");
    Ok(())
}

/// Poll until `shutdown` resolves or a pass fails.
///
/// Returns the number of completed passes. `shutdown` is only checked while
/// sleeping, so a pass in progress always finishes first.
#[instrument(level = "info", skip_all, fields(subreddit = %subreddit, interval = ?interval))]
pub async fn run<W, F, S>(
    words: &W,
    feed: &F,
    ledger: &mut Ledger,
    subreddit: &str,
    interval: Duration,
    shutdown: S,
) -> Result<u64, Box<dyn Error>>
where
    W: WordSource,
    F: CommentFeed,
    S: Future<Output = ()>,
{
    tokio::pin!(shutdown);
    let mut passes = 0u64;

    loop {
        let t0 = Instant::now();
        let report = run_pass(words, feed, ledger, subreddit).await?;
        passes += 1;
        info!(
            pass = passes,
            scanned = report.scanned,
            replied = report.replied,
            skipped_seen = report.skipped_seen,
            skipped_own = report.skipped_own,
            ledger_size = ledger.len(),
            elapsed_ms = t0.elapsed().as_millis() as u128,
            "Pass complete"
        );

        tokio::select! {
            biased;
            _ = &mut shutdown => {
                info!(passes, "Shutdown requested; stopping");
                return Ok(passes);
            }
            _ = tokio::time::sleep(interval) => {}
        }
    }
}
