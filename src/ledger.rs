//! Seen-comment ledger.
//!
//! A plain text file with one comment id per line, only ever appended to.
//! The file is read once at startup; afterwards the in-memory set and the
//! file are kept in step by [`Ledger::record`], which appends and syncs
//! before returning.
//!
//! ```text
//! k3x9a1
//! k3xb77
//! ```

use std::collections::HashSet;
use std::error::Error;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, instrument};

/// Ids of comments that have already been answered.
#[derive(Debug)]
pub struct Ledger {
    path: PathBuf,
    seen: HashSet<String>,
}

impl Ledger {
    /// Load the ledger at `path`.
    ///
    /// A missing file is an empty ledger. Blank lines are ignored, so a
    /// trailing newline or a hand-edited file loads cleanly.
    ///
    /// # Errors
    ///
    /// Any I/O error other than "not found" (permissions, invalid UTF-8, ...).
    #[instrument(level = "info", skip_all, fields(path = %path.as_ref().display()))]
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, Box<dyn Error>> {
        let path = path.as_ref().to_path_buf();
        let seen = match fs::read_to_string(&path).await {
            Ok(text) => text
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string)
                .collect::<HashSet<_>>(),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("No ledger file yet; starting empty");
                HashSet::new()
            }
            Err(e) => return Err(Box::new(e)),
        };
        info!(count = seen.len(), "Loaded ledger");
        Ok(Self { path, seen })
    }

    /// Whether `id` has already been answered.
    pub fn contains(&self, id: &str) -> bool {
        self.seen.contains(id)
    }

    /// Mark `id` as answered, appending it to the backing file.
    ///
    /// The line is flushed to disk before this returns. Recording an id that
    /// is already present writes nothing.
    #[instrument(level = "debug", skip(self))]
    pub async fn record(&mut self, id: &str) -> Result<(), Box<dyn Error>> {
        if self.seen.contains(id) {
            debug!("Id already in ledger; not appending");
            return Ok(());
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(format!("{id}\n").as_bytes()).await?;
        file.sync_data().await?;

        self.seen.insert(id.to_string());
        debug!(count = self.seen.len(), "Recorded id");
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
