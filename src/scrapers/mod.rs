//! Word-of-the-day sources.
//!
//! The poll loop only needs "give me today's word"; it talks to a
//! [`WordSource`] so tests can drive it with a fixed word instead of the
//! network.
//!
//! # Supported Sources
//!
//! | Source | Module | Method |
//! |--------|--------|--------|
//! | Merriam-Webster | [`merriam_webster`] | HTML scraping |

use crate::models::WordOfDay;
use std::error::Error;

pub mod merriam_webster;

/// Something that can produce today's [`WordOfDay`].
pub trait WordSource {
    /// Fetch and parse the current word of the day.
    async fn fetch_word(&self) -> Result<WordOfDay, Box<dyn Error>>;
}
