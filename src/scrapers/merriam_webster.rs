//! Merriam-Webster word-of-the-day scraper.
//!
//! Fetches <https://www.merriam-webster.com/word-of-the-day> and pulls four
//! fields out of well-known markup regions:
//!
//! | Field | Selector |
//! |-------|----------|
//! | headword | `div.word-header h1` |
//! | attribute | `div.word-attributes .main-attr` |
//! | syllables | `div.word-attributes .word-syllables` |
//! | definitions | `div.wod-definition-container > p` |
//!
//! Any change to that markup surfaces as a parse error.

use crate::models::WordOfDay;
use crate::scrapers::WordSource;
use crate::utils::collapse_whitespace;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use std::error::Error;
use std::time::Instant;
use tracing::{debug, info, instrument};

pub const WORD_OF_THE_DAY_URL: &str = "https://www.merriam-webster.com/word-of-the-day";

/// Scrapes the word of the day from the Merriam-Webster site.
#[derive(Debug, Clone)]
pub struct MerriamWebster {
    client: Client,
    url: String,
}

impl MerriamWebster {
    /// Create a scraper for the public word-of-the-day page.
    pub fn new(client: Client) -> Self {
        Self::with_url(client, WORD_OF_THE_DAY_URL)
    }

    /// Create a scraper for a page served from `url` instead.
    pub fn with_url(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

impl WordSource for MerriamWebster {
    #[instrument(level = "info", skip_all, fields(url = %self.url))]
    async fn fetch_word(&self) -> Result<WordOfDay, Box<dyn Error>> {
        let t0 = Instant::now();
        let html = self
            .client
            .get(&self.url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        debug!(bytes = html.len(), "Fetched word-of-the-day page");

        let word = parse_word(&html)?;
        info!(
            word = %word.headword,
            definitions = word.definitions.len(),
            elapsed_ms = t0.elapsed().as_millis() as u128,
            "Fetched word of the day"
        );
        Ok(word)
    }
}

/// Extract a [`WordOfDay`] from the word-of-the-day page HTML.
///
/// # Errors
///
/// Returns an error if the headword, attribute or syllable regions are
/// missing or empty, or if the definition container is missing. A container
/// with no `p` children yields an empty definition list.
pub fn parse_word(html: &str) -> Result<WordOfDay, Box<dyn Error>> {
    let document = Html::parse_document(html);

    let header_selector = Selector::parse("div.word-header")?;
    let h1_selector = Selector::parse("h1")?;
    let attributes_selector = Selector::parse("div.word-attributes")?;
    let main_attr_selector = Selector::parse(".main-attr")?;
    let syllables_selector = Selector::parse(".word-syllables")?;
    let definitions_selector = Selector::parse("div.wod-definition-container")?;

    let header = document
        .select(&header_selector)
        .next()
        .ok_or("word header not found")?;
    let headword = first_text(header, &h1_selector).ok_or("headword not found")?;

    let attributes = document
        .select(&attributes_selector)
        .next()
        .ok_or("word attributes not found")?;
    let attribute = first_text(attributes, &main_attr_selector).ok_or("main attribute not found")?;
    let syllables = first_text(attributes, &syllables_selector).ok_or("syllables not found")?;

    let container = document
        .select(&definitions_selector)
        .next()
        .ok_or("definition container not found")?;
    let definitions = container
        .children()
        .filter_map(ElementRef::wrap)
        .filter(|child| child.value().name() == "p")
        .map(element_text)
        .collect::<Vec<_>>();

    Ok(WordOfDay {
        headword,
        attribute,
        syllables,
        definitions,
    })
}

/// Text of the first descendant of `scope` matching `selector`, if non-empty.
fn first_text(scope: ElementRef<'_>, selector: &Selector) -> Option<String> {
    scope
        .select(selector)
        .next()
        .map(element_text)
        .filter(|text| !text.is_empty())
}

fn element_text(element: ElementRef<'_>) -> String {
    collapse_whitespace(&element.text().collect::<String>())
}
