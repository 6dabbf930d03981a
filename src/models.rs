//! Data models shared by the scraper, the reddit client and the poll loop.
//!
//! - [`WordOfDay`]: the scraped word of the day
//! - [`Comment`]: a read-only view of a reddit comment
//! - [`PassReport`]: counters produced by one pass of the poll loop

/// Today's word as published on the word-of-the-day page.
///
/// Immutable once fetched. The poll loop fetches a fresh one every pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordOfDay {
    /// The headword, e.g. `"ephemeral"`.
    pub headword: String,
    /// The grammatical label, e.g. `"adjective"`.
    pub attribute: String,
    /// The syllable breakdown, e.g. `"ephem·er·al"`.
    pub syllables: String,
    /// Definition paragraphs in page order.
    pub definitions: Vec<String>,
}

/// A comment as returned by the comment listing.
///
/// `id` is the bare base-36 id (no `t1_` kind prefix).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub id: String,
    pub body: String,
    pub author: String,
}

impl Comment {
    /// The `t1_<id>` fullname the reply endpoint expects.
    pub fn fullname(&self) -> String {
        format!("t1_{}", self.id)
    }
}

/// What happened to the comments seen in one pass of the poll loop.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PassReport {
    /// Comments returned by the listing.
    pub scanned: usize,
    /// Replies sent and recorded.
    pub replied: usize,
    /// Matching comments skipped because the ledger already had them.
    pub skipped_seen: usize,
    /// Matching comments skipped because the bot wrote them.
    pub skipped_own: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comment_fullname() {
        let comment = Comment {
            id: "k3x9a1".to_string(),
            body: "hello".to_string(),
            author: "someone".to_string(),
        };
        assert_eq!(comment.fullname(), "t1_k3x9a1");
    }

    #[test]
    fn test_pass_report_default_is_zeroed() {
        let report = PassReport::default();
        assert_eq!(report.scanned, 0);
        assert_eq!(report.replied, 0);
        assert_eq!(report.skipped_seen, 0);
        assert_eq!(report.skipped_own, 0);
    }
}
