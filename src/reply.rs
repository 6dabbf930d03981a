//! Reply message composition.
//!
//! The reply is reddit Markdown. `&nbsp;` between two blank lines forces an
//! empty paragraph after the header, which reddit would otherwise collapse.

const BLANK_LINE: &str = "\n\n&nbsp;\n\n";
pub const REPLY_HEADER: &str = "You said the word of the day!";
pub const REPLY_LINK: &str =
    "Read more at [merriam-webster.com](https://www.merriam-webster.com/word-of-the-day).";

/// Build the reply posted under a matching comment.
///
/// Sections, in order: header, blank line, bolded word, italic
/// attribute/syllables pair, one paragraph per definition, link.
/// An empty `definitions` slice simply yields no definition paragraphs.
pub fn compose(word: &str, attribute: &str, syllables: &str, definitions: &[String]) -> String {
    let mut reply = String::new();
    reply.push_str(REPLY_HEADER);
    reply.push_str(BLANK_LINE);
    reply.push_str(&format!("**{word}**\n\n"));
    reply.push_str(&format!("*{attribute}* | *{syllables}*\n\n"));
    for definition in definitions {
        reply.push_str(definition);
        reply.push_str("\n\n");
    }
    reply.push_str(REPLY_LINK);
    reply
}
