//! Ballot parsing for consensus voting.
//!
//! Extracting a choice from a voter's free-form output is decoupled from
//! the voting algorithm itself: the voter asks a [`ChoiceParser`] for a
//! candidate string and matches it against the option list. This is pure
//! domain logic — no I/O, just text pattern matching.

/// Strategy for extracting a single choice from raw voter output.
///
/// Implementations return `None` when no choice can be extracted; the
/// ballot is then discarded, never guessed at.
pub trait ChoiceParser: Send + Sync {
    /// Extract the voted-for option text, if any.
    fn parse_choice(&self, raw: &str) -> Option<String>;
}

/// Extract the trimmed text between `<tag>` and `</tag>`.
///
/// Returns `None` when either tag is missing, the tags are out of order,
/// or the enclosed text is empty.
///
/// # Example
///
/// ```
/// use swarm_domain::parse_tagged;
///
/// let raw = "<reasoning>B is cheaper</reasoning>\n<vote>Option B</vote>";
/// assert_eq!(parse_tagged(raw, "vote"), Some("Option B".to_string()));
/// assert_eq!(parse_tagged(raw, "score"), None);
/// ```
pub fn parse_tagged(raw: &str, tag: &str) -> Option<String> {
    let open = format!("<{}>", tag);
    let close = format!("</{}>", tag);

    let start = raw.find(&open)? + open.len();
    let end = raw[start..].find(&close)? + start;

    let choice = raw[start..end].trim();
    if choice.is_empty() {
        None
    } else {
        Some(choice.to_string())
    }
}

/// Default ballot parser: the choice is delimited by a vote tag.
///
/// Voting payloads instruct each voter to answer with
/// `<vote>exact option text</vote>`; this parser extracts that span.
#[derive(Debug, Clone)]
pub struct TaggedChoiceParser {
    tag: String,
}

impl TaggedChoiceParser {
    /// Create a parser for a custom tag name
    pub fn new(tag: impl Into<String>) -> Self {
        Self { tag: tag.into() }
    }

    /// The tag this parser looks for
    pub fn tag(&self) -> &str {
        &self.tag
    }
}

impl Default for TaggedChoiceParser {
    fn default() -> Self {
        Self::new("vote")
    }
}

impl ChoiceParser for TaggedChoiceParser {
    fn parse_choice(&self, raw: &str) -> Option<String> {
        parse_tagged(raw, &self.tag)
    }
}
