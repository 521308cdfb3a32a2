//! Identifier extraction.

use regex::Regex;

/// Result of a successful pattern match during detection. Built
/// transiently per attempt and discarded after use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketReference {
    /// Text matched by the stage pattern.
    pub matched: String,
    /// Identifier pulled out of the match scope, when one was found.
    pub ticket_id: Option<String>,
}

/// First full match of `ticket_pattern` in `text`, if any.
pub fn extract_id(text: &str, ticket_pattern: &Regex) -> Option<String> {
    ticket_pattern.find(text).map(|m| m.as_str().to_string())
}
