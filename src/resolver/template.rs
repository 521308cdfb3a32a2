//! Title template substitution.

/// Placeholder tokens recognized in the title format.
pub const PREFIX_TOKEN: &str = "%prefix%";
pub const ID_TOKEN: &str = "%id%";
pub const TITLE_TOKEN: &str = "%title%";

/// Render the replacement title.
///
/// Replacement is literal and single-shot: each token is substituted at
/// most once (first occurrence), and the original title is substituted
/// last so its content is never scanned for further tokens. Leftover
/// tokens are not validated.
pub fn render_title(format: &str, prefix: &str, id: &str, title: &str) -> String {
    format
        .replacen(PREFIX_TOKEN, prefix, 1)
        .replacen(ID_TOKEN, id, 1)
        .replacen(TITLE_TOKEN, title, 1)
}
