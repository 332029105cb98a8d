//! Context assembler
//!
//! Pure data transformation: converts a retrieval result into a bounded
//! text context and a display-ready source list. Deterministic for
//! fixed input; never calls external services.

use docqa_core::{Snippet, SourceFile};

/// Visible separator between snippet texts in the context block
pub const SNIPPET_SEPARATOR: &str = "\n-----\n";

/// Build the context block from retrieved snippets.
///
/// Each snippet text is trimmed, truncated to `char_cap` characters,
/// and dropped if empty; survivors are joined with a dashed separator
/// in original order.
pub fn build_context(snippets: &[Snippet], char_cap: usize) -> String {
    snippets
        .iter()
        .filter_map(|s| {
            let trimmed = s.text.trim();
            if trimmed.is_empty() {
                return None;
            }
            Some(truncate_chars(trimmed, char_cap))
        })
        .collect::<Vec<_>>()
        .join(SNIPPET_SEPARATOR)
}

/// Format up to `max` candidate files as a human-readable hint list,
/// one "name — URL" line per file. Empty when there are no files.
pub fn build_source_hint(files: &[SourceFile], max: usize) -> String {
    files
        .iter()
        .take(max)
        .map(|f| format!("{} — {}", f.name, f.web_url))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Truncate to a character count without splitting a code point.
pub fn truncate_chars(text: &str, cap: usize) -> String {
    text.chars().take(cap).collect()
}
