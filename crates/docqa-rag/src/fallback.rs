//! Fallback composer
//!
//! When the model produces no usable text, synthesizes a deterministic
//! answer directly from the retrieved snippets and files. This path
//! makes no external calls and cannot fail: the caller always gets a
//! non-empty answer.

use crate::context::truncate_chars;
use crate::gate::SOURCES_HEADING;
use docqa_core::{Snippet, SourceFile};
use regex::Regex;

/// Literal header of the fallback answer; tests and monitoring detect
/// the fallback path by this text.
pub const FALLBACK_HEADER: &str =
    "No fue posible generar una respuesta. Resumen de los documentos encontrados:";

const MAX_ITEMS: usize = 5;
const SNIPPET_EXCERPT_CHARS: usize = 300;

/// Compose the deterministic fallback answer.
pub fn compose_fallback(snippets: &[Snippet], files: &[SourceFile]) -> String {
    let mut answer = String::new();
    answer.push_str(FALLBACK_HEADER);
    answer.push_str("\n\n");

    if snippets.iter().any(|s| !s.text.trim().is_empty()) {
        for snippet in snippets
            .iter()
            .filter(|s| !s.text.trim().is_empty())
            .take(MAX_ITEMS)
        {
            let excerpt = truncate_chars(&normalize_whitespace(&snippet.text), SNIPPET_EXCERPT_CHARS);
            answer.push_str(&format!("- {excerpt}\n"));
        }
    } else {
        answer.push_str("(sin fragmentos disponibles)\n");
    }

    answer.push('\n');
    answer.push_str(SOURCES_HEADING);
    answer.push('\n');

    if files.is_empty() {
        answer.push_str("(sin documentos)\n");
    } else {
        for file in files.iter().take(MAX_ITEMS) {
            answer.push_str(&format!("- {} — {}\n", file.name, file.web_url));
        }
    }

    answer
}

fn normalize_whitespace(text: &str) -> String {
    match Regex::new(r"\s+") {
        Ok(re) => re.replace_all(text.trim(), " ").into_owned(),
        Err(_) => text.trim().to_string(),
    }
}
