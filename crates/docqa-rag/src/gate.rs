//! Answer-quality gate
//!
//! Detects evasive or too-short answers (triggering the pipeline's
//! single stricter retry) and enforces the presence of a sources
//! section in the final answer.
//!
//! The evasiveness test is a fixed phrase list. It is deliberately kept
//! behind the [`is_evasive`] predicate so it can be swapped for a more
//! robust classifier without touching the pipeline.

use docqa_core::SourceFile;
use regex::Regex;

/// Refusal/uncertainty phrases that mark an answer as evasive,
/// matched case-insensitively
pub const EVASIVE_PHRASES: &[&str] = &[
    "no tengo acceso",
    "no encuentro información",
    "no encuentro informacion",
    "no puedo responder",
    "no dispongo de",
    "no hay información disponible",
    "lo siento",
    "i don't have access",
    "i cannot find",
];

/// Heading for the synthesized sources section
pub const SOURCES_HEADING: &str = "Fuentes:";

/// True when the answer contains a refusal phrase or is shorter than
/// `min_len` characters.
pub fn is_evasive(answer: &str, min_len: usize) -> bool {
    let trimmed = answer.trim();
    if trimmed.chars().count() < min_len {
        return true;
    }

    let lower = trimmed.to_lowercase();
    EVASIVE_PHRASES.iter().any(|phrase| lower.contains(phrase))
}

/// True when the answer already carries a detectable sources heading.
pub fn has_sources_section(answer: &str) -> bool {
    Regex::new(r"(?i)\b(fuentes|sources)\s*:")
        .map(|re| re.is_match(answer))
        .unwrap_or(false)
}

/// Append a synthesized sources section built from the top candidate
/// files when the answer lacks one. Never duplicates an existing
/// section; a file-less answer is returned unchanged.
pub fn ensure_sources_section(answer: &str, files: &[SourceFile], max: usize) -> String {
    if files.is_empty() || has_sources_section(answer) {
        return answer.to_string();
    }

    let listing = files
        .iter()
        .take(max)
        .map(|f| format!("- {} — {}", f.name, f.web_url))
        .collect::<Vec<_>>()
        .join("\n");

    format!("{}\n\n{SOURCES_HEADING}\n{listing}", answer.trim_end())
}
