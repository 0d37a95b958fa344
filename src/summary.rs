//! Best-effort recovery of bullet structure from the AI summary returned by the search
//! service. The generator is inconsistent: sometimes it emits `•`/`-` bullets, sometimes
//! a single paragraph with the bullets glued onto sentence ends, sometimes plain prose.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::sanitizer::clean;

/// Canonical glyph every normalized line starts with.
pub const BULLET: char = '•';

pub const MAX_SUMMARY_LINES: usize = 10;

const MIN_LINE_CHARS: usize = 5;
const MIN_FALLBACK_SENTENCE_CHARS: usize = 10;

static INLINE_BULLET_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\.\s*([•-])").expect("valid inline bullet regex"));

static LEADING_BULLET_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*([•-])").expect("valid leading bullet regex"));

static CITATION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[\d+\]").expect("valid citation regex"));

static GLYPH_SPACING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"•\s+").expect("valid glyph regex"));

/// Normalizes a raw summary into at most [`MAX_SUMMARY_LINES`] lines of the form `• text.`
/// joined by `\n`. Empty input gives empty output.
pub fn normalize(summary: &str) -> String {
    let cleaned = clean(summary);
    if cleaned.is_empty() {
        return String::new();
    }
    tracing::debug!(chars = cleaned.chars().count(), "normalizing summary");

    let split = split_inline_bullets(&cleaned);
    let mut bullets: Vec<String> = split.split('\n').filter_map(normalize_line).collect();

    if bullets.is_empty() {
        tracing::debug!("no bullet structure in summary, falling back to sentences");
        bullets = sentence_bullets(&cleaned);
    }

    bullets.truncate(MAX_SUMMARY_LINES);
    tracing::debug!(lines = bullets.len(), "summary normalized");
    bullets.join("\n")
}

/// Moves every bullet marker that follows a period onto its own line.
fn split_inline_bullets(text: &str) -> String {
    let text = INLINE_BULLET_RE.replace_all(text, ".\n$1");
    LEADING_BULLET_RE.replace(&text, "$1").into_owned()
}

fn strip_citations(text: &str) -> String {
    CITATION_RE.replace_all(text, "").trim().to_string()
}

fn ensure_period(line: &mut String) {
    if !line.ends_with('.') {
        line.push('.');
    }
}

fn normalize_line(line: &str) -> Option<String> {
    let line = line.trim();
    if line.chars().count() < MIN_LINE_CHARS {
        return None;
    }

    let line = strip_citations(line);
    if line.is_empty() {
        return None;
    }

    let body = line
        .strip_prefix(BULLET)
        .or_else(|| line.strip_prefix('-'))
        .unwrap_or(line.as_str())
        .trim_start();

    let mut bullet = format!("{BULLET} {body}");
    bullet = GLYPH_SPACING_RE.replace_all(&bullet, "• ").into_owned();
    ensure_period(&mut bullet);
    Some(bullet)
}

fn sentence_bullets(text: &str) -> Vec<String> {
    text.split(". ")
        .map(str::trim)
        .filter(|sentence| sentence.chars().count() > MIN_FALLBACK_SENTENCE_CHARS)
        .filter_map(|sentence| {
            let mut sentence = strip_citations(sentence);
            if sentence.is_empty() {
                return None;
            }
            ensure_period(&mut sentence);
            Some(format!("{BULLET} {sentence}"))
        })
        .collect()
}
