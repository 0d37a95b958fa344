use crate::data_models::{DocumentDescriptor, FileKind, SearchHit};
use crate::sanitizer::clean;
use crate::snippet::segment;

/// Storage-bucket scheme the search service uses for indexed files.
pub const BUCKET_SCHEME: &str = "gs://";

/// Browsable prefix that replaces [`BUCKET_SCHEME`].
pub const BUCKET_BROWSE_PREFIX: &str = "https://storage.cloud.google.com/";

pub const UNTITLED_DOCUMENT: &str = "Document";

pub const PREVIEW_UNAVAILABLE: &str = "preview unavailable";

const DEFAULT_EXTENSION: &str = ".pdf";

/// Extensions that mean the title already names a file.
const KNOWN_EXTENSIONS: &[&str] = &[
    ".pdf", ".xlsx", ".xls", ".csv", ".doc", ".docx", ".txt", ".ppt", ".pptx", ".md",
];

/// Classification table, checked top to bottom. First substring hit wins.
const KIND_RULES: &[(FileKind, &[&str])] = &[
    (FileKind::Pdf, &[".pdf"]),
    (FileKind::Spreadsheet, &[".xlsx", ".xls", ".csv"]),
    (FileKind::WordProcessor, &[".doc", ".docx"]),
    (FileKind::Presentation, &[".ppt", ".pptx"]),
    (FileKind::PlainText, &[".txt", ".md"]),
];

/// Display filename for a hit title. Titles without a recognizable extension are assumed to
/// be PDFs; the content type is never sniffed.
pub fn display_name(title: &str) -> String {
    let title = title.trim();
    let base = if title.is_empty() { UNTITLED_DOCUMENT } else { title };

    let lower = base.to_lowercase();
    if KNOWN_EXTENSIONS.iter().any(|ext| lower.contains(ext)) {
        base.to_string()
    } else {
        format!("{base}{DEFAULT_EXTENSION}")
    }
}

pub fn classify(display_name: &str) -> FileKind {
    let lower = display_name.to_lowercase();
    KIND_RULES
        .iter()
        .find(|(_, exts)| exts.iter().any(|ext| lower.contains(ext)))
        .map(|(kind, _)| *kind)
        .unwrap_or(FileKind::Other)
}

/// Rewrites `gs://bucket/path` to its browsable https form; other links pass through.
pub fn display_link(link: &str) -> String {
    match link.strip_prefix(BUCKET_SCHEME) {
        Some(path) => format!("{BUCKET_BROWSE_PREFIX}{path}"),
        None => link.to_string(),
    }
}

/// Resolves one hit. `position` is the 1-based rank shown to the user.
pub fn resolve(hit: &SearchHit, position: usize) -> DocumentDescriptor {
    let display_name = display_name(&hit.title);
    let kind = classify(&display_name);
    let snippet = clean(hit.snippet.as_str());
    let snippet_bullets = if snippet.is_empty() {
        vec![PREVIEW_UNAVAILABLE.to_string()]
    } else {
        segment(&snippet)
    };

    DocumentDescriptor {
        position,
        display_name,
        kind,
        display_link: display_link(&hit.link),
        snippet,
        snippet_bullets,
    }
}

/// Resolves every hit, keeping the order the search service ranked them in.
pub fn resolve_all(hits: &[SearchHit]) -> Vec<DocumentDescriptor> {
    hits.iter()
        .enumerate()
        .map(|(idx, hit)| resolve(hit, idx + 1))
        .collect()
}
