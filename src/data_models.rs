use serde::{Deserialize, Serialize};

/// One document returned by the search service for a query.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchHit {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub snippet: String,
    #[serde(default)]
    pub link: String,
}

impl SearchHit {
    pub fn new(
        title: impl Into<String>,
        snippet: impl Into<String>,
        link: impl Into<String>,
    ) -> Self {
        SearchHit {
            title: title.into(),
            snippet: snippet.into(),
            link: link.into(),
        }
    }
}

/// Everything a single search call produced. Consumed once by the composer.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchOutcome {
    pub query: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub hits: Vec<SearchHit>,
    #[serde(default)]
    pub total_count: u64,
}

impl SearchOutcome {
    /// The summary as an option, so composers can tell "absent" from "present".
    pub fn summary(&self) -> Option<&str> {
        let summary = self.summary.trim();
        if summary.is_empty() { None } else { Some(summary) }
    }
}

/// Type category of a resolved document, derived from its display name.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FileKind {
    Pdf,
    Spreadsheet,
    WordProcessor,
    Presentation,
    PlainText,
    Other,
}

impl FileKind {
    pub fn icon(self) -> &'static str {
        match self {
            FileKind::Pdf | FileKind::PlainText => "📄",
            FileKind::Spreadsheet | FileKind::Presentation => "📊",
            FileKind::WordProcessor => "📝",
            FileKind::Other => "📋",
        }
    }
}

/// Display-ready form of a [`SearchHit`].
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct DocumentDescriptor {
    /// 1-based position in the result list.
    pub position: usize,
    pub display_name: String,
    pub kind: FileKind,
    pub display_link: String,
    /// Sanitized snippet text, empty when the hit had none.
    pub snippet: String,
    pub snippet_bullets: Vec<String>,
}
