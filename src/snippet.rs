/// Snippets up to this many characters are shown as a single bullet.
pub const DEFAULT_MAX_BULLET_LENGTH: usize = 120;

/// Display cap on bullets per document.
pub const MAX_SNIPPET_BULLETS: usize = 3;

/// Splits a long snippet into at most three short bullets using [`DEFAULT_MAX_BULLET_LENGTH`].
pub fn segment(snippet: &str) -> Vec<String> {
    segment_with(snippet, DEFAULT_MAX_BULLET_LENGTH)
}

/// Splits `snippet` on sentence boundaries (`". "`) and greedily packs the sentences into
/// bullets of at most `max_length` characters.
///
/// A sentence that is longer than `max_length` on its own still gets a bullet of its own;
/// nothing is cut mid-sentence. Bullets beyond [`MAX_SNIPPET_BULLETS`] are dropped.
pub fn segment_with(snippet: &str, max_length: usize) -> Vec<String> {
    if snippet.chars().count() <= max_length {
        return vec![snippet.to_string()];
    }

    let mut bullets = Vec::new();
    let mut current = String::new();
    // tracked separately so we don't rescan the buffer for every sentence
    let mut current_len = 0usize;

    for sentence in snippet.split(". ") {
        let sentence = sentence.trim();
        if sentence.is_empty() {
            continue;
        }

        let mut sentence = sentence.to_string();
        if !sentence.ends_with('.') {
            sentence.push('.');
        }
        let sentence_len = sentence.chars().count();

        if current_len + sentence_len > max_length {
            if !current.is_empty() {
                bullets.push(current.trim_end().to_string());
            }
            current.clear();
            current_len = 0;
        }

        current.push_str(&sentence);
        current.push(' ');
        current_len += sentence_len + 1;
    }

    if !current.is_empty() {
        bullets.push(current.trim_end().to_string());
    }

    bullets.truncate(MAX_SNIPPET_BULLETS);
    bullets
}
