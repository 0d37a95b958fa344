use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").expect("valid tag regex"));

static ENTITY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"&(nbsp|#39|quot|amp|lt|gt);").expect("valid entity regex"));

static SANITIZER: Lazy<TextSanitizer> = Lazy::new(TextSanitizer::default);

/// A character filter receives text and returns a transformed copy of it, adding, removing,
/// or changing characters. Filters are chained by [`TextSanitizer`] in a fixed order.
pub trait CharacterFilter: Send + Sync {
    fn filter(&self, text: String) -> String;
}

/// Drops every `<...>` tag. No attempt is made to understand the markup, so `a < b > c`
/// loses its middle part just like a real tag would.
#[derive(Debug, Default)]
pub struct MarkupTagFilter;

impl CharacterFilter for MarkupTagFilter {
    fn filter(&self, text: String) -> String {
        match TAG_RE.replace_all(&text, "") {
            std::borrow::Cow::Borrowed(_) => text,
            std::borrow::Cow::Owned(stripped) => stripped,
        }
    }
}

/// Decodes the handful of entities the search service emits in snippets and summaries.
///
/// Decoding is a single left-to-right pass, so `&amp;lt;` becomes `&lt;` and not `<`.
#[derive(Debug, Default)]
pub struct EntityDecodeFilter;

impl EntityDecodeFilter {
    fn decode(entity: &str) -> &'static str {
        match entity {
            "nbsp" => " ",
            "#39" => "'",
            "quot" => "\"",
            "amp" => "&",
            "lt" => "<",
            "gt" => ">",
            _ => "",
        }
    }
}

impl CharacterFilter for EntityDecodeFilter {
    fn filter(&self, text: String) -> String {
        ENTITY_RE
            .replace_all(&text, |caps: &Captures| Self::decode(&caps[1]))
            .into_owned()
    }
}

/// Collapses runs of whitespace (newlines and non-breaking spaces included) into a single
/// space and trims both ends.
#[derive(Debug, Default)]
pub struct WhitespaceCollapseFilter;

impl CharacterFilter for WhitespaceCollapseFilter {
    fn filter(&self, text: String) -> String {
        text.split_whitespace().collect::<Vec<&str>>().join(" ")
    }
}

/// Pure text cleaning pipeline, no I/O.
pub struct TextSanitizer {
    char_filters: Vec<Box<dyn CharacterFilter>>,
}

impl TextSanitizer {
    pub fn new(char_filters: Vec<Box<dyn CharacterFilter>>) -> Self {
        Self { char_filters }
    }

    pub fn sanitize(&self, mut content: String) -> String {
        for filter in self.char_filters.iter() {
            content = filter.filter(content);
        }
        content
    }
}

impl Default for TextSanitizer {
    fn default() -> Self {
        Self::new(vec![
            Box::new(MarkupTagFilter),
            Box::new(EntityDecodeFilter),
            Box::new(WhitespaceCollapseFilter),
        ])
    }
}

/// Strips markup, decodes entities and collapses whitespace. Missing input yields `""`.
///
/// ```
/// use searchbot::sanitizer::clean;
///
/// assert_eq!(clean("<b>Price</b>&nbsp;list &amp; terms"), "Price list & terms");
/// assert_eq!(clean(None), "");
/// ```
pub fn clean<'a>(text: impl Into<Option<&'a str>>) -> String {
    match text.into() {
        Some(text) if !text.is_empty() => SANITIZER.sanitize(text.to_string()),
        _ => String::new(),
    }
}
