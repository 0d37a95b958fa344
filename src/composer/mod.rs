use serde::Serialize;

use crate::data_models::{DocumentDescriptor, SearchOutcome};
use crate::descriptor::resolve_all;
use crate::summary::{BULLET, normalize};

pub mod cards;
pub mod notices;

use cards::{Button, Card, CardHeader, CardsResponse, DecoratedText, OnClick, Section, Widget};

/// Hard limit the chat transport puts on a serialized card message.
pub const MAX_CARD_PAYLOAD_BYTES: usize = 30_000;

/// Results kept when a payload has to be cut down.
pub const TRUNCATED_RESULT_COUNT: usize = 3;

pub const BOTTOM_LABEL_MAX_CHARS: usize = 100;

pub const SEARCH_ICON_URL: &str =
    "https://fonts.gstatic.com/s/i/short-term/release/googlesymbols/search/default/24px.svg";

pub const RESULTS_TITLE: &str = "🔍 Search results";
pub const SUMMARY_HEADER: &str = "📄 Summary";
pub const RESULTS_HEADER: &str = "📋 Detailed results";
pub const TIPS_HEADER: &str = "💡 Tips";
pub const SNIPPET_UNAVAILABLE: &str = "snippet unavailable";

const CARD_TIPS: &str =
    "• Click a document name or the button to open it\n• Refine your query for better results";

const TEXT_TIPS: &str = "💡 **Tips:**\n\
    • Click a link to open the full document\n\
    • Refine your query for better results";

const NO_RESULTS_TEXT: &str = "🔍 **No results found**\n\n\
    Try:\n• Rephrasing the query\n• Using synonyms\n• Shortening the query";

/// A message ready to hand to the chat transport.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum FormattedMessage {
    Text(TextMessage),
    Cards(CardsResponse),
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct TextMessage {
    pub text: String,
}

impl FormattedMessage {
    pub fn text(text: impl Into<String>) -> Self {
        FormattedMessage::Text(TextMessage { text: text.into() })
    }

    pub fn serialized_size(&self) -> usize {
        match self {
            FormattedMessage::Text(_) => serde_json::to_vec(self)
                .map(|b| b.len())
                .unwrap_or(usize::MAX),
            FormattedMessage::Cards(cards) => cards.serialized_size(),
        }
    }
}

impl From<CardsResponse> for FormattedMessage {
    fn from(cards: CardsResponse) -> Self {
        FormattedMessage::Cards(cards)
    }
}

/// Card payload plus what the size guard measured on it.
#[derive(Debug, Clone, PartialEq)]
pub struct ComposedCards {
    pub payload: CardsResponse,
    /// Serialized size of `payload`, measured after any truncation.
    pub size: usize,
    pub truncated: bool,
}

/// The sections of a card message before they are flattened, so truncation can pick them
/// by role rather than by position.
struct CardDeck {
    header: Card,
    summary: Option<Card>,
    results: Vec<Widget>,
    tips: Card,
}

impl CardDeck {
    fn full(self) -> CardsResponse {
        let mut cards = vec![self.header];
        cards.extend(self.summary);
        if !self.results.is_empty() {
            cards.push(results_card(self.results));
        }
        cards.push(self.tips);
        CardsResponse::new(cards)
    }

    /// Header and summary survive, results are cut to [`TRUNCATED_RESULT_COUNT`], tips go.
    fn truncated(mut self) -> CardsResponse {
        let mut cards = vec![self.header];
        cards.extend(self.summary);
        self.results.truncate(TRUNCATED_RESULT_COUNT);
        if !self.results.is_empty() {
            cards.push(results_card(self.results));
        }
        CardsResponse::new(cards)
    }
}

fn results_card(widgets: Vec<Widget>) -> Card {
    Card::with_section(Section::new(RESULTS_HEADER, widgets))
}

/// Stateless message builder. The only knob is the size cap, which comes from config.
#[derive(Debug, Clone, Copy)]
pub struct Composer {
    size_cap: usize,
}

impl Default for Composer {
    fn default() -> Self {
        Self::new(MAX_CARD_PAYLOAD_BYTES)
    }
}

impl Composer {
    pub fn new(size_cap: usize) -> Self {
        Self { size_cap }
    }

    pub fn size_cap(&self) -> usize {
        self.size_cap
    }

    /// Resolves the hits of `outcome` and builds the card message for them.
    pub fn cards_for(&self, outcome: &SearchOutcome) -> ComposedCards {
        let descriptors = resolve_all(&outcome.hits);
        self.compose_cards(&descriptors, &outcome.query, outcome.summary())
    }

    /// Resolves the hits of `outcome` and builds the plain-text message for them.
    pub fn text_for(&self, outcome: &SearchOutcome) -> String {
        let descriptors = resolve_all(&outcome.hits);
        self.compose_text(&descriptors, &outcome.query, outcome.summary())
    }

    /// Builds the card message. If the full payload is over the size cap it is rebuilt once
    /// with header, summary and the first results only; that second payload is not checked
    /// again.
    pub fn compose_cards(
        &self,
        descriptors: &[DocumentDescriptor],
        query: &str,
        summary: Option<&str>,
    ) -> ComposedCards {
        tracing::info!(query, results = descriptors.len(), "composing card response");

        let payload = self.deck(descriptors, query, summary).full();
        let size = payload.serialized_size();
        if size <= self.size_cap {
            return ComposedCards {
                payload,
                size,
                truncated: false,
            };
        }

        tracing::warn!(size, cap = self.size_cap, "card response too large, truncating");
        let payload = self.deck(descriptors, query, summary).truncated();
        let size = payload.serialized_size();
        ComposedCards {
            payload,
            size,
            truncated: true,
        }
    }

    fn deck(
        &self,
        descriptors: &[DocumentDescriptor],
        query: &str,
        summary: Option<&str>,
    ) -> CardDeck {
        let header = Card::with_header(CardHeader {
            title: RESULTS_TITLE.to_string(),
            subtitle: format!("Query: {query}"),
            image_url: Some(SEARCH_ICON_URL.to_string()),
        });

        let summary = summary.and_then(|summary| {
            let widgets: Vec<Widget> = normalize(summary)
                .lines()
                .map(str::trim)
                .filter(|line| line.starts_with(BULLET))
                .map(|line| Widget::paragraph(format!("<b>{line}</b>")))
                .collect();
            (!widgets.is_empty()).then(|| Card::with_section(Section::new(SUMMARY_HEADER, widgets)))
        });

        let results = descriptors.iter().map(result_widget).collect();

        let tips = Card::with_section(Section::new(
            TIPS_HEADER,
            vec![Widget::paragraph(CARD_TIPS)],
        ));

        CardDeck {
            header,
            summary,
            results,
            tips,
        }
    }

    /// Builds the markdown-ish plain-text message. There is no contractual cap on this form,
    /// but a message over the size cap is re-rendered with the first results only.
    pub fn compose_text(
        &self,
        descriptors: &[DocumentDescriptor],
        query: &str,
        summary: Option<&str>,
    ) -> String {
        if descriptors.is_empty() {
            return NO_RESULTS_TEXT.to_string();
        }

        let text = render_text(descriptors, query, summary);
        if text.len() <= self.size_cap || descriptors.len() <= TRUNCATED_RESULT_COUNT {
            return text;
        }
        tracing::warn!(
            size = text.len(),
            cap = self.size_cap,
            "text response too large, truncating"
        );
        render_text(&descriptors[..TRUNCATED_RESULT_COUNT], query, summary)
    }
}

fn result_widget(descriptor: &DocumentDescriptor) -> Widget {
    let snippet = if descriptor.snippet.is_empty() {
        SNIPPET_UNAVAILABLE
    } else {
        descriptor.snippet.as_str()
    };

    Widget::DecoratedText(DecoratedText {
        top_label: format!("{} Document {}", descriptor.kind.icon(), descriptor.position),
        text: format!("<b>{}</b>", descriptor.display_name),
        bottom_label: truncate_chars(snippet, BOTTOM_LABEL_MAX_CHARS),
        on_click: OnClick::open(&descriptor.display_link),
        button: Some(Button {
            text: "📎 Open".to_string(),
            on_click: OnClick::open(&descriptor.display_link),
        }),
    })
}

/// Cuts `text` to `max` characters, appending `...` when anything was dropped.
pub fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((byte_idx, _)) => format!("{}...", &text[..byte_idx]),
        None => text.to_string(),
    }
}

fn render_text(descriptors: &[DocumentDescriptor], query: &str, summary: Option<&str>) -> String {
    let mut out = format!("🔍 **Search results for:** `{query}`\n");

    let summary = summary.map(normalize).filter(|s| !s.is_empty());
    if let Some(summary) = summary {
        out.push_str("\n📄 **Summary:**\n");
        out.push_str(&summary);
        out.push_str("\n\n📋 **Detailed results:**\n");
    }

    let items: Vec<String> = descriptors
        .iter()
        .map(|d| {
            let mut item = format!(
                "{} **{}. {}**\n   📎 [Open document]({})",
                d.kind.icon(),
                d.position,
                d.display_name,
                d.display_link
            );
            for bullet in &d.snippet_bullets {
                item.push_str("\n   • ");
                item.push_str(bullet);
            }
            item
        })
        .collect();

    out.push('\n');
    out.push_str(&items.join("\n\n"));
    out.push_str("\n\n");
    out.push_str(TEXT_TIPS);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_models::SearchHit;
    use crate::descriptor::resolve;

    fn descriptors(n: usize, snippet: &str) -> Vec<DocumentDescriptor> {
        (1..=n)
            .map(|i| {
                let hit = SearchHit::new(format!("Doc {i}"), snippet, format!("gs://b/{i}.pdf"));
                resolve(&hit, i)
            })
            .collect()
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("short", 100), "short");
        assert_eq!(truncate_chars("abcdef", 3), "abc...");
        assert_eq!(truncate_chars("їжак", 2), "їж...");
        assert_eq!(truncate_chars(&"a".repeat(100), 100), "a".repeat(100));
    }

    #[test]
    fn test_full_card_layout() {
        let composed = Composer::default().compose_cards(
            &descriptors(2, "Some snippet."),
            "price import",
            Some("First point. • Second point."),
        );
        assert!(!composed.truncated);
        assert_eq!(composed.size, composed.payload.serialized_size());

        let cards: Vec<&Card> = composed.payload.cards().collect();
        assert_eq!(cards.len(), 4);
        let header = cards[0].header.as_ref().unwrap();
        assert_eq!(header.subtitle, "Query: price import");
        assert_eq!(cards[1].section_header(), Some(SUMMARY_HEADER));
        assert_eq!(cards[1].sections[0].widgets.len(), 2);
        assert_eq!(cards[2].section_header(), Some(RESULTS_HEADER));
        assert_eq!(cards[3].section_header(), Some(TIPS_HEADER));
    }

    #[test]
    fn test_result_widget_fields() {
        let long = "word ".repeat(40);
        let d = &descriptors(1, &long)[0];
        let Widget::DecoratedText(widget) = result_widget(d) else {
            panic!("expected decorated text");
        };
        assert_eq!(widget.top_label, "📄 Document 1");
        assert_eq!(widget.text, "<b>Doc 1.pdf</b>");
        assert_eq!(widget.on_click.open_link.url, "https://storage.cloud.google.com/b/1.pdf");
        assert!(widget.bottom_label.ends_with("..."));
        assert_eq!(widget.bottom_label.chars().count(), BOTTOM_LABEL_MAX_CHARS + 3);
    }

    #[test]
    fn test_missing_snippet_bottom_label() {
        let d = &descriptors(1, "")[0];
        let Widget::DecoratedText(widget) = result_widget(d) else {
            panic!("expected decorated text");
        };
        assert_eq!(widget.bottom_label, SNIPPET_UNAVAILABLE);
    }

    #[test]
    fn test_no_summary_and_no_results() {
        let composed = Composer::default().compose_cards(&[], "nothing", None);
        let cards: Vec<&Card> = composed.payload.cards().collect();
        assert_eq!(cards.len(), 2);
        assert!(cards[0].header.is_some());
        assert_eq!(cards[1].section_header(), Some(TIPS_HEADER));
    }

    #[test]
    fn test_summary_without_bullets_is_skipped() {
        // normalizes to nothing: every fragment is too short
        let composed = Composer::default().compose_cards(&descriptors(1, "x"), "q", Some("ok"));
        assert!(composed.payload.cards().all(|c| c.section_header() != Some(SUMMARY_HEADER)));
    }

    #[test]
    fn test_oversized_payload_is_truncated_once() {
        let composer = Composer::new(2_000);
        let composed = composer.compose_cards(
            &descriptors(10, &"Long snippet text. ".repeat(10)),
            "q",
            Some("A summary point here."),
        );
        assert!(composed.truncated);
        let cards: Vec<&Card> = composed.payload.cards().collect();
        assert_eq!(cards.len(), 3);
        assert_eq!(cards[1].section_header(), Some(SUMMARY_HEADER));
        assert_eq!(cards[2].sections[0].widgets.len(), TRUNCATED_RESULT_COUNT);
        assert_eq!(composed.size, composed.payload.serialized_size());
    }

    #[test]
    fn test_text_layout() {
        let text = Composer::default().compose_text(
            &descriptors(2, "Snippet body."),
            "import",
            Some("Point one here. • Point two here."),
        );
        let expected = "🔍 **Search results for:** `import`\n\
            \n📄 **Summary:**\n• Point one here.\n• Point two here.\n\
            \n📋 **Detailed results:**\n\
            \n📄 **1. Doc 1.pdf**\n   \
            📎 [Open document](https://storage.cloud.google.com/b/1.pdf)\n   • Snippet body.\n\
            \n📄 **2. Doc 2.pdf**\n   \
            📎 [Open document](https://storage.cloud.google.com/b/2.pdf)\n   • Snippet body.\n\
            \n💡 **Tips:**\n• Click a link to open the full document\n\
            • Refine your query for better results";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_text_without_summary_has_no_labels() {
        let text = Composer::default().compose_text(&descriptors(1, "s"), "q", None);
        assert!(!text.contains("Summary"));
        assert!(!text.contains("Detailed results"));
        assert!(text.starts_with("🔍 **Search results for:** `q`\n\n📄 **1. Doc 1.pdf**"));
    }

    #[test]
    fn test_text_no_results() {
        assert_eq!(Composer::default().compose_text(&[], "q", None), NO_RESULTS_TEXT);
    }

    #[test]
    fn test_text_guard_keeps_first_results() {
        let text = Composer::new(500).compose_text(&descriptors(6, "Snippet body."), "q", None);
        assert!(text.contains("**3. Doc 3.pdf**"));
        assert!(!text.contains("**4. Doc 4.pdf**"));
    }

    #[test]
    fn test_formatted_message_text_shape() {
        let message = FormattedMessage::text("hello");
        assert_eq!(serde_json::to_string(&message).unwrap(), r#"{"text":"hello"}"#);
        assert_eq!(message.serialized_size(), r#"{"text":"hello"}"#.len());
    }
}
