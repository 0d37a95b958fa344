//! Fixed messages the bot sends outside of search results.

use super::FormattedMessage;
use super::cards::{Card, CardHeader, CardsResponse, Section, Widget};

const RECOVERY_HINTS: &str = "<b>What you can do:</b>\n\
    • Try again in a few seconds\n\
    • Rephrase the query\n\
    • Contact your administrator";

fn card(title: &str, subtitle: &str, sections: Vec<Section>) -> CardsResponse {
    CardsResponse::new([Card {
        header: Some(CardHeader {
            title: title.to_string(),
            subtitle: subtitle.to_string(),
            image_url: None,
        }),
        sections,
    }])
}

/// Sent when the bot is added to a space.
pub fn welcome(bot_name: &str) -> CardsResponse {
    card(
        &format!("🤖 {bot_name}"),
        "Welcome to the document search bot!",
        vec![
            Section::new(
                "How to use",
                vec![Widget::paragraph(
                    "<b>• Just type your query</b>\n\
                     <b>• I will find the relevant documents</b>\n\
                     <b>• You get structured results with links</b>",
                )],
            ),
            Section::new(
                "Example queries",
                vec![Widget::paragraph(
                    "• \"price import\"\n• \"system settings\"\n• \"user guide\"",
                )],
            ),
        ],
    )
}

/// Sent when a message arrives without any text.
pub fn empty_message_help() -> CardsResponse {
    card(
        "💬 How to ask",
        "Send a text message",
        vec![Section::untitled(vec![Widget::paragraph(
            "<b>Examples:</b>\n\
             • \"API documentation\"\n• \"database settings\"\n• \"user manual\"",
        )])],
    )
}

pub fn query_too_short(min_chars: usize) -> FormattedMessage {
    FormattedMessage::text(format!(
        "🔍 **Query too short**\n\nPlease enter a query of at least {min_chars} characters."
    ))
}

/// Sent when the search service call failed.
pub fn search_failed(error: &str) -> CardsResponse {
    card(
        "⚠️ Search error",
        "Something went wrong while searching",
        vec![Section::untitled(vec![Widget::paragraph(format!(
            "<b>Error:</b> {error}\n\n{RECOVERY_HINTS}"
        ))])],
    )
}

/// Sent when the request could not be handled at all.
pub fn internal_error() -> CardsResponse {
    card(
        "⚠️ Internal error",
        "Something went wrong while handling the request",
        vec![Section::untitled(vec![Widget::paragraph(RECOVERY_HINTS)])],
    )
}
