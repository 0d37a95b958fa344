//! Google Chat `cardsV2` message model. Only the widgets the bot renders are modelled.

use serde::{Deserialize, Serialize};

/// Top-level card message: `{"cardsV2": [{"card": {...}}, ...]}`.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CardsResponse {
    pub cards_v2: Vec<CardEnvelope>,
}

impl CardsResponse {
    pub fn new(cards: impl IntoIterator<Item = Card>) -> Self {
        Self {
            cards_v2: cards.into_iter().map(|card| CardEnvelope { card }).collect(),
        }
    }

    pub fn cards(&self) -> impl Iterator<Item = &Card> {
        self.cards_v2.iter().map(|envelope| &envelope.card)
    }

    /// Serialized byte length, measured on the compact JSON encoding sent on the wire.
    pub fn serialized_size(&self) -> usize {
        // serializing plain structs of strings cannot fail
        serde_json::to_vec(self).map(|bytes| bytes.len()).unwrap_or(usize::MAX)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct CardEnvelope {
    pub card: Card,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Card {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header: Option<CardHeader>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sections: Vec<Section>,
}

impl Card {
    pub fn with_header(header: CardHeader) -> Self {
        Self {
            header: Some(header),
            sections: Vec::new(),
        }
    }

    pub fn with_section(section: Section) -> Self {
        Self {
            header: None,
            sections: vec![section],
        }
    }

    /// Header text of the first section, used to tell cards apart.
    pub fn section_header(&self) -> Option<&str> {
        self.sections.first().and_then(|s| s.header.as_deref())
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CardHeader {
    pub title: String,
    pub subtitle: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Section {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header: Option<String>,
    pub widgets: Vec<Widget>,
}

impl Section {
    pub fn new(header: impl Into<String>, widgets: Vec<Widget>) -> Self {
        Self {
            header: Some(header.into()),
            widgets,
        }
    }

    pub fn untitled(widgets: Vec<Widget>) -> Self {
        Self {
            header: None,
            widgets,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub enum Widget {
    TextParagraph(TextParagraph),
    DecoratedText(DecoratedText),
}

impl Widget {
    pub fn paragraph(text: impl Into<String>) -> Self {
        Widget::TextParagraph(TextParagraph { text: text.into() })
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TextParagraph {
    pub text: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DecoratedText {
    pub top_label: String,
    pub text: String,
    pub bottom_label: String,
    pub on_click: OnClick,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub button: Option<Button>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OnClick {
    pub open_link: OpenLink,
}

impl OnClick {
    pub fn open(url: impl Into<String>) -> Self {
        Self {
            open_link: OpenLink { url: url.into() },
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct OpenLink {
    pub url: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Button {
    pub text: String,
    pub on_click: OnClick,
}
