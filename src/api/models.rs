use serde::{Deserialize, Serialize};

/// Chat event types the bot reacts to. Anything else is acknowledged and ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    AddedToSpace,
    Message,
    RemovedFromSpace,
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
pub struct ChatEvent {
    #[serde(rename = "type", default)]
    pub event_type: Option<EventType>,
    #[serde(default)]
    pub message: Option<ChatMessage>,
}

impl ChatEvent {
    /// No event type and no message: nothing a chat platform would send.
    pub fn is_empty(&self) -> bool {
        self.event_type.is_none() && self.message.is_none()
    }

    pub fn text(&self) -> &str {
        self.message.as_ref().map(|m| m.text.trim()).unwrap_or_default()
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct ChatMessage {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct DebugParams {
    pub debug: Option<String>,
    pub q: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DebugResponse {
    pub debug: bool,
    pub version: &'static str,
    pub original_query: String,
    pub cleaned_query: String,
    pub results_count: usize,
    pub total_count: u64,
    pub summary_length: usize,
    pub summary_bullets: usize,
    pub card_bytes: usize,
    pub card_truncated: bool,
    pub results: Vec<DebugResult>,
}

#[derive(Debug, Serialize)]
pub struct DebugResult {
    pub title: String,
    pub has_snippet: bool,
}

#[derive(Debug, Serialize)]
pub struct DebugError {
    pub debug_error: String,
    pub version: &'static str,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}
