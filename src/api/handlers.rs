use axum::{
    Json,
    extract::{Query, State, rejection::JsonRejection, rejection::QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::any::Any;

use crate::composer::{FormattedMessage, notices};
use crate::config::CODE_VERSION;
use crate::summary::BULLET;

use super::AppState;
use super::error::{AppError, AppResult};
use super::models::{
    ChatEvent, DebugError, DebugParams, DebugResponse, DebugResult, EventType, HealthResponse,
};

/// Queries shorter than this (after mention stripping) are not sent to the search service.
pub const MIN_QUERY_CHARS: usize = 3;

/// Strips chat mentions from a message: a leading `<users/...>` tag, the bot's own
/// `@name`, and any other leading `@word`. A blank bot name strips nothing.
pub fn clean_message_text(text: &str, bot_name: &str) -> String {
    let mut text = text.trim();
    if text.starts_with("<users/") {
        if let Some((_, rest)) = text.split_once("> ") {
            text = rest.trim();
        }
    }

    let bot_name = bot_name.trim();
    let without_bot = if bot_name.is_empty() {
        text.to_string()
    } else {
        text.replace(&format!("@{bot_name}"), "")
    };
    let text = without_bot.trim();

    if text.starts_with('@') {
        return text
            .split_once(' ')
            .map(|(_, rest)| rest.trim().to_string())
            .unwrap_or_default();
    }
    text.to_string()
}

pub async fn event_handler(
    State(state): State<AppState>,
    payload: Result<Json<ChatEvent>, JsonRejection>,
) -> AppResult<Json<FormattedMessage>> {
    let Json(event) = payload?;
    if event.is_empty() {
        return Err(AppError::BadRequest("invalid JSON: empty event".to_string()));
    }

    match event.event_type {
        Some(EventType::AddedToSpace) => {
            tracing::info!("bot added to a space");
            Ok(Json(notices::welcome(&state.config.bot_name).into()))
        }
        Some(EventType::Message) => handle_message(&state, event.text()).await,
        Some(EventType::RemovedFromSpace) => {
            tracing::info!("bot removed from a space");
            Ok(Json(FormattedMessage::text("")))
        }
        other => {
            tracing::info!(event_type = ?other, "ignoring unknown event type");
            Ok(Json(FormattedMessage::text("")))
        }
    }
}

async fn handle_message(state: &AppState, text: &str) -> AppResult<Json<FormattedMessage>> {
    if text.is_empty() {
        return Ok(Json(notices::empty_message_help().into()));
    }

    let query = clean_message_text(text, &state.config.bot_name);
    if query.chars().count() < MIN_QUERY_CHARS {
        return Ok(Json(notices::query_too_short(MIN_QUERY_CHARS)));
    }

    tracing::info!(query = %query, "search query");
    let outcome = state.search.search(&query).await?;
    let composed = state.composer.cards_for(&outcome);
    tracing::info!(
        bytes = composed.size,
        truncated = composed.truncated,
        "card response ready"
    );
    Ok(Json(composed.payload.into()))
}

/// `GET /?debug&q=...`: runs the whole pipeline and reports what it saw.
pub async fn debug_handler(
    State(state): State<AppState>,
    params: Result<Query<DebugParams>, QueryRejection>,
) -> AppResult<Response> {
    let Query(params) = params?;
    if params.debug.is_none() {
        return Err(AppError::MethodNotAllowed);
    }

    let original_query = params
        .q
        .unwrap_or_else(|| state.config.debug_default_query.clone());
    let cleaned_query = clean_message_text(&original_query, &state.config.bot_name);

    let outcome = match state.search.search(&cleaned_query).await {
        Ok(outcome) => outcome,
        Err(e) => {
            tracing::error!(error = %e, "debug search failed");
            let body = DebugError {
                debug_error: e.to_string(),
                version: CODE_VERSION,
            };
            return Ok((StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response());
        }
    };

    let composed = state.composer.cards_for(&outcome);
    Ok(Json(DebugResponse {
        debug: true,
        version: CODE_VERSION,
        original_query,
        cleaned_query,
        results_count: outcome.hits.len(),
        total_count: outcome.total_count,
        summary_length: outcome.summary.chars().count(),
        summary_bullets: outcome.summary.matches(BULLET).count(),
        card_bytes: composed.size,
        card_truncated: composed.truncated,
        results: outcome
            .hits
            .iter()
            .map(|hit| DebugResult {
                title: hit.title.clone(),
                has_snippet: !hit.snippet.trim().is_empty(),
            })
            .collect(),
    })
    .into_response())
}

pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: CODE_VERSION,
    })
}

pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

/// Last-resort response when a handler panics.
pub fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    tracing::error!(detail, "handler panicked");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(FormattedMessage::from(notices::internal_error())),
    )
        .into_response()
}
