use anyhow::Result;
use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use clap::Parser;
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

use searchbot::api::{AppState, create_router};
use searchbot::config::Config;
use searchbot::data_models::{SearchHit, SearchOutcome};
use searchbot::search_client::{SearchClient, SearchError};

mod test_helpers {
    use super::*;

    /// Returns a canned outcome (or error) and records every query it was asked.
    pub struct FakeSearch {
        pub outcome: Option<SearchOutcome>,
        pub queries: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl SearchClient for FakeSearch {
        async fn search(&self, query: &str) -> Result<SearchOutcome, SearchError> {
            self.queries.lock().unwrap().push(query.to_string());
            match &self.outcome {
                Some(outcome) => Ok(SearchOutcome {
                    query: query.to_string(),
                    ..outcome.clone()
                }),
                None => Err(SearchError::Credentials("token expired".to_string())),
            }
        }
    }

    pub fn test_config() -> Config {
        Config::try_parse_from([
            "searchbot",
            "--project-id",
            "proj",
            "--location",
            "eu",
            "--search-engine-id",
            "engine",
            "--environment",
            "cloud",
            "--bot-name",
            "Docs Bot",
        ])
        .unwrap()
    }

    pub fn app(outcome: Option<SearchOutcome>) -> (Router, Arc<FakeSearch>) {
        let search = Arc::new(FakeSearch {
            outcome,
            queries: Mutex::new(Vec::new()),
        });
        let state = AppState::new(search.clone(), test_config());
        (create_router(state), search)
    }

    pub fn sample_outcome() -> SearchOutcome {
        SearchOutcome {
            query: String::new(),
            summary: "Prices are imported nightly [1]. • Errors are emailed.".to_string(),
            hits: vec![
                SearchHit::new("Price import", "How to import prices.", "gs://docs/import.pdf"),
                SearchHit::new("Stock.xlsx", "", "https://example.com/stock.xlsx"),
            ],
            total_count: 2,
        }
    }

    pub async fn send(app: Router, request: Request<Body>) -> Result<(StatusCode, Value)> {
        let response = app.oneshot(request).await?;
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)?
        };
        Ok((status, value))
    }

    pub fn post_json(body: Value) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri("/")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    pub fn message(text: &str) -> Request<Body> {
        post_json(json!({"type": "MESSAGE", "message": {"text": text}}))
    }
}

use test_helpers::*;

#[tokio::test]
async fn test_message_returns_cards() -> Result<()> {
    let (app, search) = app(Some(sample_outcome()));
    let (status, body) = send(app, message("@Docs Bot price import")).await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(*search.queries.lock().unwrap(), vec!["price import".to_string()]);

    let cards = body["cardsV2"].as_array().unwrap();
    assert_eq!(cards.len(), 4);
    assert_eq!(cards[0]["card"]["header"]["subtitle"], "Query: price import");
    assert_eq!(
        cards[1]["card"]["sections"][0]["widgets"][0]["textParagraph"]["text"],
        "<b>• Prices are imported nightly .</b>"
    );

    let widgets = cards[2]["card"]["sections"][0]["widgets"].as_array().unwrap();
    assert_eq!(widgets.len(), 2);
    assert_eq!(widgets[0]["decoratedText"]["text"], "<b>Price import.pdf</b>");
    assert_eq!(
        widgets[0]["decoratedText"]["onClick"]["openLink"]["url"],
        "https://storage.cloud.google.com/docs/import.pdf"
    );
    assert_eq!(widgets[1]["decoratedText"]["topLabel"], "📊 Document 2");
    Ok(())
}

#[tokio::test]
async fn test_short_query_is_rejected_without_search() -> Result<()> {
    let (app, search) = app(Some(sample_outcome()));
    let (status, body) = send(app, message("@Docs Bot ab")).await?;

    assert_eq!(status, StatusCode::OK);
    assert!(body["text"].as_str().unwrap().contains("Query too short"));
    assert!(search.queries.lock().unwrap().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_empty_message_gets_help_card() -> Result<()> {
    let (app, search) = app(Some(sample_outcome()));
    let (status, body) = send(app, message("   ")).await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["cardsV2"][0]["card"]["header"]["title"], "💬 How to ask");
    assert!(search.queries.lock().unwrap().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_search_failure_returns_error_card() -> Result<()> {
    let (app, _) = app(None);
    let (status, body) = send(app, message("price import")).await?;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["cardsV2"][0]["card"]["header"]["title"], "⚠️ Search error");
    let text = body["cardsV2"][0]["card"]["sections"][0]["widgets"][0]["textParagraph"]["text"]
        .as_str()
        .unwrap();
    assert!(text.contains("token expired"));
    Ok(())
}

#[tokio::test]
async fn test_added_to_space_welcomes() -> Result<()> {
    let (app, _) = app(None);
    let (status, body) = send(app, post_json(json!({"type": "ADDED_TO_SPACE"}))).await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["cardsV2"][0]["card"]["header"]["title"], "🤖 Docs Bot");
    Ok(())
}

#[tokio::test]
async fn test_removed_and_unknown_events_are_acknowledged() -> Result<()> {
    for event in ["REMOVED_FROM_SPACE", "CARD_CLICKED"] {
        let (app, _) = app(None);
        let (status, body) = send(app, post_json(json!({"type": event}))).await?;
        assert_eq!(status, StatusCode::OK, "event {event}");
        assert_eq!(body, json!({"text": ""}), "event {event}");
    }
    Ok(())
}

#[tokio::test]
async fn test_invalid_json_is_bad_request() -> Result<()> {
    let (app, _) = app(None);
    let request = Request::builder()
        .method(Method::POST)
        .uri("/")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = send(app, request).await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "BAD_REQUEST");
    Ok(())
}

#[tokio::test]
async fn test_empty_event_is_bad_request() -> Result<()> {
    let (app, search) = app(Some(sample_outcome()));
    let (status, body) = send(app, post_json(json!({}))).await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "BAD_REQUEST");
    assert!(search.queries.lock().unwrap().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_get_without_debug_is_not_allowed() -> Result<()> {
    let (app, _) = app(None);
    let request = Request::builder().uri("/").body(Body::empty()).unwrap();
    let (status, body) = send(app, request).await?;

    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body["error"], "METHOD_NOT_ALLOWED");
    Ok(())
}

#[tokio::test]
async fn test_other_methods_are_not_allowed() -> Result<()> {
    let (app, _) = app(None);
    let request = Request::builder()
        .method(Method::PUT)
        .uri("/")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(app, request).await?;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    Ok(())
}

#[tokio::test]
async fn test_debug_endpoint_reports_pipeline() -> Result<()> {
    let (app, search) = app(Some(sample_outcome()));
    let request = Request::builder()
        .uri("/?debug=1&q=%40Docs%20Bot%20price%20import")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(app, request).await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["debug"], true);
    assert_eq!(body["original_query"], "@Docs Bot price import");
    assert_eq!(body["cleaned_query"], "price import");
    assert_eq!(body["results_count"], 2);
    assert_eq!(body["summary_bullets"], 1);
    assert_eq!(body["card_truncated"], false);
    assert_eq!(
        body["results"],
        json!([
            {"title": "Price import", "has_snippet": true},
            {"title": "Stock.xlsx", "has_snippet": false}
        ])
    );
    assert_eq!(*search.queries.lock().unwrap(), vec!["price import".to_string()]);
    Ok(())
}

#[tokio::test]
async fn test_debug_endpoint_search_error() -> Result<()> {
    let (app, _) = app(None);
    let request = Request::builder().uri("/?debug").body(Body::empty()).unwrap();
    let (status, body) = send(app, request).await?;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["debug_error"].as_str().unwrap().contains("token expired"));
    Ok(())
}

#[tokio::test]
async fn test_health() -> Result<()> {
    let (app, _) = app(None);
    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let (status, body) = send(app, request).await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    Ok(())
}
