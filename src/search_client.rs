//! Client for the Discovery Engine (Vertex AI Search) REST API.

use async_trait::async_trait;
use gcp_auth::{CustomServiceAccount, TokenProvider};
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::{Map, Value, json};
use std::sync::Arc;
use thiserror::Error;

use crate::config::Config;
use crate::data_models::{SearchHit, SearchOutcome};

pub const CLOUD_PLATFORM_SCOPE: &str = "https://www.googleapis.com/auth/cloud-platform";

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("search request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("search service returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("could not obtain an access token: {0}")]
    Credentials(String),
}

impl From<gcp_auth::Error> for SearchError {
    fn from(err: gcp_auth::Error) -> Self {
        SearchError::Credentials(err.to_string())
    }
}

/// Anything that can turn a user query into a [`SearchOutcome`]. The HTTP layer only sees
/// this trait, so tests plug in canned results.
#[async_trait]
pub trait SearchClient: Send + Sync {
    async fn search(&self, query: &str) -> Result<SearchOutcome, SearchError>;
}

/// Picks the token provider: the configured service account key file, or the
/// application default credentials (metadata server on Cloud Run / GCE).
pub async fn token_provider(config: &Config) -> Result<Arc<dyn TokenProvider>, SearchError> {
    match &config.credentials_file {
        Some(path) => {
            tracing::info!(path = %path.display(), "using service account key file");
            let account = CustomServiceAccount::from_file(path)?;
            Ok(Arc::new(account))
        }
        None => {
            tracing::info!("using application default credentials");
            Ok(gcp_auth::provider().await?)
        }
    }
}

pub struct DiscoveryEngineClient {
    http: reqwest::Client,
    endpoint: String,
    tokens: Arc<dyn TokenProvider>,
    page_size: u32,
    summary_result_count: u32,
}

impl DiscoveryEngineClient {
    pub async fn new(config: &Config) -> Result<Self, SearchError> {
        let tokens = token_provider(config).await?;
        Self::with_token_provider(config, tokens)
    }

    pub fn with_token_provider(
        config: &Config,
        tokens: Arc<dyn TokenProvider>,
    ) -> Result<Self, SearchError> {
        let http = reqwest::Client::builder()
            .timeout(config.search_timeout())
            .build()?;

        Ok(Self {
            http,
            endpoint: Self::endpoint(config),
            tokens,
            page_size: config.page_size,
            summary_result_count: config.summary_result_count,
        })
    }

    pub fn endpoint(config: &Config) -> String {
        format!(
            "https://{location}-discoveryengine.googleapis.com/v1/projects/{project}\
             /locations/{location}/collections/default_collection/engines/{engine}\
             /servingConfigs/default_search:search",
            location = config.location,
            project = config.project_id,
            engine = config.search_engine_id,
        )
    }

    fn request_body(&self, query: &str) -> Value {
        json!({
            "query": query,
            "pageSize": self.page_size,
            "spellCorrectionSpec": { "mode": "AUTO" },
            "contentSearchSpec": {
                "snippetSpec": { "returnSnippet": true, "maxSnippetCount": 3 },
                "summarySpec": {
                    "summaryResultCount": self.summary_result_count,
                    "includeCitations": true,
                    "ignoreAdversarialQuery": true,
                    "ignoreNonSummarySeekingQuery": true
                }
            }
        })
    }
}

#[async_trait]
impl SearchClient for DiscoveryEngineClient {
    async fn search(&self, query: &str) -> Result<SearchOutcome, SearchError> {
        let token = self.tokens.token(&[CLOUD_PLATFORM_SCOPE]).await?;
        tracing::info!(query, "searching");

        let res = self
            .http
            .post(&self.endpoint)
            .bearer_auth(token.as_str())
            .json(&self.request_body(query))
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            tracing::error!(%status, "search service rejected request");
            return Err(SearchError::Status { status, body });
        }

        let response: SearchResponse = res.json().await?;
        let outcome = response.into_outcome(query);
        tracing::info!(
            hits = outcome.hits.len(),
            total = outcome.total_count,
            summary_chars = outcome.summary.chars().count(),
            "search finished"
        );
        Ok(outcome)
    }
}

/// Subset of the `:search` response the bot reads.
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    #[serde(default)]
    pub results: Vec<SearchResult>,
    #[serde(default)]
    pub total_size: Option<u64>,
    #[serde(default)]
    pub summary: Option<Summary>,
}

#[derive(Debug, Deserialize, Default)]
pub struct SearchResult {
    #[serde(default)]
    pub document: Document,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(default)]
    pub derived_struct_data: Map<String, Value>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    #[serde(default)]
    pub summary_text: String,
}

impl SearchResponse {
    pub fn into_outcome(self, query: &str) -> SearchOutcome {
        let hits: Vec<SearchHit> = self
            .results
            .into_iter()
            .map(|r| hit_from_derived(&r.document.derived_struct_data))
            .collect();

        SearchOutcome {
            query: query.to_string(),
            summary: self.summary.map(|s| s.summary_text).unwrap_or_default(),
            total_count: self.total_size.unwrap_or(hits.len() as u64),
            hits,
        }
    }
}

fn string_field(data: &Map<String, Value>, key: &str) -> String {
    data.get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// Snippet objects carry the text under `snippet` next to status fields. Older payloads used
/// other keys, so fall back to the first non-empty string value.
fn snippet_text(snippet: &Value) -> Option<&str> {
    let obj = snippet.as_object()?;
    obj.get("snippet")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .or_else(|| {
            obj.iter()
                .filter(|(key, _)| !key.ends_with("status"))
                .filter_map(|(_, v)| v.as_str().map(str::trim))
                .find(|s| !s.is_empty())
        })
}

fn hit_from_derived(data: &Map<String, Value>) -> SearchHit {
    let snippet = data
        .get("snippets")
        .and_then(Value::as_array)
        .map(|snippets| {
            snippets
                .iter()
                .filter_map(snippet_text)
                .collect::<Vec<&str>>()
                .join(" ")
        })
        .unwrap_or_default();

    SearchHit {
        title: string_field(data, "title"),
        snippet,
        link: string_field(data, "link"),
    }
}
