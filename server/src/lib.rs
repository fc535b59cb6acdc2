use anyhow::Result;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use hybrid_client::{EmbedClient, IndexHandle, InputType, QueryRequest};
use hybrid_core::encoder::Bm25Encoder;
use hybrid_core::persist::{load_encoder, StatePaths};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

#[derive(Deserialize)]
pub struct SearchParams {
    pub q: String,
    #[serde(default = "default_k")]
    pub k: u32,
}
fn default_k() -> u32 {
    10
}

#[derive(Deserialize)]
pub struct EncodeParams {
    pub q: String,
}

#[derive(Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub took_s: f64,
    pub results: Vec<SearchHit>,
}

#[derive(Serialize)]
pub struct SearchHit {
    pub id: String,
    pub score: f32,
    pub title: String,
    pub snippet: Option<String>,
}

#[derive(Serialize)]
pub struct EncodeResponse {
    pub query: String,
    pub indices: Vec<u32>,
    pub values: Vec<f32>,
}

/// Clients for the hosted service. Absent when the server runs without an
/// index, in which case /search answers 503.
#[derive(Clone)]
pub struct Backend {
    pub embed: EmbedClient,
    pub index: IndexHandle,
}

#[derive(Clone)]
pub struct AppState {
    pub encoder: Arc<Bm25Encoder>,
    pub backend: Option<Backend>,
}

pub fn build_app(state_dir: &str, backend: Option<Backend>) -> Result<Router> {
    // Load fitted encoder state at startup
    let encoder = load_encoder(&StatePaths::new(state_dir))?;
    let app_state = AppState { encoder: Arc::new(encoder), backend };

    // CORS: read CORS_ALLOW_ORIGIN (comma-separated) or allow Any by default
    let cors = match std::env::var("CORS_ALLOW_ORIGIN") {
        Ok(val) => {
            let origins: Vec<_> = val.split(',').filter_map(|s| s.trim().parse().ok()).collect();
            if origins.is_empty() {
                CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
            } else {
                CorsLayer::new()
                    .allow_origin(AllowOrigin::list(origins))
                    .allow_methods(Any)
                    .allow_headers(Any)
            }
        }
        Err(_) => CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any),
    };

    let app = Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/encode", get(encode_handler))
        .route("/search", get(search_handler))
        .with_state(app_state)
        .layer(cors);
    Ok(app)
}

/// Sparse-encode a query against the loaded fitted state, without touching
/// the hosted service.
pub async fn encode_handler(
    State(state): State<AppState>,
    Query(params): Query<EncodeParams>,
) -> Result<Json<EncodeResponse>, (StatusCode, String)> {
    let sv = state
        .encoder
        .encode_query(&params.q)
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    Ok(Json(EncodeResponse { query: params.q, indices: sv.indices, values: sv.values }))
}

pub async fn search_handler(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, (StatusCode, String)> {
    let start = Instant::now();
    let backend = state
        .backend
        .as_ref()
        .ok_or((StatusCode::SERVICE_UNAVAILABLE, "no vector index configured".to_string()))?;

    let sparse = state
        .encoder
        .encode_query(&params.q)
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    let dense = backend
        .embed
        .embed(InputType::Query, &[&params.q])
        .await
        .map_err(upstream)?
        .into_iter()
        .next()
        .ok_or((StatusCode::BAD_GATEWAY, "embed returned no vector".to_string()))?;

    let k = params.k.clamp(1, 100);
    let response = backend
        .index
        .query(&QueryRequest {
            top_k: k,
            vector: dense,
            sparse_vector: (!sparse.is_empty()).then_some(sparse),
            include_metadata: true,
        })
        .await
        .map_err(upstream)?;

    // Capture raw query terms for highlighting
    let raw_terms: Vec<String> = params.q.split_whitespace().map(|s| s.to_string()).collect();
    let results: Vec<SearchHit> = response
        .matches
        .into_iter()
        .map(|m| {
            let (title, snippet) = match m.metadata {
                Some(md) => (md.title, snippet_from_content(&md.content, &raw_terms)),
                None => (String::new(), None),
            };
            SearchHit { id: m.id, score: m.score, title, snippet }
        })
        .collect();

    let elapsed = start.elapsed();
    Ok(Json(SearchResponse { query: params.q, took_s: elapsed.as_secs_f64(), results }))
}

fn upstream(err: anyhow::Error) -> (StatusCode, String) {
    tracing::warn!(%err, "upstream request failed");
    (StatusCode::BAD_GATEWAY, err.to_string())
}

pub fn snippet_from_content(text: &str, raw_terms: &[String]) -> Option<String> {
    if text.is_empty() {
        return None;
    }
    // find first match (case-insensitive) of any raw term
    let mut first_idx: Option<usize> = None;
    for term in raw_terms {
        if term.trim().is_empty() {
            continue;
        }
        if let Some(pos) = find_case_insensitive(text, term) {
            first_idx = Some(pos);
            break;
        }
    }
    let snippet = match first_idx {
        Some(idx) => {
            let start = floor_char_boundary(text, idx.saturating_sub(100));
            let end = floor_char_boundary(text, (idx + 200).min(text.len()));
            text[start..end].to_string()
        }
        None => text.chars().take(200).collect(),
    };
    Some(highlight_terms(&snippet, raw_terms))
}

fn floor_char_boundary(text: &str, mut idx: usize) -> usize {
    while idx > 0 && !text.is_char_boundary(idx) {
        idx -= 1;
    }
    idx
}

fn find_case_insensitive(haystack: &str, needle: &str) -> Option<usize> {
    let h = haystack.to_lowercase();
    let n = needle.to_lowercase();
    h.find(&n)
}

fn highlight_terms(snippet: &str, terms: &[String]) -> String {
    let mut s = snippet.to_string();
    for t in terms {
        if t.trim().is_empty() {
            continue;
        }
        if let Ok(pat) = regex::RegexBuilder::new(&regex::escape(t)).case_insensitive(true).build() {
            s = pat
                .replace_all(&s, |caps: &regex::Captures| format!("<em>{}</em>", &caps[0]))
                .to_string();
        }
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snippets_highlight_query_terms() {
        let text = "Climate change poses a significant threat to the environment.";
        let terms = vec!["climate".to_string()];
        let snippet = snippet_from_content(text, &terms).unwrap();
        assert!(snippet.contains("<em>Climate</em>"));
    }

    #[test]
    fn snippet_windows_respect_char_boundaries() {
        let text = "é".repeat(400);
        let terms = vec!["é".to_string()];
        // must not panic slicing mid-character
        let snippet = snippet_from_content(&text, &terms).unwrap();
        assert!(!snippet.is_empty());
    }
}
