use anyhow::Result;
use axum::{extract::{Path, Query, State}, http::{HeaderValue, StatusCode}, routing::get, Json, Router};
use lexcode_core::article::format_date_fr;
use lexcode_core::config::EngineConfig;
use lexcode_core::{Article, SearchEngine};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

#[derive(Deserialize)]
pub struct SearchParams {
    pub q: String,
    #[serde(default = "default_k")]
    pub k: usize,
}
fn default_k() -> usize { 10 }

#[derive(Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub took_s: f64,
    pub total_hits: usize,
    pub results: Vec<SearchHit>,
}

#[derive(Serialize)]
pub struct SearchHit {
    pub article_id: String,
    pub article_num: String,
    pub score: f64,
}

#[derive(Serialize)]
pub struct ResultsResponse {
    pub query: String,
    pub number: usize,
    pub results: Vec<ArticleView>,
}

/// An article prepared for display.
#[derive(Serialize)]
pub struct ArticleView {
    pub article_id: String,
    pub article_num: String,
    /// French long date, absent when the stored timestamp is malformed.
    pub date: Option<String>,
    pub titles: Vec<String>,
    pub paragraphs: Vec<String>,
    /// Found by article number rather than ranked.
    pub reference: bool,
}

impl ArticleView {
    fn new(article: &Article, reference: bool) -> Self {
        Self {
            article_id: article.article_id.clone(),
            article_num: article.article_num.clone(),
            date: article.effective_date().map(format_date_fr),
            titles: article.titles(),
            paragraphs: article.paragraphs(),
            reference,
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<SearchEngine>,
    pub limit: usize,
}

/// Load the dataset and index named by the config, then wire the routes.
pub fn build_app(config: &EngineConfig) -> Result<Router> {
    let engine = SearchEngine::open(config)?;
    Ok(router(Arc::new(engine), config.limit))
}

pub fn router(engine: Arc<SearchEngine>, limit: usize) -> Router {
    let cors = cors_layer(std::env::var("CORS_ALLOW_ORIGIN").ok().as_deref());
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/search", get(search_handler))
        .route("/results/:query", get(results_handler))
        .route("/article/:article_id", get(article_handler))
        .with_state(AppState { engine, limit })
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Origins allowed to call the API, from a comma-separated list. Any origin
/// when the list is absent or holds no valid header value.
pub fn cors_layer(allowed: Option<&str>) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed
        .unwrap_or_default()
        .split(',')
        .filter_map(|s| s.trim().parse().ok())
        .filter(|v: &HeaderValue| !v.is_empty())
        .collect();
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.is_empty() {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(AllowOrigin::list(origins))
    }
}

pub async fn search_handler(State(state): State<AppState>, Query(params): Query<SearchParams>) -> Json<SearchResponse> {
    let start = std::time::Instant::now();
    let scored = state.engine.search(&params.q);
    let total_hits = scored.len();
    let k = params.k.max(1).min(100);

    let corpus = state.engine.corpus();
    let results = scored
        .into_iter()
        .take(k)
        .filter_map(|(article_id, score)| {
            let article = corpus.get(&article_id)?;
            Some(SearchHit { article_num: article.article_num.clone(), article_id, score })
        })
        .collect();

    let elapsed = start.elapsed();
    Json(SearchResponse { query: params.q, took_s: elapsed.as_secs_f64(), total_hits, results })
}

pub async fn results_handler(State(state): State<AppState>, Path(query): Path<String>) -> Json<ResultsResponse> {
    let resolution = state.engine.solve(&query, state.limit);
    let results: Vec<ArticleView> = resolution
        .references
        .iter()
        .map(|a| ArticleView::new(a, true))
        .chain(resolution.ranked.iter().map(|a| ArticleView::new(a, false)))
        .collect();
    tracing::debug!(%query, number = results.len(), "results served");
    Json(ResultsResponse { query, number: results.len(), results })
}

pub async fn article_handler(
    State(state): State<AppState>,
    Path(article_id): Path<String>,
) -> Result<Json<ArticleView>, (StatusCode, Json<serde_json::Value>)> {
    match state.engine.corpus().get(&article_id) {
        Some(article) => Ok(Json(ArticleView::new(article, false))),
        None => Err((StatusCode::NOT_FOUND, Json(serde_json::json!({ "error": "not found" })))),
    }
}
