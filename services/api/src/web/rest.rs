//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the REST API endpoints and the master
//! definition for the OpenAPI specification.

use crate::web::state::AppState;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use faq_retrieval_core::{
    pipeline::{ingest, run_search, IngestReport, SearchRequest},
    SearchOutcome, SearchResult,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};
use utoipa::{IntoParams, OpenApi, ToSchema};

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(ingest_handler, search_handler),
    components(schemas(IngestResponse, SearchResponse, SearchResultBody, SearchStatus)),
    tags(
        (name = "FAQ Search API", description = "Ingest course FAQ documents and search them by keyword.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// API Response and Payload Structs
//=========================================================================================

/// The response payload sent after an ingestion run.
#[derive(Serialize, Deserialize, ToSchema, Debug)]
pub struct IngestResponse {
    /// The index that now holds the documents. Pass it to `/search`.
    pub index_name: String,
    pub courses: Vec<String>,
    pub documents_indexed: usize,
}

impl From<IngestReport> for IngestResponse {
    fn from(report: IngestReport) -> Self {
        Self {
            index_name: report.index_name,
            courses: report.courses,
            documents_indexed: report.documents_indexed,
        }
    }
}

/// Query string of `GET /search`.
#[derive(Deserialize, IntoParams, Debug)]
#[into_params(parameter_in = Query)]
pub struct SearchParams {
    /// Index to search, as returned by `/ingest`.
    pub index: String,
    /// Keywords to match. Defaults to the configured query.
    pub query: Option<String>,
    /// Maximum number of results. Defaults to the configured value.
    pub top_k: Option<usize>,
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SearchStatus {
    Ok,
    Rejected,
    Failed,
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, PartialEq, Eq)]
pub struct SearchResultBody {
    pub section: Option<String>,
    pub question: Option<String>,
    /// The first sixty characters of the answer followed by `...`.
    pub answer: String,
    pub document_id: Option<String>,
}

impl From<SearchResult> for SearchResultBody {
    fn from(result: SearchResult) -> Self {
        Self {
            section: result.section,
            question: result.question,
            answer: result.answer,
            document_id: result.document_id,
        }
    }
}

/// Search results. Failed searches still answer 200 with an empty list; the
/// `status` and `reason` fields say why.
#[derive(Serialize, Deserialize, ToSchema, Debug)]
pub struct SearchResponse {
    pub index: String,
    pub query: String,
    pub status: SearchStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub results: Vec<SearchResultBody>,
}

impl SearchResponse {
    fn from_outcome(index: String, query: String, outcome: SearchOutcome) -> Self {
        let (status, reason) = match &outcome {
            SearchOutcome::Hits(_) => (SearchStatus::Ok, None),
            SearchOutcome::Rejected(reason) => (SearchStatus::Rejected, Some(reason.clone())),
            SearchOutcome::Failed(reason) => (SearchStatus::Failed, Some(reason.clone())),
        };
        Self {
            index,
            query,
            status,
            reason,
            results: outcome.into_results().into_iter().map(Into::into).collect(),
        }
    }
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// Fetch every configured course FAQ and index it into a new index.
#[utoipa::path(
    post,
    path = "/ingest",
    responses(
        (status = 201, description = "Documents indexed", body = IngestResponse),
        (status = 502, description = "The document source or search engine failed")
    )
)]
pub async fn ingest_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let config = &app_state.config;
    let now = chrono::Local::now().naive_local();

    let report = ingest(
        app_state.source.as_ref(),
        app_state.engine.as_ref(),
        &config.faq_documents,
        &config.ingest_options(),
        now,
    )
    .await
    .map_err(|e| {
        error!("Ingestion failed: {}", e);
        (StatusCode::BAD_GATEWAY, format!("Ingestion failed: {}", e))
    })?;

    info!(
        index = %report.index_name,
        documents = report.documents_indexed,
        "Ingestion finished"
    );
    Ok((StatusCode::CREATED, Json(IngestResponse::from(report))))
}

/// Keyword search over an ingested index, restricted to the configured course.
#[utoipa::path(
    get,
    path = "/search",
    params(SearchParams),
    responses(
        (status = 200, description = "Search results, possibly empty", body = SearchResponse)
    )
)]
pub async fn search_handler(
    State(app_state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Json<SearchResponse> {
    let config = &app_state.config;
    let request = SearchRequest {
        query_text: params
            .query
            .filter(|q| !q.trim().is_empty())
            .unwrap_or_else(|| config.default_query.clone()),
        top_k: params.top_k.filter(|k| *k > 0).unwrap_or(config.top_k),
    };

    let outcome = run_search(
        app_state.engine.as_ref(),
        &params.index,
        &request,
        &config.course_filter,
        &config.chunk_field,
    )
    .await;

    Json(SearchResponse::from_outcome(
        params.index,
        request.query_text,
        outcome,
    ))
}

/// The API routes, without documentation or CORS layers.
pub fn api_router(app_state: Arc<AppState>) -> Router {
    Router::new()
        .route("/ingest", post(ingest_handler))
        .route("/search", get(search_handler))
        .with_state(app_state)
}
