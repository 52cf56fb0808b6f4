//! services/api/src/adapters/elasticsearch.rs
//!
//! This module contains the search engine adapter, the concrete implementation
//! of the `SearchEngine` port from the `core` crate. It talks to Elasticsearch
//! over its REST API using `reqwest`.

use async_trait::async_trait;
use faq_retrieval_core::domain::{
    FieldKind, IdentifiedDocument, IndexSettings, MatchSemantics, SearchHit, SearchQuery,
};
use faq_retrieval_core::ports::{PortError, PortResult, SearchEngine};
use reqwest::{Response, StatusCode};
use serde_json::{json, Map, Value};
use tracing::debug;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A search engine adapter that implements the `SearchEngine` port.
#[derive(Clone)]
pub struct ElasticsearchAdapter {
    client: reqwest::Client,
    base_url: String,
}

impl ElasticsearchAdapter {
    /// Creates a new `ElasticsearchAdapter` for the cluster at `base_url`.
    pub fn new(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }
}

fn unexpected(e: reqwest::Error) -> PortError {
    PortError::Unexpected(e.to_string())
}

/// Turns a non-success response into a port error carrying the body.
async fn ensure_success(response: Response, action: &str) -> PortResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(PortError::Unexpected(format!(
        "{} failed with status {}: {}",
        action, status, body
    )))
}

//=========================================================================================
// Request and Response Bodies
//=========================================================================================

/// Settings and mappings body for index creation.
pub fn render_index_body(settings: &IndexSettings) -> Value {
    let properties: Map<String, Value> = settings
        .fields
        .iter()
        .map(|(name, kind)| {
            let es_type = match kind {
                FieldKind::FreeText => "text",
                FieldKind::Keyword => "keyword",
            };
            (name.clone(), json!({ "type": es_type }))
        })
        .collect();

    json!({
        "settings": {
            "number_of_shards": settings.number_of_shards,
            "number_of_replicas": settings.number_of_replicas,
        },
        "mappings": { "properties": properties },
    })
}

/// Query DSL body for a search: a boosted `multi_match` inside a `bool`
/// query, with one `term` filter per exact-match field.
pub fn render_search_body(query: &SearchQuery) -> Value {
    let fields: Vec<String> = query
        .boosted_fields
        .iter()
        .map(|boost| match boost.weight {
            1 => boost.field.clone(),
            weight => format!("{}^{}", boost.field, weight),
        })
        .collect();

    let match_type = match query.semantics {
        MatchSemantics::BestFields => "best_fields",
    };

    let filters: Vec<Value> = query
        .filters
        .iter()
        .map(|(field, value)| {
            let mut term = Map::new();
            term.insert(field.clone(), Value::String(value.clone()));
            json!({ "term": term })
        })
        .collect();

    json!({
        "size": query.top_k,
        "query": {
            "bool": {
                "must": [{
                    "multi_match": {
                        "query": query.query_text,
                        "fields": fields,
                        "type": match_type,
                    }
                }],
                "filter": filters,
            }
        }
    })
}

/// Maps the status of a search response to the port error it stands for.
/// A 400 means the engine rejected the query itself.
pub fn check_search_status(status: StatusCode, index: &str, body: &str) -> PortResult<()> {
    match status {
        status if status.is_success() => Ok(()),
        StatusCode::BAD_REQUEST => Err(PortError::QueryRejected(body.to_string())),
        StatusCode::NOT_FOUND => Err(PortError::NotFound(format!("Index {} not found", index))),
        status => Err(PortError::Unexpected(format!(
            "Search failed with status {}: {}",
            status, body
        ))),
    }
}

/// Reads `hits.hits[*]` out of a search response body.
pub fn parse_hits(body: &Value) -> PortResult<Vec<SearchHit>> {
    let hits = body
        .pointer("/hits/hits")
        .and_then(Value::as_array)
        .ok_or_else(|| PortError::Unexpected("Search response has no hits array".to_string()))?;

    Ok(hits
        .iter()
        .map(|hit| {
            let id = hit
                .get("_id")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            let fields = hit
                .get("_source")
                .and_then(Value::as_object)
                .map(|source| {
                    source
                        .iter()
                        .map(|(k, v)| (k.clone(), v.clone()))
                        .collect()
                })
                .unwrap_or_default();
            SearchHit { id, fields }
        })
        .collect())
}

//=========================================================================================
// `SearchEngine` Trait Implementation
//=========================================================================================

#[async_trait]
impl SearchEngine for ElasticsearchAdapter {
    async fn index_exists(&self, index: &str) -> PortResult<bool> {
        let response = self
            .client
            .head(self.url(index))
            .send()
            .await
            .map_err(unexpected)?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(false),
            status if status.is_success() => Ok(true),
            status => Err(PortError::Unexpected(format!(
                "Checking index {} failed with status {}",
                index, status
            ))),
        }
    }

    async fn create_index(&self, index: &str, settings: &IndexSettings) -> PortResult<()> {
        let response = self
            .client
            .put(self.url(index))
            .json(&render_index_body(settings))
            .send()
            .await
            .map_err(unexpected)?;
        ensure_success(response, "Creating index").await?;
        Ok(())
    }

    async fn index_document(&self, index: &str, document: &IdentifiedDocument) -> PortResult<()> {
        let response = self
            .client
            .post(self.url(&format!("{}/_doc", index)))
            .json(document)
            .send()
            .await
            .map_err(unexpected)?;
        ensure_success(response, "Indexing document").await?;
        Ok(())
    }

    async fn search(&self, index: &str, query: &SearchQuery) -> PortResult<Vec<SearchHit>> {
        let body = render_search_body(query);
        let response = self
            .client
            .post(self.url(&format!("{}/_search", index)))
            .json(&body)
            .send()
            .await
            .map_err(unexpected)?;

        let status = response.status();
        let text = response.text().await.map_err(unexpected)?;
        check_search_status(status, index, &text)?;

        let payload: Value = serde_json::from_str(&text)
            .map_err(|e| PortError::Unexpected(format!("Invalid search response: {}", e)))?;
        debug!(index, took = ?payload.get("took"), "Search response received");
        parse_hits(&payload)
    }
}
