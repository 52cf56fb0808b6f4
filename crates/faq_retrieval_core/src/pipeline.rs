//! crates/faq_retrieval_core/src/pipeline.rs
//!
//! Drives the two pipeline runs over the ports: ingestion (fetch, structure,
//! identify, index) and search (build query, run it, shape the hits).
//!
//! The name of the index written by ingestion is returned in the
//! [`IngestReport`] and must be handed to [`run_search`] explicitly.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::domain::{CourseDocumentSet, IdentifiedDocument, IndexSettings};
use crate::identity::assign_document_ids;
use crate::ports::{DocumentSource, PortResult, SearchEngine};
use crate::query::build_search_query;
use crate::shaper::{shape_outcome, SearchOutcome};
use crate::structurer::structure_faq;

//=========================================================================================
// Ingestion
//=========================================================================================

/// A course and the id of its FAQ document at the document source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseSource {
    pub course: String,
    pub source_id: String,
}

/// Index settings that apply to one ingestion run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestOptions {
    pub index_name_prefix: String,
    pub number_of_shards: u32,
    pub number_of_replicas: u32,
}

/// Summary of a finished ingestion run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestReport {
    pub index_name: String,
    pub courses: Vec<String>,
    pub documents_indexed: usize,
}

/// `"{prefix}_{YYYYmmdd_HHMMSS}"`, so every run writes a fresh index.
pub fn index_name_for(prefix: &str, now: NaiveDateTime) -> String {
    format!("{}_{}", prefix, now.format("%Y%m%d_%H%M%S"))
}

/// Fetches and structures each course's FAQ document, in order.
pub async fn load_courses(
    source: &dyn DocumentSource,
    courses: &[CourseSource],
) -> PortResult<Vec<CourseDocumentSet>> {
    let mut sets = Vec::with_capacity(courses.len());
    for course in courses {
        let paragraphs = source.fetch_paragraphs(&course.source_id).await?;
        let documents = structure_faq(&paragraphs);
        info!(
            course = %course.course,
            paragraphs = paragraphs.len(),
            records = documents.len(),
            "Structured FAQ document"
        );
        sets.push(CourseDocumentSet {
            course: course.course.clone(),
            documents,
        });
    }
    Ok(sets)
}

/// Creates `index_name` when missing, then writes every document to it.
/// Returns the number of documents written.
pub async fn export_documents(
    engine: &dyn SearchEngine,
    index_name: &str,
    settings: &IndexSettings,
    documents: &[IdentifiedDocument],
) -> PortResult<usize> {
    if !engine.index_exists(index_name).await? {
        engine.create_index(index_name, settings).await?;
        info!(index = index_name, ?settings, "Index created");
    }

    info!(
        index = index_name,
        count = documents.len(),
        "Indexing documents"
    );
    for document in documents {
        debug!(document_id = %document.document_id, "Indexing document");
        engine.index_document(index_name, document).await?;
    }

    if let Some(last) = documents.last() {
        info!(?last, "Last document indexed");
    }
    Ok(documents.len())
}

/// Runs a full ingestion into a new timestamped index.
pub async fn ingest(
    source: &dyn DocumentSource,
    engine: &dyn SearchEngine,
    courses: &[CourseSource],
    options: &IngestOptions,
    now: NaiveDateTime,
) -> PortResult<IngestReport> {
    let sets = load_courses(source, courses).await?;
    let documents = assign_document_ids(&sets);

    let index_name = index_name_for(&options.index_name_prefix, now);
    info!(index = %index_name, "Ingestion target index");

    let settings = IndexSettings::faq_schema(options.number_of_shards, options.number_of_replicas);
    let documents_indexed = export_documents(engine, &index_name, &settings, &documents).await?;

    Ok(IngestReport {
        index_name,
        courses: sets.into_iter().map(|set| set.course).collect(),
        documents_indexed,
    })
}

//=========================================================================================
// Search
//=========================================================================================

/// The caller-controlled part of a search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub query_text: String,
    pub top_k: usize,
}

/// Searches `index_name` for FAQ entries of `course`. Never returns an error:
/// engine failures come back as [`SearchOutcome::Rejected`] or
/// [`SearchOutcome::Failed`].
pub async fn run_search(
    engine: &dyn SearchEngine,
    index_name: &str,
    request: &SearchRequest,
    course: &str,
    chunk_field: &str,
) -> SearchOutcome {
    let query = build_search_query(&request.query_text, request.top_k, course);
    info!(index = index_name, ?query, "Sending text query");

    let response = engine.search(index_name, &query).await;
    if let Ok(hits) = &response {
        debug!(index = index_name, hits = hits.len(), "Raw response from search engine");
    }

    shape_outcome(response, chunk_field)
}
