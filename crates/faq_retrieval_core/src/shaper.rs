//! crates/faq_retrieval_core/src/shaper.rs
//!
//! Turns raw search hits into the trimmed results handed back to callers, and
//! folds search failures into a typed outcome instead of an error.

use serde_json::Value;
use tracing::{error, warn};

use crate::domain::{SearchHit, SearchResult};
use crate::ports::{PortError, PortResult};

/// Number of answer characters kept in a result.
pub const ANSWER_PREVIEW_CHARS: usize = 60;

const ELLIPSIS: &str = "...";

//=========================================================================================
// Outcome Type
//=========================================================================================

/// What a search produced. Failures carry their reason so callers can tell
/// "nothing matched" apart from "the query never ran".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    Hits(Vec<SearchResult>),
    /// The engine refused the query as malformed.
    Rejected(String),
    /// Any other failure while talking to the engine.
    Failed(String),
}

impl SearchOutcome {
    /// The results, or an empty list when the search failed.
    pub fn into_results(self) -> Vec<SearchResult> {
        match self {
            SearchOutcome::Hits(results) => results,
            SearchOutcome::Rejected(_) | SearchOutcome::Failed(_) => Vec::new(),
        }
    }

    pub fn results(&self) -> &[SearchResult] {
        match self {
            SearchOutcome::Hits(results) => results.as_slice(),
            SearchOutcome::Rejected(_) | SearchOutcome::Failed(_) => &[],
        }
    }

    pub fn is_failure(&self) -> bool {
        !matches!(self, SearchOutcome::Hits(_))
    }

    pub fn failure_reason(&self) -> Option<&str> {
        match self {
            SearchOutcome::Hits(_) => None,
            SearchOutcome::Rejected(reason) | SearchOutcome::Failed(reason) => Some(reason),
        }
    }

    pub fn len(&self) -> usize {
        self.results().len()
    }

    pub fn is_empty(&self) -> bool {
        self.results().is_empty()
    }
}

//=========================================================================================
// Shaping
//=========================================================================================

/// First sixty characters of `text` plus `"..."`. The suffix is added even
/// when nothing was cut, which existing consumers rely on.
pub fn truncate_answer(text: &str) -> String {
    let mut answer: String = text.chars().take(ANSWER_PREVIEW_CHARS).collect();
    answer.push_str(ELLIPSIS);
    answer
}

fn string_field(hit: &SearchHit, name: &str) -> Option<String> {
    match hit.fields.get(name)? {
        Value::String(s) => Some(s.clone()),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

/// Projects every hit that stores `chunk_field`. Hits without it are skipped
/// with a warning listing the fields they do have.
pub fn shape_results(hits: &[SearchHit], chunk_field: &str) -> Vec<SearchResult> {
    hits.iter()
        .filter_map(|hit| {
            if !hit.fields.contains_key(chunk_field) {
                let available: Vec<&str> = hit.fields.keys().map(String::as_str).collect();
                warn!(
                    hit_id = %hit.id,
                    ?available,
                    "'{}' not found in search hit, skipping",
                    chunk_field
                );
                return None;
            }

            let text = string_field(hit, "text").unwrap_or_default();
            Some(SearchResult {
                section: string_field(hit, "section"),
                question: string_field(hit, "question"),
                answer: truncate_answer(&text),
                document_id: string_field(hit, "document_id"),
            })
        })
        .collect()
}

/// Applies the never-fail policy to an engine response: errors become a
/// logged, typed failure instead of propagating.
pub fn shape_outcome(response: PortResult<Vec<SearchHit>>, chunk_field: &str) -> SearchOutcome {
    match response {
        Ok(hits) => SearchOutcome::Hits(shape_results(&hits, chunk_field)),
        Err(PortError::QueryRejected(reason)) => {
            error!("Search engine rejected the query: {}", reason);
            SearchOutcome::Rejected(reason)
        }
        Err(e) => {
            error!("Unexpected error during search: {}", e);
            SearchOutcome::Failed(e.to_string())
        }
    }
}
