//! crates/faq_retrieval_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the pipeline's external
//! collaborators. The core only ever talks to a document source and a search
//! engine through these traits, so the concrete HTTP clients live in the
//! service crate.

use async_trait::async_trait;

use crate::domain::{IdentifiedDocument, IndexSettings, SearchHit, SearchQuery, StyledParagraph};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    /// The search engine refused the query as malformed.
    #[error("Query rejected: {0}")]
    QueryRejected(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// Fetches the styled paragraphs of one course's FAQ document, in order.
    async fn fetch_paragraphs(&self, source_id: &str) -> PortResult<Vec<StyledParagraph>>;
}

#[async_trait]
pub trait SearchEngine: Send + Sync {
    async fn index_exists(&self, index: &str) -> PortResult<bool>;

    async fn create_index(&self, index: &str, settings: &IndexSettings) -> PortResult<()>;

    async fn index_document(&self, index: &str, document: &IdentifiedDocument) -> PortResult<()>;

    /// Runs a query and returns the raw hits in ranking order.
    async fn search(&self, index: &str, query: &SearchQuery) -> PortResult<Vec<SearchHit>>;
}
