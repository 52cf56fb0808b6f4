//! crates/faq_retrieval_core/src/domain.rs
//!
//! Defines the core data structures that flow through the ingestion and
//! retrieval pipeline. Serialization derives only exist on the types that
//! cross the wire (indexed documents and search results).

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

//=========================================================================================
// Ingestion Side
//=========================================================================================

/// The role a paragraph plays in an FAQ document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParagraphStyle {
    SectionHeading,
    QuestionHeading,
    Body,
}

/// One unit of source text, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyledParagraph {
    pub style: ParagraphStyle,
    pub text: String,
}

impl StyledParagraph {
    pub fn new(style: ParagraphStyle, text: impl Into<String>) -> Self {
        Self {
            style,
            text: text.into(),
        }
    }

    pub fn section(text: impl Into<String>) -> Self {
        Self::new(ParagraphStyle::SectionHeading, text)
    }

    pub fn question(text: impl Into<String>) -> Self {
        Self::new(ParagraphStyle::QuestionHeading, text)
    }

    pub fn body(text: impl Into<String>) -> Self {
        Self::new(ParagraphStyle::Body, text)
    }
}

/// A single question/answer unit scoped by its section.
/// All three fields are non-empty whenever the structurer emits one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaqRecord {
    pub text: String,
    pub section: String,
    pub question: String,
}

/// All FAQ records that came from one course's source document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseDocumentSet {
    pub course: String,
    pub documents: Vec<FaqRecord>,
}

/// An FAQ record stamped with its course and a derived short id.
/// This is exactly the shape written to the search index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentifiedDocument {
    pub text: String,
    pub section: String,
    pub question: String,
    pub course: String,
    pub document_id: String,
}

//=========================================================================================
// Index Management
//=========================================================================================

/// How the search engine should treat a stored field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Analyzed free text.
    FreeText,
    /// Exact-match keyword.
    Keyword,
}

/// Settings and schema used when an index is created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexSettings {
    pub number_of_shards: u32,
    pub number_of_replicas: u32,
    pub fields: Vec<(String, FieldKind)>,
}

impl IndexSettings {
    /// The schema for identified FAQ documents.
    pub fn faq_schema(number_of_shards: u32, number_of_replicas: u32) -> Self {
        let fields = [
            ("text", FieldKind::FreeText),
            ("section", FieldKind::FreeText),
            ("question", FieldKind::FreeText),
            ("course", FieldKind::Keyword),
            ("document_id", FieldKind::Keyword),
        ]
        .into_iter()
        .map(|(name, kind)| (name.to_string(), kind))
        .collect();

        Self {
            number_of_shards,
            number_of_replicas,
            fields,
        }
    }
}

//=========================================================================================
// Retrieval Side
//=========================================================================================

/// A field that participates in the multi-field match, with its weight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldBoost {
    pub field: String,
    pub weight: u32,
}

/// How scores from several matched fields combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchSemantics {
    /// A document scores by its single best-matching field.
    BestFields,
}

/// A structured keyword query, built fresh for every request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub query_text: String,
    pub top_k: usize,
    pub boosted_fields: Vec<FieldBoost>,
    pub semantics: MatchSemantics,
    /// Field name to the exact value it must hold.
    pub filters: BTreeMap<String, String>,
}

/// A raw hit as returned by the search engine.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    pub id: String,
    pub fields: BTreeMap<String, Value>,
}

/// The user-facing projection of one hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub section: Option<String>,
    pub question: Option<String>,
    pub answer: String,
    pub document_id: Option<String>,
}
