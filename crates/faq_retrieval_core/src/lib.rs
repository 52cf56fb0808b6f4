pub mod domain;
pub mod identity;
pub mod normalize;
pub mod pipeline;
pub mod ports;
pub mod query;
pub mod shaper;
pub mod structurer;

pub use domain::{
    CourseDocumentSet, FaqRecord, FieldBoost, FieldKind, IdentifiedDocument, IndexSettings,
    MatchSemantics, ParagraphStyle, SearchHit, SearchQuery, SearchResult, StyledParagraph,
};
pub use identity::{assign_document_ids, generate_document_id};
pub use normalize::clean_line;
pub use pipeline::{
    export_documents, index_name_for, ingest, load_courses, run_search, CourseSource,
    IngestOptions, IngestReport, SearchRequest,
};
pub use ports::{DocumentSource, PortError, PortResult, SearchEngine};
pub use query::build_search_query;
pub use shaper::{shape_outcome, shape_results, truncate_answer, SearchOutcome};
pub use structurer::{structure_faq, FaqStructurer};
