//! Stable short ids for FAQ records.

use tracing::info;

use crate::domain::{CourseDocumentSet, FaqRecord, IdentifiedDocument};

/// Number of hex characters kept from the digest.
pub const DOCUMENT_ID_LEN: usize = 8;

/// Number of leading characters of the answer that feed the id.
const TEXT_PREFIX_CHARS: usize = 10;

/// Derives the document id for a record of `course`.
///
/// The id is the first eight hex characters of a BLAKE3 digest over
/// `"{course}-{question}-{first ten characters of text}"`. Characters are
/// Unicode scalar values, not bytes. Ids are only 32 bits wide, so two records
/// can collide; nothing here detects that.
pub fn generate_document_id(course: &str, question: &str, text: &str) -> String {
    let prefix: String = text.chars().take(TEXT_PREFIX_CHARS).collect();
    let combined = format!("{course}-{question}-{prefix}");
    let digest = blake3::hash(combined.as_bytes());
    digest.to_hex().as_str()[..DOCUMENT_ID_LEN].to_string()
}

fn identify(course: &str, record: &FaqRecord) -> IdentifiedDocument {
    IdentifiedDocument {
        document_id: generate_document_id(course, &record.question, &record.text),
        text: record.text.clone(),
        section: record.section.clone(),
        question: record.question.clone(),
        course: course.to_string(),
    }
}

/// Flattens every course's records into identified documents, keeping order.
///
/// A single course is passed as `std::slice::from_ref(&set)`.
pub fn assign_document_ids(sets: &[CourseDocumentSet]) -> Vec<IdentifiedDocument> {
    let documents: Vec<IdentifiedDocument> = sets
        .iter()
        .flat_map(|set| {
            set.documents
                .iter()
                .map(move |record| identify(&set.course, record))
        })
        .collect();

    info!(
        courses = sets.len(),
        documents = documents.len(),
        "Assigned document ids"
    );
    documents
}
