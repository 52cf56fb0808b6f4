//! Builds the keyword query sent to the search engine.

use std::collections::BTreeMap;

use crate::domain::{FieldBoost, MatchSemantics, SearchQuery};

/// Fields searched by every FAQ query and their weights. Question text
/// counts three times as much as the answer or the section title.
pub const FAQ_FIELD_BOOSTS: [(&str, u32); 3] = [("question", 3), ("text", 1), ("section", 1)];

/// The field the course filter applies to.
pub const COURSE_FIELD: &str = "course";

/// Matches `query_text` against the FAQ fields with best-field scoring,
/// restricted to documents of `course`, returning at most `top_k` hits.
pub fn build_search_query(query_text: &str, top_k: usize, course: &str) -> SearchQuery {
    let boosted_fields = FAQ_FIELD_BOOSTS
        .iter()
        .map(|(field, weight)| FieldBoost {
            field: field.to_string(),
            weight: *weight,
        })
        .collect();

    let mut filters = BTreeMap::new();
    filters.insert(COURSE_FIELD.to_string(), course.to_string());

    SearchQuery {
        query_text: query_text.to_string(),
        top_k,
        boosted_fields,
        semantics: MatchSemantics::BestFields,
        filters,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_weights_question_highest() {
        let query = build_search_query("When is the next cohort?", 5, "llm-zoomcamp");

        assert_eq!(query.query_text, "When is the next cohort?");
        assert_eq!(query.top_k, 5);
        assert_eq!(query.semantics, MatchSemantics::BestFields);

        let boosts: Vec<(&str, u32)> = query
            .boosted_fields
            .iter()
            .map(|b| (b.field.as_str(), b.weight))
            .collect();
        assert_eq!(boosts, vec![("question", 3), ("text", 1), ("section", 1)]);
    }

    #[test]
    fn query_filters_on_exact_course() {
        let query = build_search_query("anything", 1, "data-engineering-zoomcamp");

        assert_eq!(query.filters.len(), 1);
        assert_eq!(
            query.filters.get("course").map(String::as_str),
            Some("data-engineering-zoomcamp")
        );
    }
}
