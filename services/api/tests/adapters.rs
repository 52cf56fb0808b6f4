//! Request/response shaping of the HTTP adapters, without a network.

use faq_api_lib::adapters::elasticsearch::{
    check_search_status, parse_hits, render_index_body, render_search_body,
};
use faq_api_lib::adapters::google_docs::parse_html_paragraphs;
use faq_retrieval_core::{
    build_search_query, structure_faq, IndexSettings, ParagraphStyle, PortError, PortResult,
};
use reqwest::StatusCode;
use rstest::rstest;
use serde_json::json;

const EXPORTED_FAQ: &str = r#"<html><head><style>p{margin:0}</style></head><body class="doc-content">
<p class="title"><span>LLM Zoomcamp FAQ</span></p>
<h1 class="c4" id="h.1"><span class="c2">General course-related questions</span></h1>
<h2 class="c5" id="h.2"><span>When is the next cohort?</span></h2>
<p class="c1"><span class="c0">The next cohort starts in June 2024.</span></p>
<p class="c1"><span class="c0"></span></p>
<p class="c1"><span class="c0">Register &amp; join the Slack.</span></p>
<h2 class="c5"><span>Can I follow the course after it finishes?</span></h2>
<ul><li class="c3"><span>Yes, all materials stay online.</span></li></ul>
</body></html>"#;

#[test]
fn exported_document_is_classified_by_heading_level() {
    let paragraphs = parse_html_paragraphs(EXPORTED_FAQ);

    let styles: Vec<ParagraphStyle> = paragraphs.iter().map(|p| p.style).collect();
    assert_eq!(
        styles,
        vec![
            ParagraphStyle::Body,
            ParagraphStyle::SectionHeading,
            ParagraphStyle::QuestionHeading,
            ParagraphStyle::Body,
            ParagraphStyle::Body,
            ParagraphStyle::Body,
            ParagraphStyle::QuestionHeading,
            ParagraphStyle::Body,
        ]
    );
    assert_eq!(paragraphs[1].text, "General course-related questions");
    assert_eq!(paragraphs[5].text, "Register & join the Slack.");
}

#[test]
fn exported_document_structures_into_records() {
    let records = structure_faq(&parse_html_paragraphs(EXPORTED_FAQ));

    assert_eq!(records.len(), 2);
    // The title paragraph precedes the first question and is carried into it.
    assert_eq!(
        records[0].text,
        "LLM Zoomcamp FAQ\nThe next cohort starts in June 2024.\nRegister & join the Slack."
    );
    assert_eq!(records[0].section, "General course-related questions");
    assert_eq!(records[1].question, "Can I follow the course after it finishes?");
    assert_eq!(records[1].text, "Yes, all materials stay online.");
}

#[test]
fn search_body_matches_query_dsl() {
    let query = build_search_query("When is the next cohort?", 5, "llm-zoomcamp");

    assert_eq!(
        render_search_body(&query),
        json!({
            "size": 5,
            "query": {
                "bool": {
                    "must": [{
                        "multi_match": {
                            "query": "When is the next cohort?",
                            "fields": ["question^3", "text", "section"],
                            "type": "best_fields"
                        }
                    }],
                    "filter": [{ "term": { "course": "llm-zoomcamp" } }]
                }
            }
        })
    );
}

#[test]
fn index_body_declares_keyword_fields() {
    let body = render_index_body(&IndexSettings::faq_schema(1, 0));

    assert_eq!(body["settings"]["number_of_shards"], 1);
    assert_eq!(body["settings"]["number_of_replicas"], 0);
    assert_eq!(body["mappings"]["properties"]["text"]["type"], "text");
    assert_eq!(body["mappings"]["properties"]["question"]["type"], "text");
    assert_eq!(body["mappings"]["properties"]["course"]["type"], "keyword");
    assert_eq!(body["mappings"]["properties"]["document_id"]["type"], "keyword");
}

#[test]
fn hits_are_read_from_search_response() {
    let payload = json!({
        "took": 3,
        "hits": {
            "total": { "value": 2 },
            "hits": [
                { "_id": "abc", "_score": 2.5, "_source": { "text": "June.", "document_id": "1a2b3c4d" } },
                { "_id": "def", "_score": 1.0 }
            ]
        }
    });

    let hits = parse_hits(&payload).unwrap();

    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].id, "abc");
    assert_eq!(hits[0].fields["text"], "June.");
    assert!(hits[1].fields.is_empty());
}

#[test]
fn response_without_hits_is_an_error() {
    assert!(parse_hits(&json!({ "error": "boom" })).is_err());
}

#[rstest]
#[case(StatusCode::OK, Ok(()))]
#[case(
    StatusCode::BAD_REQUEST,
    Err(PortError::QueryRejected("parsing_exception".to_string()))
)]
#[case(
    StatusCode::NOT_FOUND,
    Err(PortError::NotFound("Index documents_20240701_090503 not found".to_string()))
)]
#[case(
    StatusCode::INTERNAL_SERVER_ERROR,
    Err(PortError::Unexpected(
        "Search failed with status 500 Internal Server Error: parsing_exception".to_string()
    ))
)]
fn search_status_maps_to_port_error(#[case] status: StatusCode, #[case] expected: PortResult<()>) {
    assert_eq!(
        check_search_status(status, "documents_20240701_090503", "parsing_exception"),
        expected
    );
}
