//! services/api/src/adapters/google_docs.rs
//!
//! This module contains the document source adapter for FAQ documents kept in
//! Google Docs. It implements the `DocumentSource` port from the `core` crate
//! by downloading the HTML export of a document and classifying its blocks.

use async_trait::async_trait;
use faq_retrieval_core::domain::{ParagraphStyle, StyledParagraph};
use faq_retrieval_core::ports::{DocumentSource, PortError, PortResult};
use html5ever::tendril::TendrilSink;
use html5ever::{parse_document, ParseOpts};
use markup5ever_rcdom::{Handle, NodeData, RcDom};
use reqwest::StatusCode;
use tracing::info;

const GOOGLE_DOCS_BASE_URL: &str = "https://docs.google.com";

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A document source that reads FAQ documents from the Google Docs export endpoint.
#[derive(Clone)]
pub struct GoogleDocsSource {
    client: reqwest::Client,
    base_url: String,
}

impl GoogleDocsSource {
    /// Creates a new `GoogleDocsSource` against the public Google Docs host.
    pub fn new(client: reqwest::Client) -> Self {
        Self::with_base_url(client, GOOGLE_DOCS_BASE_URL)
    }

    /// Creates a source against another host serving the same export path.
    pub fn with_base_url(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn export_url(&self, file_id: &str) -> String {
        format!("{}/document/d/{}/export?format=html", self.base_url, file_id)
    }
}

//=========================================================================================
// `DocumentSource` Trait Implementation
//=========================================================================================

#[async_trait]
impl DocumentSource for GoogleDocsSource {
    async fn fetch_paragraphs(&self, source_id: &str) -> PortResult<Vec<StyledParagraph>> {
        let url = self.export_url(source_id);
        info!(%url, "Fetching FAQ document");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(PortError::NotFound(format!("Document {} not found", source_id)));
        }
        if !status.is_success() {
            return Err(PortError::Unexpected(format!(
                "Fetching document {} failed with status {}",
                source_id, status
            )));
        }

        let html = response
            .text()
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        Ok(parse_html_paragraphs(&html))
    }
}

//=========================================================================================
// HTML Export Parsing
//=========================================================================================

/// The paragraph style of a block element, or `None` for any other element.
fn block_style(tag: &str) -> Option<ParagraphStyle> {
    match tag {
        "h1" => Some(ParagraphStyle::SectionHeading),
        "h2" => Some(ParagraphStyle::QuestionHeading),
        "h3" | "h4" | "h5" | "h6" | "p" | "li" => Some(ParagraphStyle::Body),
        _ => None,
    }
}

fn element_name(node: &Handle) -> Option<&str> {
    match &node.data {
        NodeData::Element { name, .. } => Some(&*name.local),
        _ => None,
    }
}

/// Appends the text under `node`. Source whitespace becomes plain spaces and
/// `<br>` becomes a newline.
fn collect_text(node: &Handle, out: &mut String) {
    match &node.data {
        NodeData::Text { contents } => {
            let contents = contents.borrow();
            out.extend(contents.chars().map(|c| if c.is_whitespace() { ' ' } else { c }));
        }
        NodeData::Element { name, .. } if &*name.local == "br" => out.push('\n'),
        _ => {
            for child in node.children.borrow().iter() {
                collect_text(child, out);
            }
        }
    }
}

/// Collapses runs of spaces on every line and trims the line ends.
fn collapse_whitespace(raw: &str) -> String {
    raw.split('\n')
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .collect::<Vec<_>>()
        .join("\n")
}

fn walk(node: &Handle, paragraphs: &mut Vec<StyledParagraph>) {
    if let Some(style) = element_name(node).and_then(block_style) {
        let mut raw = String::new();
        collect_text(node, &mut raw);
        paragraphs.push(StyledParagraph::new(style, collapse_whitespace(&raw)));
        return;
    }
    for child in node.children.borrow().iter() {
        walk(child, paragraphs);
    }
}

/// Splits an exported document into paragraphs, in document order.
///
/// `<h1>` blocks are section headings and `<h2>` blocks are question headings.
/// Every other paragraph, list item or lower heading is body text. Entities
/// are decoded by the HTML parser.
pub fn parse_html_paragraphs(html: &str) -> Vec<StyledParagraph> {
    let dom = parse_document(RcDom::default(), ParseOpts::default()).one(html);
    let mut paragraphs = Vec::new();
    walk(&dom.document, &mut paragraphs);
    paragraphs
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn body_text(html: &str) -> String {
        let paragraphs = parse_html_paragraphs(html);
        assert_eq!(paragraphs.len(), 1, "{paragraphs:?}");
        paragraphs[0].text.clone()
    }

    #[rstest]
    #[case("<p>plain</p>", "plain")]
    #[case("<p><span class=\"c1\">It&#39;s free.</span></p>", "It's free.")]
    #[case("<p>Tom &amp; Jerry &lt;3</p>", "Tom & Jerry <3")]
    #[case("<p>line one<br>line two</p>", "line one\nline two")]
    #[case("<p>&#x263A; smile</p>", "\u{263A} smile")]
    #[case(
        "<p><span>It&rsquo;s in June &mdash; see &ldquo;Slack&rdquo;&hellip;</span></p>",
        "It\u{2019}s in June \u{2014} see \u{201C}Slack\u{201D}\u{2026}"
    )]
    #[case("<p>a long line\n  wrapped by the exporter</p>", "a long line wrapped by the exporter")]
    #[case("<p>  <span>split</span> <span>spans</span>  </p>", "split spans")]
    fn block_text_is_decoded_and_collapsed(#[case] html: &str, #[case] expected: &str) {
        assert_eq!(body_text(html), expected);
    }

    #[test]
    fn named_entities_in_headings_are_decoded() {
        let paragraphs =
            parse_html_paragraphs("<h1>General</h1><h2>When&rsquo;s the next cohort?</h2>");

        assert_eq!(
            paragraphs,
            vec![
                StyledParagraph::section("General"),
                StyledParagraph::question("When\u{2019}s the next cohort?"),
            ]
        );
    }

    #[test]
    fn head_content_is_not_a_paragraph() {
        let html = "<html><head><title>FAQ</title><style>p{margin:0}</style></head>\
                    <body><div><h3>Details</h3></div></body></html>";

        assert_eq!(parse_html_paragraphs(html), vec![StyledParagraph::body("Details")]);
    }

    #[test]
    fn export_url_uses_html_format() {
        let source = GoogleDocsSource::with_base_url(reqwest::Client::new(), "http://docs.local/");
        assert_eq!(
            source.export_url("abc123"),
            "http://docs.local/document/d/abc123/export?format=html"
        );
    }
}
