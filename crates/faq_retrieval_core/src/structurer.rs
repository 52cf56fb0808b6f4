//! crates/faq_retrieval_core/src/structurer.rs
//!
//! Groups a stream of styled paragraphs into question/answer records.
//!
//! The structurer keeps the most recent section heading, the most recent
//! question heading and the body text collected since the last emitted record.
//! A record is closed when the next question heading arrives or when the
//! stream ends, and only if all three pieces are non-empty.

use crate::domain::{FaqRecord, ParagraphStyle, StyledParagraph};
use crate::normalize::clean_line;

/// Incremental FAQ builder. Feed paragraphs in document order with
/// [`FaqStructurer::push`], then call [`FaqStructurer::finish`].
#[derive(Debug, Default)]
pub struct FaqStructurer {
    section: String,
    question: String,
    body: String,
    records: Vec<FaqRecord>,
}

impl FaqStructurer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, paragraph: &StyledParagraph) {
        let text = clean_line(&paragraph.text);
        if text.is_empty() {
            return;
        }

        match paragraph.style {
            ParagraphStyle::SectionHeading => {
                self.section = text.to_string();
            }
            ParagraphStyle::QuestionHeading => {
                self.close_record();
                self.question = text.to_string();
            }
            ParagraphStyle::Body => {
                self.body.push('\n');
                self.body.push_str(text);
            }
        }
    }

    /// Flushes the last open question and returns every record in order.
    pub fn finish(mut self) -> Vec<FaqRecord> {
        self.close_record();
        self.records
    }

    // Body text survives when no record is emitted. Lines seen before the
    // first question therefore end up in that question's answer.
    fn close_record(&mut self) {
        let trimmed = self.body.trim();
        if trimmed.len() != self.body.len() {
            self.body = trimmed.to_string();
        }

        if self.body.is_empty() || self.section.is_empty() || self.question.is_empty() {
            return;
        }

        self.records.push(FaqRecord {
            text: std::mem::take(&mut self.body),
            section: self.section.clone(),
            question: self.question.clone(),
        });
    }
}

/// Structures a complete paragraph stream in one call.
pub fn structure_faq<'a, I>(paragraphs: I) -> Vec<FaqRecord>
where
    I: IntoIterator<Item = &'a StyledParagraph>,
{
    let mut structurer = FaqStructurer::new();
    for paragraph in paragraphs {
        structurer.push(paragraph);
    }
    structurer.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn record(text: &str, section: &str, question: &str) -> FaqRecord {
        FaqRecord {
            text: text.to_string(),
            section: section.to_string(),
            question: question.to_string(),
        }
    }

    #[test]
    fn groups_body_lines_under_question() {
        let paragraphs = vec![
            StyledParagraph::section("Billing"),
            StyledParagraph::question("How do I pay?"),
            StyledParagraph::body("Use the portal."),
            StyledParagraph::body("It's free."),
        ];

        let records = structure_faq(&paragraphs);

        assert_eq!(
            records,
            vec![record("Use the portal.\nIt's free.", "Billing", "How do I pay?")]
        );
    }

    #[test]
    fn last_question_is_flushed_at_end_of_stream() {
        let paragraphs = vec![
            StyledParagraph::section("General"),
            StyledParagraph::question("Q1"),
            StyledParagraph::body("A1"),
            StyledParagraph::section("Setup"),
            StyledParagraph::question("Q2"),
            StyledParagraph::body("A2"),
        ];

        let records = structure_faq(&paragraphs);

        // Q1 closes when Q2 arrives, after the section already changed.
        assert_eq!(
            records,
            vec![record("A1", "Setup", "Q1"), record("A2", "Setup", "Q2")]
        );
    }

    #[test]
    fn question_without_body_is_dropped() {
        let paragraphs = vec![
            StyledParagraph::section("General"),
            StyledParagraph::question("Empty question"),
            StyledParagraph::question("Q2"),
            StyledParagraph::body("A2"),
            StyledParagraph::question("Trailing question"),
        ];

        let records = structure_faq(&paragraphs);

        assert_eq!(records, vec![record("A2", "General", "Q2")]);
    }

    #[test]
    fn question_without_section_is_dropped() {
        let paragraphs = vec![
            StyledParagraph::question("Orphan"),
            StyledParagraph::body("No section yet"),
        ];

        assert!(structure_faq(&paragraphs).is_empty());
    }

    #[test]
    fn latest_of_consecutive_sections_wins() {
        let paragraphs = vec![
            StyledParagraph::section("First"),
            StyledParagraph::section("Second"),
            StyledParagraph::question("Q"),
            StyledParagraph::body("A"),
        ];

        assert_eq!(structure_faq(&paragraphs), vec![record("A", "Second", "Q")]);
    }

    #[test]
    fn body_before_first_question_is_carried_into_it() {
        let paragraphs = vec![
            StyledParagraph::section("Intro"),
            StyledParagraph::body("Welcome to the FAQ."),
            StyledParagraph::question("Q"),
            StyledParagraph::body("A"),
        ];

        assert_eq!(
            structure_faq(&paragraphs),
            vec![record("Welcome to the FAQ.\nA", "Intro", "Q")]
        );
    }

    #[test]
    fn blank_and_bom_only_paragraphs_are_skipped() {
        let paragraphs = vec![
            StyledParagraph::section("\u{FEFF}Billing "),
            StyledParagraph::question("  "),
            StyledParagraph::question("How do I pay?"),
            StyledParagraph::body("\u{FEFF}"),
            StyledParagraph::body("  Use the portal.  "),
            StyledParagraph::body(""),
        ];

        assert_eq!(
            structure_faq(&paragraphs),
            vec![record("Use the portal.", "Billing", "How do I pay?")]
        );
    }

    #[test]
    fn empty_stream_yields_nothing() {
        assert!(structure_faq(&Vec::<StyledParagraph>::new()).is_empty());
    }

    fn paragraph_strategy() -> impl Strategy<Value = StyledParagraph> {
        prop_oneof![
            "[A-Z][a-z]{0,8}".prop_map(StyledParagraph::section),
            "[A-Z][a-z ]{0,12}\\?".prop_map(StyledParagraph::question),
            "[a-z][a-z .]{0,20}".prop_map(StyledParagraph::body),
        ]
    }

    fn answered_questions(paragraphs: &[StyledParagraph]) -> usize {
        let mut count = 0;
        let mut open = false;
        let mut answered = false;
        for paragraph in paragraphs {
            match paragraph.style {
                ParagraphStyle::QuestionHeading => {
                    if open && answered {
                        count += 1;
                    }
                    open = true;
                    answered = false;
                }
                ParagraphStyle::Body => answered = true,
                ParagraphStyle::SectionHeading => {}
            }
        }
        if open && answered {
            count += 1;
        }
        count
    }

    proptest! {
        #[test]
        fn one_record_per_answered_question(
            section in "[A-Z][a-z]{0,8}",
            question in "[A-Z][a-z ]{0,12}\\?",
            rest in prop::collection::vec(paragraph_strategy(), 0..40),
        ) {
            let mut paragraphs = vec![
                StyledParagraph::section(section),
                StyledParagraph::question(question),
            ];
            paragraphs.extend(rest);

            let records = structure_faq(&paragraphs);

            prop_assert_eq!(records.len(), answered_questions(&paragraphs));
            for record in &records {
                prop_assert!(!record.text.is_empty());
                prop_assert!(!record.section.is_empty());
                prop_assert!(!record.question.is_empty());
            }
        }
    }
}
