use std::fmt::Write;

use crate::gate::{AnswerContext, SourceOrigin};

pub const SYSTEM_PROMPT: &str = "You are a helpful retrieval-augmented assistant. \
Prefer the user's documents; use Wikipedia for general knowledge. \
Reply with only the final, useful answer.";

/// Rendered in place of sources when the context is empty.
pub const NO_CONTEXT: &str = "No relevant information found.";

/// Returned when the model produces no text.
pub const NO_ANSWER: &str = "Could not generate answer.";

/// Renders the user turn: grouped sources followed by the question.
///
/// Corpus passages are numbered `[i] <source_id>` in assembly order; external passages
/// already carry their own `Page:` header.
pub fn render_prompt(question: &str, context: &AnswerContext) -> String {
    let mut corpus = String::new();
    let mut external = String::new();
    let mut corpus_index = 0;

    for (passage, provenance) in context.iter() {
        match provenance.origin {
            SourceOrigin::Corpus => {
                corpus_index += 1;
                if !corpus.is_empty() {
                    corpus.push_str("\n\n");
                }
                let _ = write!(corpus, "[{corpus_index}] {}\n{passage}", provenance.source_id);
            }
            SourceOrigin::External => {
                if !external.is_empty() {
                    external.push_str("\n\n");
                }
                external.push_str(passage);
            }
        }
    }

    let mut sections = Vec::with_capacity(2);
    if !corpus.is_empty() {
        sections.push(format!("Document corpus results:\n{corpus}"));
    }
    if !external.is_empty() {
        sections.push(format!("Wikipedia results:\n{external}"));
    }

    let information = if sections.is_empty() {
        NO_CONTEXT.to_string()
    } else {
        sections.join("\n\n")
    };

    format!(
        "Available information:\n{information}\n\nQuestion: {question}\n\n\
         Provide a comprehensive answer based on the available information:"
    )
}
