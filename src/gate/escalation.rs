//! Opt-in upgrade of corpus-only answers to corpus + fallback.
//!
//! A confident top score does not guarantee the corpus says much. When enabled, thin corpus
//! text (or a general-knowledge style question over modest corpus text) escalates
//! `UseCorpusOnly` to `UseBoth`. Other decisions pass through untouched.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::constants::{DEFAULT_GENERAL_QUESTION_CHARS, DEFAULT_MIN_CORPUS_CHARS};

use super::types::{RetrievalResult, RoutingDecision};

/// Lowercase phrases that mark a question as general knowledge.
pub const GENERAL_KNOWLEDGE_INDICATORS: &[&str] = &[
    "what is",
    "who is",
    "define",
    "explain",
    "history of",
    "when was",
    "where is",
    "how does",
    "what are",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscalationConfig {
    pub enabled: bool,
    /// Corpus text shorter than this always escalates.
    pub min_corpus_chars: usize,
    /// General-knowledge questions escalate while corpus text is shorter than this.
    pub general_question_chars: usize,
}

impl Default for EscalationConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            min_corpus_chars: DEFAULT_MIN_CORPUS_CHARS,
            general_question_chars: DEFAULT_GENERAL_QUESTION_CHARS,
        }
    }
}

impl EscalationConfig {
    pub fn enabled() -> Self {
        Self {
            enabled: true,
            ..Self::default()
        }
    }
}

pub fn is_general_knowledge_question(question: &str) -> bool {
    let lowered = question.to_lowercase();
    GENERAL_KNOWLEDGE_INDICATORS
        .iter()
        .any(|indicator| lowered.contains(indicator))
}

pub fn escalate(
    decision: RoutingDecision,
    result: &RetrievalResult,
    question: &str,
    config: &EscalationConfig,
) -> RoutingDecision {
    if !config.enabled || decision != RoutingDecision::UseCorpusOnly {
        return decision;
    }

    let corpus_chars = result.corpus_chars();

    let thin_corpus = corpus_chars < config.min_corpus_chars;
    let general_question = corpus_chars < config.general_question_chars
        && is_general_knowledge_question(question);

    if thin_corpus || general_question {
        debug!(
            corpus_chars,
            thin_corpus, general_question, "Escalating corpus-only decision to fallback"
        );
        RoutingDecision::UseBoth
    } else {
        decision
    }
}
