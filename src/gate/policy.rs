use tracing::debug;

use super::config::GateConfig;
use super::error::GateError;
use super::types::{AnswerContext, Provenance, RetrievalResult, RoutingDecision};

/// Classifies retrieval quality.
///
/// Total over any `RetrievalResult`: an empty candidate list means `UseFallbackOnly`, a top
/// score below `score_threshold` means `UseBoth`, and a confident top score backed by at
/// least `min_candidates` candidates means `UseCorpusOnly`. A confident top score with too
/// few candidates is treated like a weak retrieval (`UseBoth`).
pub fn decide(result: &RetrievalResult, config: &GateConfig) -> RoutingDecision {
    let Some(top_score) = result.top_score() else {
        return RoutingDecision::UseFallbackOnly;
    };

    // NaN fails this comparison and lands on UseBoth.
    let confident = top_score >= config.score_threshold;

    if confident && result.len() >= config.min_candidates {
        RoutingDecision::UseCorpusOnly
    } else {
        RoutingDecision::UseBoth
    }
}

/// Builds the generator context for `decision`.
///
/// Corpus candidates come first in score order, then fallback passages in supplied order;
/// the combined list is cut to `max_context_chunks`. Since truncation keeps a prefix, the
/// best corpus candidate survives whenever the corpus is used and the budget is non-zero.
pub fn assemble(
    result: &RetrievalResult,
    fallback_passages: &[String],
    decision: RoutingDecision,
    config: &GateConfig,
) -> AnswerContext {
    let limit = config.max_context_chunks;

    let corpus: &[_] = if decision.uses_corpus() {
        &result.candidates
    } else {
        &[]
    };
    let fallback: &[String] = if decision.uses_fallback() {
        fallback_passages
    } else {
        &[]
    };

    let corpus_taken = corpus.len().min(limit);
    let fallback_taken = fallback.len().min(limit - corpus_taken);

    let mut context = AnswerContext::with_capacity(corpus_taken + fallback_taken);

    for candidate in &corpus[..corpus_taken] {
        context.push(
            candidate.text.clone(),
            Provenance::corpus(candidate.source_id.clone()),
        );
    }

    for (index, passage) in fallback[..fallback_taken].iter().enumerate() {
        context.push(passage.clone(), Provenance::external(index + 1));
    }

    debug!(
        decision = %decision,
        corpus_available = corpus.len(),
        fallback_available = fallback.len(),
        corpus_taken,
        fallback_taken,
        limit,
        "Assembled answer context"
    );

    context
}

/// Stateless gate bound to a validated [`GateConfig`].
///
/// Holds no per-question state, so one instance can be shared across tasks freely.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetrievalGate {
    config: GateConfig,
}

impl Default for RetrievalGate {
    fn default() -> Self {
        Self {
            config: GateConfig::default(),
        }
    }
}

impl RetrievalGate {
    pub fn new(config: GateConfig) -> Result<Self, GateError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    pub fn decide(&self, result: &RetrievalResult) -> RoutingDecision {
        decide(result, &self.config)
    }

    pub fn assemble(
        &self,
        result: &RetrievalResult,
        fallback_passages: &[String],
        decision: RoutingDecision,
    ) -> AnswerContext {
        assemble(result, fallback_passages, decision, &self.config)
    }
}
