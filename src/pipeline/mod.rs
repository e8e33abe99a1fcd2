//! Question answering over the corpus with a gated general-knowledge fallback.
//!
//! [`RagPipeline`] owns the I/O around the [`RetrievalGate`]: it embeds and searches,
//! consults the fallback only when the routing decision asks for it, and hands the
//! assembled context to the generator. A failed or timed-out fallback never fails the
//! question; the pipeline degrades to whatever the corpus offered.

pub mod error;

#[cfg(test)]
mod tests;

pub use error::{PipelineError, PipelineResult};

use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use crate::config::{Config, ConfigError};
use crate::constants::{DEFAULT_FALLBACK_TIMEOUT_SECS, DEFAULT_TOP_K};
use crate::embedding::Embedder;
use crate::fallback::{FallbackError, FallbackKnowledgeSource};
use crate::gate::{
    AnswerContext, Candidate, EscalationConfig, GateConfig, RetrievalGate, RetrievalResult,
    RoutingDecision, escalate,
};
use crate::generation::Generator;
use crate::ingest::TextChunker;
use crate::vectordb::{PassagePoint, VectorIndex, WriteConsistency};

/// Outcome of [`RagPipeline::ask`].
#[derive(Debug, Clone, Serialize)]
pub struct Answer {
    pub question: String,
    pub answer: String,
    /// What the gate (plus escalation) asked for.
    pub decision: RoutingDecision,
    /// What was actually assembled, after degrading on a missing fallback.
    pub effective_decision: RoutingDecision,
    pub context: AnswerContext,
    pub candidates: Vec<Candidate>,
}

pub struct RagPipeline<I, E, F, G> {
    index: I,
    embedder: E,
    fallback: F,
    generator: G,
    gate: RetrievalGate,
    escalation: EscalationConfig,
    top_k: u64,
    fallback_timeout: Duration,
    chunker: TextChunker,
}

impl<I, E, F, G> std::fmt::Debug for RagPipeline<I, E, F, G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RagPipeline")
            .field("gate", &self.gate)
            .field("escalation", &self.escalation)
            .field("top_k", &self.top_k)
            .field("fallback_timeout", &self.fallback_timeout)
            .field("chunker", &self.chunker)
            .finish_non_exhaustive()
    }
}

impl<I, E, F, G> RagPipeline<I, E, F, G>
where
    I: VectorIndex,
    E: Embedder,
    F: FallbackKnowledgeSource,
    G: Generator,
{
    pub fn new(index: I, embedder: E, fallback: F, generator: G, gate: RetrievalGate) -> Self {
        Self {
            index,
            embedder,
            fallback,
            generator,
            gate,
            escalation: EscalationConfig::default(),
            top_k: DEFAULT_TOP_K,
            fallback_timeout: Duration::from_secs(DEFAULT_FALLBACK_TIMEOUT_SECS),
            chunker: TextChunker::default(),
        }
    }

    /// Wires the collaborators with every tunable taken from `config`.
    pub fn from_config(
        config: &Config,
        index: I,
        embedder: E,
        fallback: F,
        generator: G,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let gate = RetrievalGate::new(config.gate_config())?;

        Ok(Self::new(index, embedder, fallback, generator, gate)
            .with_top_k(config.top_k)
            .with_escalation(config.escalation_config())
            .with_fallback_timeout(config.fallback_timeout)
            .with_chunker(config.chunker()?))
    }

    pub fn with_top_k(mut self, top_k: u64) -> Self {
        self.top_k = top_k.max(1);
        self
    }

    pub fn with_escalation(mut self, escalation: EscalationConfig) -> Self {
        self.escalation = escalation;
        self
    }

    pub fn with_fallback_timeout(mut self, timeout: Duration) -> Self {
        self.fallback_timeout = timeout;
        self
    }

    pub fn with_chunker(mut self, chunker: TextChunker) -> Self {
        self.chunker = chunker;
        self
    }

    pub fn gate_config(&self) -> &GateConfig {
        self.gate.config()
    }

    pub fn index(&self) -> &I {
        &self.index
    }

    pub fn embedder(&self) -> &E {
        &self.embedder
    }

    pub fn fallback(&self) -> &F {
        &self.fallback
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    /// Creates the passage collection sized for the embedder, if missing.
    pub async fn ensure_collection(&self) -> PipelineResult<()> {
        self.index
            .ensure_collection(self.embedder.embedding_dim() as u64)
            .await?;
        Ok(())
    }

    /// Chunks, embeds and stores `text` under `source_id`; returns the number of chunks stored.
    ///
    /// Re-ingesting a source replaces its previous chunks. Nothing stored is touched until
    /// every chunk has been embedded, so a failed re-ingest leaves the old version in place.
    #[instrument(skip(self, text), fields(source_id = source_id, text_len = text.len()))]
    pub async fn ingest(&self, source_id: &str, text: &str) -> PipelineResult<usize> {
        let source_id = source_id.trim();
        if source_id.is_empty() {
            return Err(PipelineError::Ingest {
                source_id: source_id.to_string(),
                reason: "source id is empty".to_string(),
            });
        }

        let chunks = self.chunker.split(text, source_id);
        if chunks.is_empty() {
            debug!("Nothing to ingest");
            return Ok(0);
        }

        let ingested_at = chrono::Utc::now().timestamp();
        let mut points = Vec::with_capacity(chunks.len());
        for chunk in chunks {
            let vector = self.embedder.embed(&chunk.text)?;
            points.push(
                PassagePoint::new(chunk.source_id, chunk.chunk_index, chunk.text, vector)
                    .with_ingested_at(ingested_at),
            );
        }

        // Point ids are derived from (source, chunk_index): the upsert overwrites chunks in
        // place, then only the tail left over from a longer previous version is dropped.
        let stored = points.len();
        self.ensure_collection().await?;
        self.index
            .upsert_passages(points, WriteConsistency::Strong)
            .await?;
        self.index.delete_stale_chunks(source_id, stored).await?;

        info!(chunks = stored, "Ingested source");
        Ok(stored)
    }

    /// Embeds `question` and returns the top-k corpus candidates, best first.
    pub async fn retrieve(&self, question: &str) -> PipelineResult<RetrievalResult> {
        let vector = self.embedder.embed(question)?;
        let candidates = self.index.search(vector, self.top_k).await?;
        Ok(RetrievalResult::new(question, candidates))
    }

    /// Queries the fallback source, bounded by the configured timeout.
    pub async fn lookup_fallback(&self, question: &str) -> PipelineResult<Vec<String>> {
        match tokio::time::timeout(self.fallback_timeout, self.fallback.lookup(question)).await {
            Ok(result) => Ok(result?),
            Err(_) => Err(FallbackError::Timeout {
                elapsed: self.fallback_timeout,
            }
            .into()),
        }
    }

    #[instrument(skip(self, question), fields(question_len = question.len()))]
    pub async fn ask(&self, question: &str) -> PipelineResult<Answer> {
        let question = question.trim();
        if question.is_empty() {
            return Err(PipelineError::EmptyQuestion);
        }

        let result = self.retrieve(question).await?;

        let decision = escalate(
            self.gate.decide(&result),
            &result,
            question,
            &self.escalation,
        );
        debug!(
            candidates = result.len(),
            top_score = result.top_score(),
            %decision,
            "Routing decision"
        );

        let (effective_decision, passages) = if decision.uses_fallback() {
            match self.lookup_fallback(question).await {
                Ok(passages) if !passages.is_empty() => (decision, passages),
                Ok(_) => {
                    debug!(%decision, "Fallback returned no passages");
                    (decision.without_fallback(), Vec::new())
                }
                Err(e) => {
                    warn!(error = %e, %decision, "Fallback lookup failed, continuing without it");
                    (decision.without_fallback(), Vec::new())
                }
            }
        } else {
            (decision, Vec::new())
        };

        let context = self.gate.assemble(&result, &passages, effective_decision);
        let answer = self.generator.generate(question, &context).await?;

        info!(
            %decision,
            %effective_decision,
            passages = context.len(),
            "Answered question"
        );

        Ok(Answer {
            question: question.to_string(),
            answer,
            decision,
            effective_decision,
            context,
            candidates: result.candidates,
        })
    }
}
