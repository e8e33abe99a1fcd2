use std::time::Duration;

use super::*;
use crate::embedding::{EmbeddingError, SentenceEmbedder};
use crate::fallback::MockFallbackSource;
use crate::gate::SourceOrigin;
use crate::generation::MockGenerator;
use crate::vectordb::MockVectorIndex;

const RUST_DOC: &str = "Rust ownership rules are enforced by the borrow checker at compile time";
const WIKI: &str = "Page: Paris\nSummary: Paris is the capital of France.";

type TestPipeline = RagPipeline<MockVectorIndex, SentenceEmbedder, MockFallbackSource, MockGenerator>;

fn pipeline_with(fallback: MockFallbackSource) -> TestPipeline {
    RagPipeline::new(
        MockVectorIndex::new(),
        SentenceEmbedder::stub(384),
        fallback,
        MockGenerator::new(),
        RetrievalGate::default(),
    )
}

async fn seeded(fallback: MockFallbackSource) -> TestPipeline {
    let pipeline = pipeline_with(fallback);
    pipeline.ingest("rust.md", RUST_DOC).await.unwrap();
    pipeline
}

#[tokio::test]
async fn test_ask_rejects_blank_question() {
    let pipeline = seeded(MockFallbackSource::empty()).await;

    for question in ["", "   ", "\n\t"] {
        let err = pipeline.ask(question).await.unwrap_err();
        assert!(matches!(err, PipelineError::EmptyQuestion));
    }
    assert_eq!(pipeline.fallback().calls(), 0);
}

#[tokio::test]
async fn test_confident_corpus_skips_fallback() {
    let pipeline = seeded(MockFallbackSource::with_passages([WIKI])).await;

    let answer = pipeline.ask(RUST_DOC).await.unwrap();

    assert_eq!(answer.decision, RoutingDecision::UseCorpusOnly);
    assert_eq!(answer.effective_decision, RoutingDecision::UseCorpusOnly);
    assert_eq!(answer.context.count_from(SourceOrigin::External), 0);
    assert_eq!(answer.context.passages[0], RUST_DOC);
    assert_eq!(answer.context.provenance[0].source_id, "rust.md");
    assert_eq!(pipeline.fallback().calls(), 0);
}

#[tokio::test]
async fn test_empty_corpus_uses_fallback_only() {
    let pipeline = pipeline_with(MockFallbackSource::with_passages([WIKI]));
    pipeline.ensure_collection().await.unwrap();

    let answer = pipeline.ask("What is the capital of France?").await.unwrap();

    assert_eq!(answer.decision, RoutingDecision::UseFallbackOnly);
    assert_eq!(answer.effective_decision, RoutingDecision::UseFallbackOnly);
    assert!(answer.candidates.is_empty());
    assert_eq!(answer.context.passages, vec![WIKI.to_string()]);
    assert_eq!(answer.context.provenance[0].source_id, "external#1");
    assert_eq!(pipeline.fallback().calls(), 1);
}

#[tokio::test]
async fn test_weak_corpus_uses_both() {
    let pipeline = seeded(MockFallbackSource::with_passages([WIKI])).await;

    let answer = pipeline.ask("capital of France").await.unwrap();

    assert_eq!(answer.decision, RoutingDecision::UseBoth);
    assert_eq!(answer.effective_decision, RoutingDecision::UseBoth);
    assert_eq!(answer.context.count_from(SourceOrigin::Corpus), 1);
    assert_eq!(answer.context.count_from(SourceOrigin::External), 1);
    assert_eq!(answer.context.provenance[0].origin, SourceOrigin::Corpus);
    assert_eq!(answer.context.provenance[1].origin, SourceOrigin::External);
}

#[tokio::test]
async fn test_failed_fallback_degrades_to_corpus_only() {
    let pipeline = seeded(MockFallbackSource::failing()).await;

    let answer = pipeline.ask("capital of France").await.unwrap();

    assert_eq!(answer.decision, RoutingDecision::UseBoth);
    assert_eq!(answer.effective_decision, RoutingDecision::UseCorpusOnly);
    assert_eq!(answer.context.len(), 1);
    assert_eq!(answer.context.count_from(SourceOrigin::External), 0);
}

#[tokio::test]
async fn test_empty_fallback_degrades_to_corpus_only() {
    let pipeline = seeded(MockFallbackSource::empty()).await;

    let answer = pipeline.ask("capital of France").await.unwrap();

    assert_eq!(answer.decision, RoutingDecision::UseBoth);
    assert_eq!(answer.effective_decision, RoutingDecision::UseCorpusOnly);
}

#[tokio::test]
async fn test_failed_fallback_with_empty_corpus_yields_empty_context() {
    let pipeline = pipeline_with(MockFallbackSource::failing());
    pipeline.ensure_collection().await.unwrap();

    let answer = pipeline.ask("What is the capital of France?").await.unwrap();

    assert_eq!(answer.effective_decision, RoutingDecision::UseFallbackOnly);
    assert!(answer.context.is_empty());
    assert!(
        pipeline
            .generator()
            .last_prompt()
            .unwrap()
            .contains("No relevant information found.")
    );
}

#[tokio::test]
async fn test_fallback_timeout_degrades() {
    let pipeline = seeded(
        MockFallbackSource::with_passages([WIKI]).with_delay(Duration::from_millis(500)),
    )
    .await
    .with_fallback_timeout(Duration::from_millis(20));

    let err = pipeline.lookup_fallback("capital of France").await.unwrap_err();
    assert!(matches!(
        err,
        PipelineError::FallbackLookupFailed(FallbackError::Timeout { .. })
    ));

    let answer = pipeline.ask("capital of France").await.unwrap();
    assert_eq!(answer.effective_decision, RoutingDecision::UseCorpusOnly);
}

#[tokio::test]
async fn test_escalation_upgrades_thin_corpus() {
    let pipeline = seeded(MockFallbackSource::with_passages([WIKI]))
        .await
        .with_escalation(EscalationConfig::enabled());

    let answer = pipeline.ask(RUST_DOC).await.unwrap();

    assert_eq!(answer.decision, RoutingDecision::UseBoth);
    assert_eq!(answer.context.count_from(SourceOrigin::External), 1);
    assert_eq!(pipeline.fallback().calls(), 1);
}

#[tokio::test]
async fn test_missing_collection_is_index_unavailable() {
    let pipeline = pipeline_with(MockFallbackSource::with_passages([WIKI]));

    let err = pipeline.ask("anything").await.unwrap_err();
    assert!(matches!(err, PipelineError::IndexUnavailable(_)));
}

#[tokio::test]
async fn test_search_failure_is_index_unavailable() {
    let pipeline = seeded(MockFallbackSource::with_passages([WIKI])).await;
    pipeline.index().set_fail_searches(true);

    let err = pipeline.ask(RUST_DOC).await.unwrap_err();
    assert!(matches!(err, PipelineError::IndexUnavailable(_)));
    assert_eq!(pipeline.fallback().calls(), 0);
}

#[tokio::test]
async fn test_generation_failure_propagates() {
    let pipeline = RagPipeline::new(
        MockVectorIndex::new(),
        SentenceEmbedder::stub(384),
        MockFallbackSource::empty(),
        MockGenerator::failing(),
        RetrievalGate::default(),
    );
    pipeline.ingest("rust.md", RUST_DOC).await.unwrap();

    let err = pipeline.ask(RUST_DOC).await.unwrap_err();
    assert!(matches!(err, PipelineError::GenerationFailed(_)));
}

#[tokio::test]
async fn test_context_respects_budget() {
    let gate = RetrievalGate::new(GateConfig::default().with_max_context_chunks(2)).unwrap();
    let pipeline = RagPipeline::new(
        MockVectorIndex::new(),
        SentenceEmbedder::stub(384),
        MockFallbackSource::with_passages([WIKI, WIKI, WIKI]),
        MockGenerator::new(),
        gate,
    )
    .with_chunker(TextChunker::new(16, 0).unwrap());

    let stored = pipeline.ingest("rust.md", RUST_DOC).await.unwrap();
    assert!(stored > 2);

    let answer = pipeline.ask("capital of France").await.unwrap();
    assert!(answer.context.len() <= 2);
}

#[tokio::test]
async fn test_ingest_counts_and_replaces_chunks() {
    let pipeline = pipeline_with(MockFallbackSource::empty())
        .with_chunker(TextChunker::new(20, 5).unwrap());

    let first = pipeline.ingest("rust.md", RUST_DOC).await.unwrap();
    assert!(first > 1);
    assert_eq!(pipeline.index().point_count(), first);

    let second = pipeline.ingest("rust.md", "short replacement").await.unwrap();
    assert_eq!(second, 1);
    assert_eq!(pipeline.index().point_count(), 1);

    pipeline.ingest("other.md", "another source").await.unwrap();
    assert_eq!(
        pipeline.index().sources(),
        vec!["rust.md".to_string(), "other.md".to_string()]
    );
}

/// Stub embedder that fails on `FAIL` chunks and returns an oversized vector for `WIDE` ones.
struct FlakyEmbedder(SentenceEmbedder);

impl Embedder for FlakyEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        if text.contains("FAIL") {
            return Err(EmbeddingError::InferenceFailed {
                reason: "injected failure".to_string(),
            });
        }
        let mut vector = self.0.embed(text)?;
        if text.contains("WIDE") {
            vector.push(0.0);
        }
        Ok(vector)
    }

    fn embedding_dim(&self) -> usize {
        self.0.embedding_dim()
    }
}

fn flaky_pipeline() -> RagPipeline<MockVectorIndex, FlakyEmbedder, MockFallbackSource, MockGenerator>
{
    RagPipeline::new(
        MockVectorIndex::new(),
        FlakyEmbedder(SentenceEmbedder::stub(384)),
        MockFallbackSource::empty(),
        MockGenerator::new(),
        RetrievalGate::default(),
    )
    .with_chunker(TextChunker::new(20, 0).unwrap())
}

#[tokio::test]
async fn test_failed_reingest_keeps_previous_chunks() {
    let pipeline = flaky_pipeline();
    let stored = pipeline.ingest("rust.md", RUST_DOC).await.unwrap();
    assert_eq!(pipeline.index().point_count(), stored);

    // Second chunk fails to embed.
    let replacement = "first chunk is fine and then FAIL appears here";
    let err = pipeline.ingest("rust.md", replacement).await.unwrap_err();
    assert!(matches!(err, PipelineError::EmbeddingService(_)));

    assert_eq!(pipeline.index().point_count(), stored);
    let answer = pipeline.ask(RUST_DOC).await.unwrap();
    assert!(answer.context.passages.iter().all(|p| RUST_DOC.contains(p.as_str())));
}

#[tokio::test]
async fn test_rejected_upsert_keeps_previous_chunks() {
    let pipeline = flaky_pipeline();
    let stored = pipeline.ingest("rust.md", RUST_DOC).await.unwrap();

    let err = pipeline
        .ingest("rust.md", "short WIDE replacement")
        .await
        .unwrap_err();
    assert!(matches!(err, PipelineError::IndexUnavailable(_)));
    assert_eq!(pipeline.index().point_count(), stored);
}

#[tokio::test]
async fn test_reingest_drops_only_leftover_tail() {
    let pipeline = flaky_pipeline();
    let first = pipeline.ingest("rust.md", RUST_DOC).await.unwrap();
    pipeline.ingest("other.md", "another source").await.unwrap();
    assert!(first > 2);

    let second = pipeline
        .ingest("rust.md", "shorter rust text that spans two")
        .await
        .unwrap();
    assert_eq!(second, 2);
    assert_eq!(pipeline.index().point_count(), second + 1);
}

#[tokio::test]
async fn test_ingest_edge_cases() {
    let pipeline = pipeline_with(MockFallbackSource::empty());

    assert_eq!(pipeline.ingest("empty.md", "   ").await.unwrap(), 0);
    assert!(!pipeline.index().has_collection());

    let err = pipeline.ingest("  ", RUST_DOC).await.unwrap_err();
    assert!(matches!(err, PipelineError::Ingest { .. }));
}

#[tokio::test]
async fn test_answer_serializes_decisions() {
    let pipeline = seeded(MockFallbackSource::failing()).await;

    let answer = pipeline.ask("capital of France").await.unwrap();
    let json = serde_json::to_value(&answer).unwrap();

    assert_eq!(json["decision"], "use_both");
    assert_eq!(json["effective_decision"], "use_corpus_only");
    assert_eq!(json["question"], "capital of France");
    assert!(json["answer"].as_str().unwrap().starts_with("[mock]"));
}

#[test]
fn test_from_config_rejects_invalid_config() {
    let config = Config {
        max_context_chunks: 0,
        ..Default::default()
    };

    let result = RagPipeline::from_config(
        &config,
        MockVectorIndex::new(),
        SentenceEmbedder::stub(384),
        MockFallbackSource::empty(),
        MockGenerator::new(),
    );
    assert!(matches!(result, Err(ConfigError::Gate(_))));
}
