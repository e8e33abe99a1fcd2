//! End-to-end pipeline tests over the in-memory collaborators.

mod common;

use common::{HANDBOOK, LAB_NOTES, PARIS_WIKI, mock_pipeline, seeded_pipeline};
use ragate::{
    Config, GateConfig, MockFallbackSource, MockGenerator, MockVectorIndex, RagPipeline,
    RetrievalResult, RoutingDecision, SentenceEmbedder, SourceOrigin, TextChunker, assemble,
    decide,
};

#[tokio::test]
async fn test_corpus_question_answers_from_documents() {
    let pipeline = seeded_pipeline(MockFallbackSource::with_passages([PARIS_WIKI])).await;

    let answer = pipeline.ask(LAB_NOTES).await.expect("ask");

    assert_eq!(answer.decision, RoutingDecision::UseCorpusOnly);
    assert_eq!(answer.context.provenance[0].source_id, "lab-notes.txt");
    assert_eq!(answer.context.count_from(SourceOrigin::External), 0);
    assert_eq!(pipeline.fallback().calls(), 0);

    let prompt = pipeline.generator().last_prompt().expect("prompt rendered");
    assert!(prompt.contains("Document corpus results:"));
    assert!(prompt.contains("[1] lab-notes.txt"));
    assert!(!prompt.contains("Wikipedia results:"));
}

#[tokio::test]
async fn test_unrelated_question_blends_in_fallback() {
    let pipeline = seeded_pipeline(MockFallbackSource::with_passages([PARIS_WIKI])).await;

    let answer = pipeline
        .ask("What is the capital of France?")
        .await
        .expect("ask");

    assert_eq!(answer.decision, RoutingDecision::UseBoth);
    assert_eq!(answer.candidates.len(), 2);
    assert_eq!(answer.context.len(), 3);
    assert_eq!(answer.context.passages.last().map(String::as_str), Some(PARIS_WIKI));
    assert_eq!(answer.context.provenance[2].source_id, "external#1");

    let prompt = pipeline.generator().last_prompt().expect("prompt rendered");
    assert!(prompt.contains("Wikipedia results:\nPage: Paris"));
}

#[tokio::test]
async fn test_empty_corpus_routes_to_fallback_only() {
    let pipeline = mock_pipeline(MockFallbackSource::with_passages([PARIS_WIKI]));
    pipeline.ensure_collection().await.expect("collection");

    let answer = pipeline
        .ask("What is the capital of France?")
        .await
        .expect("ask");

    assert_eq!(answer.decision, RoutingDecision::UseFallbackOnly);
    assert_eq!(answer.context.count_from(SourceOrigin::Corpus), 0);
    assert_eq!(answer.context.passages, vec![PARIS_WIKI.to_string()]);
}

#[tokio::test]
async fn test_fallback_outage_keeps_corpus_answer() {
    let pipeline = seeded_pipeline(MockFallbackSource::failing()).await;

    let answer = pipeline
        .ask("What is the capital of France?")
        .await
        .expect("ask degrades instead of failing");

    assert_eq!(answer.decision, RoutingDecision::UseBoth);
    assert_eq!(answer.effective_decision, RoutingDecision::UseCorpusOnly);
    assert_eq!(answer.context.count_from(SourceOrigin::Corpus), 2);
    assert_eq!(answer.context.count_from(SourceOrigin::External), 0);
}

#[tokio::test]
async fn test_repeated_questions_hit_embedding_cache() {
    let pipeline = seeded_pipeline(MockFallbackSource::empty()).await;
    let before = pipeline.embedder().entry_count();

    pipeline.ask(HANDBOOK).await.expect("ask");
    pipeline.ask(HANDBOOK).await.expect("ask again");

    assert!(pipeline.embedder().contains(HANDBOOK));
    assert!(pipeline.embedder().entry_count() <= before + 1);
}

#[tokio::test]
async fn test_pipeline_from_config() {
    let config = Config {
        max_context_chunks: 1,
        chunk_size: 40,
        chunk_overlap: 10,
        ..Default::default()
    };

    let pipeline = RagPipeline::from_config(
        &config,
        MockVectorIndex::new(),
        SentenceEmbedder::stub(128),
        MockFallbackSource::with_passages([PARIS_WIKI]),
        MockGenerator::new(),
    )
    .expect("valid config");

    let stored = pipeline.ingest("handbook.txt", HANDBOOK).await.expect("ingest");
    let expected = TextChunker::new(40, 10)
        .expect("chunker")
        .split(HANDBOOK, "handbook.txt")
        .len();
    assert_eq!(stored, expected);

    let answer = pipeline
        .ask("What is the capital of France?")
        .await
        .expect("ask");
    assert_eq!(answer.context.len(), 1);
    assert_eq!(answer.context.provenance[0].origin, SourceOrigin::Corpus);
}

#[test]
fn test_gate_scenarios_through_public_api() {
    let config = GateConfig::default();
    let paris = vec![PARIS_WIKI.to_string()];

    let empty = RetrievalResult::empty("capital of France?");
    assert_eq!(decide(&empty, &config), RoutingDecision::UseFallbackOnly);
    let context = assemble(&empty, &paris, RoutingDecision::UseFallbackOnly, &config);
    assert_eq!(context.passages, paris);

    let weak = RetrievalResult::new(
        "capital of France?",
        vec![
            ragate::Candidate::new("C", "c.txt", 0.3),
            ragate::Candidate::new("D", "d.txt", 0.2),
        ],
    );
    assert_eq!(decide(&weak, &config), RoutingDecision::UseBoth);
    let context = assemble(&weak, &paris, RoutingDecision::UseBoth, &config);
    assert_eq!(context.passages, vec!["C", "D", PARIS_WIKI]);
}
