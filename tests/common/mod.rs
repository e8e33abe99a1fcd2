#![allow(dead_code)]

use ragate::{
    CachedEmbedder, MockFallbackSource, MockGenerator, MockVectorIndex, RagPipeline,
    RetrievalGate, SentenceEmbedder,
};

pub const PARIS_WIKI: &str = "Page: Paris\nSummary: Paris is the capital and largest city of France.";

pub const LAB_NOTES: &str = "The spectrometer calibration drifts by two nanometres after \
every forty hours of continuous operation, so the lab recalibrates it each Monday.";

pub const HANDBOOK: &str = "Expense reports must be filed within thirty days. Receipts above \
fifty euros require a scanned copy attached to the report.";

pub type MockPipeline =
    RagPipeline<MockVectorIndex, CachedEmbedder<SentenceEmbedder>, MockFallbackSource, MockGenerator>;

pub fn mock_pipeline(fallback: MockFallbackSource) -> MockPipeline {
    RagPipeline::new(
        MockVectorIndex::new(),
        CachedEmbedder::new(SentenceEmbedder::stub(384)),
        fallback,
        MockGenerator::new(),
        RetrievalGate::default(),
    )
}

pub async fn seeded_pipeline(fallback: MockFallbackSource) -> MockPipeline {
    let pipeline = mock_pipeline(fallback);
    pipeline
        .ingest("lab-notes.txt", LAB_NOTES)
        .await
        .expect("ingest lab notes");
    pipeline
        .ingest("handbook.txt", HANDBOOK)
        .await
        .expect("ingest handbook");
    pipeline
}
