//! ragate library crate (used by the CLI binary and integration tests).
//!
//! # Public API Surface
//!
//! ## Core Types
//! - [`RetrievalGate`], [`GateConfig`] - Routing decision and context assembly
//! - [`RetrievalResult`], [`Candidate`], [`RoutingDecision`], [`AnswerContext`] - Gate data
//! - [`RagPipeline`], [`Answer`], [`PipelineError`] - End-to-end question answering
//! - [`Config`], [`ConfigError`] - Environment configuration
//!
//! ## Collaborators
//! - [`SentenceEmbedder`], [`CachedEmbedder`] - Embedding generation
//! - [`QdrantIndex`] - Corpus passage index
//! - [`WikipediaSource`] - General-knowledge fallback
//! - [`GenaiGenerator`] - Answer synthesis
//!
//! ## Test/Mock Support
//! Mock implementations are available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod cache;
pub mod config;
pub mod constants;
pub mod embedding;
pub mod fallback;
pub mod gate;
pub mod generation;
pub mod hashing;
pub mod ingest;
pub mod pipeline;
pub mod vectordb;

pub use cache::CachedEmbedder;
pub use config::{Config, ConfigError};
pub use embedding::{Embedder, EmbedderConfig, EmbeddingError, SentenceEmbedder};
pub use fallback::{FallbackError, FallbackKnowledgeSource, WikipediaConfig, WikipediaSource};
pub use gate::{
    AnswerContext, Candidate, EscalationConfig, GateConfig, GateError, Provenance,
    RetrievalGate, RetrievalResult, RoutingDecision, SourceOrigin, assemble, decide, escalate,
};
pub use generation::{GenaiGenerator, GenerationError, Generator, render_prompt};
pub use hashing::{hash_text, hash_to_u64, passage_point_id};
pub use ingest::{ChunkerError, TextChunk, TextChunker};
pub use pipeline::{Answer, PipelineError, PipelineResult, RagPipeline};
pub use vectordb::{PassagePoint, QdrantIndex, VectorDbError, VectorIndex, WriteConsistency};

#[cfg(any(test, feature = "mock"))]
pub use fallback::MockFallbackSource;
#[cfg(any(test, feature = "mock"))]
pub use generation::MockGenerator;
#[cfg(any(test, feature = "mock"))]
pub use vectordb::MockVectorIndex;
