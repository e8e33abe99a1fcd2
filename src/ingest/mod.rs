//! Plain-text ingestion: split documents into overlapping chunks for embedding.

pub mod chunker;

pub use chunker::{ChunkerError, TextChunk, TextChunker};
