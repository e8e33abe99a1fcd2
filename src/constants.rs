//! Cross-cutting, shared defaults.
//!
//! Score thresholds are tied to the embedding model's similarity distribution. The defaults
//! here suit mean-pooled, L2-normalized BERT sentence embeddings compared with cosine
//! similarity; recalibrate them when switching models.

/// Minimum top-candidate similarity for the corpus to be considered confident.
pub const DEFAULT_SCORE_THRESHOLD: f32 = 0.5;

/// Minimum number of candidates for a corpus-only answer.
pub const DEFAULT_MIN_CANDIDATES: usize = 1;

/// Maximum passages handed to the generator.
pub const DEFAULT_MAX_CONTEXT_CHUNKS: usize = 8;

/// Candidates requested from the vector index per question.
pub const DEFAULT_TOP_K: u64 = 8;

/// Embedding dimension of the default sentence-embedding model (MiniLM-L6).
pub const DEFAULT_EMBEDDING_DIM: usize = 384;

pub const DEFAULT_MAX_SEQ_LEN: usize = 512;

pub const DEFAULT_COLLECTION_NAME: &str = "ragate_corpus";

pub const DEFAULT_QDRANT_URL: &str = "http://localhost:6334";

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

pub const DEFAULT_CHUNK_SIZE: usize = 1000;
pub const DEFAULT_CHUNK_OVERLAP: usize = 200;

pub const DEFAULT_EMBEDDING_CACHE_CAPACITY: u64 = 10_000;

/// Wikipedia articles consulted per fallback lookup.
pub const DEFAULT_FALLBACK_TOP_K: usize = 3;
/// MediaWiki returns at most this many intro extracts per `prop=extracts` request.
pub const WIKIPEDIA_MAX_EXTRACTS: usize = 20;
pub const DEFAULT_FALLBACK_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_WIKIPEDIA_LANG: &str = "en";
/// Per-article character cap for fallback passages.
pub const DEFAULT_FALLBACK_MAX_CHARS: usize = 4000;

/// Corpus text below this many characters escalates to the fallback (when enabled).
pub const DEFAULT_MIN_CORPUS_CHARS: usize = 200;
/// Corpus text ceiling under which general-knowledge questions also escalate.
pub const DEFAULT_GENERAL_QUESTION_CHARS: usize = 500;
