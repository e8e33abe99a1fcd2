//! Environment-backed configuration.
//!
//! Every setting has a default. Override with `RAGATE_*` environment variables.

pub mod error;


pub use error::ConfigError;

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::constants::{
    DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE, DEFAULT_COLLECTION_NAME,
    DEFAULT_EMBEDDING_CACHE_CAPACITY, DEFAULT_FALLBACK_TIMEOUT_SECS, DEFAULT_FALLBACK_TOP_K,
    DEFAULT_MAX_CONTEXT_CHUNKS, DEFAULT_MIN_CANDIDATES, DEFAULT_MODEL, DEFAULT_QDRANT_URL,
    DEFAULT_SCORE_THRESHOLD, DEFAULT_TOP_K, DEFAULT_WIKIPEDIA_LANG, WIKIPEDIA_MAX_EXTRACTS,
};
use crate::embedding::EmbedderConfig;
use crate::fallback::WikipediaConfig;
use crate::gate::{EscalationConfig, GateConfig};
use crate::ingest::TextChunker;

/// Application configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `RAGATE_*` overrides on top of defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Qdrant endpoint URL. Default: `http://localhost:6334`.
    pub qdrant_url: String,

    /// Qdrant collection holding corpus passages. Default: `ragate_corpus`.
    pub collection_name: String,

    /// Sentence-embedding model directory. `None` runs the stub embedder.
    pub embedder_path: Option<PathBuf>,

    /// Candidates requested per question. Default: `8`.
    pub top_k: u64,

    /// Default: `0.5`.
    pub score_threshold: f32,

    /// Default: `1`.
    pub min_candidates: usize,

    /// Default: `8`.
    pub max_context_chunks: usize,

    /// Upgrade thin corpus-only answers to include the fallback. Default: `false`.
    pub escalate_general_knowledge: bool,

    /// genai model name. Default: `gpt-4o-mini`.
    pub model: String,

    /// Default: `en`.
    pub wikipedia_lang: String,

    /// Default: `3`.
    pub fallback_top_k: usize,

    /// Deadline for the whole fallback lookup. Default: 10s.
    pub fallback_timeout: Duration,

    /// Default: `1000` characters.
    pub chunk_size: usize,

    /// Default: `200` characters.
    pub chunk_overlap: usize,

    /// Default: `10_000` entries.
    pub embedding_cache_capacity: u64,

    /// Answer with the offline mock generator instead of a hosted model.
    pub mock_provider: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            qdrant_url: DEFAULT_QDRANT_URL.to_string(),
            collection_name: DEFAULT_COLLECTION_NAME.to_string(),
            embedder_path: None,
            top_k: DEFAULT_TOP_K,
            score_threshold: DEFAULT_SCORE_THRESHOLD,
            min_candidates: DEFAULT_MIN_CANDIDATES,
            max_context_chunks: DEFAULT_MAX_CONTEXT_CHUNKS,
            escalate_general_knowledge: false,
            model: DEFAULT_MODEL.to_string(),
            wikipedia_lang: DEFAULT_WIKIPEDIA_LANG.to_string(),
            fallback_top_k: DEFAULT_FALLBACK_TOP_K,
            fallback_timeout: Duration::from_secs(DEFAULT_FALLBACK_TIMEOUT_SECS),
            chunk_size: DEFAULT_CHUNK_SIZE,
            chunk_overlap: DEFAULT_CHUNK_OVERLAP,
            embedding_cache_capacity: DEFAULT_EMBEDDING_CACHE_CAPACITY,
            mock_provider: false,
        }
    }
}

impl Config {
    const ENV_QDRANT_URL: &'static str = "RAGATE_QDRANT_URL";
    const ENV_COLLECTION: &'static str = "RAGATE_COLLECTION";
    const ENV_EMBEDDER_PATH: &'static str = "RAGATE_EMBEDDER_PATH";
    const ENV_TOP_K: &'static str = "RAGATE_TOP_K";
    const ENV_SCORE_THRESHOLD: &'static str = "RAGATE_SCORE_THRESHOLD";
    const ENV_MIN_CANDIDATES: &'static str = "RAGATE_MIN_CANDIDATES";
    const ENV_MAX_CONTEXT_CHUNKS: &'static str = "RAGATE_MAX_CONTEXT_CHUNKS";
    const ENV_ESCALATE_GENERAL: &'static str = "RAGATE_ESCALATE_GENERAL";
    const ENV_MODEL: &'static str = "RAGATE_MODEL";
    const ENV_WIKIPEDIA_LANG: &'static str = "RAGATE_WIKIPEDIA_LANG";
    const ENV_FALLBACK_TOP_K: &'static str = "RAGATE_FALLBACK_TOP_K";
    const ENV_FALLBACK_TIMEOUT_SECS: &'static str = "RAGATE_FALLBACK_TIMEOUT_SECS";
    const ENV_CHUNK_SIZE: &'static str = "RAGATE_CHUNK_SIZE";
    const ENV_CHUNK_OVERLAP: &'static str = "RAGATE_CHUNK_OVERLAP";
    const ENV_EMBEDDING_CACHE_CAPACITY: &'static str = "RAGATE_EMBEDDING_CACHE_CAPACITY";
    const ENV_MOCK_PROVIDER: &'static str = "RAGATE_MOCK_PROVIDER";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        Ok(Self {
            qdrant_url: Self::parse_string_from_env(Self::ENV_QDRANT_URL, defaults.qdrant_url),
            collection_name: Self::parse_string_from_env(
                Self::ENV_COLLECTION,
                defaults.collection_name,
            ),
            embedder_path: Self::parse_optional_path_from_env(Self::ENV_EMBEDDER_PATH),
            top_k: Self::parse_from_env(Self::ENV_TOP_K, defaults.top_k)?,
            score_threshold: Self::parse_from_env(
                Self::ENV_SCORE_THRESHOLD,
                defaults.score_threshold,
            )?,
            min_candidates: Self::parse_from_env(Self::ENV_MIN_CANDIDATES, defaults.min_candidates)?,
            max_context_chunks: Self::parse_from_env(
                Self::ENV_MAX_CONTEXT_CHUNKS,
                defaults.max_context_chunks,
            )?,
            escalate_general_knowledge: Self::parse_bool_from_env(
                Self::ENV_ESCALATE_GENERAL,
                defaults.escalate_general_knowledge,
            )?,
            model: Self::parse_string_from_env(Self::ENV_MODEL, defaults.model),
            wikipedia_lang: Self::parse_string_from_env(
                Self::ENV_WIKIPEDIA_LANG,
                defaults.wikipedia_lang,
            ),
            fallback_top_k: Self::parse_from_env(Self::ENV_FALLBACK_TOP_K, defaults.fallback_top_k)?,
            fallback_timeout: Duration::from_secs(Self::parse_from_env(
                Self::ENV_FALLBACK_TIMEOUT_SECS,
                defaults.fallback_timeout.as_secs(),
            )?),
            chunk_size: Self::parse_from_env(Self::ENV_CHUNK_SIZE, defaults.chunk_size)?,
            chunk_overlap: Self::parse_from_env(Self::ENV_CHUNK_OVERLAP, defaults.chunk_overlap)?,
            embedding_cache_capacity: Self::parse_from_env(
                Self::ENV_EMBEDDING_CACHE_CAPACITY,
                defaults.embedding_cache_capacity,
            )?,
            mock_provider: Self::parse_bool_from_env(
                Self::ENV_MOCK_PROVIDER,
                defaults.mock_provider,
            )?,
        })
    }

    /// Validates thresholds, chunking and paths (does not touch the network).
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.top_k == 0 {
            return Err(ConfigError::ZeroTopK);
        }
        if self.fallback_top_k > WIKIPEDIA_MAX_EXTRACTS {
            return Err(ConfigError::FallbackTopKTooLarge {
                top_k: self.fallback_top_k,
                max: WIKIPEDIA_MAX_EXTRACTS,
            });
        }

        self.gate_config().validate()?;
        self.chunker()?;

        if let Some(ref path) = self.embedder_path {
            if !path.exists() {
                return Err(ConfigError::PathNotFound { path: path.clone() });
            }
            if !path.is_dir() {
                return Err(ConfigError::NotADirectory { path: path.clone() });
            }
        }

        Ok(())
    }

    pub fn gate_config(&self) -> GateConfig {
        GateConfig {
            min_candidates: self.min_candidates,
            score_threshold: self.score_threshold,
            max_context_chunks: self.max_context_chunks,
        }
    }

    pub fn escalation_config(&self) -> EscalationConfig {
        EscalationConfig {
            enabled: self.escalate_general_knowledge,
            ..EscalationConfig::default()
        }
    }

    pub fn embedder_config(&self) -> EmbedderConfig {
        match &self.embedder_path {
            Some(path) => EmbedderConfig::new(path.clone()),
            None => EmbedderConfig::stub(),
        }
    }

    pub fn wikipedia_config(&self) -> WikipediaConfig {
        WikipediaConfig {
            lang: self.wikipedia_lang.clone(),
            top_k: self.fallback_top_k,
            timeout: self.fallback_timeout,
            ..WikipediaConfig::default()
        }
    }

    pub fn chunker(&self) -> Result<TextChunker, ConfigError> {
        Ok(TextChunker::new(self.chunk_size, self.chunk_overlap)?)
    }

    fn parse_from_env<T>(var_name: &'static str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        match env::var(var_name) {
            Ok(value) => value
                .trim()
                .parse()
                .map_err(|e: T::Err| ConfigError::InvalidValue {
                    name: var_name,
                    value: value.clone(),
                    reason: e.to_string(),
                }),
            Err(_) => Ok(default),
        }
    }

    fn parse_bool_from_env(var_name: &'static str, default: bool) -> Result<bool, ConfigError> {
        match env::var(var_name) {
            Ok(value) => match value.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => Ok(true),
                "0" | "false" | "no" | "off" | "" => Ok(false),
                _ => Err(ConfigError::InvalidValue {
                    name: var_name,
                    value,
                    reason: "expected a boolean".to_string(),
                }),
            },
            Err(_) => Ok(default),
        }
    }

    fn parse_optional_path_from_env(var_name: &str) -> Option<PathBuf> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
    }

    fn parse_string_from_env(var_name: &str, default: String) -> String {
        env::var(var_name)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(default)
    }
}
