use serde::{Deserialize, Serialize};

/// One retrieved passage with its similarity score (higher = more relevant).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub text: String,
    pub source_id: String,
    pub score: f32,
}

impl Candidate {
    pub fn new(text: impl Into<String>, source_id: impl Into<String>, score: f32) -> Self {
        Self {
            text: text.into(),
            source_id: source_id.into(),
            score,
        }
    }
}

/// Ranked candidates for a single question.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RetrievalResult {
    /// Score-descending; see the module-level caller contract.
    pub candidates: Vec<Candidate>,
    pub query: String,
}

impl RetrievalResult {
    pub fn new(query: impl Into<String>, candidates: Vec<Candidate>) -> Self {
        Self {
            candidates,
            query: query.into(),
        }
    }

    pub fn empty(query: impl Into<String>) -> Self {
        Self::new(query, Vec::new())
    }

    /// Score of the first (best) candidate.
    pub fn top_score(&self) -> Option<f32> {
        self.candidates.first().map(|c| c.score)
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Combined length of all candidate texts, in characters.
    pub fn corpus_chars(&self) -> usize {
        self.candidates.iter().map(|c| c.text.chars().count()).sum()
    }
}

/// Which information sources feed the answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoutingDecision {
    /// Corpus retrieval is confident and sufficient.
    UseCorpusOnly,
    /// Nothing was retrieved; rely on the external source.
    UseFallbackOnly,
    /// Corpus is weak; keep it but supplement with the external source.
    UseBoth,
}

impl RoutingDecision {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoutingDecision::UseCorpusOnly => "USE_CORPUS_ONLY",
            RoutingDecision::UseFallbackOnly => "USE_FALLBACK_ONLY",
            RoutingDecision::UseBoth => "USE_BOTH",
        }
    }

    pub fn uses_corpus(&self) -> bool {
        !matches!(self, RoutingDecision::UseFallbackOnly)
    }

    pub fn uses_fallback(&self) -> bool {
        !matches!(self, RoutingDecision::UseCorpusOnly)
    }

    /// The decision to act on when the fallback produced nothing.
    ///
    /// `UseBoth` collapses to `UseCorpusOnly`; `UseFallbackOnly` stays as is and simply
    /// assembles an empty context.
    pub fn without_fallback(self) -> Self {
        match self {
            RoutingDecision::UseBoth => RoutingDecision::UseCorpusOnly,
            other => other,
        }
    }
}

impl std::fmt::Display for RoutingDecision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceOrigin {
    Corpus,
    External,
}

impl SourceOrigin {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceOrigin::Corpus => "corpus",
            SourceOrigin::External => "external",
        }
    }
}

impl std::fmt::Display for SourceOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where one assembled passage came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provenance {
    pub origin: SourceOrigin,
    pub source_id: String,
}

impl Provenance {
    pub fn corpus(source_id: impl Into<String>) -> Self {
        Self {
            origin: SourceOrigin::Corpus,
            source_id: source_id.into(),
        }
    }

    /// External passages have no stable id; `position` is 1-based within the lookup result.
    pub fn external(position: usize) -> Self {
        Self {
            origin: SourceOrigin::External,
            source_id: format!("external#{position}"),
        }
    }
}

/// Passages handed to the generator, parallel to their provenance.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AnswerContext {
    pub passages: Vec<String>,
    pub provenance: Vec<Provenance>,
}

impl AnswerContext {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            passages: Vec::with_capacity(capacity),
            provenance: Vec::with_capacity(capacity),
        }
    }

    pub(crate) fn push(&mut self, passage: String, provenance: Provenance) {
        self.passages.push(passage);
        self.provenance.push(provenance);
    }

    pub fn len(&self) -> usize {
        self.passages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.passages.is_empty()
    }

    /// `(passage, provenance)` pairs in assembly order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Provenance)> {
        self.passages
            .iter()
            .map(String::as_str)
            .zip(self.provenance.iter())
    }

    pub fn count_from(&self, origin: SourceOrigin) -> usize {
        self.provenance.iter().filter(|p| p.origin == origin).count()
    }
}
