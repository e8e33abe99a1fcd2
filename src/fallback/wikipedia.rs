//! Wikipedia lookup over the MediaWiki action API.
//!
//! Two requests per lookup: a full-text search for the top titles, then one batched
//! `prop=extracts` call for their plain-text intros. Passages keep search rank order and
//! read `Page: <title>\nSummary: <intro>`.

use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, warn};

use crate::constants::{
    DEFAULT_FALLBACK_MAX_CHARS, DEFAULT_FALLBACK_TIMEOUT_SECS, DEFAULT_FALLBACK_TOP_K,
    DEFAULT_WIKIPEDIA_LANG, WIKIPEDIA_MAX_EXTRACTS,
};

use super::FallbackKnowledgeSource;
use super::error::FallbackError;

/// MediaWiki rejects very long search strings.
const MAX_QUERY_CHARS: usize = 300;

#[derive(Debug, Clone, PartialEq)]
pub struct WikipediaConfig {
    /// Language subdomain, e.g. `en`.
    pub lang: String,
    /// Articles fetched per lookup, at most [`WIKIPEDIA_MAX_EXTRACTS`].
    pub top_k: usize,
    /// Per-passage character cap.
    pub max_chars: usize,
    pub timeout: Duration,
    /// Overrides `https://{lang}.wikipedia.org/w/api.php`.
    pub endpoint: Option<String>,
}

impl Default for WikipediaConfig {
    fn default() -> Self {
        Self {
            lang: DEFAULT_WIKIPEDIA_LANG.to_string(),
            top_k: DEFAULT_FALLBACK_TOP_K,
            max_chars: DEFAULT_FALLBACK_MAX_CHARS,
            timeout: Duration::from_secs(DEFAULT_FALLBACK_TIMEOUT_SECS),
            endpoint: None,
        }
    }
}

impl WikipediaConfig {
    pub fn endpoint(&self) -> String {
        self.endpoint
            .clone()
            .unwrap_or_else(|| format!("https://{}.wikipedia.org/w/api.php", self.lang))
    }
}

#[derive(Debug, Clone)]
pub struct WikipediaSource {
    client: reqwest::Client,
    config: WikipediaConfig,
}

impl WikipediaSource {
    /// Builds the HTTP client. A `top_k` above [`WIKIPEDIA_MAX_EXTRACTS`] is clamped.
    pub fn new(mut config: WikipediaConfig) -> Result<Self, FallbackError> {
        if config.top_k > WIKIPEDIA_MAX_EXTRACTS {
            warn!(
                top_k = config.top_k,
                max = WIKIPEDIA_MAX_EXTRACTS,
                "Wikipedia top_k exceeds the extracts limit, clamping"
            );
            config.top_k = WIKIPEDIA_MAX_EXTRACTS;
        }

        let client = reqwest::Client::builder()
            .user_agent(concat!("ragate/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout)
            .build()?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &WikipediaConfig {
        &self.config
    }

    async fn search_titles(&self, query: &str) -> Result<Vec<String>, FallbackError> {
        let limit = self.config.top_k.to_string();
        let response: SearchResponse = self
            .client
            .get(self.config.endpoint())
            .query(&[
                ("action", "query"),
                ("list", "search"),
                ("srsearch", query),
                ("srlimit", limit.as_str()),
                ("format", "json"),
                ("formatversion", "2"),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(search_titles(response, self.config.top_k))
    }

    async fn fetch_extracts(&self, titles: &[String]) -> Result<ExtractResponse, FallbackError> {
        let joined = titles.join("|");
        let limit = titles.len().to_string();
        let response = self
            .client
            .get(self.config.endpoint())
            .query(&[
                ("action", "query"),
                ("prop", "extracts"),
                ("exintro", "1"),
                ("exlimit", limit.as_str()),
                ("explaintext", "1"),
                ("redirects", "1"),
                ("titles", joined.as_str()),
                ("format", "json"),
                ("formatversion", "2"),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(response)
    }
}

impl FallbackKnowledgeSource for WikipediaSource {
    async fn lookup(&self, query: &str) -> Result<Vec<String>, FallbackError> {
        let query: String = query.trim().chars().take(MAX_QUERY_CHARS).collect();
        if query.is_empty() || self.config.top_k == 0 {
            return Ok(Vec::new());
        }

        let titles = self.search_titles(&query).await?;
        if titles.is_empty() {
            debug!(query = %query, "Wikipedia search returned no titles");
            return Ok(Vec::new());
        }

        let extracts = self.fetch_extracts(&titles).await?;
        let passages = collect_passages(&titles, extracts, self.config.max_chars);

        debug!(
            query = %query,
            titles = titles.len(),
            passages = passages.len(),
            "Wikipedia lookup complete"
        );

        Ok(passages)
    }
}

#[derive(Debug, Deserialize, Default)]
pub(crate) struct SearchResponse {
    #[serde(default)]
    query: Option<SearchQuery>,
}

#[derive(Debug, Deserialize, Default)]
struct SearchQuery {
    #[serde(default)]
    search: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    title: String,
}

#[derive(Debug, Deserialize, Default)]
pub(crate) struct ExtractResponse {
    #[serde(default)]
    query: Option<ExtractQuery>,
}

#[derive(Debug, Deserialize, Default)]
struct ExtractQuery {
    #[serde(default)]
    redirects: Vec<Redirect>,
    #[serde(default)]
    normalized: Vec<Redirect>,
    #[serde(default)]
    pages: Vec<ExtractPage>,
}

#[derive(Debug, Deserialize)]
struct Redirect {
    from: String,
    to: String,
}

#[derive(Debug, Deserialize)]
struct ExtractPage {
    title: String,
    #[serde(default)]
    extract: Option<String>,
    #[serde(default)]
    missing: bool,
}

pub(crate) fn search_titles(response: SearchResponse, top_k: usize) -> Vec<String> {
    response
        .query
        .map(|q| q.search)
        .unwrap_or_default()
        .into_iter()
        .map(|hit| hit.title)
        .take(top_k)
        .collect()
}

/// Orders extracts by `titles` (search rank), following normalization and redirects.
pub(crate) fn collect_passages(
    titles: &[String],
    response: ExtractResponse,
    max_chars: usize,
) -> Vec<String> {
    let Some(query) = response.query else {
        return Vec::new();
    };

    let renames: HashMap<String, String> = query
        .normalized
        .into_iter()
        .chain(query.redirects)
        .map(|r| (r.from, r.to))
        .collect();

    let extracts: HashMap<String, String> = query
        .pages
        .into_iter()
        .filter(|p| !p.missing)
        .filter_map(|p| {
            let extract = p.extract?.trim().to_string();
            (!extract.is_empty()).then_some((p.title, extract))
        })
        .collect();

    let mut passages = Vec::with_capacity(titles.len());
    for title in titles {
        let mut resolved = title;
        // Normalization can be followed by a redirect; bounded to avoid cycles.
        for _ in 0..2 {
            match renames.get(resolved) {
                Some(next) => resolved = next,
                None => break,
            }
        }

        if let Some(extract) = extracts.get(resolved) {
            let passage = format!("Page: {resolved}\nSummary: {extract}");
            passages.push(truncate_chars(&passage, max_chars));
        }
    }

    passages
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => text[..byte_index].to_string(),
        None => text.to_string(),
    }
}
