use serde::Serialize;
use tracing::{debug, info};

use quarry_core::config::{Settings, DEFAULT_WINDOW_CHARS, MAX_HITS};
use quarry_core::error::{Error, Result};
use quarry_core::traits::SearchProvider;
use quarry_core::types::{QueryShape, SearchStatus};

use crate::classifier::classify;
use crate::compiler::compile;
use crate::fetcher::Fetcher;
use crate::highlight::{AnnotatedSnippet, HighlightPlan};
use crate::merger::merge;
use crate::snippet::SnippetExtractor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineOptions {
    pub window_chars: usize,
    pub max_hits: usize,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self { window_chars: DEFAULT_WINDOW_CHARS, max_hits: MAX_HITS }
    }
}

impl From<&Settings> for EngineOptions {
    fn from(settings: &Settings) -> Self {
        Self {
            window_chars: settings.snippet.window_chars,
            max_hits: settings.search.max_hits.min(MAX_HITS),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnotatedResult {
    /// 1-based position in the merged list.
    pub rank: usize,
    pub score: f32,
    pub doc_id: String,
    pub snippet: AnnotatedSnippet,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchOutcome {
    pub shape: QueryShape,
    /// First provider failure seen, or `Complete`.
    pub status: SearchStatus,
    pub results: Vec<AnnotatedResult>,
}

/// Reject empty queries and counts outside `1..=max_hits` before any
/// provider call.
pub fn validate_request(raw_query: &str, requested_count: usize, max_hits: usize) -> Result<()> {
    if raw_query.trim().is_empty() {
        return Err(Error::Validation("query must not be empty".to_string()));
    }
    if !(1..=max_hits).contains(&requested_count) {
        return Err(Error::Validation(format!(
            "result count must be between 1 and {max_hits}, got {requested_count}"
        )));
    }
    Ok(())
}

/// Classify, compile, fetch, merge and annotate. Holds no per-request
/// state, so one engine can serve concurrent searches.
pub struct QueryEngine<P> {
    fetcher: Fetcher<P>,
    extractor: SnippetExtractor,
    options: EngineOptions,
}

impl<P: SearchProvider> QueryEngine<P> {
    pub fn new(provider: P, options: EngineOptions) -> Self {
        Self {
            fetcher: Fetcher::new(provider),
            extractor: SnippetExtractor::new(options.window_chars),
            options,
        }
    }

    pub fn provider(&self) -> &P {
        self.fetcher.provider()
    }

    pub fn search(&self, raw_query: &str, requested_count: usize) -> Result<SearchOutcome> {
        validate_request(raw_query, requested_count, self.options.max_hits)?;
        let query = classify(raw_query, requested_count)?;
        let count = query.requested_count;
        info!(shape = %query.shape, count, "classified query");

        let Some(compiled) = compile(&query) else {
            info!(query = raw_query, "no searchable terms after decomposition");
            return Ok(SearchOutcome { shape: query.shape, status: SearchStatus::Complete, results: vec![] });
        };
        for expr in compiled.expressions() {
            info!(connector = %expr.connector(), expression = %expr, "compiled");
        }

        let strict = self.fetcher.fetch(&compiled.strict, count, "strict");
        let mut status = strict.status;
        let relaxed_hits = match &compiled.relaxed {
            Some(relaxed) if strict.hits.len() < count => {
                let relaxed = self.fetcher.fetch(relaxed, count, "relaxed");
                if status == SearchStatus::Complete {
                    status = relaxed.status;
                }
                relaxed.hits
            }
            _ => Vec::new(),
        };
        let merged = merge(strict.hits, relaxed_hits, count);
        debug!(merged = merged.len(), "merged strict and relaxed hits");

        let plan = HighlightPlan::new(raw_query, query.shape);
        let results = merged
            .into_iter()
            .enumerate()
            .map(|(i, hit)| {
                let snippet = self.extractor.extract(&hit.body, raw_query);
                AnnotatedResult {
                    rank: i + 1,
                    score: hit.score,
                    doc_id: hit.doc_id,
                    snippet: plan.annotate(snippet.text),
                }
            })
            .collect();
        Ok(SearchOutcome { shape: query.shape, status, results })
    }
}
