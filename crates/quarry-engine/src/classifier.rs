//! Decides the shape of a raw query and gathers its atoms.

use quarry_core::config::MAX_HITS;
use quarry_core::error::{Error, Result};
use quarry_core::types::{ClassifiedQuery, QueryShape};

use crate::terms::{decompose, QueryTerms};

pub fn shape_of(terms: &QueryTerms) -> QueryShape {
    if terms.has_quoted {
        return QueryShape::PhraseMixed;
    }
    match (terms.hyphen_tokens, terms.plain_tokens) {
        (1, 0) => QueryShape::Hyphen,
        (0, _) => QueryShape::Free,
        _ => QueryShape::PhraseMixed,
    }
}

/// Classify `raw`, clamping `requested_count` into `1..=MAX_HITS`.
///
/// Empty or whitespace-only input is a validation error.
pub fn classify(raw: &str, requested_count: usize) -> Result<ClassifiedQuery> {
    if raw.trim().is_empty() {
        return Err(Error::Validation("query must not be empty".to_string()));
    }
    let terms = decompose(raw);
    let shape = shape_of(&terms);
    let hyphen_terms: Vec<String> = terms.compounds().map(str::to_string).collect();
    let atoms = match shape {
        QueryShape::Free => Vec::new(),
        QueryShape::Hyphen => terms.remainder.clone(),
        QueryShape::PhraseMixed => terms.atoms(),
    };
    Ok(ClassifiedQuery {
        raw: raw.to_string(),
        shape,
        atoms,
        hyphen_terms,
        requested_count: requested_count.clamp(1, MAX_HITS),
    })
}
