//! quarry-engine
//!
//! Query interpretation and result annotation: raw query text goes through
//! the classifier and compiler, one or two provider fetches, the strict-first
//! merger, and per-hit snippet extraction and tiered highlighting.

#![deny(warnings)]
#![deny(dead_code)]
#![deny(unused_variables)]
#![deny(unused_imports)]

pub mod classifier;
pub mod compiler;
pub mod engine;
pub mod fetcher;
pub mod highlight;
pub mod merger;
pub mod snippet;
pub mod terms;
mod text;

pub use engine::{validate_request, AnnotatedResult, EngineOptions, QueryEngine, SearchOutcome};
pub use highlight::{AnnotatedSnippet, AnsiStyle, HighlightPlan, HtmlStyle, MarkerStyle, TagStyle};
