//! quarry-text
//!
//! Tantivy-backed index building and the `SearchProvider` the query engine
//! executes compiled expressions against.

pub mod tantivy_utils;
pub mod index;
pub mod provider;

pub use index::TantivyIndexer;
pub use provider::TantivyProvider;
