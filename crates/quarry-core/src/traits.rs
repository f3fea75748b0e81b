use crate::error::ProviderError;
use crate::types::{BooleanExpression, Hit, NormalizedDocument};

/// Executes compiled expressions against a full-text index.
///
/// Hits come back sorted by descending score; ties break deterministically
/// within a single call.
pub trait SearchProvider: Send + Sync {
    fn execute(&self, expression: &BooleanExpression, limit: usize) -> Result<Vec<Hit>, ProviderError>;
}

pub trait DocumentIndexer {
    /// Write and commit `docs`, returning how many were indexed.
    fn index_documents(&mut self, docs: &[NormalizedDocument]) -> anyhow::Result<usize>;
}

impl<P: SearchProvider + ?Sized> SearchProvider for &P {
    fn execute(&self, expression: &BooleanExpression, limit: usize) -> Result<Vec<Hit>, ProviderError> {
        (**self).execute(expression, limit)
    }
}
