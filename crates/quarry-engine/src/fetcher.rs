//! Adapter between the engine and a [`SearchProvider`]: provider failures
//! become an empty hit list plus a status, never an error.

use tracing::{error, info, warn};

use quarry_core::error::ProviderError;
use quarry_core::traits::SearchProvider;
use quarry_core::types::{BooleanExpression, Hit, SearchStatus};

#[derive(Debug, Clone, PartialEq)]
pub struct Fetched {
    pub hits: Vec<Hit>,
    pub status: SearchStatus,
}

pub struct Fetcher<P> {
    provider: P,
}

impl<P: SearchProvider> Fetcher<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Execute `expression`, asking for at most `limit` hits. `pass` labels
    /// the execution in logs (`strict`, `relaxed`).
    pub fn fetch(&self, expression: &BooleanExpression, limit: usize, pass: &'static str) -> Fetched {
        match self.provider.execute(expression, limit) {
            Ok(mut hits) => {
                hits.truncate(limit);
                info!(pass, connector = %expression.connector(), hits = hits.len(), "fetched");
                Fetched { hits, status: SearchStatus::Complete }
            }
            Err(ProviderError::IndexUnavailable(reason)) => {
                warn!(pass, %reason, "index unavailable; treating as zero hits");
                Fetched { hits: Vec::new(), status: SearchStatus::IndexUnavailable }
            }
            Err(ProviderError::MalformedExpression { expression, reason }) => {
                error!(pass, %expression, %reason, "provider rejected compiled expression");
                Fetched { hits: Vec::new(), status: SearchStatus::QueryRejected }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(Result<Vec<Hit>, ProviderError>);

    impl SearchProvider for Fixed {
        fn execute(&self, _expression: &BooleanExpression, _limit: usize) -> Result<Vec<Hit>, ProviderError> {
            self.0.clone()
        }
    }

    fn hit(id: &str) -> Hit {
        Hit { doc_id: id.into(), score: 1.0, body: String::new() }
    }

    #[test]
    fn success_is_truncated_to_limit() {
        let f = Fetcher::new(Fixed(Ok(vec![hit("a"), hit("b"), hit("c")])));
        let out = f.fetch(&BooleanExpression::Native("x".into()), 2, "strict");
        assert_eq!(out.status, SearchStatus::Complete);
        assert_eq!(out.hits.len(), 2);
    }

    #[test]
    fn unavailable_index_yields_empty_hits() {
        let f = Fetcher::new(Fixed(Err(ProviderError::IndexUnavailable("gone".into()))));
        let out = f.fetch(&BooleanExpression::Native("x".into()), 5, "strict");
        assert_eq!(out, Fetched { hits: vec![], status: SearchStatus::IndexUnavailable });
    }

    #[test]
    fn malformed_expression_yields_empty_hits() {
        let f = Fetcher::new(Fixed(Err(ProviderError::MalformedExpression {
            expression: "content:(".into(),
            reason: "syntax".into(),
        })));
        let out = f.fetch(&BooleanExpression::Native("(".into()), 5, "relaxed");
        assert_eq!(out.status, SearchStatus::QueryRejected);
        assert!(out.hits.is_empty());
    }
}
