use thiserror::Error;

/// Failures reported by an index-search provider.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProviderError {
    #[error("Index unavailable: {0}")]
    IndexUnavailable(String),

    #[error("Malformed expression `{expression}`: {reason}")]
    MalformedExpression { expression: String, reason: String },
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid query: {0}")]
    Validation(String),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("Annotation failed: {0}")]
    Annotation(String),

    #[error("Ingest failed: {0}")]
    Ingest(String),
}

pub type Result<T> = std::result::Result<T, Error>;
