//! Domain types shared by the query engine and the index-search provider.

use serde::{Deserialize, Serialize};
use std::fmt;

pub type DocId = String;

/// Field searched when an expression is rendered without an explicit one.
pub const DEFAULT_FIELD: &str = "content";

/// One indivisible unit of a decomposed query.
///
/// Free terms and compounds shorter than three characters never become atoms;
/// phrases are kept as long as they are non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum QueryAtom {
    FreeTerm(String),
    Phrase(String),
    /// Hyphenated token with each hyphen replaced by a space (`well known`).
    HyphenCompound(String),
}

impl QueryAtom {
    pub fn text(&self) -> &str {
        match self {
            Self::FreeTerm(t) | Self::Phrase(t) | Self::HyphenCompound(t) => t,
        }
    }

    /// Render as a provider clause against `field`: phrases and compounds are
    /// quoted, free terms are bare with syntax characters escaped.
    pub fn to_clause(&self, field: &str) -> String {
        match self {
            Self::FreeTerm(t) => format!("{field}:{}", escape_term(t)),
            Self::Phrase(t) | Self::HyphenCompound(t) => format!("{field}:\"{}\"", escape_quoted(t)),
        }
    }
}

/// Characters the provider query syntax gives meaning to outside quotes.
const SYNTAX_CHARS: &[char] = &['+', '-', '&', '|', '!', '(', ')', '{', '}', '[', ']', '^', '"', '~', '*', '?', ':', '\\', '/'];

fn escape_term(t: &str) -> String {
    let mut out = String::with_capacity(t.len());
    for c in t.chars() {
        if SYNTAX_CHARS.contains(&c) {
            out.push('\\');
        }
        out.push(c);
    }
    match out.as_str() {
        "AND" | "OR" | "NOT" => format!("\"{out}\""),
        _ => out,
    }
}

fn escape_quoted(t: &str) -> String {
    t.replace('\\', "\\\\").replace('"', "\\\"")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryShape {
    Free,
    Hyphen,
    PhraseMixed,
}

impl fmt::Display for QueryShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Free => "free",
            Self::Hyphen => "hyphen",
            Self::PhraseMixed => "phrase-mixed",
        })
    }
}

/// Result of classifying one raw query string. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassifiedQuery {
    pub raw: String,
    pub shape: QueryShape,
    pub atoms: Vec<QueryAtom>,
    pub hyphen_terms: Vec<String>,
    pub requested_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Connector {
    And,
    Or,
}

impl Connector {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
        }
    }
}

impl fmt::Display for Connector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A compiled query handed to a [`crate::traits::SearchProvider`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum BooleanExpression {
    /// Raw query text passed through to the provider's own parser. Providers
    /// join its terms with their default conjunction, which is AND.
    Native(String),
    Joined {
        atoms: Vec<QueryAtom>,
        connector: Connector,
    },
}

impl BooleanExpression {
    pub fn joined(atoms: Vec<QueryAtom>, connector: Connector) -> Self {
        Self::Joined { atoms, connector }
    }

    pub fn connector(&self) -> Connector {
        match self {
            Self::Native(_) => Connector::And,
            Self::Joined { connector, .. } => *connector,
        }
    }

    /// Provider query syntax, e.g. `content:"climate change" AND content:impact`.
    pub fn to_query_string(&self, field: &str) -> String {
        match self {
            Self::Native(raw) => raw.clone(),
            Self::Joined { atoms, connector } => atoms
                .iter()
                .map(|a| a.to_clause(field))
                .collect::<Vec<_>>()
                .join(&format!(" {connector} ")),
        }
    }
}

impl fmt::Display for BooleanExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_query_string(DEFAULT_FIELD))
    }
}

/// A ranked match returned by a provider. `score` is provider-specific but
/// higher is always better.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hit {
    pub doc_id: DocId,
    pub score: f32,
    pub body: String,
}

/// Highlight priority class, strongest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HighlightTier {
    Phrase,
    Hyphen,
    PhraseWord,
    FreeWord,
}

impl HighlightTier {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Phrase => "phrase",
            Self::Hyphen => "hyphen",
            Self::PhraseWord => "phrase-word",
            Self::FreeWord => "free-word",
        }
    }
}

/// Half-open byte range into a snippet's plain text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighlightSpan {
    pub start: usize,
    pub end: usize,
    pub tier: HighlightTier,
}

impl HighlightSpan {
    pub fn overlaps(&self, other: &HighlightSpan) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// A corpus document after markup stripping and normalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedDocument {
    pub doc_id: DocId,
    pub content: String,
}

/// How a search finished, so callers can tell "nothing matched" from
/// "search is down".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchStatus {
    Complete,
    IndexUnavailable,
    QueryRejected,
}
