//! Decomposition of raw query text into phrases, hyphen compounds and free
//! words. The classifier, the snippet extractor and the highlighter all read
//! terms through [`decompose`] so they agree on what the query contains.

use regex::Regex;
use std::sync::OnceLock;

use quarry_core::types::QueryAtom;

/// Free words and compounds must be longer than this many characters.
pub const MIN_TERM_CHARS: usize = 2;

fn quoted_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#""([^"]*)""#).expect("static regex"))
}

fn long_enough(s: &str) -> bool {
    s.chars().count() > MIN_TERM_CHARS
}

/// `well-known` -> `well known`; runs of hyphens collapse to one space.
pub fn compound_text(token: &str) -> String {
    token.split('-').filter(|p| !p.is_empty()).collect::<Vec<_>>().join(" ")
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryTerms {
    /// At least one matched pair of double quotes was present.
    pub has_quoted: bool,
    /// Trimmed, non-empty quoted spans in query order.
    pub phrases: Vec<String>,
    /// Compounds and free terms from outside the quotes, in token order.
    pub remainder: Vec<QueryAtom>,
    /// Whitespace tokens outside quotes containing a hyphen.
    pub hyphen_tokens: usize,
    /// Whitespace tokens outside quotes without a hyphen.
    pub plain_tokens: usize,
}

impl QueryTerms {
    pub fn compounds(&self) -> impl Iterator<Item = &str> {
        self.remainder.iter().filter_map(|a| match a {
            QueryAtom::HyphenCompound(t) => Some(t.as_str()),
            _ => None,
        })
    }

    pub fn free_words(&self) -> impl Iterator<Item = &str> {
        self.remainder.iter().filter_map(|a| match a {
            QueryAtom::FreeTerm(t) => Some(t.as_str()),
            _ => None,
        })
    }

    /// Words of every phrase longer than the minimum term length.
    pub fn phrase_words(&self) -> impl Iterator<Item = &str> {
        self.phrases.iter().flat_map(|p| p.split_whitespace()).filter(|w| long_enough(w))
    }

    /// Phrases first, then the remainder in token order.
    pub fn atoms(&self) -> Vec<QueryAtom> {
        self.phrases
            .iter()
            .map(|p| QueryAtom::Phrase(p.clone()))
            .chain(self.remainder.iter().cloned())
            .collect()
    }
}

pub fn decompose(raw: &str) -> QueryTerms {
    let mut terms = QueryTerms::default();
    for cap in quoted_re().captures_iter(raw) {
        terms.has_quoted = true;
        let phrase = cap.get(1).map_or("", |m| m.as_str()).trim();
        if !phrase.is_empty() {
            terms.phrases.push(phrase.to_string());
        }
    }

    // Unpaired quotes left after removing the pairs separate tokens.
    let remainder = quoted_re().replace_all(raw, " ").replace('"', " ");
    for token in remainder.split_whitespace() {
        if token.contains('-') {
            terms.hyphen_tokens += 1;
            let compound = compound_text(token);
            if long_enough(&compound) {
                terms.remainder.push(QueryAtom::HyphenCompound(compound));
            }
        } else {
            terms.plain_tokens += 1;
            if long_enough(token) {
                terms.remainder.push(QueryAtom::FreeTerm(token.to_string()));
            }
        }
    }
    terms
}
