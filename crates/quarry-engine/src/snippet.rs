//! Centroid-based context windows.

use quarry_core::config::DEFAULT_WINDOW_CHARS;

use crate::terms::decompose;
use crate::text::{fold, FoldedText};

/// A window into a document body. Offsets are character indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snippet<'a> {
    pub text: &'a str,
    pub start: usize,
    pub end: usize,
    /// First-occurrence positions of the query terms that were found.
    pub positions: Vec<usize>,
}

#[derive(Debug, Clone, Copy)]
pub struct SnippetExtractor {
    window_chars: usize,
}

impl Default for SnippetExtractor {
    fn default() -> Self {
        Self { window_chars: DEFAULT_WINDOW_CHARS }
    }
}

impl SnippetExtractor {
    pub fn new(window_chars: usize) -> Self {
        Self { window_chars: window_chars.max(1) }
    }

    /// Window of `window_chars` characters centred on the mean first-match
    /// position of the query's phrases, compounds and free words; the head
    /// of the document when nothing matches.
    pub fn extract<'a>(&self, body: &'a str, query: &str) -> Snippet<'a> {
        let text = FoldedText::new(body);
        let terms = decompose(query);
        let positions: Vec<usize> = terms
            .phrases
            .iter()
            .map(String::as_str)
            .chain(terms.compounds())
            .chain(terms.free_words())
            .filter_map(|term| text.find(&fold(term), 0))
            .collect();

        let doc_len = text.len();
        let (start, end) = if doc_len <= self.window_chars {
            (0, doc_len)
        } else if positions.is_empty() {
            (0, self.window_chars)
        } else {
            let center = positions.iter().sum::<usize>() / positions.len();
            let start = center.saturating_sub(self.window_chars / 2);
            (start, (start + self.window_chars).min(doc_len))
        };
        Snippet { text: text.slice(start, end), start, end, positions }
    }
}
