//! Tiered, non-overlapping highlighting of snippets.
//!
//! Spans are collected in character coordinates of the unmodified snippet
//! across all four tiers, checked against an ordered index of committed
//! spans, and only then materialized. The text is never edited while
//! scanning, so committed offsets never move.

use serde::Serialize;
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use tracing::warn;

use quarry_core::error::{Error, Result};
use quarry_core::types::{HighlightSpan, HighlightTier, QueryShape};

use crate::terms::{decompose, MIN_TERM_CHARS};
use crate::text::{fold, FoldedText};

/// Maps highlight tiers to concrete markup for one output medium.
pub trait MarkerStyle {
    fn open(&self, tier: HighlightTier) -> Cow<'static, str>;
    fn close(&self, tier: HighlightTier) -> Cow<'static, str>;

    /// Escape plain text for the medium; identity by default.
    fn escape<'a>(&self, text: &'a str) -> Cow<'a, str> {
        Cow::Borrowed(text)
    }
}

/// Abstract `[tier]…[/tier]` tags.
#[derive(Debug, Clone, Copy, Default)]
pub struct TagStyle;

impl MarkerStyle for TagStyle {
    fn open(&self, tier: HighlightTier) -> Cow<'static, str> {
        Cow::Owned(format!("[{}]", tier.as_str()))
    }

    fn close(&self, tier: HighlightTier) -> Cow<'static, str> {
        Cow::Owned(format!("[/{}]", tier.as_str()))
    }
}

/// Bold terminal colours: phrase red, hyphen blue, phrase-word green,
/// free-word yellow.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnsiStyle;

impl MarkerStyle for AnsiStyle {
    fn open(&self, tier: HighlightTier) -> Cow<'static, str> {
        Cow::Borrowed(match tier {
            HighlightTier::Phrase => "\x1b[1m\x1b[31m",
            HighlightTier::Hyphen => "\x1b[1m\x1b[34m",
            HighlightTier::PhraseWord => "\x1b[1m\x1b[32m",
            HighlightTier::FreeWord => "\x1b[1m\x1b[33m",
        })
    }

    fn close(&self, _tier: HighlightTier) -> Cow<'static, str> {
        Cow::Borrowed("\x1b[0m")
    }
}

/// `<mark class="hl-{tier}">` elements over HTML-escaped text.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlStyle;

impl MarkerStyle for HtmlStyle {
    fn open(&self, tier: HighlightTier) -> Cow<'static, str> {
        Cow::Owned(format!("<mark class=\"hl-{}\">", tier.as_str()))
    }

    fn close(&self, _tier: HighlightTier) -> Cow<'static, str> {
        Cow::Borrowed("</mark>")
    }

    fn escape<'a>(&self, text: &'a str) -> Cow<'a, str> {
        if !text.contains(['&', '<', '>', '"', '\'']) {
            return Cow::Borrowed(text);
        }
        let mut out = String::with_capacity(text.len() + 16);
        for c in text.chars() {
            match c {
                '&' => out.push_str("&amp;"),
                '<' => out.push_str("&lt;"),
                '>' => out.push_str("&gt;"),
                '"' => out.push_str("&quot;"),
                '\'' => out.push_str("&#39;"),
                _ => out.push(c),
            }
        }
        Cow::Owned(out)
    }
}

/// Snippet text plus sorted, non-overlapping spans (byte offsets into `text`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnnotatedSnippet {
    pub text: String,
    pub spans: Vec<HighlightSpan>,
}

impl AnnotatedSnippet {
    pub fn plain(text: impl Into<String>) -> Self {
        Self { text: text.into(), spans: Vec::new() }
    }

    /// Matched text of every span, in order.
    pub fn highlighted(&self) -> impl Iterator<Item = (&str, HighlightTier)> {
        self.spans.iter().map(|s| (&self.text[s.start..s.end], s.tier))
    }

    /// Materialize the markup in one left-to-right pass.
    pub fn render(&self, style: &dyn MarkerStyle) -> String {
        let mut out = String::with_capacity(self.text.len() + self.spans.len() * 16);
        let mut cursor = 0;
        for span in &self.spans {
            out.push_str(&style.escape(&self.text[cursor..span.start]));
            out.push_str(&style.open(span.tier));
            out.push_str(&style.escape(&self.text[span.start..span.end]));
            out.push_str(&style.close(span.tier));
            cursor = span.end;
        }
        out.push_str(&style.escape(&self.text[cursor..]));
        out
    }
}

impl fmt::Display for AnnotatedSnippet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(&TagStyle))
    }
}

/// Committed spans keyed by start, in character coordinates.
#[derive(Debug, Default)]
struct SpanSet {
    by_start: BTreeMap<usize, (usize, HighlightTier)>,
}

impl SpanSet {
    /// True when `[start, end)` intersects no committed span. Committed spans
    /// never overlap, so only the last one starting before `end` can collide.
    fn is_free(&self, start: usize, end: usize) -> bool {
        match self.by_start.range(..end).next_back() {
            Some((_, &(prev_end, _))) => prev_end <= start,
            None => true,
        }
    }

    fn commit(&mut self, start: usize, end: usize, tier: HighlightTier) {
        self.by_start.insert(start, (end, tier));
    }
}

/// Highlight terms derived once from a query, applied to each snippet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightPlan {
    passes: Vec<(HighlightTier, Vec<String>)>,
}

impl HighlightPlan {
    pub fn new(query: &str, shape: QueryShape) -> Self {
        let terms = decompose(query);
        let mut passes = vec![
            (HighlightTier::Phrase, terms.phrases.clone()),
            (HighlightTier::Hyphen, owned(terms.compounds())),
        ];
        if shape == QueryShape::PhraseMixed {
            passes.push((HighlightTier::PhraseWord, owned(terms.phrase_words())));
        }
        passes.push((HighlightTier::FreeWord, owned(terms.free_words())));
        Self { passes }
    }

    /// Annotate `snippet`, falling back to the plain text if the span set
    /// fails validation.
    pub fn annotate(&self, snippet: &str) -> AnnotatedSnippet {
        match self.try_annotate(snippet) {
            Ok(annotated) => annotated,
            Err(e) => {
                warn!(error = %e, "highlighting failed; returning plain snippet");
                AnnotatedSnippet::plain(snippet)
            }
        }
    }

    fn try_annotate(&self, snippet: &str) -> Result<AnnotatedSnippet> {
        let text = FoldedText::new(snippet);
        let mut spans = SpanSet::default();
        for (tier, terms) in &self.passes {
            for term in terms {
                claim_occurrences(&text, &mut spans, term, *tier);
            }
        }
        let spans: Vec<HighlightSpan> = spans
            .by_start
            .into_iter()
            .map(|(start, (end, tier))| HighlightSpan {
                start: text.byte_offset(start),
                end: text.byte_offset(end),
                tier,
            })
            .collect();
        let annotated = AnnotatedSnippet { text: snippet.to_string(), spans };
        validate(&annotated)?;
        Ok(annotated)
    }
}

fn owned<'a>(terms: impl Iterator<Item = &'a str>) -> Vec<String> {
    terms.map(str::to_string).collect()
}

/// Commit every boundary-aligned, unclaimed occurrence of `term`.
fn claim_occurrences(text: &FoldedText<'_>, spans: &mut SpanSet, term: &str, tier: HighlightTier) {
    let needle = fold(term);
    if needle.len() <= MIN_TERM_CHARS {
        return;
    }
    let mut from = 0;
    while let Some(start) = text.find(&needle, from) {
        let end = start + needle.len();
        if text.is_word_boundary(start, end) && spans.is_free(start, end) {
            spans.commit(start, end, tier);
            from = end;
        } else {
            from = start + 1;
        }
    }
}

fn validate(snippet: &AnnotatedSnippet) -> Result<()> {
    let mut prev: Option<&HighlightSpan> = None;
    for span in &snippet.spans {
        let in_bounds = span.start < span.end && span.end <= snippet.text.len();
        let ordered = prev.map_or(true, |p| p.start < span.start && !p.overlaps(span));
        if !in_bounds || !ordered {
            return Err(Error::Annotation(format!("span {}..{} out of order or bounds", span.start, span.end)));
        }
        if !snippet.text.is_char_boundary(span.start) || !snippet.text.is_char_boundary(span.end) {
            return Err(Error::Annotation(format!("span {}..{} splits a character", span.start, span.end)));
        }
        prev = Some(span);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn annotate(snippet: &str, query: &str, shape: QueryShape) -> AnnotatedSnippet {
        HighlightPlan::new(query, shape).annotate(snippet)
    }

    fn marked(snippet: &str, query: &str, shape: QueryShape) -> String {
        annotate(snippet, query, shape).to_string()
    }

    #[test]
    fn phrase_beats_its_own_words_and_free_words_mark_every_occurrence() {
        let out = marked(
            "Impact of climate change: the impact is global.",
            r#""climate change" impact"#,
            QueryShape::PhraseMixed,
        );
        assert_eq!(
            out,
            "[free-word]Impact[/free-word] of [phrase]climate change[/phrase]: the [free-word]impact[/free-word] is global."
        );
    }

    #[test]
    fn phrase_words_highlight_outside_the_phrase() {
        let out = marked("change comes before climate change", r#""climate change""#, QueryShape::PhraseMixed);
        assert_eq!(out, "[phrase-word]change[/phrase-word] comes before [phrase]climate change[/phrase]");
    }

    #[test]
    fn phrase_word_tier_is_skipped_for_other_shapes() {
        let plan = HighlightPlan::new("well-known", QueryShape::Hyphen);
        assert!(plan.passes.iter().all(|(tier, _)| *tier != HighlightTier::PhraseWord));
        assert_eq!(marked("a well known fact", "well-known", QueryShape::Hyphen), "a [hyphen]well known[/hyphen] fact");
    }

    #[test]
    fn partial_words_are_not_highlighted() {
        assert_eq!(marked("impacts and reimpact", "impact", QueryShape::Free), "impacts and reimpact");
        assert_eq!(marked("impact-driven", "impact", QueryShape::Free), "[free-word]impact[/free-word]-driven");
    }

    #[test]
    fn short_terms_are_never_highlighted() {
        assert_eq!(marked("we go on", "we go on", QueryShape::Free), "we go on");
        assert_eq!(marked("ok so", r#""ok" so"#, QueryShape::PhraseMixed), "ok so");
    }

    #[test]
    fn original_casing_is_preserved() {
        let a = annotate("The CLIMATE report", "climate", QueryShape::Free);
        assert_eq!(a.highlighted().collect::<Vec<_>>(), vec![("CLIMATE", HighlightTier::FreeWord)]);
    }

    #[test]
    fn overlapping_lower_tier_match_is_rejected() {
        // "known well" overlaps the committed compound "well known".
        let a = annotate("well known well", "well-known known-well", QueryShape::PhraseMixed);
        assert_eq!(a.highlighted().collect::<Vec<_>>(), vec![("well known", HighlightTier::Hyphen)]);
    }

    #[test]
    fn spans_are_byte_offsets_into_multibyte_text() {
        let a = annotate("Ça été un impact énorme", "impact énorme", QueryShape::Free);
        assert_eq!(
            a.highlighted().collect::<Vec<_>>(),
            vec![("impact", HighlightTier::FreeWord), ("énorme", HighlightTier::FreeWord)]
        );
    }

    #[test]
    fn renderers_wrap_spans() {
        let a = annotate("the impact <now>", "impact", QueryShape::Free);
        assert_eq!(a.render(&AnsiStyle), "the \x1b[1m\x1b[33mimpact\x1b[0m <now>");
        assert_eq!(a.render(&HtmlStyle), "the <mark class=\"hl-free-word\">impact</mark> &lt;now&gt;");
    }

    #[test]
    fn invalid_spans_fall_back_to_plain_text() {
        let bad = AnnotatedSnippet {
            text: "héllo".into(),
            spans: vec![HighlightSpan { start: 0, end: 2, tier: HighlightTier::Phrase }],
        };
        assert!(validate(&bad).is_err());
        let overlapping = AnnotatedSnippet {
            text: "hello world".into(),
            spans: vec![
                HighlightSpan { start: 0, end: 5, tier: HighlightTier::Phrase },
                HighlightSpan { start: 3, end: 8, tier: HighlightTier::FreeWord },
            ],
        };
        assert!(validate(&overlapping).is_err());
    }

    proptest! {
        #[test]
        fn spans_never_overlap_and_sit_on_word_boundaries(
            snippet in "[a-cA-C ,.-]{0,80}",
            query in "[a-c \"-]{0,24}",
            mixed in any::<bool>(),
        ) {
            let shape = if mixed { QueryShape::PhraseMixed } else { QueryShape::Free };
            let a = annotate(&snippet, &query, shape);
            prop_assert_eq!(&a.text, &snippet);
            for (i, s) in a.spans.iter().enumerate() {
                let before = a.text[..s.start].chars().next_back();
                let after = a.text[s.end..].chars().next();
                prop_assert!(!before.is_some_and(char::is_alphanumeric));
                prop_assert!(!after.is_some_and(char::is_alphanumeric));
                for t in &a.spans[i + 1..] {
                    prop_assert!(!s.overlaps(t));
                }
            }
        }
    }
}
