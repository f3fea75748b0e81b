use clap::ValueEnum;
use quarry_core::types::SearchStatus;
use quarry_engine::{AnsiStyle, HtmlStyle, MarkerStyle, SearchOutcome, TagStyle};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Text,
    Json,
    Html,
}

pub const NO_MATCHES: &str = "No matching documents.";
pub const INDEX_UNAVAILABLE: &str = "Search index is unavailable. Run `quarry index` first.";
pub const QUERY_REJECTED: &str = "The search provider rejected the compiled query.";

fn push_line(out: &mut String, line: &str) {
    out.push_str(line);
    out.push('\n');
}

fn status_notice(status: SearchStatus) -> Option<&'static str> {
    match status {
        SearchStatus::Complete => None,
        SearchStatus::IndexUnavailable => Some(INDEX_UNAVAILABLE),
        SearchStatus::QueryRejected => Some(QUERY_REJECTED),
    }
}

/// Ranked text listing. `color` selects ANSI markers over plain tags.
pub fn render_text(outcome: &SearchOutcome, color: bool) -> String {
    let mut out = String::new();
    if let Some(notice) = status_notice(outcome.status) {
        push_line(&mut out, notice);
    }
    if outcome.results.is_empty() {
        if outcome.status == SearchStatus::Complete {
            push_line(&mut out, NO_MATCHES);
        }
        return out;
    }
    let style: &dyn MarkerStyle = if color { &AnsiStyle } else { &TagStyle };
    for r in &outcome.results {
        push_line(&mut out, &format!("Rank: {:02} | Score: {:.4} | Doc: {}", r.rank, r.score, r.doc_id));
        push_line(&mut out, &r.snippet.render(style));
        push_line(&mut out, "---");
    }
    out
}

pub fn render_json(outcome: &SearchOutcome) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(outcome)?)
}

pub fn render_html(outcome: &SearchOutcome) -> String {
    let style = HtmlStyle;
    let mut out = String::from("<ol class=\"results\">\n");
    for r in &outcome.results {
        push_line(
            &mut out,
            &format!(
                "  <li data-rank=\"{}\" data-score=\"{:.4}\"><h3>{}</h3><p>{}</p></li>",
                r.rank,
                r.score,
                style.escape(&r.doc_id),
                r.snippet.render(&style)
            ),
        );
    }
    out.push_str("</ol>\n");
    if let Some(notice) = status_notice(outcome.status) {
        push_line(&mut out, &format!("<p class=\"notice\">{}</p>", style.escape(notice)));
    } else if outcome.results.is_empty() {
        push_line(&mut out, &format!("<p class=\"notice\">{NO_MATCHES}</p>"));
    }
    out
}

pub fn render(outcome: &SearchOutcome, format: Format, color: bool) -> anyhow::Result<String> {
    match format {
        Format::Text => Ok(render_text(outcome, color)),
        Format::Json => render_json(outcome),
        Format::Html => Ok(render_html(outcome)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quarry_core::types::{HighlightSpan, HighlightTier, QueryShape};
    use quarry_engine::{AnnotatedResult, AnnotatedSnippet};

    fn outcome(status: SearchStatus, n: usize) -> SearchOutcome {
        let results = (1..=n)
            .map(|rank| AnnotatedResult {
                rank,
                score: 1.5,
                doc_id: format!("DOC{rank}"),
                snippet: AnnotatedSnippet {
                    text: "solar <grid>".into(),
                    spans: vec![HighlightSpan { start: 0, end: 5, tier: HighlightTier::FreeWord }],
                },
            })
            .collect();
        SearchOutcome { shape: QueryShape::Free, status, results }
    }

    #[test]
    fn text_lists_ranked_results() {
        let text = render_text(&outcome(SearchStatus::Complete, 2), false);
        assert_eq!(
            text,
            "Rank: 01 | Score: 1.5000 | Doc: DOC1\n[free-word]solar[/free-word] <grid>\n---\n\
             Rank: 02 | Score: 1.5000 | Doc: DOC2\n[free-word]solar[/free-word] <grid>\n---\n"
        );
    }

    #[test]
    fn empty_and_unavailable_are_told_apart() {
        assert_eq!(render_text(&outcome(SearchStatus::Complete, 0), false), format!("{NO_MATCHES}\n"));
        assert_eq!(render_text(&outcome(SearchStatus::IndexUnavailable, 0), false), format!("{INDEX_UNAVAILABLE}\n"));
    }

    #[test]
    fn html_escapes_snippet_text() {
        let html = render_html(&outcome(SearchStatus::Complete, 1));
        assert!(html.contains("<mark class=\"hl-free-word\">solar</mark> &lt;grid&gt;"));
        assert!(html.contains("<h3>DOC1</h3>"));
    }

    #[test]
    fn json_carries_status_and_spans() {
        let json = render_json(&outcome(SearchStatus::QueryRejected, 1)).expect("json");
        let v: serde_json::Value = serde_json::from_str(&json).expect("parse");
        assert_eq!(v["status"], "query_rejected");
        assert_eq!(v["results"][0]["snippet"]["spans"][0]["end"], 5);
    }
}
