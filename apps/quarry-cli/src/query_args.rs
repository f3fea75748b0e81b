//! Shorthand accepted inside the query words themselves:
//!
//! - `--hits=N` anywhere sets the result count,
//! - `--phrase=N` quotes the first N words,
//! - otherwise `new_york_city` becomes `"new york city"`,
//! - a trailing bare integer sets the result count.

use regex::Regex;
use std::sync::OnceLock;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryArgs {
    pub query: String,
    pub hits: Option<usize>,
}

fn hits_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"--hits=(\d+)").expect("static regex"))
}

fn phrase_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"--phrase=(\d+)").expect("static regex"))
}

/// Take the first `--NAME=N` match out of `text`.
fn take_option(re: &Regex, text: &mut String) -> Option<usize> {
    let caps = re.captures(text)?;
    let value = caps[1].parse().ok();
    let range = caps.get(0).map(|m| m.range())?;
    text.replace_range(range, " ");
    value
}

fn quote_first(words: &[&str], count: usize) -> String {
    if count == 0 || words.len() < count {
        return words.join(" ");
    }
    let phrase = words[..count].join(" ");
    let rest = words[count..].join(" ");
    format!("\"{phrase}\" {rest}").trim_end().to_string()
}

fn quote_underscored(words: &[&str]) -> String {
    words
        .iter()
        .map(|w| {
            if w.contains('_') && !w.starts_with("--") {
                format!("\"{}\"", w.replace('_', " "))
            } else {
                (*w).to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Apply the shorthand to the joined query words. `phrase_words` comes from
/// the `--phrase` flag and wins over an embedded `--phrase=N`.
pub fn parse(words: &[String], phrase_words: Option<usize>) -> QueryArgs {
    let mut text = words.join(" ");
    let mut hits = take_option(hits_re(), &mut text);
    let phrase = take_option(phrase_re(), &mut text).or(phrase_words);

    let tokens: Vec<&str> = text.split_whitespace().collect();
    let mut query = match phrase {
        Some(n) => quote_first(&tokens, n),
        None => quote_underscored(&tokens),
    };

    let mut parts: Vec<&str> = query.split_whitespace().collect();
    if let Some(n) = parts.last().and_then(|last| last.parse::<usize>().ok()) {
        if parts.len() > 1 {
            parts.pop();
            hits = hits.or(Some(n));
            query = parts.join(" ");
        }
    }
    QueryArgs { query: query.trim().to_string(), hits }
}
