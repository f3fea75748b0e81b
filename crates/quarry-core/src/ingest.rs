//! Corpus ingestion: SGML-wrapped `.txt` files into normalized documents.

use anyhow::Result;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::{debug, info, warn};

use crate::error::Error;
use crate::types::NormalizedDocument;

fn doc_block_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)<DOC>(.*?)</DOC>").expect("static regex"))
}

fn docno_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)<DOCNO>\s*(.*?)\s*</DOCNO>").expect("static regex"))
}

fn text_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)<TEXT>(.*?)</TEXT>").expect("static regex"))
}

fn punctuation_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^\w\s]").expect("static regex"))
}

/// Lowercase, split intra-word hyphens (`closed-door` -> `closed door`) and
/// drop every other non-word, non-space character.
pub fn normalize(text: &str) -> String {
    let lowered = text.to_lowercase();
    let chars: Vec<char> = lowered.chars().collect();
    let is_word = |c: char| c.is_alphanumeric() || c == '_';
    let mut split = String::with_capacity(lowered.len());
    for (i, &c) in chars.iter().enumerate() {
        let joins_words = c == '-'
            && i > 0
            && chars.get(i + 1).is_some_and(|&n| is_word(n))
            && is_word(chars[i - 1]);
        split.push(if joins_words { ' ' } else { c });
    }
    punctuation_re().replace_all(&split, "").into_owned()
}

/// Extract every `<DOCNO>`/`<TEXT>` record from one file's contents. A file
/// without `<DOC>` wrappers is treated as a single record.
pub fn parse_records(content: &str) -> Vec<NormalizedDocument> {
    let mut blocks: Vec<&str> = doc_block_re()
        .captures_iter(content)
        .filter_map(|c| c.get(1).map(|m| m.as_str()))
        .collect();
    if blocks.is_empty() {
        blocks.push(content);
    }
    blocks.into_iter().filter_map(parse_record).collect()
}

fn parse_record(block: &str) -> Option<NormalizedDocument> {
    let doc_id = docno_re().captures(block)?.get(1)?.as_str().trim().to_string();
    let text = text_re().captures(block)?.get(1)?.as_str().trim();
    if doc_id.is_empty() {
        return None;
    }
    Some(NormalizedDocument { doc_id, content: normalize(text) })
}

#[derive(Debug, Clone, Default)]
pub struct CorpusReader {
    limit: Option<usize>,
}

impl CorpusReader {
    pub fn new() -> Self { Self::default() }

    /// Read at most `limit` files.
    pub fn with_limit(limit: usize) -> Self { Self { limit: Some(limit) } }

    pub fn read_dir(&self, root: &Path) -> Result<Vec<NormalizedDocument>> {
        fs::metadata(root)
            .map_err(|e| Error::Ingest(format!("corpus root {} is not readable: {e}", root.display())))?;
        let mut files = self.list_txt_files(root);
        if files.is_empty() {
            warn!(root = %root.display(), "no .txt files found");
            return Ok(vec![]);
        }
        if let Some(limit) = self.limit {
            if files.len() > limit {
                files.truncate(limit);
                info!(limit, "limiting corpus to first files");
            }
        }
        let mut docs = Vec::new();
        for file_path in &files {
            match self.read_file_content(file_path) {
                Ok(content) => {
                    let records = parse_records(&content);
                    if records.is_empty() {
                        debug!(file = %file_path.display(), "no DOCNO/TEXT records");
                    }
                    docs.extend(records);
                }
                Err(e) => warn!(file = %file_path.display(), error = %e, "skipping unreadable file"),
            }
        }
        info!(files = files.len(), documents = docs.len(), "corpus read");
        Ok(docs)
    }

    fn read_file_content(&self, file_path: &Path) -> Result<String> {
        match fs::read_to_string(file_path) {
            Ok(content) => Ok(content),
            Err(_) => Ok(String::from_utf8_lossy(&fs::read(file_path)?).to_string()),
        }
    }

    fn list_txt_files(&self, root: &Path) -> Vec<PathBuf> {
        let mut txt_files = Vec::new();
        for entry in walkdir::WalkDir::new(root).into_iter().filter_map(|e| e.ok()).filter(|e| e.file_type().is_file()) {
            let path = entry.path(); if path.extension().and_then(|s| s.to_str()) == Some("txt") { txt_files.push(path.to_path_buf()); }
        }
        txt_files.sort(); txt_files
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_splits_compounds_and_strips_punctuation() {
        assert_eq!(normalize("Closed-door talks, in U.S. today!"), "closed door talks in us today");
        assert_eq!(normalize("a-b-c"), "a b c");
        assert_eq!(normalize("- dash -"), " dash ");
    }

    #[test]
    fn parse_records_reads_every_doc_block() {
        let content = "<DOC>\n<DOCNO> APW1 </DOCNO>\n<TEXT>\nClimate-change talks\n</TEXT>\n</DOC>\n\
                       <DOC>\n<DOCNO>APW2</DOCNO>\n<TEXT>Second.</TEXT>\n</DOC>\n\
                       <DOC>\n<DOCNO>APW3</DOCNO>\n</DOC>";
        let docs = parse_records(content);
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0], NormalizedDocument { doc_id: "APW1".into(), content: "climate change talks".into() });
        assert_eq!(docs[1].content, "second");
    }

    #[test]
    fn unwrapped_file_is_a_single_record() {
        let docs = parse_records("<DOCNO>X9</DOCNO><TEXT>Hello</TEXT>");
        assert_eq!(docs, vec![NormalizedDocument { doc_id: "X9".into(), content: "hello".into() }]);
    }
}
