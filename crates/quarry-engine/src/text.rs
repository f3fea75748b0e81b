//! Case-insensitive, character-indexed view over a borrowed string.
//!
//! Every character folds to exactly one lowercase character so that indices
//! in the folded form are indices in the unfolded text. Characters whose lowercase
//! form expands to several characters are kept as-is.

pub(crate) fn fold_char(c: char) -> char {
    let mut lower = c.to_lowercase();
    match (lower.next(), lower.next()) {
        (Some(l), None) => l,
        _ => c,
    }
}

pub(crate) fn fold(s: &str) -> Vec<char> {
    s.chars().map(fold_char).collect()
}

pub(crate) struct FoldedText<'a> {
    text: &'a str,
    folded: Vec<char>,
    alnum: Vec<bool>,
    /// Byte offset of every character, plus `text.len()` as a sentinel.
    offsets: Vec<usize>,
}

impl<'a> FoldedText<'a> {
    pub(crate) fn new(text: &'a str) -> Self {
        let mut folded = Vec::with_capacity(text.len());
        let mut alnum = Vec::with_capacity(text.len());
        let mut offsets = Vec::with_capacity(text.len() + 1);
        for (i, c) in text.char_indices() {
            folded.push(fold_char(c));
            alnum.push(c.is_alphanumeric());
            offsets.push(i);
        }
        offsets.push(text.len());
        Self { text, folded, alnum, offsets }
    }

    pub(crate) fn len(&self) -> usize {
        self.folded.len()
    }

    /// First character index `>= from` where `needle` (already folded) occurs.
    pub(crate) fn find(&self, needle: &[char], from: usize) -> Option<usize> {
        if needle.is_empty() || needle.len() > self.len() {
            return None;
        }
        let last = self.len() - needle.len();
        (from..=last).find(|&i| self.folded[i..i + needle.len()] == *needle)
    }

    /// The character before `start` and the one at `end`, where present, are
    /// not alphanumeric.
    pub(crate) fn is_word_boundary(&self, start: usize, end: usize) -> bool {
        let before = start == 0 || !self.alnum[start - 1];
        let after = end >= self.len() || !self.alnum[end];
        before && after
    }

    pub(crate) fn byte_offset(&self, char_index: usize) -> usize {
        self.offsets[char_index.min(self.len())]
    }

    /// Substring between two character indices.
    pub(crate) fn slice(&self, start: usize, end: usize) -> &'a str {
        &self.text[self.byte_offset(start)..self.byte_offset(end)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_is_case_insensitive() {
        let t = FoldedText::new("Climate CHANGE and climate");
        assert_eq!(t.find(&fold("climate"), 0), Some(0));
        assert_eq!(t.find(&fold("climate"), 1), Some(19));
        assert_eq!(t.find(&fold("change"), 0), Some(8));
        assert_eq!(t.find(&fold("absent"), 0), None);
        assert_eq!(t.find(&fold(""), 0), None);
    }

    #[test]
    fn indices_are_characters_not_bytes() {
        let t = FoldedText::new("Ünïcode café impact");
        assert_eq!(t.find(&fold("impact"), 0), Some(13));
        assert_eq!(t.slice(8, 12), "café");
        assert_eq!(t.byte_offset(t.len()), "Ünïcode café impact".len());
    }

    #[test]
    fn word_boundaries_use_alphanumerics() {
        let t = FoldedText::new("impacts, impact.");
        assert!(!t.is_word_boundary(0, 6));
        assert!(t.is_word_boundary(0, 7));
        assert!(t.is_word_boundary(9, 15));
    }

    #[test]
    fn multi_char_lowercase_is_kept_one_for_one() {
        let t = FoldedText::new("İstanbul");
        assert_eq!(t.len(), 8);
        assert_eq!(t.find(&fold("stanbul"), 0), Some(1));
    }
}
