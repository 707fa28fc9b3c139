//! Sentence segmentation for long inputs.
//!
//! The acoustic model decodes a bounded number of steps, so long text is
//! synthesised one sentence at a time.  The splitter is rule based: a
//! sentence ends at `.`, `!` or `?` (plus any trailing terminators, closing
//! quotes or brackets) when whitespace follows and the next word does not
//! start in lowercase.  Abbreviations, single-letter initials and decimal
//! numbers do not end a sentence; a blank line always does.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

/// Tokens (lowercased, without the final period) that are followed by a
/// period without ending the sentence.
static ABBREVIATIONS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "mr", "mrs", "ms", "dr", "drs", "st", "jr", "sr", "prof", "rev", "hon", "gen", "col",
        "capt", "sgt", "lt", "maj", "esq", "vs", "etc", "e.g", "i.e", "inc", "ltd", "co", "corp",
        "no", "vol", "fig", "approx", "dept", "est", "mt", "ft", "jan", "feb", "mar", "apr",
        "jun", "jul", "aug", "sep", "sept", "oct", "nov", "dec", "u.s", "u.k", "a.m", "p.m",
    ]
    .into_iter()
    .collect()
});

/// Two or more newlines (with optional blanks between): a paragraph break.
static RE_PARAGRAPH: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n[ \t\r]*\n\s*").unwrap());

fn is_terminator(c: char) -> bool {
    matches!(c, '.' | '!' | '?')
}

fn is_closer(c: char) -> bool {
    matches!(c, '"' | '\'' | ')' | ']' | '}' | '\u{2019}' | '\u{201D}' | '»')
}

fn is_opener(c: char) -> bool {
    matches!(c, '"' | '\'' | '(' | '[' | '{' | '\u{2018}' | '\u{201C}' | '«')
}

/// Rule-based sentence splitter.
#[derive(Debug, Clone, Default)]
pub struct SentenceSegmenter {
    extra_abbreviations: HashSet<String>,
}

impl SentenceSegmenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add domain abbreviations (case-insensitive, without trailing period).
    pub fn with_abbreviations<I, S>(mut self, abbreviations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.extra_abbreviations
            .extend(abbreviations.into_iter().map(|a| a.as_ref().trim_end_matches('.').to_lowercase()));
        self
    }

    /// Split `text` into trimmed, non-empty sentences in input order.
    pub fn split(&self, text: &str) -> Vec<String> {
        RE_PARAGRAPH
            .split(text)
            .flat_map(|paragraph| self.split_paragraph(paragraph))
            .collect()
    }

    fn split_paragraph(&self, text: &str) -> Vec<String> {
        let chars: Vec<(usize, char)> = text.char_indices().collect();
        let mut sentences = Vec::new();
        let mut start = 0usize;
        let mut i = 0usize;

        while i < chars.len() {
            let (_, c) = chars[i];
            if !is_terminator(c) {
                i += 1;
                continue;
            }

            // Swallow runs like "?!", "..." and closing quotes/brackets.
            let mut end = i + 1;
            while end < chars.len() && (is_terminator(chars[end].1) || is_closer(chars[end].1)) {
                end += 1;
            }

            let at_text_end = end == chars.len();
            let followed_by_space = !at_text_end && chars[end].1.is_whitespace();
            if !(at_text_end || followed_by_space) {
                i = end;
                continue;
            }

            let byte_end = chars.get(end).map(|&(b, _)| b).unwrap_or(text.len());
            let candidate = &text[chars[start].0..byte_end];

            if at_text_end || self.is_boundary(candidate, c, &chars[end..]) {
                push_trimmed(&mut sentences, candidate);
                start = end;
            }
            i = end;
        }

        if start < chars.len() {
            push_trimmed(&mut sentences, &text[chars[start].0..]);
        }
        sentences
    }

    /// Decide whether `candidate` (ending in `terminator`) closes a sentence
    /// given the characters that follow it.
    fn is_boundary(&self, candidate: &str, terminator: char, rest: &[(usize, char)]) -> bool {
        // The next word must not start in lowercase ("e.g. the", "approx. ten").
        let next = rest
            .iter()
            .map(|&(_, c)| c)
            .find(|c| !c.is_whitespace() && !is_opener(*c));
        if next.is_some_and(|c| c.is_lowercase()) {
            return false;
        }
        if terminator != '.' {
            return true;
        }

        let body = candidate.trim_end_matches(|c: char| is_terminator(c) || is_closer(c));
        let last_word = body
            .rsplit(|c: char| c.is_whitespace() || is_opener(c))
            .next()
            .unwrap_or("");

        // "J. R. R. Tolkien"
        let mut letters = last_word.chars();
        if let (Some(only), None) = (letters.next(), letters.next()) {
            if only.is_alphabetic() {
                return false;
            }
        }

        let key = last_word.to_lowercase();
        !(ABBREVIATIONS.contains(key.as_str()) || self.extra_abbreviations.contains(&key))
    }
}

fn push_trimmed(sentences: &mut Vec<String>, s: &str) {
    let s = s.trim();
    if !s.is_empty() {
        sentences.push(s.to_string());
    }
}

/// Split `text` with the default segmenter.
pub fn split_sentences(text: &str) -> Vec<String> {
    SentenceSegmenter::new().split(text)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
