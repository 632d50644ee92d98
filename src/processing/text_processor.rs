//! Text normalization, tokenization and context windows
//!
//! Tokens keep their byte span in the source text so every n-gram can be
//! mapped back to the exact substring it came from.

use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

/// Characters trimmed from token edges: sentence periods, bullet dashes, stray slashes
const EDGE_CHARS: &[char] = &['.', '/', '-'];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Lower-cased token text
    pub text: String,
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NGram {
    /// Lower-cased tokens joined with single spaces
    pub text: String,
    pub start: usize,
    pub end: usize,
    pub token_count: usize,
}

/// Alphanumerics plus the symbols that appear inside skill names (c++, c#, node.js, ci/cd, scikit-learn)
pub fn is_token_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '+' | '#' | '.' | '/' | '-')
}

/// Split text into lower-cased tokens with their byte spans
pub fn tokenize(text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut current: Option<usize> = None;

    for (idx, ch) in text.char_indices() {
        if is_token_char(ch) {
            if current.is_none() {
                current = Some(idx);
            }
        } else if let Some(start) = current.take() {
            push_token(text, start, idx, &mut tokens);
        }
    }
    if let Some(start) = current {
        push_token(text, start, text.len(), &mut tokens);
    }

    tokens
}

fn push_token(text: &str, start: usize, end: usize, tokens: &mut Vec<Token>) {
    let raw = &text[start..end];
    let without_lead = raw.trim_start_matches(EDGE_CHARS);
    let trimmed = without_lead.trim_end_matches(EDGE_CHARS);
    if trimmed.is_empty() {
        return;
    }

    let token_start = start + (raw.len() - without_lead.len());
    tokens.push(Token {
        text: trimmed.to_lowercase(),
        start: token_start,
        end: token_start + trimmed.len(),
    });
}

/// Canonical form of a phrase: its tokens joined by single spaces
pub fn normalize_phrase(phrase: &str) -> String {
    tokenize(phrase)
        .into_iter()
        .map(|t| t.text)
        .collect::<Vec<_>>()
        .join(" ")
}

/// All sliding n-grams of 1..=max_n tokens, in text order then by length
pub fn ngrams(tokens: &[Token], max_n: usize) -> Vec<NGram> {
    let mut grams = Vec::new();

    for i in 0..tokens.len() {
        let longest = max_n.min(tokens.len() - i);
        for n in 1..=longest {
            let window = &tokens[i..i + n];
            grams.push(NGram {
                text: window.iter().map(|t| t.text.as_str()).collect::<Vec<_>>().join(" "),
                start: window[0].start,
                end: window[n - 1].end,
                token_count: n,
            });
        }
    }

    grams
}

/// Map typographic punctuation to ASCII so cue patterns see "don't", not "don’t"
pub fn normalize_unicode(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\u{2018}' | '\u{2019}' => '\'',
            '\u{201C}' | '\u{201D}' => '"',
            '\u{2013}' | '\u{2014}' => '-',
            '\u{2026}' => '.',
            _ => c,
        })
        .collect()
}

/// Last `n` chars of `s`
pub fn last_chars(s: &str, n: usize) -> &str {
    if n == 0 {
        return "";
    }
    match s.char_indices().rev().nth(n - 1) {
        Some((idx, _)) => &s[idx..],
        None => s,
    }
}

/// First `n` chars of `s`
pub fn first_chars(s: &str, n: usize) -> &str {
    match s.char_indices().nth(n) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Whether `[start, end)` in `text` is not glued to surrounding letters or digits
pub fn is_word_boundary(text: &str, start: usize, end: usize) -> bool {
    let before_ok = text[..start].chars().next_back().map_or(true, |c| !c.is_alphanumeric());
    let after_ok = text[end..].chars().next().map_or(true, |c| !c.is_alphanumeric());
    before_ok && after_ok
}

/// Char index of a byte offset
pub fn char_index(text: &str, byte_offset: usize) -> usize {
    text[..byte_offset].chars().count()
}

/// Bounded, lower-cased text surrounding a match, with the match located inside it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextWindow {
    pub text: String,
    pub match_start: usize,
    pub match_end: usize,
}

impl ContextWindow {
    /// Window of `radius` user-perceived characters on each side of `text[start..end]`
    pub fn around(text: &str, start: usize, end: usize, radius: usize) -> Self {
        let before = &text[..start];
        let after = &text[end..];

        let window_start = if radius == 0 {
            start
        } else {
            before
                .grapheme_indices(true)
                .rev()
                .nth(radius - 1)
                .map_or(0, |(idx, _)| idx)
        };
        let window_end = after
            .grapheme_indices(true)
            .nth(radius)
            .map_or(text.len(), |(idx, _)| end + idx);

        let prefix = normalize_unicode(&text[window_start..start]).to_lowercase();
        let matched = normalize_unicode(&text[start..end]).to_lowercase();
        let suffix = normalize_unicode(&text[end..window_end]).to_lowercase();

        let match_start = prefix.len();
        let match_end = match_start + matched.len();
        Self {
            text: format!("{}{}{}", prefix, matched, suffix),
            match_start,
            match_end,
        }
    }

    /// Build from a pre-cut window and the first occurrence of `needle` inside it
    pub fn locate(window: &str, needle: &str) -> Option<Self> {
        let text = normalize_unicode(window).to_lowercase();
        let needle = normalize_unicode(needle).to_lowercase();
        if needle.is_empty() {
            return None;
        }
        let match_start = text.find(&needle)?;
        Some(Self {
            match_end: match_start + needle.len(),
            match_start,
            text,
        })
    }

    pub fn before(&self) -> &str {
        &self.text[..self.match_start]
    }

    pub fn matched(&self) -> &str {
        &self.text[self.match_start..self.match_end]
    }

    pub fn after(&self) -> &str {
        &self.text[self.match_end..]
    }
}
