/*!
 * Timing flags for display tokens.
 *
 * Classification looks only at a token's own text, so pieces produced by
 * the long-word splitter are flagged the same way as whole words.
 */

use super::Token;
use super::segments::{Segment, segments_for};

/// Tokens with fewer letters and digits than this are short
pub const SHORT_WORD_THRESHOLD: usize = 5;

/// Tokens with at least this many letters and digits are long
pub const LONG_WORD_THRESHOLD: usize = 9;

/// Full stops, exclamation and question marks across scripts
const SENTENCE_TERMINATORS: &[char] = &[
    '.', '!', '?', '\u{3002}', '\u{FF01}', '\u{FF1F}', '\u{061F}', '\u{FF0E}', '\u{FF61}',
];

/// Derives timing flags from a token's text
///
/// Classification only looks at the text, so a sub-token produced by the
/// splitter is classified exactly like a token straight from the tokenizer.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokenClassifier;

impl TokenClassifier {
    pub fn new() -> Self {
        Self
    }

    pub fn classify(&self, text: &str) -> Token {
        let segments = segments_for(text);
        let word_like: Vec<&Segment<'_>> = segments.iter().filter(|s| s.is_word_like).collect();
        let word_length: usize = word_like.iter().map(|s| s.char_count()).sum();

        let is_sentence_end = is_sentence_end(text);
        let is_other_punctuation =
            !is_sentence_end && segments.iter().any(Segment::is_trivial_punctuation);
        let is_numeric = !word_like.is_empty()
            && word_like
                .iter()
                .all(|s| s.text.chars().all(|c| c.is_ascii_digit()));

        Token {
            text: text.to_string(),
            is_sentence_end,
            is_other_punctuation,
            is_numeric,
            is_short_word: word_length < SHORT_WORD_THRESHOLD,
            is_long_word: word_length >= LONG_WORD_THRESHOLD,
        }
    }

    /// Characters in the word-like segments of `text`, punctuation excluded
    pub fn word_length(&self, text: &str) -> usize {
        segments_for(text)
            .iter()
            .filter(|s| s.is_word_like)
            .map(Segment::char_count)
            .sum()
    }
}

/// Whether the punctuation trailing the last letter or digit ends a sentence
pub fn is_sentence_end(text: &str) -> bool {
    text.chars()
        .rev()
        .take_while(|c| !c.is_alphanumeric())
        .any(|c| SENTENCE_TERMINATORS.contains(&c))
}
