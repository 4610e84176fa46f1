/*!
 * Word-boundary segmentation.
 *
 * Text is cut at Unicode (UAX #29) word boundaries. Each segment records
 * whether it is whitespace or holds a letter or digit, which is all the
 * tokenizer and classifier need to know about it.
 */

use once_cell::sync::Lazy;
use regex::Regex;
use unicode_segmentation::UnicodeSegmentation;

/// Punctuation and symbol runs that attach to a neighbouring word
static TRIVIAL_PUNCTUATION_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[\p{P}\p{S}。、・：；？！「」（）【】『』［］〔〕〈〉《》]+$")
        .expect("Invalid trivial punctuation regex")
});

/// One piece of text between two word boundaries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment<'a> {
    pub text: &'a str,

    /// Every character is whitespace
    pub is_whitespace: bool,

    /// At least one character is a letter or digit
    pub is_word_like: bool,
}

impl<'a> Segment<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            is_whitespace: text.chars().all(char::is_whitespace),
            is_word_like: text.chars().any(char::is_alphanumeric),
        }
    }

    /// Neither whitespace nor word-like, and made only of punctuation or symbols
    pub fn is_trivial_punctuation(&self) -> bool {
        !self.is_whitespace && !self.is_word_like && TRIVIAL_PUNCTUATION_REGEX.is_match(self.text)
    }

    /// Characters in the segment
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }
}

/// Split text at Unicode (UAX #29) word boundaries
///
/// The concatenation of all returned segments is exactly `text`.
pub fn segments_for(text: &str) -> Vec<Segment<'_>> {
    text.split_word_bounds().map(Segment::new).collect()
}
