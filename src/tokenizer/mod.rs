/*!
 * Text to display tokens.
 *
 * Raw text is cut at Unicode word boundaries and regrouped into the units
 * shown one at a time: a word together with the punctuation touching it.
 * Every token carries the flags the scheduler uses to pace it.
 */

pub mod classifier;
pub mod pipeline;
pub mod segments;

use serde::Serialize;

use crate::language_utils;
use segments::{Segment, segments_for};

pub use classifier::{LONG_WORD_THRESHOLD, SHORT_WORD_THRESHOLD, TokenClassifier};
pub use pipeline::TokenPipeline;

/// A display unit with its timing flags
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Token {
    pub text: String,
    pub is_sentence_end: bool,
    pub is_other_punctuation: bool,
    pub is_numeric: bool,
    pub is_short_word: bool,
    pub is_long_word: bool,
}

impl Token {
    /// Build a classified token from text
    pub fn classified(text: &str) -> Self {
        TokenClassifier::new().classify(text)
    }
}

/// Splits text into classified tokens
#[derive(Debug, Default, Clone)]
pub struct Tokenizer {
    classifier: TokenClassifier,
}

impl Tokenizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tokenize `text` under a language tag
    ///
    /// A missing or unusable tag falls back to the system locale. Languages
    /// written without spaces get one token per word or character run, with
    /// adjacent punctuation attached; all others get one token per
    /// whitespace-separated run.
    pub fn tokenize(&self, text: &str, language_tag: Option<&str>) -> Vec<Token> {
        if text.trim().is_empty() {
            return Vec::new();
        }

        let tag = language_utils::effective_language_tag(language_tag);
        let segments = segments_for(text);

        let texts = if language_utils::is_space_delimited(&tag) {
            join_space_delimited(&segments)
        } else {
            group_continuous_script(&segments)
        };

        texts
            .iter()
            .map(|text| self.classifier.classify(text))
            .collect()
    }

    pub fn classifier(&self) -> &TokenClassifier {
        &self.classifier
    }
}

fn join_space_delimited(segments: &[Segment<'_>]) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut buffer = String::new();

    for segment in segments {
        if segment.is_whitespace {
            if !buffer.is_empty() {
                tokens.push(std::mem::take(&mut buffer));
            }
            continue;
        }
        buffer.push_str(segment.text);
    }
    if !buffer.is_empty() {
        tokens.push(buffer);
    }

    tokens
}

/// Group segments as (leading punctuation, one word-ish segment, trailing punctuation)
fn group_continuous_script(segments: &[Segment<'_>]) -> Vec<String> {
    let is_core = |segment: &Segment<'_>| !segment.is_whitespace && !segment.is_trivial_punctuation();

    let mut tokens = Vec::new();
    let mut i = 0;
    while i < segments.len() {
        if segments[i].is_whitespace {
            i += 1;
            continue;
        }

        let mut token = String::new();

        // leading punctuation only attaches when a word follows it directly
        while i < segments.len()
            && segments[i].is_trivial_punctuation()
            && segments.get(i + 1).is_some_and(is_core)
        {
            token.push_str(segments[i].text);
            i += 1;
        }

        if i < segments.len() && is_core(&segments[i]) {
            token.push_str(segments[i].text);
            i += 1;
        }

        while i < segments.len() && segments[i].is_trivial_punctuation() {
            token.push_str(segments[i].text);
            i += 1;
        }

        let token = token.trim();
        if !token.is_empty() {
            tokens.push(token.to_string());
        }
    }

    tokens
}
