/*!
 * Text to final display tokens.
 *
 * Tokenizes text, then cuts every token whose word length exceeds the
 * configured maximum: first at hyphens already in the word, then at
 * hyphenation points, then at fixed intervals.
 */

use log::debug;

use super::{Token, TokenClassifier, Tokenizer};
use crate::hyphenation::{Hyphenator, PatternHyphenator, reattach_affixes, split_affixes};
use crate::language_utils;

/// Characters treated as a literal hyphen inside a word
pub const HYPHEN_CHARS: &[char] = &['-', '\u{2010}', '\u{2011}', '\u{2012}', '\u{2013}', '\u{2212}'];

/// Tokenizer plus long-token splitting
#[derive(Clone, Default)]
pub struct TokenPipeline {
    tokenizer: Tokenizer,
    hyphenator: PatternHyphenator,
    classifier: TokenClassifier,
}

impl TokenPipeline {
    pub fn new(hyphenator: PatternHyphenator) -> Self {
        Self {
            tokenizer: Tokenizer::new(),
            hyphenator,
            classifier: TokenClassifier::new(),
        }
    }

    /// Tokenize `text` and split tokens longer than `max_word_length`
    ///
    /// Without a usable tag both stages run under the system locale.
    pub fn build_tokens(&self, text: &str, language_tag: Option<&str>, max_word_length: usize) -> Vec<Token> {
        if text.trim().is_empty() {
            return Vec::new();
        }

        let tag = language_utils::effective_language_tag(language_tag);
        let raw = self.tokenizer.tokenize(text, Some(&tag));
        debug!("Tokenized {} raw tokens under '{}'", raw.len(), tag);

        self.split_long_tokens(raw, Some(&tag), max_word_length)
    }

    /// Replace every over-long token by sub-tokens that fit
    ///
    /// Tokens that already fit pass through untouched, as does everything
    /// when `max_word_length` is zero.
    pub fn split_long_tokens(
        &self,
        tokens: Vec<Token>,
        language_tag: Option<&str>,
        max_word_length: usize,
    ) -> Vec<Token> {
        if max_word_length == 0 {
            return tokens;
        }

        let mut hyphenator: Option<Hyphenator> = None;
        let mut result = Vec::with_capacity(tokens.len());

        for token in tokens {
            if self.classifier.word_length(&token.text) <= max_word_length {
                result.push(token);
                continue;
            }

            let hyphenator =
                hyphenator.get_or_insert_with(|| self.hyphenator.hyphenator_for(language_tag));

            let (prefix, core, suffix) = split_affixes(&token.text);
            match split_at_hyphen_boundaries(core, max_word_length) {
                Some(pieces) => {
                    for piece in reattach_affixes(prefix, pieces, suffix) {
                        if self.classifier.word_length(&piece) <= max_word_length {
                            result.push(self.classifier.classify(&piece));
                        } else {
                            result.extend(self.split_by_hyphenation(
                                &piece,
                                hyphenator,
                                language_tag,
                                max_word_length,
                            ));
                        }
                    }
                }
                None => result.extend(self.split_by_hyphenation(
                    &token.text,
                    hyphenator,
                    language_tag,
                    max_word_length,
                )),
            }
        }

        result
    }

    fn split_by_hyphenation(
        &self,
        text: &str,
        hyphenator: &Hyphenator,
        language_tag: Option<&str>,
        max_word_length: usize,
    ) -> Vec<Token> {
        let pieces: Vec<String> = hyphenator
            .split(text, language_tag, max_word_length)
            .into_iter()
            .filter(|piece| !piece.is_empty())
            .collect();

        if pieces.is_empty() {
            return vec![self.classifier.classify(text)];
        }

        let last = pieces.len() - 1;
        pieces
            .iter()
            .enumerate()
            .map(|(index, piece)| {
                if index < last {
                    self.classifier.classify(&append_hyphen(piece))
                } else {
                    self.classifier.classify(piece)
                }
            })
            .collect()
    }

    pub fn tokenizer(&self) -> &Tokenizer {
        &self.tokenizer
    }

    pub fn hyphenator(&self) -> &PatternHyphenator {
        &self.hyphenator
    }
}

/// Cut a token after literal hyphens where the following word would overflow
///
/// The hyphen stays on the left piece. Returns `None` when the token has no
/// hyphen or no cut is needed.
pub fn split_at_hyphen_boundaries(text: &str, max_word_length: usize) -> Option<Vec<String>> {
    if !text.contains(HYPHEN_CHARS) {
        return None;
    }

    let chars: Vec<char> = text.chars().collect();
    let mut pieces = Vec::new();
    let mut buffer = String::new();
    let mut word_chars = 0;

    for (i, &ch) in chars.iter().enumerate() {
        if HYPHEN_CHARS.contains(&ch) {
            let next_run = chars[i + 1..]
                .iter()
                .take_while(|c| c.is_alphanumeric())
                .count();
            if next_run > 0 && word_chars + next_run > max_word_length {
                buffer.push(ch);
                pieces.push(std::mem::take(&mut buffer));
                word_chars = 0;
                continue;
            }
        }

        buffer.push(ch);
        if ch.is_alphanumeric() {
            word_chars += 1;
        }
    }
    if !buffer.is_empty() {
        pieces.push(buffer);
    }

    (pieces.len() > 1).then_some(pieces)
}

fn append_hyphen(piece: &str) -> String {
    match piece.chars().last() {
        Some(last) if last.is_alphanumeric() && !HYPHEN_CHARS.contains(&last) => format!("{}-", piece),
        _ => piece.to_string(),
    }
}
