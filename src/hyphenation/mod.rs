/*!
 * Hyphenation for over-long words.
 *
 * A [`Hyphenator`] cuts a word into pieces no longer than a maximum number of
 * characters. When Liang patterns exist for the language the cuts land on
 * legal syllable breaks; otherwise the word is chopped into fixed-size runs.
 */

pub mod patterns;
pub mod repository;

use log::debug;
use std::sync::Arc;
use unicode_segmentation::UnicodeSegmentation;

pub use patterns::{HyphenationPatternSet, PatternTrie, PatternTrieBuilder};
pub use repository::{
    DirectoryPatterns, EmbeddedPatterns, LayeredPatterns, PatternRepository, PatternSource,
};

/// Splitting strategy for one language
#[derive(Debug, Clone)]
pub enum Hyphenator {
    /// Break at pattern-derived syllable boundaries
    PatternBased(Arc<HyphenationPatternSet>),

    /// Break every `max_length` characters
    NaiveFallback,
}

impl Hyphenator {
    /// Split `word` into pieces whose alphanumeric core fits `max_length`
    ///
    /// Leading and trailing punctuation stays attached to the first and last
    /// piece. Pieces are returned without added hyphens. A zero maximum or a
    /// word without letters or digits comes back unchanged.
    pub fn split(&self, word: &str, language_tag: Option<&str>, max_length: usize) -> Vec<String> {
        if max_length == 0 || word.is_empty() {
            return vec![word.to_string()];
        }

        let (prefix, core, suffix) = split_affixes(word);
        if core.is_empty() {
            return vec![word.to_string()];
        }
        let core_chars: Vec<char> = core.chars().collect();

        let segments = match self {
            Hyphenator::NaiveFallback => split_naive(&core_chars, max_length),
            Hyphenator::PatternBased(set) => {
                if core_chars.len() <= max_length {
                    return vec![word.to_string()];
                }
                let breakpoints = set.hyphenation_points(core, language_tag);
                split_at_breakpoints(&core_chars, &breakpoints, max_length)
            }
        };

        if segments.is_empty() {
            return vec![word.to_string()];
        }
        reattach_affixes(prefix, segments, suffix)
    }

    pub fn is_pattern_based(&self) -> bool {
        matches!(self, Hyphenator::PatternBased(_))
    }
}

/// Picks a [`Hyphenator`] per language from a shared pattern repository
#[derive(Clone)]
pub struct PatternHyphenator {
    repository: Arc<PatternRepository>,
}

impl PatternHyphenator {
    pub fn new(repository: Arc<PatternRepository>) -> Self {
        Self { repository }
    }

    /// Strategy for a language: patterns when available, naive otherwise
    pub fn hyphenator_for(&self, language_tag: Option<&str>) -> Hyphenator {
        match self.repository.load(language_tag) {
            Some(set) => Hyphenator::PatternBased(set),
            None => {
                debug!("No hyphenation patterns for {:?}, using naive splitting", language_tag);
                Hyphenator::NaiveFallback
            }
        }
    }

    pub fn split(&self, word: &str, language_tag: Option<&str>, max_length: usize) -> Vec<String> {
        self.hyphenator_for(language_tag)
            .split(word, language_tag, max_length)
    }

    pub fn repository(&self) -> &Arc<PatternRepository> {
        &self.repository
    }
}

impl Default for PatternHyphenator {
    fn default() -> Self {
        Self::new(Arc::new(PatternRepository::embedded()))
    }
}

/// Split into (leading punctuation, alphanumeric core, trailing punctuation)
///
/// The core ends with the grapheme cluster of its last letter or digit, so
/// combining marks after it stay in the core. A word without any letter or
/// digit yields three empty parts.
pub fn split_affixes(word: &str) -> (&str, &str, &str) {
    let start = match word.char_indices().find(|(_, c)| c.is_alphanumeric()) {
        Some((index, _)) => index,
        None => return ("", "", ""),
    };
    let last_alphanumeric_end = word
        .char_indices()
        .rev()
        .find(|(_, c)| c.is_alphanumeric())
        .map(|(index, c)| index + c.len_utf8())
        .unwrap_or(word.len());
    let end = word
        .grapheme_indices(true)
        .map(|(index, grapheme)| index + grapheme.len())
        .find(|&end| end >= last_alphanumeric_end)
        .unwrap_or(word.len());

    (&word[..start], &word[start..end], &word[end..])
}

fn split_naive(chars: &[char], max_length: usize) -> Vec<String> {
    chars
        .chunks(max_length)
        .map(|chunk| chunk.iter().collect())
        .collect()
}

/// Greedy left-to-right cut at the rightmost break within reach
fn split_at_breakpoints(chars: &[char], breakpoints: &[usize], max_length: usize) -> Vec<String> {
    if breakpoints.is_empty() {
        return split_naive(chars, max_length);
    }

    let mut segments = Vec::new();
    let mut start = 0;
    while start < chars.len() {
        if chars.len() - start <= max_length {
            segments.push(chars[start..].iter().collect());
            break;
        }

        let cap = start + max_length;
        let end = breakpoints
            .iter()
            .rev()
            .copied()
            .find(|&point| point > start && point <= cap)
            .unwrap_or(cap);
        segments.push(chars[start..end].iter().collect());
        start = end;
    }
    segments
}

pub(crate) fn reattach_affixes(prefix: &str, mut segments: Vec<String>, suffix: &str) -> Vec<String> {
    if let Some(first) = segments.first_mut() {
        first.insert_str(0, prefix);
    }
    if let Some(last) = segments.last_mut() {
        last.push_str(suffix);
    }
    segments
}
