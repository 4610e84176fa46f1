/*!
 * Liang hyphenation patterns.
 *
 * Patterns are parsed into an index-based trie: nodes live in one vector and
 * refer to their children by position, so a finished trie is a flat,
 * read-only structure that can be shared between threads without locking.
 */

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

/// Minimum characters kept on either side of a break when a file says nothing
pub const DEFAULT_HYPHEN_MIN: usize = 2;

static LEFT_MIN_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)%\s*left:\s*(\d+)").expect("Invalid left-min regex")
});

static RIGHT_MIN_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)%\s*right:\s*(\d+)").expect("Invalid right-min regex")
});

/// Word boundary marker used inside patterns and around scored words
const BOUNDARY: char = '.';

#[derive(Debug, Default, Clone)]
struct PatternNode {
    children: HashMap<char, usize>,
    weights: Option<Box<[u8]>>,
}

/// Mutable trie used while a pattern file is being parsed
#[derive(Debug)]
pub struct PatternTrieBuilder {
    nodes: Vec<PatternNode>,
}

impl PatternTrieBuilder {
    pub fn new() -> Self {
        Self {
            nodes: vec![PatternNode::default()],
        }
    }

    /// Insert one pattern such as `a1b` or `.ach4`
    ///
    /// Digits are weights at the gap they occupy; the weight array is one
    /// longer than the letter count and unspecified gaps weigh 0. A pattern
    /// inserted twice keeps the later weights.
    pub fn insert(&mut self, pattern: &str) {
        if pattern.trim().is_empty() {
            return;
        }

        let mut letters = Vec::new();
        let mut weights = vec![0u8];
        for ch in pattern.chars() {
            match ch.to_digit(10) {
                Some(digit) => {
                    if let Some(last) = weights.last_mut() {
                        *last = digit as u8;
                    }
                }
                None => {
                    letters.push(ch);
                    weights.push(0);
                }
            }
        }

        let mut node = 0;
        for ch in letters {
            node = match self.nodes[node].children.get(&ch) {
                Some(&child) => child,
                None => {
                    let child = self.nodes.len();
                    self.nodes.push(PatternNode::default());
                    self.nodes[node].children.insert(ch, child);
                    child
                }
            };
        }
        self.nodes[node].weights = Some(weights.into_boxed_slice());
    }

    /// Freeze the trie
    pub fn build(self) -> PatternTrie {
        let patterns = self.nodes.iter().filter(|node| node.weights.is_some()).count();
        PatternTrie {
            nodes: self.nodes,
            patterns,
        }
    }
}

impl Default for PatternTrieBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Read-only pattern trie
#[derive(Debug)]
pub struct PatternTrie {
    nodes: Vec<PatternNode>,
    patterns: usize,
}

impl PatternTrie {
    const ROOT: usize = 0;

    fn child(&self, node: usize, ch: char) -> Option<usize> {
        self.nodes[node].children.get(&ch).copied()
    }

    fn weights(&self, node: usize) -> Option<&[u8]> {
        self.nodes[node].weights.as_deref()
    }

    /// Number of distinct patterns stored
    pub fn pattern_count(&self) -> usize {
        self.patterns
    }

    pub fn is_empty(&self) -> bool {
        self.patterns == 0
    }
}

/// The patterns of one language plus its break margins
#[derive(Debug)]
pub struct HyphenationPatternSet {
    trie: PatternTrie,
    min_left: usize,
    min_right: usize,
}

impl HyphenationPatternSet {
    pub fn new(trie: PatternTrie, min_left: usize, min_right: usize) -> Self {
        Self {
            trie,
            min_left,
            min_right,
        }
    }

    /// Parse a TeX pattern file (`\patterns{...}` with `%` comments)
    ///
    /// `% left: N` and `% right: N` metadata lines set the break margins.
    /// Control sequences and tokens holding anything but letters, digits and
    /// the boundary dot (such as hyphenated exception words) are skipped.
    pub fn parse(text: &str) -> Self {
        let min_left = parse_hyphen_min(&LEFT_MIN_REGEX, text).unwrap_or(DEFAULT_HYPHEN_MIN);
        let min_right = parse_hyphen_min(&RIGHT_MIN_REGEX, text).unwrap_or(DEFAULT_HYPHEN_MIN);

        let cleaned = text
            .lines()
            .map(|line| line.split(['%', ';']).next().unwrap_or_default())
            .collect::<Vec<_>>()
            .join("\n")
            .replace("\\patterns", " ")
            .replace("\\hyphenation", " ")
            .replace(['{', '}'], " ");

        let mut builder = PatternTrieBuilder::new();
        for token in cleaned.split_whitespace() {
            if token.starts_with('\\') {
                continue;
            }
            if !token.chars().all(|c| c.is_alphanumeric() || c == BOUNDARY) {
                continue;
            }
            builder.insert(token);
        }

        Self::new(builder.build(), min_left, min_right)
    }

    pub fn min_left(&self) -> usize {
        self.min_left
    }

    pub fn min_right(&self) -> usize {
        self.min_right
    }

    pub fn pattern_count(&self) -> usize {
        self.trie.pattern_count()
    }

    /// Legal break offsets inside `word`, ascending
    ///
    /// An offset `k` means a break may go between the `k`-th and `k+1`-th
    /// character. Weights from every matching pattern are merged with `max`
    /// and odd results allow a break, subject to the left/right margins.
    pub fn hyphenation_points(&self, word: &str, language_tag: Option<&str>) -> Vec<usize> {
        let lower = lowercase_chars(word, language_tag);
        let length = lower.len();
        if length == 0 || length <= self.min_left + self.min_right {
            return Vec::new();
        }

        let mut work = Vec::with_capacity(length + 2);
        work.push(BOUNDARY);
        work.extend_from_slice(&lower);
        work.push(BOUNDARY);

        let mut values = vec![0u8; work.len() + 1];
        for start in 0..work.len() {
            let mut node = PatternTrie::ROOT;
            for &ch in &work[start..] {
                node = match self.trie.child(node, ch) {
                    Some(child) => child,
                    None => break,
                };
                if let Some(weights) = self.trie.weights(node) {
                    for (offset, &weight) in weights.iter().enumerate() {
                        if let Some(slot) = values.get_mut(start + offset) {
                            *slot = (*slot).max(weight);
                        }
                    }
                }
            }
        }

        (1..length)
            .filter(|&k| k >= self.min_left && length - k >= self.min_right)
            .filter(|&k| values[k + 1] % 2 == 1)
            .collect()
    }
}

fn parse_hyphen_min(regex: &Regex, text: &str) -> Option<usize> {
    regex
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Lower-case one character at a time so offsets stay aligned with `word`
///
/// Turkish and Azerbaijani map `I` to dotless `ı` and `İ` to `i`.
fn lowercase_chars(word: &str, language_tag: Option<&str>) -> Vec<char> {
    let turkic = language_tag
        .and_then(crate::language_utils::base_language)
        .is_some_and(|base| base == "tr" || base == "az");

    word.chars()
        .map(|ch| match ch {
            'I' if turkic => 'ı',
            '\u{130}' if turkic => 'i',
            _ => ch.to_lowercase().next().unwrap_or(ch),
        })
        .collect()
}
