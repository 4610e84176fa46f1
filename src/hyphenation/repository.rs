/*!
 * Hyphenation pattern lookup and caching.
 *
 * Tags are reduced to their base language, mapped to a pattern resource
 * name through a static table, read from a [`PatternSource`] and parsed once.
 * Results, including "no patterns for this language", are cached for the
 * lifetime of the repository.
 */

use log::{debug, warn};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::patterns::HyphenationPatternSet;
use crate::language_utils;

/// Base language -> pattern resource name
const PATTERN_RESOURCES: &[(&str, &str)] = &[
    ("ar", "hyph-ar.tex"),
    ("bn", "hyph-bn.tex"),
    ("de", "hyph-de-1996.tex"),
    ("en", "hyph-en-us.tex"),
    ("es", "hyph-es.tex"),
    ("fa", "hyph-fa.tex"),
    ("fr", "hyph-fr.tex"),
    ("hi", "hyph-hi.tex"),
    ("id", "hyph-id.tex"),
    ("it", "hyph-it.tex"),
    ("mr", "hyph-mr.tex"),
    ("pt", "hyph-pt.tex"),
    ("ru", "hyph-ru.tex"),
    ("ta", "hyph-ta.tex"),
    ("te", "hyph-te.tex"),
    ("th", "hyph-th.tex"),
    ("tr", "hyph-tr.tex"),
    ("vi", "hyph-vi.tex"),
];

/// Patterns compiled into the binary
const EMBEDDED_RESOURCES: &[(&str, &str)] = &[
    ("hyph-de-1996.tex", include_str!("../../patterns/hyph-de-1996.tex")),
    ("hyph-en-us.tex", include_str!("../../patterns/hyph-en-us.tex")),
    ("hyph-fr.tex", include_str!("../../patterns/hyph-fr.tex")),
];

/// Resource name for a base language, if the language is in the table
pub fn resource_for(base_language: &str) -> Option<&'static str> {
    PATTERN_RESOURCES
        .iter()
        .find(|(language, _)| *language == base_language)
        .map(|(_, resource)| *resource)
}

/// Base languages that have an entry in the resource table
pub fn known_languages() -> impl Iterator<Item = &'static str> {
    PATTERN_RESOURCES.iter().map(|(language, _)| *language)
}

/// Something that can produce the text of a named pattern resource
pub trait PatternSource: Send + Sync {
    /// Return the resource text, or `None` when this source does not have it
    fn read(&self, resource: &str) -> Option<String>;
}

/// Patterns bundled with the binary
#[derive(Debug, Default, Clone, Copy)]
pub struct EmbeddedPatterns;

impl PatternSource for EmbeddedPatterns {
    fn read(&self, resource: &str) -> Option<String> {
        EMBEDDED_RESOURCES
            .iter()
            .find(|(name, _)| *name == resource)
            .map(|(_, text)| text.to_string())
    }
}

/// Pattern files in a directory, e.g. a hyph-utf8 `patterns/tex` tree
#[derive(Debug, Clone)]
pub struct DirectoryPatterns {
    dir: PathBuf,
}

impl DirectoryPatterns {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }
}

impl PatternSource for DirectoryPatterns {
    fn read(&self, resource: &str) -> Option<String> {
        let path = self.dir.join(resource);
        match std::fs::read_to_string(&path) {
            Ok(text) => Some(text),
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => {
                warn!("Failed to read hyphenation patterns {:?}: {}", path, e);
                None
            }
        }
    }
}

/// Tries each source in order and returns the first hit
pub struct LayeredPatterns {
    sources: Vec<Box<dyn PatternSource>>,
}

impl LayeredPatterns {
    pub fn new(sources: Vec<Box<dyn PatternSource>>) -> Self {
        Self { sources }
    }

    /// An optional directory searched before the embedded patterns
    pub fn with_directory(dir: Option<PathBuf>) -> Self {
        let mut sources: Vec<Box<dyn PatternSource>> = Vec::new();
        if let Some(dir) = dir {
            sources.push(Box::new(DirectoryPatterns::new(dir)));
        }
        sources.push(Box::new(EmbeddedPatterns));
        Self::new(sources)
    }
}

impl PatternSource for LayeredPatterns {
    fn read(&self, resource: &str) -> Option<String> {
        self.sources.iter().find_map(|source| source.read(resource))
    }
}

/// Read-through cache of parsed pattern sets, one entry per base language
///
/// Safe to share between threads. Concurrent first lookups of the same
/// language may both parse, but only the first stored result is kept.
pub struct PatternRepository {
    source: Box<dyn PatternSource>,
    cache: RwLock<HashMap<String, Option<Arc<HyphenationPatternSet>>>>,
    hits: AtomicUsize,
    misses: AtomicUsize,
}

impl PatternRepository {
    pub fn new(source: Box<dyn PatternSource>) -> Self {
        Self {
            source,
            cache: RwLock::new(HashMap::new()),
            hits: AtomicUsize::new(0),
            misses: AtomicUsize::new(0),
        }
    }

    /// Repository over the patterns bundled with the binary
    pub fn embedded() -> Self {
        Self::new(Box::new(EmbeddedPatterns))
    }

    /// Pattern set for a language tag, or `None` when unsupported
    pub fn load(&self, language_tag: Option<&str>) -> Option<Arc<HyphenationPatternSet>> {
        let key = language_tag.and_then(language_utils::base_language)?;

        if let Some(cached) = self.cache.read().get(&key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            debug!("Pattern cache hit for '{}'", key);
            return cached.clone();
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        debug!("Pattern cache miss for '{}'", key);
        let loaded = self.load_uncached(&key);

        let mut cache = self.cache.write();
        cache.entry(key).or_insert(loaded).clone()
    }

    fn load_uncached(&self, base_language: &str) -> Option<Arc<HyphenationPatternSet>> {
        let resource = resource_for(base_language)?;
        let text = match self.source.read(resource) {
            Some(text) => text,
            None => {
                debug!("No hyphenation resource {} for '{}'", resource, base_language);
                return None;
            }
        };

        let set = HyphenationPatternSet::parse(&text);
        if set.pattern_count() == 0 {
            warn!("Hyphenation resource {} contains no patterns", resource);
            return None;
        }
        debug!(
            "Loaded {} hyphenation patterns for '{}' (left {}, right {})",
            set.pattern_count(),
            base_language,
            set.min_left(),
            set.min_right()
        );
        Some(Arc::new(set))
    }

    /// Get cache statistics as (hits, misses, hit rate)
    pub fn stats(&self) -> (usize, usize, f64) {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let total = hits + misses;

        let hit_rate = if total > 0 {
            hits as f64 / total as f64
        } else {
            0.0
        };

        (hits, misses, hit_rate)
    }

    /// Number of cached languages, supported or not
    pub fn len(&self) -> usize {
        self.cache.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.read().is_empty()
    }
}

impl Default for PatternRepository {
    fn default() -> Self {
        Self::embedded()
    }
}
