use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::errors::ConfigError;
use crate::language_utils;

/// Application configuration module
/// This module handles the reader configuration including loading,
/// clamping, validating and saving settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Playback pacing options
    #[serde(default)]
    pub playback: PlaybackOptions,

    /// Long-word handling options
    #[serde(default)]
    pub text_handling: TextHandlingOptions,

    /// Language selection options
    #[serde(default)]
    pub language: LanguageOptions,

    /// Hyphenation pattern resources
    #[serde(default)]
    pub hyphenation: HyphenationConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Timing options consumed by the scheduler
///
/// Every delay factor multiplies the base per-word delay of `60000 / wpm`
/// milliseconds. Use [`PlaybackOptions::clamped`] to bring values loaded from
/// outside into their documented ranges.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct PlaybackOptions {
    /// Words per minute
    pub wpm: u32,

    /// Number of leading tokens shown progressively slower
    pub slow_start_count: u32,

    /// Factor for tokens ending a sentence
    pub sentence_delay: f32,

    /// Factor for tokens carrying other punctuation
    pub other_punc_delay: f32,

    /// Factor for short words
    pub short_word_delay: f32,

    /// Factor for long words
    pub long_word_delay: f32,

    /// Factor for numbers
    pub numeric_delay: f32,

    /// Tokens moved by one skip
    pub skip_count: u32,
}

impl PlaybackOptions {
    pub const MIN_WPM: u32 = 50;
    pub const MAX_WPM: u32 = 1800;
    pub const MIN_SLOW_START: u32 = 1;
    pub const MAX_SLOW_START: u32 = 10;
    pub const MIN_DELAY_FACTOR: f32 = 1.0;
    pub const MAX_DELAY_FACTOR: f32 = 10.0;
    pub const MIN_SKIP_COUNT: u32 = 0;
    pub const MAX_SKIP_COUNT: u32 = 100;

    /// Return a copy with every field inside its documented range
    pub fn clamped(&self) -> Self {
        Self {
            wpm: self.wpm.clamp(Self::MIN_WPM, Self::MAX_WPM),
            slow_start_count: self.slow_start_count.clamp(Self::MIN_SLOW_START, Self::MAX_SLOW_START),
            sentence_delay: clamp_factor(self.sentence_delay),
            other_punc_delay: clamp_factor(self.other_punc_delay),
            short_word_delay: clamp_factor(self.short_word_delay),
            long_word_delay: clamp_factor(self.long_word_delay),
            numeric_delay: clamp_factor(self.numeric_delay),
            skip_count: self.skip_count.clamp(Self::MIN_SKIP_COUNT, Self::MAX_SKIP_COUNT),
        }
    }

    /// Options with every multiplier neutral, useful for steady pacing
    pub fn uniform(wpm: u32) -> Self {
        Self {
            wpm,
            slow_start_count: 1,
            sentence_delay: 1.0,
            other_punc_delay: 1.0,
            short_word_delay: 1.0,
            long_word_delay: 1.0,
            numeric_delay: 1.0,
            ..Self::default()
        }
    }
}

impl Default for PlaybackOptions {
    fn default() -> Self {
        Self {
            wpm: 400,
            slow_start_count: 5,
            sentence_delay: 2.5,
            other_punc_delay: 1.5,
            short_word_delay: 1.3,
            long_word_delay: 1.4,
            numeric_delay: 1.8,
            skip_count: 10,
        }
    }
}

// NaN compares false everywhere, so it is pinned to the minimum
fn clamp_factor(value: f32) -> f32 {
    if value.is_nan() {
        return PlaybackOptions::MIN_DELAY_FACTOR;
    }
    value.clamp(PlaybackOptions::MIN_DELAY_FACTOR, PlaybackOptions::MAX_DELAY_FACTOR)
}

/// Options controlling how over-long words are cut
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct TextHandlingOptions {
    /// Maximum letters and digits shown in one token
    pub max_word_length: usize,

    /// Whether neighbouring words are shown dimmed around the current one
    pub show_flankers: bool,
}

impl TextHandlingOptions {
    pub const MIN_MAX_WORD_LENGTH: usize = 5;
    pub const MAX_MAX_WORD_LENGTH: usize = 50;

    pub fn clamped(&self) -> Self {
        Self {
            max_word_length: self
                .max_word_length
                .clamp(Self::MIN_MAX_WORD_LENGTH, Self::MAX_MAX_WORD_LENGTH),
            ..*self
        }
    }
}

impl Default for TextHandlingOptions {
    fn default() -> Self {
        Self {
            max_word_length: 13,
            show_flankers: false,
        }
    }
}

/// Options controlling which language text is processed under
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct LanguageOptions {
    /// Trust the language a document declares about itself
    pub auto_detect_from_html: bool,

    /// Language used when the document declares none; `None` means auto
    pub default_language_tag: Option<String>,
}

impl LanguageOptions {
    /// Blank default tags mean "auto"
    pub fn normalized(&self) -> Self {
        Self {
            default_language_tag: self
                .default_language_tag
                .as_deref()
                .map(str::trim)
                .filter(|tag| !tag.is_empty())
                .map(str::to_string),
            ..self.clone()
        }
    }
}

impl Default for LanguageOptions {
    fn default() -> Self {
        Self {
            auto_detect_from_html: true,
            default_language_tag: None,
        }
    }
}

/// Where hyphenation patterns are read from
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(default)]
pub struct HyphenationConfig {
    /// Directory of hyph-utf8 style `.tex` pattern files, searched before
    /// the patterns bundled with the binary
    pub patterns_dir: Option<PathBuf>,
}

impl HyphenationConfig {
    /// The configured directory, or `<data dir>/stutter/hyphenation` when it exists
    pub fn effective_patterns_dir(&self) -> Option<PathBuf> {
        if let Some(dir) = &self.patterns_dir {
            return Some(dir.clone());
        }
        dirs::data_dir()
            .map(|dir| dir.join("stutter").join("hyphenation"))
            .filter(|dir| dir.is_dir())
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

impl Config {
    /// Load a configuration file, applying defaults for missing fields
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let file = File::open(path.as_ref())?;
        let config: Config = serde_json::from_reader(BufReader::new(file))?;
        Ok(config.clamped())
    }

    /// Write the configuration as pretty-printed JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        Ok(())
    }

    /// Return a copy with all numeric options clamped and tags normalized
    pub fn clamped(&self) -> Self {
        Self {
            playback: self.playback.clamped(),
            text_handling: self.text_handling.clamped(),
            language: self.language.normalized(),
            ..self.clone()
        }
    }

    /// Validate the configuration for consistency
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(tag) = self.language.normalized().default_language_tag {
            if language_utils::canonical_tag(&tag).is_none() {
                return Err(ConfigError::InvalidLanguageTag(tag));
            }
        }
        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            playback: PlaybackOptions::default(),
            text_handling: TextHandlingOptions::default(),
            language: LanguageOptions::default(),
            hyphenation: HyphenationConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
