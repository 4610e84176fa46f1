/*!
 * Tests for application configuration functionality
 */

use anyhow::Result;
use stutter::app_config::{Config, LogLevel, PlaybackOptions};
use stutter::errors::ConfigError;

use crate::common;

/// Test default configuration values
#[test]
fn test_default_config_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();

    assert_eq!(config.playback.wpm, 400);
    assert_eq!(config.playback.slow_start_count, 5);
    assert_eq!(config.playback.skip_count, 10);
    assert_eq!(config.text_handling.max_word_length, 13);
    assert!(config.language.auto_detect_from_html);
    assert!(config.language.default_language_tag.is_none());
    assert!(config.hyphenation.patterns_dir.is_none());
    assert_eq!(config.log_level, LogLevel::Info);
    assert!(config.validate().is_ok());
}

/// Test saving and loading a configuration file
#[test]
fn test_config_save_and_load_withTempFile_shouldPreserveValues() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("conf.json");

    let mut config = Config::default();
    config.playback.wpm = 600;
    config.text_handling.max_word_length = 9;
    config.language.default_language_tag = Some("de-AT".to_string());
    config.log_level = LogLevel::Debug;
    config.save(&path)?;

    let loaded = Config::from_file(&path)?;
    assert_eq!(loaded, config);
    Ok(())
}

/// Test that missing sections fall back to defaults
#[test]
fn test_config_from_file_withPartialJson_shouldFillDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(
        temp_dir.path(),
        "partial.json",
        r#"{ "playback": { "wpm": 250 }, "log_level": "warn" }"#,
    )?;

    let config = Config::from_file(&path)?;
    assert_eq!(config.playback.wpm, 250);
    assert_eq!(config.playback.sentence_delay, PlaybackOptions::default().sentence_delay);
    assert_eq!(config.text_handling.max_word_length, 13);
    assert_eq!(config.log_level, LogLevel::Warn);
    Ok(())
}

/// Test that out-of-range values are clamped on load
#[test]
fn test_config_from_file_withOutOfRangeValues_shouldClamp() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(
        temp_dir.path(),
        "wild.json",
        r#"{
            "playback": { "wpm": 5, "slow_start_count": 0, "sentence_delay": 50.0, "skip_count": 1000 },
            "text_handling": { "max_word_length": 2 }
        }"#,
    )?;

    let config = Config::from_file(&path)?;
    assert_eq!(config.playback.wpm, PlaybackOptions::MIN_WPM);
    assert_eq!(config.playback.slow_start_count, 1);
    assert_eq!(config.playback.sentence_delay, PlaybackOptions::MAX_DELAY_FACTOR);
    assert_eq!(config.playback.skip_count, PlaybackOptions::MAX_SKIP_COUNT);
    assert_eq!(config.text_handling.max_word_length, 5);
    Ok(())
}

/// Test parse failures surface as config errors
#[test]
fn test_config_from_file_withInvalidJson_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "broken.json", "{ not json")?;

    assert!(matches!(Config::from_file(&path), Err(ConfigError::Parse(_))));
    assert!(matches!(
        Config::from_file(temp_dir.path().join("missing.json")),
        Err(ConfigError::Io(_))
    ));
    Ok(())
}

/// Test configuration validation of language tags
#[test]
fn test_config_validation_withInvalidLanguageTag_shouldFail() {
    let mut config = Config::default();
    config.language.default_language_tag = Some("1234".to_string());
    assert!(matches!(config.validate(), Err(ConfigError::InvalidLanguageTag(_))));

    // Blank means "auto"
    config.language.default_language_tag = Some("   ".to_string());
    assert!(config.validate().is_ok());
    assert!(config.clamped().language.default_language_tag.is_none());
}

/// Test log level conversion
#[test]
fn test_log_level_into_level_filter_shouldMatch() {
    assert_eq!(log::LevelFilter::from(LogLevel::Error), log::LevelFilter::Error);
    assert_eq!(log::LevelFilter::from(LogLevel::Trace), log::LevelFilter::Trace);
}
