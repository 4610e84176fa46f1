/*!
 * Tests for the application controller lifecycle
 */

use anyhow::Result;
use stutter::app_config::Config;
use stutter::app_controller::{Controller, PlaybackCommand, WPM_STEP};
use stutter::source::{self, ReadingInput};
use stutter::{PlaybackOptions, Scheduler, Token};

use crate::common;

fn english_config() -> Config {
    let mut config = Config::default();
    config.language.default_language_tag = Some("en".to_string());
    config
}

/// Test controller creation with an invalid configuration
#[test]
fn test_controller_with_config_withInvalidTag_shouldFail() {
    let mut config = Config::default();
    config.language.default_language_tag = Some("12".to_string());
    assert!(Controller::with_config(config).is_err());
}

/// Test language resolution order through the controller
#[test]
fn test_resolve_language_withDocumentTag_shouldPreferDocument() -> Result<()> {
    let controller = Controller::with_config(english_config())?;

    let input = ReadingInput {
        language_tag: Some("fr".to_string()),
        ..ReadingInput::plain("Bonjour")
    };
    assert_eq!(controller.resolve_language(&input), "fr");
    assert_eq!(controller.resolve_language(&ReadingInput::plain("Hello")), "en");

    let mut config = english_config();
    config.language.auto_detect_from_html = false;
    let controller = Controller::with_config(config)?;
    assert_eq!(controller.resolve_language(&input), "en");
    Ok(())
}

/// Test token preparation with the configured limit
#[test]
fn test_prepare_tokens_withLongWord_shouldSplit() -> Result<()> {
    let mut config = english_config();
    config.text_handling.max_word_length = 5;
    let controller = Controller::with_config(config)?;

    let tokens = controller.prepare_tokens(&ReadingInput::plain("A characterization."));
    assert_eq!(common::texts(&tokens), vec!["A", "char-", "acter-", "iza-", "tion."]);
    Ok(())
}

/// Test that a patterns directory from the config is used
#[test]
fn test_prepare_tokens_withPatternsDirectory_shouldUseExtraLanguage() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_test_patterns(temp_dir.path())?;

    let mut config = Config::default();
    config.language.default_language_tag = Some("it".to_string());
    config.text_handling.max_word_length = 5;
    config.hyphenation.patterns_dir = Some(temp_dir.path().to_path_buf());
    let controller = Controller::with_config(config)?;

    let tokens = controller.prepare_tokens(&ReadingInput::plain("Il tavolino."));
    assert_eq!(common::texts(&tokens), vec!["Il", "tavo-", "lino."]);
    Ok(())
}

/// Test that a URL without a fetcher reads its status message
#[tokio::test]
async fn test_prepare_tokens_withUnfetchedUrl_shouldReadStatus() -> Result<()> {
    let controller = Controller::with_config(english_config())?;
    let input = source::resolve_input("https://example.org/article", None, None).await;
    let tokens = controller.prepare_tokens(&input);

    assert_eq!(tokens.first().map(|t| t.text.as_str()), Some("No"));
    assert!(tokens.iter().any(|t| t.text == "fetcher"));
    Ok(())
}

/// Test the token table and JSON listings
#[test]
fn test_format_token_listings_shouldIncludeTiming() -> Result<()> {
    let mut config = english_config();
    config.playback = PlaybackOptions::uniform(60);
    let controller = Controller::with_config(config)?;
    let tokens = controller.prepare_tokens(&ReadingInput::plain("Status message"));

    let table = controller.format_token_table(&tokens);
    let lines: Vec<&str> = table.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].contains("offset"));
    assert!(lines[1].ends_with("Status"));
    assert!(lines[2].contains("1000"));

    let json: serde_json::Value = serde_json::from_str(&controller.format_token_json(&tokens)?)?;
    let rows = json.as_array().expect("array of rows");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1]["text"], "message");
    assert_eq!(rows[1]["offset_ms"], 1000);
    assert_eq!(rows[1]["delay_ms"], 1000);
    assert_eq!(rows[1]["is_sentence_end"], false);
    Ok(())
}

/// Test flanker rendering around the current token
#[test]
fn test_display_text_withFlankers_shouldShowNeighbours() {
    let tokens: Vec<Token> = ["one", "two", "three"].iter().map(|t| Token::classified(t)).collect();

    assert_eq!(Controller::display_text(&tokens, 1, false), "two");
    let shown = Controller::display_text(&tokens, 0, true);
    assert!(shown.contains("one"));
    assert!(shown.contains("two"));
    assert_eq!(Controller::display_text(&tokens, 9, false), "");
}

/// Test live commands against a scheduler
#[tokio::test(start_paused = true)]
async fn test_apply_command_shouldDriveScheduler() {
    let scheduler = Scheduler::new();
    let tokens: Vec<Token> = ["a", "b", "c"].iter().map(|t| Token::classified(t)).collect();
    scheduler.load(tokens, PlaybackOptions::uniform(200));

    assert!(Controller::apply_command(&scheduler, PlaybackCommand::Faster));
    assert_eq!(scheduler.options().wpm, 200 + WPM_STEP);
    assert!(Controller::apply_command(&scheduler, PlaybackCommand::Slower));
    assert!(Controller::apply_command(&scheduler, PlaybackCommand::Slower));
    assert_eq!(scheduler.options().wpm, 200 - WPM_STEP);

    assert!(Controller::apply_command(&scheduler, PlaybackCommand::SkipForward));
    assert_eq!(scheduler.current_index(), 2);
    assert!(!Controller::apply_command(&scheduler, PlaybackCommand::Quit));
}

/// Test a full non-interactive read
#[tokio::test(start_paused = true)]
async fn test_run_reading_withTokens_shouldFinish() -> Result<()> {
    let mut config = english_config();
    config.playback = PlaybackOptions::uniform(600);
    let controller = Controller::with_config(config)?;
    let tokens = controller.prepare_tokens(&ReadingInput::plain("Read these four words."));

    controller.run_reading(tokens, false).await?;
    controller.run_reading(Vec::new(), false).await?;
    Ok(())
}
