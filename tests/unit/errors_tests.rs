/*!
 * Tests for error types
 */

use stutter::errors::{AppError, ConfigError, SourceError};

/// Test that source errors display their message verbatim
#[test]
fn test_source_error_display_shouldBeMessageOnly() {
    let error = SourceError::Fetch("Network unavailable".to_string());
    assert_eq!(error.to_string(), "Network unavailable");

    let error = SourceError::Extract("No readable content".to_string());
    assert_eq!(error.to_string(), "No readable content");
}

/// Test conversions into the application error
#[test]
fn test_app_error_from_conversions_shouldWrapSources() {
    let error: AppError = ConfigError::InvalidLanguageTag("1234".to_string()).into();
    assert_eq!(error.to_string(), "Config error: Invalid language tag: 1234");

    let error: AppError = SourceError::Fetch("timeout".to_string()).into();
    assert!(matches!(error, AppError::Source(_)));

    let error: AppError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
    assert!(matches!(error, AppError::File(_)));

    let error: AppError = anyhow::anyhow!("boom").into();
    assert_eq!(error.to_string(), "Unknown error: boom");
}
