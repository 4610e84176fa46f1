/*!
 * Error types for the stutter reader.
 *
 * The reading pipeline itself (tokenizer, splitter, pattern engine and
 * scheduler) never fails; these types cover the application edges:
 * configuration, input loading and the source collaborators.
 */

use thiserror::Error;

/// Errors that can occur while loading or validating configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file could not be read or written
    #[error("Config I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration file is not valid JSON for the expected schema
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    /// A language tag in the configuration does not name a language
    #[error("Invalid language tag: {0}")]
    InvalidLanguageTag(String),
}

/// Errors reported by the (external) content extraction collaborator
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    /// Fetching the remote document failed
    #[error("{0}")]
    Fetch(String),

    /// The document was fetched but held no readable text
    #[error("{0}")]
    Extract(String),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from configuration handling
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Error from a content source
    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
