/*!
 * Where reading text comes from.
 *
 * Fetching pages and pulling the main text out of HTML are left to
 * collaborators behind the [`Fetcher`] and [`Extractor`] traits. Whatever
 * goes wrong there never stops the reader: the error message itself becomes
 * the text to read.
 */

use async_trait::async_trait;
use log::{info, warn};
use std::fmt::Debug;

use crate::errors::SourceError;
use crate::language_utils::LanguageResolver;

/// Readable content extracted from a document
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExtractedContent {
    pub text: String,
    pub title: Option<String>,

    /// Language the document declares for itself
    pub language_tag: Option<String>,
}

/// Retrieves the raw document behind a URL
#[async_trait]
pub trait Fetcher: Send + Sync + Debug {
    /// Fetch a document
    ///
    /// # Arguments
    /// * `url` - Address of the document
    ///
    /// # Returns
    /// * `Result<String, SourceError>` - The raw HTML, or a displayable error
    async fn fetch(&self, url: &str) -> Result<String, SourceError>;
}

/// Turns raw HTML into readable text
pub trait Extractor: Send + Sync + Debug {
    fn extract(&self, html: &str) -> Result<ExtractedContent, SourceError>;
}

/// Text ready for the token pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadingInput {
    pub text: String,
    pub language_tag: Option<String>,
    pub title: Option<String>,
}

impl ReadingInput {
    /// Plain text with no declared language
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            language_tag: None,
            title: None,
        }
    }

    /// An error message standing in for the content
    pub fn status(error: &SourceError) -> Self {
        Self::plain(error.to_string())
    }

    /// Resolve the language to read this input in
    pub fn resolve_language(
        &self,
        resolver: &LanguageResolver,
        user_default: Option<&str>,
        device_locale: Option<&str>,
    ) -> Option<String> {
        resolver.resolve(self.language_tag.as_deref(), user_default, device_locale)
    }
}

/// Whether input text is an http(s) address rather than text to read
pub fn is_url(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed.starts_with("http://") || trimmed.starts_with("https://")
}

/// Fetch and extract `url`, degrading every failure to a status message
pub async fn load_reading_text(
    fetcher: &dyn Fetcher,
    extractor: &dyn Extractor,
    url: &str,
) -> ReadingInput {
    info!("Fetching {}", url);
    let html = match fetcher.fetch(url).await {
        Ok(html) => html,
        Err(e) => {
            warn!("Fetching {} failed: {}", url, e);
            return ReadingInput::status(&e);
        }
    };

    match extractor.extract(&html) {
        Ok(content) => ReadingInput {
            text: content.text,
            language_tag: content.language_tag,
            title: content.title,
        },
        Err(e) => {
            warn!("Extracting {} failed: {}", url, e);
            ReadingInput::status(&e)
        }
    }
}

/// Resolve the text to read from raw input: fetch URLs, pass text through
pub async fn resolve_input(
    input: &str,
    fetcher: Option<&dyn Fetcher>,
    extractor: Option<&dyn Extractor>,
) -> ReadingInput {
    match (is_url(input), fetcher, extractor) {
        (true, Some(fetcher), Some(extractor)) => {
            load_reading_text(fetcher, extractor, input.trim()).await
        }
        (true, _, _) => ReadingInput::status(&SourceError::Fetch(format!(
            "No fetcher configured for {}",
            input.trim()
        ))),
        (false, _, _) => ReadingInput::plain(input),
    }
}
