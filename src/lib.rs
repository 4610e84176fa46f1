/*!
 * # stutter - a rapid serial visual presentation reader
 *
 * Shows text one word at a time at a steady, adjustable pace.
 *
 * ## Features
 *
 * - Unicode word segmentation, including languages written without spaces
 * - Token classification (sentence ends, punctuation, numbers, word length)
 * - Long words split at hyphenation points using Liang patterns:
 *   - Bundled patterns for English, German and French
 *   - Additional `hyph-*.tex` files loaded from a patterns directory
 * - Drift-free playback timing with pause, resume, restart and skipping
 * - Per-token delays for punctuation, short, long and numeric words
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `tokenizer`: Text to display tokens:
 *   - `tokenizer::segments`: Word-boundary segmentation
 *   - `tokenizer::classifier`: Token flags
 *   - `tokenizer::pipeline`: Tokenizing plus long-word splitting
 * - `hyphenation`: Liang pattern engine and pattern repository
 * - `scheduler`: Timed token playback:
 *   - `scheduler::core`: The playback state machine and timing loop
 *   - `scheduler::clock`: Monotonic time source
 * - `source`: Fetching and extraction collaborators
 * - `file_utils`: File system and input operations
 * - `app_controller`: Main application controller
 * - `language_utils`: Language tag utilities
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod errors;
pub mod file_utils;
pub mod hyphenation;
pub mod language_utils;
pub mod scheduler;
pub mod source;
pub mod tokenizer;

// Re-export main types for easier usage
pub use app_config::{Config, PlaybackOptions};
pub use errors::{AppError, ConfigError, SourceError};
pub use hyphenation::{Hyphenator, PatternHyphenator, PatternRepository};
pub use scheduler::core::Scheduler;
pub use scheduler::{ScheduledToken, SchedulerState};
pub use tokenizer::pipeline::TokenPipeline;
pub use tokenizer::{Token, Tokenizer};
