use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info, warn};
use serde::Serialize;
use std::io::BufRead;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::broadcast::error::{RecvError, TryRecvError};
use tokio::sync::mpsc;

use crate::app_config::{Config, PlaybackOptions};
use crate::hyphenation::{LayeredPatterns, PatternHyphenator, PatternRepository};
use crate::language_utils::{self, LanguageResolver};
use crate::scheduler::{self, ScheduledToken, Scheduler, SchedulerState};
use crate::source::ReadingInput;
use crate::tokenizer::{Token, TokenPipeline};

// @module: Application controller for reading sessions

/// Words per minute added or removed by one speed command
pub const WPM_STEP: u32 = 25;

/// A live control typed while reading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackCommand {
    Pause,
    Resume,
    Restart,
    SkipForward,
    SkipBack,
    Faster,
    Slower,
    Quit,
}

impl PlaybackCommand {
    // @parses: One input line, case-insensitive
    pub fn parse(line: &str) -> Option<Self> {
        match line.trim().to_ascii_lowercase().as_str() {
            "p" | "pause" => Some(Self::Pause),
            "r" | "resume" => Some(Self::Resume),
            "s" | "restart" => Some(Self::Restart),
            "f" | "forward" => Some(Self::SkipForward),
            "b" | "back" => Some(Self::SkipBack),
            "+" | "faster" => Some(Self::Faster),
            "-" | "slower" => Some(Self::Slower),
            "q" | "quit" => Some(Self::Quit),
            _ => None,
        }
    }
}

/// One row of the token listing
#[derive(Debug, Serialize)]
pub struct TokenRow<'a> {
    pub index: usize,
    pub offset_ms: i64,
    pub delay_ms: i64,
    #[serde(flatten)]
    pub token: &'a Token,
}

/// Main application controller for reading text
pub struct Controller {
    // @field: App configuration
    config: Config,

    // @field: Tokenizer and long-word splitter sharing one pattern cache
    pipeline: TokenPipeline,

    resolver: LanguageResolver,
}

impl Controller {
    /// Create a new controller for test purposes with default configuration
    pub fn new_for_test() -> Result<Self> {
        Self::with_config(Config::default())
    }

    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        let config = config.clamped();
        config.validate().context("Configuration validation failed")?;

        let patterns_dir = config.hyphenation.effective_patterns_dir();
        if let Some(dir) = &patterns_dir {
            debug!("Hyphenation patterns directory: {:?}", dir);
        }
        let repository = PatternRepository::new(Box::new(LayeredPatterns::with_directory(patterns_dir)));
        let pipeline = TokenPipeline::new(PatternHyphenator::new(Arc::new(repository)));
        let resolver = LanguageResolver::new(config.language.auto_detect_from_html);

        Ok(Self {
            config,
            pipeline,
            resolver,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn pipeline(&self) -> &TokenPipeline {
        &self.pipeline
    }

    /// Language to read `input` in: document, then configured default, then system locale
    pub fn resolve_language(&self, input: &ReadingInput) -> String {
        let device_locale = language_utils::system_locale_tag();
        input
            .resolve_language(
                &self.resolver,
                self.config.language.default_language_tag.as_deref(),
                Some(&device_locale),
            )
            .unwrap_or_else(|| language_utils::DEFAULT_LANGUAGE_TAG.to_string())
    }

    /// Tokenize and split the input into final display tokens
    pub fn prepare_tokens(&self, input: &ReadingInput) -> Vec<Token> {
        let tag = self.resolve_language(input);
        let tokens = self.pipeline.build_tokens(
            &input.text,
            Some(&tag),
            self.config.text_handling.max_word_length,
        );

        info!(
            "Prepared {} tokens in {} ({})",
            tokens.len(),
            language_utils::get_language_name(&tag).unwrap_or_else(|| tag.clone()),
            tag
        );
        tokens
    }

    /// Rows pairing every token with its delay and offset
    pub fn token_rows<'a>(&self, tokens: &'a [Token]) -> Vec<TokenRow<'a>> {
        let options = self.config.playback.clamped();
        let offsets = scheduler::compute_offsets(tokens, &options);

        tokens
            .iter()
            .enumerate()
            .map(|(index, token)| TokenRow {
                index,
                offset_ms: offsets[index],
                delay_ms: scheduler::delay_ms(token, &options, index),
                token,
            })
            .collect()
    }

    /// Plain-text token listing with flags and schedule
    pub fn format_token_table(&self, tokens: &[Token]) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "{:>5}  {:>8}  {:>6}  {:<5}  {}\n",
            "#", "offset", "delay", "flags", "token"
        ));
        for row in self.token_rows(tokens) {
            out.push_str(&format!(
                "{:>5}  {:>8}  {:>6}  {:<5}  {}\n",
                row.index,
                row.offset_ms,
                row.delay_ms,
                Self::flag_string(row.token),
                row.token.text
            ));
        }
        out
    }

    /// JSON token listing
    pub fn format_token_json(&self, tokens: &[Token]) -> Result<String> {
        serde_json::to_string_pretty(&self.token_rows(tokens)).context("Failed to serialize tokens")
    }

    // Flags as letters: Sentence end, Punctuation, Numeric, short (s), Long
    fn flag_string(token: &Token) -> String {
        [
            (token.is_sentence_end, 'S'),
            (token.is_other_punctuation, 'P'),
            (token.is_numeric, 'N'),
            (token.is_short_word, 's'),
            (token.is_long_word, 'L'),
        ]
        .iter()
        .map(|&(set, flag)| if set { flag } else { '.' })
        .collect()
    }

    /// Text shown for the token at `index`, optionally between its neighbours
    pub fn display_text(tokens: &[Token], index: usize, show_flankers: bool) -> String {
        let current = tokens.get(index).map(|t| t.text.as_str()).unwrap_or_default();
        if !show_flankers {
            return current.to_string();
        }

        let previous = index
            .checked_sub(1)
            .and_then(|i| tokens.get(i))
            .map(|t| t.text.as_str())
            .unwrap_or_default();
        let next = tokens.get(index + 1).map(|t| t.text.as_str()).unwrap_or_default();
        format!("\x1B[2m{}\x1B[0m  \x1B[1m{}\x1B[0m  \x1B[2m{}\x1B[0m", previous, current, next)
    }

    /// Apply a live control; returns false when reading should stop
    pub fn apply_command(scheduler: &Scheduler, command: PlaybackCommand) -> bool {
        match command {
            PlaybackCommand::Pause => scheduler.pause(),
            PlaybackCommand::Resume => scheduler.resume(),
            PlaybackCommand::Restart => scheduler.restart(),
            PlaybackCommand::SkipForward => scheduler.skip_forward(),
            PlaybackCommand::SkipBack => scheduler.skip_back(),
            PlaybackCommand::Faster | PlaybackCommand::Slower => {
                let options = scheduler.options();
                let wpm = match command {
                    PlaybackCommand::Faster => options.wpm.saturating_add(WPM_STEP),
                    _ => options.wpm.saturating_sub(WPM_STEP),
                };
                scheduler.update_options(PlaybackOptions { wpm, ..options });
                info!("Speed: {} wpm", scheduler.options().wpm);
            }
            PlaybackCommand::Quit => return false,
        }
        true
    }

    /// Read the tokens aloud on the terminal until finished or quit
    ///
    /// With `interactive` set, lines typed on stdin control playback.
    pub async fn run_reading(&self, tokens: Vec<Token>, interactive: bool) -> Result<()> {
        if tokens.is_empty() {
            warn!("Nothing to read");
            return Ok(());
        }

        let start_time = Instant::now();
        let total = tokens.len();
        let show_flankers = self.config.text_handling.show_flankers;

        let progress_bar = ProgressBar::new(total as u64);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] {pos}/{len} {msg}")
            .or_else(|_| ProgressStyle::default_bar().template("{pos}/{len} {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(style);

        let scheduler = Scheduler::new();
        let mut events = scheduler.subscribe();
        let mut state = scheduler.watch_state();
        scheduler.load(tokens.clone(), self.config.playback);
        scheduler.play();
        info!(
            "Reading {} tokens at {} wpm{}",
            total,
            scheduler.options().wpm,
            if interactive { " (p/r/s/f/b/+/-/q + Enter)" } else { "" }
        );

        let mut commands = interactive.then(spawn_command_reader);

        let render = |event: &ScheduledToken| {
            progress_bar.set_position(event.index as u64 + 1);
            progress_bar.set_message(Self::display_text(&tokens, event.index, show_flankers));
        };

        loop {
            tokio::select! {
                event = events.recv() => match event {
                    Ok(event) => render(&event),
                    Err(RecvError::Lagged(skipped)) => debug!("Display fell behind by {} tokens", skipped),
                    Err(RecvError::Closed) => break,
                },
                changed = state.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let current = *state.borrow_and_update();
                    debug!("Playback state: {:?}", current);
                    if current == SchedulerState::Finished {
                        loop {
                            match events.try_recv() {
                                Ok(event) => render(&event),
                                Err(TryRecvError::Lagged(_)) => continue,
                                Err(_) => break,
                            }
                        }
                        break;
                    }
                },
                line = next_line(&mut commands) => match line {
                    Some(line) => match PlaybackCommand::parse(&line) {
                        Some(command) => {
                            if !Self::apply_command(&scheduler, command) {
                                break;
                            }
                        }
                        None => warn!("Unknown command '{}'", line.trim()),
                    },
                    None => commands = None,
                },
                _ = tokio::signal::ctrl_c() => break,
            }
        }

        progress_bar.finish();
        info!(
            "Read {} of {} tokens in {}",
            scheduler.last_emitted().map_or(0, |i| i + 1),
            total,
            Self::format_duration(start_time.elapsed())
        );
        Ok(())
    }

    // Format duration in a human-readable format (HH:MM:SS)
    fn format_duration(duration: std::time::Duration) -> String {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}

// Stdin is read on its own thread so a pending read never holds up shutdown
fn spawn_command_reader() -> mpsc::UnboundedReceiver<String> {
    let (sender, receiver) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else {
                break;
            };
            if sender.send(line).is_err() {
                break;
            }
        }
    });
    receiver
}

// Next control line, or never when controls are off
async fn next_line(commands: &mut Option<mpsc::UnboundedReceiver<String>>) -> Option<String> {
    match commands {
        Some(receiver) => receiver.recv().await,
        None => std::future::pending().await,
    }
}
