/*!
 * Playback scheduling.
 *
 * Each token gets a delay derived from the reading speed and its flags. The
 * delays are summed into absolute offsets once per load or option change,
 * and a single tokio task emits each token when the clock reaches its
 * offset from a fixed reference time.
 */

pub mod clock;
pub mod core;

use crate::app_config::PlaybackOptions;
use crate::tokenizer::Token;

pub use self::clock::{MonotonicClock, TokioClock};
pub use self::core::Scheduler;

/// Capacity of the event channel; lagging subscribers lose the oldest events
pub const EVENT_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SchedulerState {
    #[default]
    Idle,
    Playing,
    Paused,
    Finished,
}

/// "Show token `index` now", sent when the token's target time is reached
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduledToken {
    pub index: usize,
    pub token: Token,

    /// Clock time the token was due, in the scheduler clock's milliseconds
    pub target_time_ms: i64,
}

/// Display time of the token at `index`, in milliseconds
///
/// Factors for each flag multiply together; the first `slow_start_count - 1`
/// tokens are additionally stretched, the first one the most.
pub fn delay_ms(token: &Token, options: &PlaybackOptions, index: usize) -> i64 {
    let mut delay = 60000f32 / options.wpm.max(1) as f32;
    if token.is_sentence_end {
        delay *= options.sentence_delay;
    }
    if token.is_other_punctuation {
        delay *= options.other_punc_delay;
    }
    if token.is_short_word {
        delay *= options.short_word_delay;
    }
    if token.is_long_word {
        delay *= options.long_word_delay;
    }
    if token.is_numeric {
        delay *= options.numeric_delay;
    }

    if options.slow_start_count > 1 {
        let remaining = (options.slow_start_count as i64 - index as i64).max(1);
        delay *= remaining as f32;
    }

    delay as i64
}

/// Offset of every token from the start of playback; the first is always 0
pub fn compute_offsets(tokens: &[Token], options: &PlaybackOptions) -> Vec<i64> {
    let mut offsets = Vec::with_capacity(tokens.len());
    let mut running = 0;
    for (index, token) in tokens.iter().enumerate() {
        offsets.push(running);
        running += delay_ms(token, options, index);
    }
    offsets
}
