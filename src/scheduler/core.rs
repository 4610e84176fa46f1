/*!
 * The playback state machine and its timed emission loop.
 *
 * All mutable playback data sits behind one mutex. The loop task re-checks a
 * generation counter under that mutex right before every emission, and every
 * operation that cancels the loop bumps the counter while holding the same
 * lock, so a cancelled loop can never emit another event.
 */

use log::{debug, trace};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;

use super::clock::{MonotonicClock, TokioClock};
use super::{EVENT_CAPACITY, ScheduledToken, SchedulerState, compute_offsets};
use crate::app_config::PlaybackOptions;
use crate::tokenizer::Token;

struct Playback {
    tokens: Vec<Token>,
    options: PlaybackOptions,
    offsets: Vec<i64>,
    state: SchedulerState,

    /// Next token to emit
    current_index: usize,

    /// Playback time already covered when the loop (re)starts
    elapsed_offset_ms: i64,

    /// Clock time that offset 0 maps to for the running loop
    start_time_ms: i64,

    /// Last token emitted since the last (re)start
    last_emitted: Option<usize>,

    generation: u64,
    task: Option<JoinHandle<()>>,
}

impl Playback {
    fn new(options: PlaybackOptions) -> Self {
        Self {
            tokens: Vec::new(),
            options,
            offsets: Vec::new(),
            state: SchedulerState::Idle,
            current_index: 0,
            elapsed_offset_ms: 0,
            start_time_ms: 0,
            last_emitted: None,
            generation: 0,
            task: None,
        }
    }

    /// Invalidate the running loop, if any
    fn cancel(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    fn last_index(&self) -> Option<usize> {
        self.tokens.len().checked_sub(1)
    }

    fn offset_at(&self, index: usize) -> i64 {
        self.offsets.get(index).copied().unwrap_or(0)
    }
}

struct Shared {
    playback: Mutex<Playback>,
    state: watch::Sender<SchedulerState>,
    events: broadcast::Sender<ScheduledToken>,
    clock: Arc<dyn MonotonicClock>,
}

impl Shared {
    fn transition(&self, playback: &mut Playback, state: SchedulerState) {
        if playback.state != state {
            debug!("Scheduler {:?} -> {:?}", playback.state, state);
        }
        playback.state = state;
        self.state.send_replace(state);
    }
}

/// Paces a token list against a clock
///
/// Every method returns immediately; emission happens on a task spawned on
/// the runtime the scheduler was created in. Dropping the scheduler stops
/// playback.
pub struct Scheduler {
    shared: Arc<Shared>,
    handle: Handle,
}

impl Scheduler {
    /// Scheduler on tokio's clock, bound to the current runtime
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(TokioClock::new()))
    }

    /// Scheduler on a custom clock, bound to the current runtime
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime.
    pub fn with_clock(clock: Arc<dyn MonotonicClock>) -> Self {
        Self::with_handle(Handle::current(), clock)
    }

    pub fn with_handle(handle: Handle, clock: Arc<dyn MonotonicClock>) -> Self {
        let (state, _) = watch::channel(SchedulerState::Idle);
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            shared: Arc::new(Shared {
                playback: Mutex::new(Playback::new(PlaybackOptions::default())),
                state,
                events,
                clock,
            }),
            handle,
        }
    }

    /// Receive every token emitted from now on
    pub fn subscribe(&self) -> broadcast::Receiver<ScheduledToken> {
        self.shared.events.subscribe()
    }

    /// Observe state changes
    pub fn watch_state(&self) -> watch::Receiver<SchedulerState> {
        self.shared.state.subscribe()
    }

    pub fn state(&self) -> SchedulerState {
        self.shared.playback.lock().state
    }

    /// Index of the next token to emit
    pub fn current_index(&self) -> usize {
        self.shared.playback.lock().current_index
    }

    pub fn last_emitted(&self) -> Option<usize> {
        self.shared.playback.lock().last_emitted
    }

    pub fn options(&self) -> PlaybackOptions {
        self.shared.playback.lock().options
    }

    pub fn token_count(&self) -> usize {
        self.shared.playback.lock().tokens.len()
    }

    /// Cumulative offsets of the loaded tokens
    pub fn offsets(&self) -> Vec<i64> {
        self.shared.playback.lock().offsets.clone()
    }

    /// Replace the tokens and options, stopping playback and rewinding
    pub fn load(&self, tokens: Vec<Token>, options: PlaybackOptions) {
        let mut playback = self.shared.playback.lock();
        playback.cancel();

        let options = options.clamped();
        playback.offsets = compute_offsets(&tokens, &options);
        playback.tokens = tokens;
        playback.options = options;
        playback.current_index = 0;
        playback.elapsed_offset_ms = 0;
        playback.last_emitted = None;
        debug!("Loaded {} tokens at {} wpm", playback.tokens.len(), options.wpm);

        self.shared.transition(&mut playback, SchedulerState::Idle);
    }

    /// Start or continue playback; a finished list starts over
    pub fn play(&self) {
        let mut playback = self.shared.playback.lock();
        if playback.tokens.is_empty() {
            return;
        }
        match playback.state {
            SchedulerState::Playing => return,
            SchedulerState::Finished => {
                playback.current_index = 0;
                playback.elapsed_offset_ms = 0;
                playback.last_emitted = None;
            }
            SchedulerState::Idle | SchedulerState::Paused => {}
        }
        self.start_loop(&mut playback);
    }

    pub fn pause(&self) {
        let mut playback = self.shared.playback.lock();
        if playback.state != SchedulerState::Playing {
            return;
        }
        let now = self.shared.clock.now_ms();
        playback.elapsed_offset_ms = (now - playback.start_time_ms).max(0);
        playback.cancel();
        self.shared.transition(&mut playback, SchedulerState::Paused);
    }

    pub fn resume(&self) {
        let mut playback = self.shared.playback.lock();
        if playback.state != SchedulerState::Paused {
            return;
        }
        self.start_loop(&mut playback);
    }

    /// Play from the first token whatever the current state
    pub fn restart(&self) {
        let mut playback = self.shared.playback.lock();
        if playback.tokens.is_empty() {
            return;
        }
        playback.current_index = 0;
        playback.elapsed_offset_ms = 0;
        playback.last_emitted = None;
        self.start_loop(&mut playback);
    }

    pub fn skip_forward(&self) {
        let mut playback = self.shared.playback.lock();
        let delta = playback.options.skip_count as i64;
        self.skip_by(&mut playback, delta);
    }

    pub fn skip_back(&self) {
        let mut playback = self.shared.playback.lock();
        let delta = -(playback.options.skip_count as i64);
        self.skip_by(&mut playback, delta);
    }

    /// Swap timing options without moving the reading position
    ///
    /// While playing, the token on screen keeps its place and the next one
    /// follows after that token's delay under the new options.
    pub fn update_options(&self, options: PlaybackOptions) {
        let mut playback = self.shared.playback.lock();
        let options = options.clamped();
        playback.options = options;

        let Some(last) = playback.last_index() else {
            return;
        };
        playback.offsets = compute_offsets(&playback.tokens, &options);

        let state = playback.state;
        let (anchor, next) = match (state, playback.last_emitted) {
            (SchedulerState::Playing, Some(shown)) => {
                let shown = shown.min(last);
                (shown, shown + 1)
            }
            (SchedulerState::Finished, _) => (last, last),
            _ => {
                let index = playback.current_index.min(last);
                (index, index)
            }
        };

        playback.current_index = next;
        playback.elapsed_offset_ms = playback.offset_at(anchor);
        if next == anchor {
            playback.last_emitted = None;
        }
        debug!("Options updated to {} wpm at token {}", options.wpm, anchor);

        if state == SchedulerState::Playing {
            self.start_loop(&mut playback);
        }
    }

    fn skip_by(&self, playback: &mut Playback, delta: i64) {
        let Some(last) = playback.last_index() else {
            return;
        };
        let base = match (playback.state, playback.last_emitted) {
            (SchedulerState::Playing, Some(shown)) => shown,
            _ => playback.current_index,
        };

        let target = (base as i64 + delta).clamp(0, last as i64) as usize;
        playback.current_index = target;
        playback.elapsed_offset_ms = playback.offset_at(target);
        playback.last_emitted = None;
        debug!("Skipped from token {} to {}", base, target);

        if playback.state == SchedulerState::Playing {
            self.start_loop(playback);
        }
    }

    fn start_loop(&self, playback: &mut Playback) {
        playback.cancel();

        let start_time = self.shared.clock.now_ms() - playback.elapsed_offset_ms;
        playback.start_time_ms = start_time;
        self.shared.transition(playback, SchedulerState::Playing);

        let generation = playback.generation;
        let shared = Arc::clone(&self.shared);
        playback.task = Some(self.handle.spawn(run_loop(shared, generation, start_time)));
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        self.shared.playback.lock().cancel();
    }
}

async fn run_loop(shared: Arc<Shared>, generation: u64, start_time: i64) {
    loop {
        let target = {
            let mut playback = shared.playback.lock();
            if playback.generation != generation {
                return;
            }
            let offset = playback.offsets.get(playback.current_index).copied();
            match offset {
                Some(offset) => start_time + offset,
                None => {
                    playback.task = None;
                    shared.transition(&mut playback, SchedulerState::Finished);
                    return;
                }
            }
        };

        let wait = target - shared.clock.now_ms();
        if wait > 0 {
            tokio::time::sleep(Duration::from_millis(wait as u64)).await;
        }

        let mut playback = shared.playback.lock();
        if playback.generation != generation {
            return;
        }
        let index = playback.current_index;
        let Some(token) = playback.tokens.get(index).cloned() else {
            continue;
        };

        trace!("Emitting token {} at {}", index, target);
        // no receivers is fine
        let _ = shared.events.send(ScheduledToken {
            index,
            token,
            target_time_ms: target,
        });
        playback.last_emitted = Some(index);
        playback.current_index += 1;
    }
}
