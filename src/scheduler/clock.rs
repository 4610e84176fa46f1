use tokio::time::Instant;

/// Milliseconds on a clock that never goes backwards
///
/// The scheduler sleeps on tokio's timer, so an implementation must advance
/// together with tokio time for targets and wake-ups to agree.
pub trait MonotonicClock: Send + Sync {
    fn now_ms(&self) -> i64;
}

/// Milliseconds since the clock was created, read from tokio's clock
///
/// Under a paused test runtime this follows virtual time exactly.
#[derive(Debug, Clone, Copy)]
pub struct TokioClock {
    origin: Instant,
}

impl TokioClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for TokioClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock for TokioClock {
    fn now_ms(&self) -> i64 {
        self.origin.elapsed().as_millis() as i64
    }
}
