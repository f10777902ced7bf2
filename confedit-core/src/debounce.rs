//! Coalescing of bursty input.
//!
//! Text edits arrive once per keystroke; reparsing on each one is wasted work.
//! A `Debouncer` keeps only the latest value and releases it once no new value
//! has arrived for `window`.

use std::time::{Duration, Instant};

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

#[derive(Debug)]
pub struct Debouncer<T> {
    window: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> Default for Debouncer<T> {
    fn default() -> Self {
        Debouncer::new(DEFAULT_DEBOUNCE)
    }
}

impl<T> Debouncer<T> {
    pub fn new(window: Duration) -> Self {
        Debouncer {
            window,
            pending: None,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Queue `value`, replacing anything pending and restarting the window.
    pub fn push(&mut self, value: T, now: Instant) {
        self.pending = Some((value, now + self.window));
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, deadline)| *deadline)
    }

    /// Release the pending value if its window has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match self.deadline() {
            Some(deadline) if now >= deadline => self.flush(),
            _ => None,
        }
    }

    /// Release the pending value immediately.
    pub fn flush(&mut self) -> Option<T> {
        self.pending.take().map(|(value, _)| value)
    }

    /// Wait out the window, then release the pending value.
    pub async fn settle(&mut self) -> Option<T> {
        if let Some(deadline) = self.deadline() {
            tokio::time::sleep_until(tokio::time::Instant::from_std(deadline)).await;
        }
        self.flush()
    }
}
