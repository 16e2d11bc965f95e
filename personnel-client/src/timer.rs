use std::time::{Duration, Instant};

/// A single scheduled-cancelable deadline. The store owns one per concern
/// (search debounce, delete confirmation) and drives them from `on_tick`;
/// rescheduling supersedes the previous deadline, which is how a keystroke
/// inside the debounce window restarts it.
#[derive(Debug, Default)]
pub struct DeadlineTimer {
    fires_at: Option<Instant>,
}

impl DeadlineTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, now: Instant, window: Duration) {
        self.fires_at = Some(now + window);
    }

    pub fn cancel(&mut self) {
        self.fires_at = None;
    }

    pub fn is_scheduled(&self) -> bool {
        self.fires_at.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.fires_at
    }

    /// Fires at most once per schedule: a due timer is cleared as it fires.
    pub fn fire_if_due(&mut self, now: Instant) -> bool {
        match self.fires_at {
            Some(deadline) if now >= deadline => {
                self.fires_at = None;
                true
            }
            _ => false,
        }
    }
}
