#[cfg(test)]
#[path = "typing_test.rs"]
mod tests;

use std::time::Duration;

use tokio::time::Instant;

/// Trailing-edge debounce of local keystrokes into typing/stopTyping signals.
pub struct TypingDebouncer {
    quiet: Duration,
    deadline: Option<Instant>,
}

impl TypingDebouncer {
    pub fn new(quiet: Duration) -> TypingDebouncer {
        return TypingDebouncer {
            quiet,
            deadline: None,
        };
    }

    /// Records a keystroke and pushes the stopTyping deadline out. Returns true
    /// when this keystroke starts a new burst and `typing` should be emitted.
    pub fn keystroke(&mut self, now: Instant) -> bool {
        let starts_burst = self.deadline.is_none();
        self.deadline = Some(now + self.quiet);

        return starts_burst;
    }

    pub fn deadline(&self) -> Option<Instant> {
        return self.deadline;
    }

    /// Returns true exactly once when the quiet period has elapsed, at which
    /// point `stopTyping` should be emitted.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                return true;
            }
            _ => {
                return false;
            }
        }
    }

    /// Drops the pending deadline without firing.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }
}
