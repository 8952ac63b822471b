// src/session/debounce.rs
//
// Cancellable scheduled computation for live text input.
//
// The timer owns at most one pending fire. Scheduling replaces whatever
// was pending, so within a burst of keystrokes only the last scheduled
// fire survives. Time is a caller-supplied millisecond clock; the timer
// never touches a platform timer primitive.

/// Quiet period after the last keystroke before a live computation fires.
pub const DEFAULT_DEBOUNCE_MS: u64 = 400;

#[derive(Debug, Clone)]
struct Pending {
    deadline_ms: u64,
    payload: String,
}

/// Debounce timer with "schedule replaces pending" semantics.
#[derive(Debug, Clone)]
pub struct DebounceTimer {
    delay_ms: u64,
    pending: Option<Pending>,
}

impl DebounceTimer {
    pub fn new(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            pending: None,
        }
    }

    /// Schedule a fire `delay_ms` from `now_ms`, replacing any pending one.
    pub fn schedule(&mut self, payload: impl Into<String>, now_ms: u64) {
        self.pending = Some(Pending {
            deadline_ms: now_ms + self.delay_ms,
            payload: payload.into(),
        });
    }

    /// Drop the pending fire, if any.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Deadline of the pending fire, for embeddings that want to sleep
    /// until it.
    pub fn deadline_ms(&self) -> Option<u64> {
        self.pending.as_ref().map(|p| p.deadline_ms)
    }

    /// Yield the payload once its deadline has passed. Returns `None`
    /// while the quiet window is still open or nothing is scheduled.
    pub fn take_due(&mut self, now_ms: u64) -> Option<String> {
        match &self.pending {
            Some(p) if now_ms >= p.deadline_ms => self.pending.take().map(|p| p.payload),
            _ => None,
        }
    }
}

impl Default for DebounceTimer {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE_MS)
    }
}
