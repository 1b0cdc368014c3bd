use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use jiff::{SignedDuration, Timestamp};

/// External stopping levers for a running search: an optional wall-clock
/// deadline and a stop flag that can be raised from another thread. Both
/// are polled between outer iterations; iteration counts are otherwise
/// the only stopping mechanism a strategy has.
#[derive(Clone, Debug, Default)]
pub struct SearchControl {
    deadline: Option<SignedDuration>,
    stop: Arc<AtomicBool>,
}

impl SearchControl {
    pub fn new() -> Self {
        SearchControl::default()
    }

    pub fn with_deadline(deadline: SignedDuration) -> Self {
        SearchControl {
            deadline: Some(deadline),
            stop: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Handle for requesting a stop from outside the search loop.
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop)
    }

    pub fn stop(&self) {
        self.stop.store(true, Ordering::Relaxed);
    }

    pub fn should_stop(&self, started: Timestamp) -> bool {
        if self.stop.load(Ordering::Relaxed) {
            return true;
        }
        match self.deadline {
            Some(deadline) => Timestamp::now().duration_since(started) > deadline,
            None => false,
        }
    }
}
