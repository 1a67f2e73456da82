//! Cancellation flag for in-flight checkouts.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// A cheap clonable cancellation flag.
///
/// The orchestrator polls it at state-transition boundaries and honors
/// it only while no financial record exists; once bill creation has
/// started the attempt runs to completion regardless.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    /// Creates a token in the not-cancelled state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation. All clones observe it.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Returns true if cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}
