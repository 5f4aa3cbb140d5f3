use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared active/passive switch, read fresh at the top of every cycle.
///
/// A passive replica keeps its loop alive but skips the sync work.
#[derive(Debug, Clone)]
pub struct ActiveFlag(Arc<AtomicBool>);

impl ActiveFlag {
    pub fn active() -> Self {
        Self(Arc::new(AtomicBool::new(true)))
    }

    pub fn passive() -> Self {
        Self(Arc::new(AtomicBool::new(false)))
    }

    pub fn is_active(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    pub fn set_active(&self, active: bool) {
        self.0.store(active, Ordering::SeqCst);
    }
}

impl Default for ActiveFlag {
    fn default() -> Self {
        Self::active()
    }
}
