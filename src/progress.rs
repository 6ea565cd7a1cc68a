//! Progress reporting for long pipeline stages.
//!
//! The observer is an explicit handle injected into the pipeline, so the
//! caller decides what, if anything, gets reported. Notifications are
//! best-effort and carry no functional weight.

use tracing::info;

/// Receives progress notifications. Implementations must be cheap and
/// infallible; the pipeline never waits on them.
pub trait ProgressObserver: Sync {
    fn on_progress(&self, stage: &str, completed: usize, total: usize);
}

/// Default observer that forwards progress to `tracing`.
#[derive(Debug, Default)]
pub struct TracingObserver;

impl ProgressObserver for TracingObserver {
    fn on_progress(&self, stage: &str, completed: usize, total: usize) {
        info!(stage, completed, total, "progress");
    }
}

/// Observer that drops every notification.
#[derive(Debug, Default)]
pub struct NullObserver;

impl ProgressObserver for NullObserver {
    fn on_progress(&self, _stage: &str, _completed: usize, _total: usize) {}
}
