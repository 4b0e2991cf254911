use crate::Summary;

/// Side effects requested by [`crate::update`], executed by the application in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Stop the acquisition loop and wait until it no longer writes to the store.
    HaltAcquisition,
    /// Stop the progress reporter and wait for its last tick.
    StopReporter,
    /// Run the validator sweep, then the deduplicator sweep.
    RunCleanup,
    PrintSummary(Summary),
    Exit,
}
