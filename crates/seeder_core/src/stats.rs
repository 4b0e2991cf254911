use std::sync::atomic::{AtomicU64, Ordering};

/// Process-wide counters shared by the acquisition loop, the progress reporter
/// and the shutdown coordinator.
///
/// `failed_downloads <= num_downloads` holds at every observation point: a
/// failure can only be recorded through an [`Attempt`], which has already been
/// counted, and [`Stats::snapshot`] reads the failure counter first.
#[derive(Debug, Default)]
pub struct Stats {
    num_downloads: AtomicU64,
    failed_downloads: AtomicU64,
    elapsed_secs: AtomicU64,
}

/// Point-in-time copy of [`Stats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatsSnapshot {
    pub num_downloads: u64,
    pub failed_downloads: u64,
    pub elapsed_secs: u64,
}

/// One counted download attempt. Dropping it records success.
#[must_use = "an attempt that fails must be reported with `fail`"]
#[derive(Debug)]
pub struct Attempt<'a> {
    stats: &'a Stats,
}

impl Attempt<'_> {
    pub fn fail(self) {
        self.stats.failed_downloads.fetch_add(1, Ordering::SeqCst);
    }
}

impl Stats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts a URL handed to the download worker.
    pub fn begin_attempt(&self) -> Attempt<'_> {
        self.num_downloads.fetch_add(1, Ordering::SeqCst);
        Attempt { stats: self }
    }

    /// Advances the elapsed-time counter by one second and returns the new value.
    pub fn tick(&self) -> u64 {
        self.elapsed_secs.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn num_downloads(&self) -> u64 {
        self.num_downloads.load(Ordering::SeqCst)
    }

    pub fn failed_downloads(&self) -> u64 {
        self.failed_downloads.load(Ordering::SeqCst)
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed_secs.load(Ordering::SeqCst)
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        // Failures first: both counters only grow and an attempt is counted
        // before its failure, so this order can never observe failed > total.
        let failed_downloads = self.failed_downloads();
        let num_downloads = self.num_downloads();
        StatsSnapshot {
            num_downloads,
            failed_downloads,
            elapsed_secs: self.elapsed_secs(),
        }
    }
}
