use std::sync::Arc;
use std::time::Duration;

use seeder_core::{Query, QueryGenerator};
use seeder_logging::{seeder_debug, seeder_info, seeder_warn};
use tokio_util::sync::CancellationToken;

use crate::{DownloadWorker, SearchBackend};

/// Outcome of one query → search → download round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IterationReport {
    pub query: Query,
    pub candidates: usize,
    pub downloaded: usize,
    pub failed: usize,
    pub search_failed: bool,
    /// Consecutive failed searches ending with this one; 0 after a success.
    pub search_failure_streak: u32,
    pub interrupted: bool,
}

impl IterationReport {
    fn new(query: Query) -> Self {
        Self {
            query,
            candidates: 0,
            downloaded: 0,
            failed: 0,
            search_failed: false,
            search_failure_streak: 0,
            interrupted: false,
        }
    }
}

/// The main acquisition loop. Runs until its cancellation token fires.
///
/// Every await point races the token, so once it fires the loop returns
/// promptly and performs no further store writes.
pub struct AcquisitionLoop {
    queries: QueryGenerator,
    search: Arc<dyn SearchBackend>,
    worker: DownloadWorker,
    delay: Duration,
    cancel: CancellationToken,
    search_failures: u32,
}

impl AcquisitionLoop {
    pub fn new(
        queries: QueryGenerator,
        search: Arc<dyn SearchBackend>,
        worker: DownloadWorker,
        delay: Duration,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            queries,
            search,
            worker,
            delay,
            cancel,
            search_failures: 0,
        }
    }

    /// Loops until cancelled and returns the number of iterations started.
    pub async fn run(mut self) -> u64 {
        let mut iterations = 0u64;
        while !self.cancel.is_cancelled() {
            iterations += 1;
            let report = self.run_iteration().await;
            seeder_debug!(
                "iteration {}: {:?} -> {} candidates, {} stored, {} failed",
                iterations,
                report.query.as_str(),
                report.candidates,
                report.downloaded,
                report.failed
            );
            if report.interrupted || !self.pause().await {
                break;
            }
        }
        seeder_info!("acquisition stopped after {} iterations", iterations);
        iterations
    }

    pub async fn run_iteration(&mut self) -> IterationReport {
        let mut report = IterationReport::new(self.queries.next_query());

        let searched = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => None,
            result = self.search.search(&report.query) => Some(result),
        };
        let candidates = match searched {
            None => {
                report.interrupted = true;
                return report;
            }
            Some(Ok(urls)) => {
                if self.search_failures > 0 {
                    seeder_info!("search recovered after {} failures", self.search_failures);
                    self.search_failures = 0;
                }
                urls
            }
            Some(Err(err)) => {
                // Warn once per run of failures.
                self.search_failures += 1;
                if self.search_failures == 1 {
                    seeder_warn!("search for {:?} failed: {}", report.query.as_str(), err);
                } else {
                    seeder_debug!("search for {:?} failed: {}", report.query.as_str(), err);
                }
                report.search_failed = true;
                report.search_failure_streak = self.search_failures;
                Vec::new()
            }
        };
        report.candidates = candidates.len();

        for url in candidates {
            if self.cancel.is_cancelled() {
                report.interrupted = true;
                break;
            }
            match self.worker.download(url.as_str(), &self.cancel).await {
                Ok(name) => {
                    seeder_debug!("stored {} as {}", url, name);
                    report.downloaded += 1;
                }
                Err(err) => {
                    seeder_debug!("download of {} failed: {}", url, err);
                    report.failed += 1;
                }
            }
        }
        report.interrupted |= self.cancel.is_cancelled();
        report
    }

    /// Waits out the inter-iteration delay. Returns `false` if cancelled meanwhile.
    async fn pause(&self) -> bool {
        if self.delay.is_zero() {
            tokio::task::yield_now().await;
            return !self.cancel.is_cancelled();
        }
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => false,
            _ = tokio::time::sleep(self.delay) => true,
        }
    }
}
