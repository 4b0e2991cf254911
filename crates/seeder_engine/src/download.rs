use std::io;
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use seeder_core::Stats;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::{CollectionStore, FetchError, Fetcher, StoreError};

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),
    #[error("store write failed: {0}")]
    Store(#[from] StoreError),
    #[error("cancelled before completion")]
    Cancelled,
}

/// Fetches candidate URLs into the collection store, one at a time.
pub struct DownloadWorker {
    fetcher: Arc<dyn Fetcher>,
    store: Arc<CollectionStore>,
    stats: Arc<Stats>,
    rng: StdRng,
}

impl DownloadWorker {
    pub fn new(fetcher: Arc<dyn Fetcher>, store: Arc<CollectionStore>, stats: Arc<Stats>) -> Self {
        Self::with_rng(fetcher, store, stats, StdRng::from_entropy())
    }

    pub fn with_rng(
        fetcher: Arc<dyn Fetcher>,
        store: Arc<CollectionStore>,
        stats: Arc<Stats>,
        rng: StdRng,
    ) -> Self {
        Self {
            fetcher,
            store,
            stats,
            rng,
        }
    }

    /// Downloads `url` and stores it under a new random name.
    ///
    /// The attempt is counted before the request goes out and counted as a
    /// failure on any error, including cancellation. Nothing is written to the
    /// store once `cancel` has fired.
    pub async fn download(
        &mut self,
        url: &str,
        cancel: &CancellationToken,
    ) -> Result<String, DownloadError> {
        let stats = Arc::clone(&self.stats);
        let attempt = stats.begin_attempt();

        let fetched = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(DownloadError::Cancelled),
            result = self.fetcher.fetch(url) => result.map_err(DownloadError::from),
        };
        let stored = match fetched {
            Ok(_) if cancel.is_cancelled() => Err(DownloadError::Cancelled),
            Ok(output) => self.store_bytes(output.bytes).await,
            Err(err) => Err(err),
        };

        if stored.is_err() {
            attempt.fail();
        }
        stored
    }

    /// Writes on the blocking pool; once started the write is awaited to completion.
    async fn store_bytes(&mut self, bytes: Vec<u8>) -> Result<String, DownloadError> {
        let store = Arc::clone(&self.store);
        let mut rng = StdRng::seed_from_u64(self.rng.gen());
        let name = tokio::task::spawn_blocking(move || store.insert(&bytes, &mut rng))
            .await
            .map_err(|err| StoreError::Io(io::Error::from(err)))??;
        Ok(name)
    }
}
