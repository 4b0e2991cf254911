//! Seeder engine: HTTP, search, collection store and cleanup sweeps.
mod acquisition;
mod classify;
mod cleanup;
mod decode;
mod dedup;
mod download;
mod fetch;
mod links;
mod search;
mod store;
mod types;
mod validate;

pub use acquisition::{AcquisitionLoop, IterationReport};
pub use classify::{label_matches, InferClassifier, TypeClassifier, SNIFF_LEN};
pub use cleanup::sanitize_collection;
pub use decode::{decode_page, DecodedPage};
pub use dedup::{fingerprint, Deduplicator, Fingerprint};
pub use download::{DownloadError, DownloadWorker};
pub use fetch::{FetchSettings, Fetcher, ReqwestFetcher, DEFAULT_USER_AGENT};
pub use links::{extract_absolute_links, DEFAULT_MAX_LINKS};
pub use search::{
    HtmlSearchClient, SearchBackend, SearchError, SearchSettings, DEFAULT_EXCLUDED_HOST_PREFIXES,
    DEFAULT_SEARCH_ENDPOINT,
};
pub use store::{ensure_store_dir, CollectionStore, StoreError, ITEM_NAME_LEN};
pub use types::{FailureKind, FetchError, FetchMetadata, FetchOutput};
pub use validate::Validator;
