//! Drives the lookups of every key and gathers the records they produce.

use std::{
    num::NonZeroUsize,
    sync::atomic::{AtomicUsize, Ordering},
    time::Duration,
};

use log::{info, trace, warn};
use rayon::{prelude::*, ThreadPoolBuilder};

use crate::{
    api::{google_books::GOOGLE_BOOKS_URL, Client},
    lookup::{LookupClient, RetryPolicy, DEFAULT_TIMEOUT},
    record::{normalize, EnrichedRecord},
    table::LookupKey,
};

/// Settings of a single enrichment run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunConfig {
    /// Lookup URL prefix, the ISBN is appended to it.
    pub endpoint: String,
    /// Retry settings applied to every key.
    pub retry: RetryPolicy,
    /// Time allowed for a single attempt.
    pub timeout: Duration,
    /// Number of keys looked up at the same time.
    pub concurrency: NonZeroUsize,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            endpoint: GOOGLE_BOOKS_URL.to_owned(),
            retry: RetryPolicy::default(),
            timeout: DEFAULT_TIMEOUT,
            concurrency: NonZeroUsize::new(1).expect("1 is not zero"),
        }
    }
}

/// Looks up every key and normalizes the responses.
///
/// Keys are processed one at a time unless the configured concurrency is above 1, in which case
/// they are spread over a dedicated thread pool of at most that many threads. Records are always
/// returned in key order.
#[derive(Debug)]
pub struct Orchestrator<C> {
    lookup: LookupClient<C>,
    concurrency: NonZeroUsize,
    progress: AtomicUsize,
}

impl<C: Client + Sync> Orchestrator<C> {
    /// Creates an orchestrator sending its requests through `client`.
    pub fn new(client: C, config: &RunConfig) -> Self {
        Self {
            lookup: LookupClient::with_endpoint(client, config.endpoint.as_str(), config.retry),
            concurrency: config.concurrency,
            progress: AtomicUsize::new(0),
        }
    }

    /// Number of keys dispatched so far.
    pub fn dispatched(&self) -> usize {
        self.progress.load(Ordering::Relaxed)
    }

    /// Fetches a record for every key, in key order.
    ///
    /// Keys whose lookup fails or finds no volume contribute nothing.
    pub fn fetch_all(&self, keys: &[LookupKey]) -> Vec<EnrichedRecord> {
        let workers = self.concurrency.get().min(keys.len());

        let slots: Vec<Option<EnrichedRecord>> = if workers <= 1 {
            keys.iter().map(|key| self.fetch_one(key)).collect()
        } else {
            self.fetch_pooled(keys, workers)
        };

        let records: Vec<_> = slots.into_iter().flatten().collect();
        info!("Fetched {} records for {} ISBNs", records.len(), keys.len());
        records
    }

    fn fetch_one(&self, key: &LookupKey) -> Option<EnrichedRecord> {
        let count = self.progress.fetch_add(1, Ordering::Relaxed) + 1;
        info!("Fetching data for ISBN: {} - No. {count}", key.isbn());

        let record = self.lookup.fetch(key.isbn()).and_then(normalize);
        if record.is_none() {
            trace!("No record for ISBN {} (row {})", key.isbn(), key.row());
        }
        record
    }

    fn fetch_pooled(&self, keys: &[LookupKey], workers: usize) -> Vec<Option<EnrichedRecord>> {
        let pool = match ThreadPoolBuilder::new().num_threads(workers).build() {
            Ok(pool) => pool,
            Err(err) => {
                warn!("Cannot start {workers} lookup threads, running sequentially - {err}");
                return keys.iter().map(|key| self.fetch_one(key)).collect();
            }
        };

        trace!("Fetching {} ISBNs with {workers} workers", keys.len());
        // indexed collect, slot `i` holds the outcome of `keys[i]`
        pool.install(|| keys.par_iter().map(|key| self.fetch_one(key)).collect())
    }
}
