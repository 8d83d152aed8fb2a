#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::perf,
    clippy::style,
    clippy::missing_safety_doc,
    clippy::missing_const_for_fn
)]
#![warn(missing_docs, rust_2018_idioms)]
#![allow(clippy::module_name_repetitions)]

//! # bookmeta
//!
//! bookmeta enriches a catalog of books, identified by ISBN, with the metadata the Google Books
//! API holds for them. Every ISBN of the catalog is looked up (with retries), the first volume
//! found is flattened into an [`EnrichedRecord`], and the records are appended after the
//! catalog rows in a fixed 21-column [`OutputTable`].

pub mod api;
mod error;
pub mod fetch;
pub mod lookup;
pub mod record;
pub mod table;

pub use error::{Error, ErrorKind};
pub use fetch::{Orchestrator, RunConfig};
pub use record::EnrichedRecord;
pub use table::{OutputTable, SourceRow};

use log::{trace, warn};

/// Enriches `rows` using the default HTTP client.
///
/// # Errors
///
/// An `Err` is returned only when the HTTP client cannot be built. Lookups that fail are logged
/// and leave the table without a record for their row.
#[inline]
pub fn enrich(rows: Vec<SourceRow>, config: &RunConfig) -> Result<OutputTable, Error> {
    trace!("Building HTTP client with a {:?} timeout", config.timeout);
    let client = api::http_client(config.timeout)?;
    Ok(enrich_with(rows, client, config))
}

/// Enriches `rows` sending every lookup through `client`.
///
/// The rows are returned unchanged, followed by one record per ISBN the lookup service knows.
pub fn enrich_with<C>(rows: Vec<SourceRow>, client: C, config: &RunConfig) -> OutputTable
where
    C: api::Client + Sync,
{
    let keys = table::extract_keys(&rows);

    let skipped = rows.len() - keys.len();
    if skipped > 0 {
        warn!("{skipped} rows have no ISBN and will not be looked up");
    }

    let records = Orchestrator::new(client, config).fetch_all(&keys);
    OutputTable::merge(rows, records)
}
