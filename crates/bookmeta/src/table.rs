//! Reading the source catalog and writing the enriched table.

use std::io;

use crate::{
    record::{EnrichedRecord, FIELD_NAMES},
    Error, ErrorKind,
};

/// The column holding the lookup key of a source row.
pub const ISBN_COLUMN: &str = "ISBN";

/// A row of the source catalog, columns in file order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SourceRow {
    fields: Vec<(String, String)>,
}

impl SourceRow {
    /// Creates a row from `(column, value)` pairs.
    #[must_use]
    pub const fn new(fields: Vec<(String, String)>) -> Self {
        Self { fields }
    }

    /// The value of the first column named `column`.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value.as_str())
    }

    /// The ISBN of this row, `None` when the column is missing or empty.
    #[must_use]
    pub fn isbn(&self) -> Option<&str> {
        self.get(ISBN_COLUMN).filter(|isbn| !isbn.is_empty())
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for SourceRow
where
    K: Into<String>,
    V: Into<String>,
{
    fn from(fields: [(K, V); N]) -> Self {
        Self::new(
            fields
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// An ISBN to look up along with the index of the source row it came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LookupKey {
    row: usize,
    isbn: String,
}

impl LookupKey {
    /// Index of the source row the key was extracted from.
    #[must_use]
    pub const fn row(&self) -> usize {
        self.row
    }

    /// The ISBN exactly as written in the source row, never empty.
    ///
    /// Hyphens are kept here and in log lines. They are only removed from the request URL, see
    /// [`volumes_url`](crate::api::google_books::volumes_url).
    #[must_use]
    pub fn isbn(&self) -> &str {
        &self.isbn
    }
}

/// Extracts the lookup keys of `rows` in row order.
///
/// Rows without an ISBN are skipped. Repeated ISBNs are kept, one key per row.
#[must_use]
pub fn extract_keys(rows: &[SourceRow]) -> Vec<LookupKey> {
    rows.iter()
        .enumerate()
        .filter_map(|(row, source)| {
            source.isbn().map(|isbn| LookupKey {
                row,
                isbn: isbn.to_owned(),
            })
        })
        .collect()
}

/// Reads CSV with a header row into [`SourceRow`]s.
///
/// Records shorter or longer than the header are accepted, cells without a header are dropped.
///
/// # Errors
///
/// An `Err` of kind [`ErrorKind::Table`] is returned if the CSV cannot be read or is not valid
/// UTF-8.
pub fn read_rows<R: io::Read>(reader: R) -> Result<Vec<SourceRow>, Error> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers = reader
        .headers()
        .map_err(|e| Error::wrap(ErrorKind::Table, e))?
        .clone();

    reader
        .records()
        .map(|record| -> Result<SourceRow, Error> {
            let record = record.map_err(|e| Error::wrap(ErrorKind::Table, e))?;
            Ok(SourceRow::new(
                headers
                    .iter()
                    .zip(record.iter())
                    .map(|(name, value)| (name.to_owned(), value.to_owned()))
                    .collect(),
            ))
        })
        .collect()
}

/// The source rows followed by the records fetched for them.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OutputTable {
    source: Vec<SourceRow>,
    enriched: Vec<EnrichedRecord>,
}

impl OutputTable {
    /// Appends `enriched` after the `source` rows.
    #[must_use]
    pub const fn merge(source: Vec<SourceRow>, enriched: Vec<EnrichedRecord>) -> Self {
        Self { source, enriched }
    }

    /// The source rows, unchanged.
    #[must_use]
    pub fn source_rows(&self) -> &[SourceRow] {
        &self.source
    }

    /// The appended records, in key order.
    #[must_use]
    pub fn enriched_records(&self) -> &[EnrichedRecord] {
        &self.enriched
    }

    /// Number of rows, header excluded.
    #[must_use]
    pub fn len(&self) -> usize {
        self.source.len() + self.enriched.len()
    }

    /// Whether the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Serializes the table as CSV using the [`FIELD_NAMES`] header.
    ///
    /// Source rows are projected on the fixed columns, columns they lack render as empty cells.
    ///
    /// # Errors
    ///
    /// An `Err` of kind [`ErrorKind::Table`] is returned if writing to `writer` fails.
    pub fn write<W: io::Write>(&self, writer: W) -> Result<(), Error> {
        let mut writer = csv::WriterBuilder::new()
            .terminator(csv::Terminator::CRLF)
            .from_writer(writer);
        let table_err = |e: csv::Error| Error::wrap(ErrorKind::Table, e);

        writer.write_record(FIELD_NAMES).map_err(table_err)?;

        for row in &self.source {
            writer
                .write_record(FIELD_NAMES.iter().map(|name| row.get(name).unwrap_or("")))
                .map_err(table_err)?;
        }

        for record in &self.enriched {
            writer.write_record(record.values()).map_err(table_err)?;
        }

        writer
            .flush()
            .map_err(|e| Error::wrap(ErrorKind::Table, e))
    }
}
